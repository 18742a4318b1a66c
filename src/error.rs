//! Error types for the wanderlens library.
//!
//! Users only ever see two failure classes:
//!
//! * [`ItineraryError::GenerationFailed`] — the model call failed for any
//!   reason. The message is always the generic "Failed to generate
//!   itinerary"; the underlying cause is kept in `detail` for logs.
//!
//! * [`ItineraryError::ExportFailed`] and friends — the PDF could not be
//!   produced or written.
//!
//! The remaining variants cover caller mistakes (blank request fields,
//! out-of-range configuration) that a form would have rejected up front.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the wanderlens library.
#[derive(Debug, Error)]
pub enum ItineraryError {
    // ── Request errors ────────────────────────────────────────────────────
    /// A required request field was blank.
    #[error("'{field}' is required")]
    InvalidRequest { field: &'static str },

    /// The lifestyle string did not name a known category.
    #[error("Unknown lifestyle '{value}': expected luxury, comfort, budget or backpacker")]
    UnknownLifestyle { value: String },

    // ── Generation errors ─────────────────────────────────────────────────
    /// Any failure of the model call. Deliberately undifferentiated.
    #[error("Failed to generate itinerary")]
    GenerationFailed { detail: String },

    // ── Export errors ─────────────────────────────────────────────────────
    /// Export was triggered on a region with nothing rendered in it.
    #[error("Nothing to export: the itinerary region is empty")]
    EmptyRegion,

    /// The PDF writer failed.
    #[error("PDF export failed: {detail}")]
    ExportFailed { detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium (or pass --pdfium-lib) to use an\n\
existing copy, or install pdfium where the system loader can find it.\n"
    )]
    PdfiumBindingFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ItineraryError {
    /// Wrap any displayable cause as a generation failure.
    pub(crate) fn generation(detail: impl std::fmt::Display) -> Self {
        ItineraryError::GenerationFailed {
            detail: detail.to_string(),
        }
    }

    /// Wrap any displayable cause as an export failure.
    pub(crate) fn export(detail: impl std::fmt::Display) -> Self {
        ItineraryError::ExportFailed {
            detail: detail.to_string(),
        }
    }

    /// The underlying cause of a generation failure, if this is one.
    pub fn generation_detail(&self) -> Option<&str> {
        match self {
            ItineraryError::GenerationFailed { detail } => Some(detail),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_failure_message_is_generic() {
        let e = ItineraryError::generation("HTTP 503: backend overloaded");
        assert_eq!(e.to_string(), "Failed to generate itinerary");
        assert_eq!(e.generation_detail(), Some("HTTP 503: backend overloaded"));
    }

    #[test]
    fn invalid_request_names_field() {
        let e = ItineraryError::InvalidRequest {
            field: "destination",
        };
        assert!(e.to_string().contains("destination"));
    }

    #[test]
    fn export_failure_keeps_detail() {
        let e = ItineraryError::export("page 2 could not be drawn");
        assert!(e.to_string().contains("page 2"));
        assert!(e.generation_detail().is_none());
    }

    #[test]
    fn output_write_failure_display() {
        let e = ItineraryError::OutputWriteFailed {
            path: PathBuf::from("/tmp/out/travel-itinerary.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = e.to_string();
        assert!(msg.contains("travel-itinerary.pdf"), "got: {msg}");
        assert!(msg.contains("denied"), "got: {msg}");
    }
}
