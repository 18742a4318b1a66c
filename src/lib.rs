//! # wanderlens
//!
//! Generate personalised day-by-day travel itineraries with Google Gemini,
//! clean up the Markdown the model returns, render it, and export it to PDF.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ItineraryRequest
//!  │
//!  ├─ 1. Prompt     request → JSON block + fixed layout instructions
//!  ├─ 2. Generate   one generateContent call (reqwest)
//!  ├─ 3. Pre-pass   bold day titles / bold spans → `#` headings
//!  ├─ 4. Normalize  ordered cleanup rules, idempotent
//!  ├─ 5. Render     Markdown → display tree → styled HTML / plain text
//!  └─ 6. Export     layout → pdfium (text pages, optional JPEG capture) → file
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wanderlens::{generate_itinerary, render_itinerary, GenerationConfig, ItineraryRequest, Lifestyle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GEMINI_API_KEY
//!     let request = ItineraryRequest::new("Tokyo, Japan", "¥150,000", Lifestyle::Budget, "5 days")?;
//!     let output = generate_itinerary(&request, &GenerationConfig::default()).await?;
//!     if let Some(region) = render_itinerary(&output.itinerary) {
//!         println!("{}", region.plain_text());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! For the form-like flow with a fallback message and notifications, use
//! [`ItineraryGenerator`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `wanderlens` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ```toml
//! wanderlens = { version = "0.1", default-features = false }
//! ```
//!
//! ## PDF export
//!
//! Export binds a pdfium shared library at runtime: an explicit path
//! ([`PdfiumWriter::with_library`]), then `PDFIUM_LIB_PATH`, then the system
//! library search path.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod generate;
pub mod notify;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod request;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{GeminiClient, Generation, GenerationClient};
pub use config::{
    ExportOptions, ExportOptionsBuilder, GenerationConfig, GenerationConfigBuilder, LengthUnit,
    Orientation, PaperFormat, SafetySetting,
};
pub use error::ItineraryError;
pub use export::export_pdf;
pub use generate::{generate_itinerary, generate_itinerary_sync, generate_itinerary_with, generate_to_file};
pub use notify::{NoopNotifier, Notification, NotificationKind, Notifier, ToastId, ToastQueue};
pub use output::{ExportReport, GenerationOutput, GenerationStats};
pub use pipeline::pdf::{PdfWriter, PdfiumWriter};
pub use pipeline::postprocess::{normalize, preprocess};
pub use pipeline::render::{render_itinerary, RenderedItinerary, StyleSheet};
pub use prompts::build_prompt;
pub use request::{ItineraryRequest, Lifestyle};
pub use session::{FormState, ItineraryGenerator, FALLBACK_MESSAGE};
