//! Export the rendered itinerary region to a PDF file.
//!
//! ## Flow
//!
//! ```text
//! loading toast ─▶ empty check ─▶ layout ─▶ writer (spawn_blocking)
//!               ─▶ atomic write (tmp + rename) ─▶ dismiss ─▶ success toast
//! ```
//!
//! Any failure dismisses the loading toast and raises exactly one error
//! toast. There is no retry; the user simply exports again.

use crate::config::ExportOptions;
use crate::error::ItineraryError;
use crate::notify::Notifier;
use crate::output::ExportReport;
use crate::pipeline::layout::{layout_pages, PageGeometry};
use crate::pipeline::pdf::PdfWriter;
use crate::pipeline::render::RenderedItinerary;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

pub const EXPORT_LOADING_MESSAGE: &str = "Generating PDF...";
pub const EXPORT_SUCCESS_MESSAGE: &str = "Itinerary downloaded successfully!";
pub const EXPORT_ERROR_MESSAGE: &str = "Failed to generate PDF. Please try again.";

/// Export `region` to `out_dir/<options.filename>`.
pub async fn export_pdf(
    region: &RenderedItinerary,
    out_dir: &Path,
    options: &ExportOptions,
    writer: Arc<dyn PdfWriter>,
    notifier: &dyn Notifier,
) -> Result<ExportReport, ItineraryError> {
    let toast = notifier.loading(EXPORT_LOADING_MESSAGE);

    let result = export_inner(region, out_dir, options, writer).await;
    notifier.dismiss(toast);

    match result {
        Ok(report) => {
            info!(
                "Exported itinerary to {} ({} pages, {} bytes)",
                report.path.display(),
                report.pages,
                report.bytes
            );
            notifier.success(EXPORT_SUCCESS_MESSAGE);
            Ok(report)
        }
        Err(e) => {
            error!("PDF export failed: {}", e);
            notifier.error(EXPORT_ERROR_MESSAGE);
            Err(e)
        }
    }
}

async fn export_inner(
    region: &RenderedItinerary,
    out_dir: &Path,
    options: &ExportOptions,
    writer: Arc<dyn PdfWriter>,
) -> Result<ExportReport, ItineraryError> {
    if region.is_empty() {
        return Err(ItineraryError::EmptyRegion);
    }

    let geometry = PageGeometry::from_options(options);
    let pages = layout_pages(region, &geometry);
    let page_count = pages.len();

    let task_options = options.clone();
    let bytes = tokio::task::spawn_blocking(move || writer.write_pdf(&pages, &task_options))
        .await
        .map_err(|e| ItineraryError::Internal(format!("PDF task panicked: {}", e)))??;

    let path = out_dir.join(&options.filename);
    write_atomic(&path, &bytes).await?;

    Ok(ExportReport {
        path,
        pages: page_count,
        bytes: bytes.len(),
    })
}

/// Write to a sibling temp file, then rename over the target.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ItineraryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| write_err(parent, e))?;
    }

    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, bytes)
        .await
        .map_err(|e| write_err(&tmp, e))?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(write_err(path, e));
    }
    Ok(())
}

fn write_err(path: &Path, source: std::io::Error) -> ItineraryError {
    ItineraryError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
