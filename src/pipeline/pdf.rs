//! PDF writing via pdfium.
//!
//! [`PdfWriter`] is the seam between the async export flow and the blocking
//! PDF library; tests swap in an in-memory writer. [`PdfiumWriter`] draws the
//! laid-out pages as text objects in the standard Helvetica/Courier faces,
//! then, unless vector output was requested, flattens every page into one
//! JPEG image (render → encode → place on a fresh page of the same size).
//!
//! All of this is blocking C-library work: callers run it inside
//! `tokio::task::spawn_blocking`.

use crate::config::ExportOptions;
use crate::error::ItineraryError;
use crate::pipeline::encode::encode_jpeg;
use crate::pipeline::layout::{FontFace, PageGeometry, PageLayout};
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// Environment variable naming an explicit pdfium shared library.
pub const PDFIUM_LIB_ENV: &str = "PDFIUM_LIB_PATH";

/// Anything that can turn laid-out pages into PDF bytes.
pub trait PdfWriter: Send + Sync {
    fn write_pdf(
        &self,
        pages: &[PageLayout],
        options: &ExportOptions,
    ) -> Result<Vec<u8>, ItineraryError>;
}

/// [`PdfWriter`] backed by a dynamically bound pdfium library.
#[derive(Debug, Clone, Default)]
pub struct PdfiumWriter {
    library_path: Option<PathBuf>,
}

impl PdfiumWriter {
    /// Bind via `PDFIUM_LIB_PATH`, falling back to the system library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to the library at `path`.
    pub fn with_library(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some(path.into()),
        }
    }

    fn bind(&self) -> Result<Pdfium, ItineraryError> {
        let explicit = self
            .library_path
            .clone()
            .or_else(|| std::env::var_os(PDFIUM_LIB_ENV).map(PathBuf::from));

        let bindings = match &explicit {
            Some(path) => {
                debug!("Binding pdfium from {}", path.display());
                Pdfium::bind_to_library(path).map_err(|e| {
                    ItineraryError::PdfiumBindingFailed(format!("{}: {:?}", path.display(), e))
                })?
            }
            None => Pdfium::bind_to_system_library()
                .map_err(|e| ItineraryError::PdfiumBindingFailed(format!("{:?}", e)))?,
        };
        Ok(Pdfium::new(bindings))
    }
}

impl PdfWriter for PdfiumWriter {
    fn write_pdf(
        &self,
        pages: &[PageLayout],
        options: &ExportOptions,
    ) -> Result<Vec<u8>, ItineraryError> {
        let pdfium = self.bind()?;
        let geometry = PageGeometry::from_options(options);

        let document = draw_document(&pdfium, pages, &geometry)?;
        let bytes = match options.raster {
            Some(raster) => {
                let flat = flatten_document(
                    &pdfium,
                    &document,
                    &geometry,
                    raster.scale,
                    options.image.quality,
                )?;
                flat.save_to_bytes()
                    .map_err(|e| ItineraryError::export(format!("save failed: {:?}", e)))?
            }
            None => document
                .save_to_bytes()
                .map_err(|e| ItineraryError::export(format!("save failed: {:?}", e)))?,
        };

        info!(
            "PDF written: {} pages, {} bytes ({})",
            pages.len(),
            bytes.len(),
            if options.raster.is_some() { "raster" } else { "vector" }
        );
        Ok(bytes)
    }
}

struct Fonts {
    regular: PdfFontToken,
    bold: PdfFontToken,
    oblique: PdfFontToken,
    bold_oblique: PdfFontToken,
    courier: PdfFontToken,
}

impl Fonts {
    fn load(document: &mut PdfDocument<'_>) -> Self {
        let fonts = document.fonts_mut();
        Self {
            regular: fonts.helvetica(),
            bold: fonts.helvetica_bold(),
            oblique: fonts.helvetica_oblique(),
            bold_oblique: fonts.helvetica_bold_oblique(),
            courier: fonts.courier(),
        }
    }

    fn get(&self, face: FontFace) -> PdfFontToken {
        match face {
            FontFace::Regular => self.regular,
            FontFace::Bold => self.bold,
            FontFace::Oblique => self.oblique,
            FontFace::BoldOblique => self.bold_oblique,
            FontFace::Courier => self.courier,
        }
    }
}

fn paper_size(geometry: &PageGeometry) -> PdfPagePaperSize {
    PdfPagePaperSize::Custom(PdfPoints::new(geometry.width), PdfPoints::new(geometry.height))
}

fn draw_document<'a>(
    pdfium: &'a Pdfium,
    pages: &[PageLayout],
    geometry: &PageGeometry,
) -> Result<PdfDocument<'a>, ItineraryError> {
    let mut document = pdfium
        .create_new_pdf()
        .map_err(|e| ItineraryError::export(format!("create document: {:?}", e)))?;
    let fonts = Fonts::load(&mut document);

    for (index, layout) in pages.iter().enumerate() {
        let mut page = document
            .pages_mut()
            .create_page_at_end(paper_size(geometry))
            .map_err(|e| ItineraryError::export(format!("page {}: {:?}", index + 1, e)))?;

        for line in &layout.lines {
            let y = PdfPoints::new(geometry.height - line.y);
            for run in &line.runs {
                let mut object = page
                    .objects_mut()
                    .create_text_object(
                        PdfPoints::new(run.x),
                        y,
                        &run.text,
                        fonts.get(run.font),
                        PdfPoints::new(run.size),
                    )
                    .map_err(|e| {
                        ItineraryError::export(format!("page {} text: {:?}", index + 1, e))
                    })?;
                let (r, g, b) = (run.color.0, run.color.1, run.color.2);
                object
                    .set_fill_color(PdfColor::new(r, g, b, 255))
                    .map_err(|e| ItineraryError::export(format!("text colour: {:?}", e)))?;
            }
        }
        debug!("Drew page {} ({} lines)", index + 1, layout.lines.len());
    }
    Ok(document)
}

/// Render each page to an image and rebuild the document from the images.
fn flatten_document<'a>(
    pdfium: &'a Pdfium,
    source: &PdfDocument<'a>,
    geometry: &PageGeometry,
    scale: f32,
    quality: f32,
) -> Result<PdfDocument<'a>, ItineraryError> {
    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
    let mut flat = pdfium
        .create_new_pdf()
        .map_err(|e| ItineraryError::export(format!("create document: {:?}", e)))?;

    for (index, page) in source.pages().iter().enumerate() {
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| ItineraryError::export(format!("capture page {}: {:?}", index + 1, e)))?;
        let captured = bitmap.as_image();
        let jpeg = encode_jpeg(&captured, quality).map_err(ItineraryError::export)?;
        let image = image::load_from_memory_with_format(&jpeg, image::ImageFormat::Jpeg)
            .map_err(ItineraryError::export)?;

        let mut target = flat
            .pages_mut()
            .create_page_at_end(paper_size(geometry))
            .map_err(|e| ItineraryError::export(format!("page {}: {:?}", index + 1, e)))?;
        target
            .objects_mut()
            .create_image_object(
                PdfPoints::ZERO,
                PdfPoints::ZERO,
                &image,
                Some(PdfPoints::new(geometry.width)),
                Some(PdfPoints::new(geometry.height)),
            )
            .map_err(|e| ItineraryError::export(format!("place page {}: {:?}", index + 1, e)))?;

        debug!(
            "Captured page {} at {}x{} px, {} bytes JPEG",
            index + 1,
            image.width(),
            image.height(),
            jpeg.len()
        );
    }
    Ok(flat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_library_path_wins() {
        let writer = PdfiumWriter::with_library("/definitely/not/here/libpdfium.so");
        let err = writer
            .write_pdf(&[], &ExportOptions::default())
            .unwrap_err();
        match err {
            ItineraryError::PdfiumBindingFailed(detail) => {
                assert!(detail.contains("/definitely/not/here/libpdfium.so"))
            }
            other => panic!("expected a binding failure, got {other:?}"),
        }
    }

    #[test]
    fn paper_size_uses_geometry_points() {
        let geometry = PageGeometry::from_options(&ExportOptions::default());
        match paper_size(&geometry) {
            PdfPagePaperSize::Custom(w, h) => {
                assert!((w.value - geometry.width).abs() < 1e-3);
                assert!((h.value - geometry.height).abs() < 1e-3);
            }
            _ => panic!("expected a custom paper size"),
        }
    }
}
