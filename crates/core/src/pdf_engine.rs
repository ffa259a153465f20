//! PDF reading and writing using pdfium (Google's PDF engine).
//!
//! Used by the document handler for text extraction and plain text layout,
//! and by the image handler to embed rasters into a PDF page.

use crate::config::PdfConfig;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tracing::debug;

/// pdfium bindings can only be initialised once per process.
static SHARED_ENGINE: OnceLock<PdfEngine> = OnceLock::new();
static BIND_LOCK: Mutex<()> = Mutex::new(());

const MM: f32 = 72.0 / 25.4;

/// A4 page size in points.
const PAGE_WIDTH: f32 = 210.0 * MM;
const PAGE_HEIGHT: f32 = 297.0 * MM;

/// Left, right and top margin.
const MARGIN: f32 = 10.0 * MM;
/// Rows may not extend past this distance from the bottom edge.
const BOTTOM_MARGIN: f32 = 20.0 * MM;
/// Height of one text row.
const LINE_HEIGHT: f32 = 10.0 * MM;
/// Gap between the row edge and the first glyph.
const CELL_PADDING: f32 = 1.0 * MM;
const FONT_SIZE: f32 = 12.0;

/// Thin wrapper over a bound pdfium library.
pub struct PdfEngine {
    pdfium: Pdfium,
}

impl PdfEngine {
    /// Bind the pdfium library.
    ///
    /// Tries the configured directory first, then `./`, `/usr/lib`,
    /// `/usr/local/lib`, and finally the system library search path.
    fn bind(config: &PdfConfig) -> Result<Self, PdfiumError> {
        let bindings = match &config.library_dir {
            Some(dir) => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
                    .or_else(|_| Self::bind_default())
            }
            None => Self::bind_default(),
        }?;

        debug!("pdfium library bound");

        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// The process-wide engine, bound on first use.
    ///
    /// `config` only takes effect on the call that performs the binding.
    pub fn shared(config: &PdfConfig) -> Result<&'static PdfEngine, PdfiumError> {
        if let Some(engine) = SHARED_ENGINE.get() {
            return Ok(engine);
        }

        let _guard = BIND_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(engine) = SHARED_ENGINE.get() {
            return Ok(engine);
        }
        let engine = Self::bind(config)?;
        Ok(SHARED_ENGINE.get_or_init(|| engine))
    }

    fn bind_default() -> Result<Box<dyn PdfiumLibraryBindings>, PdfiumError> {
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("/usr/lib"))
            })
            .or_else(|_| {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                    "/usr/local/lib",
                ))
            })
            .or_else(|_| Pdfium::bind_to_system_library())
    }

    /// Extract the text of every page, in page order.
    pub fn extract_page_texts(&self, pdf_path: &Path) -> Result<Vec<String>, PdfiumError> {
        let document = self.pdfium.load_pdf_from_file(pdf_path, None)?;

        let mut texts = Vec::with_capacity(document.pages().len() as usize);
        for page in document.pages().iter() {
            texts.push(page.text()?.all());
        }

        debug!("Extracted text from {} pages of {:?}", texts.len(), pdf_path);
        Ok(texts)
    }

    /// Lay out `lines` one per row on A4 pages in Helvetica and save to `output`.
    ///
    /// Returns the number of pages written. An empty input still yields one page.
    pub fn write_text_pdf(&self, lines: &[String], output: &Path) -> Result<usize, PdfiumError> {
        let mut document = self.pdfium.create_new_pdf()?;
        let font = document.fonts_mut().helvetica();

        let mut page = document.pages_mut().create_page_at_end(a4())?;
        let mut page_count = 1;
        let mut row = 0usize;

        for line in lines {
            let mut top = MARGIN + row as f32 * LINE_HEIGHT;
            if top + LINE_HEIGHT > PAGE_HEIGHT - BOTTOM_MARGIN {
                page = document.pages_mut().create_page_at_end(a4())?;
                page_count += 1;
                row = 0;
                top = MARGIN;
            }

            if !line.is_empty() {
                // Baseline sits just below the vertical centre of the row.
                let baseline = PAGE_HEIGHT - (top + 0.5 * LINE_HEIGHT + 0.3 * FONT_SIZE);
                page.objects_mut().create_text_object(
                    PdfPoints::new(MARGIN + CELL_PADDING),
                    PdfPoints::new(baseline),
                    line,
                    font,
                    PdfPoints::new(FONT_SIZE),
                )?;
            }
            row += 1;
        }
        drop(page);

        document.save_to_file(output)?;
        debug!("Wrote {} lines over {} pages to {:?}", lines.len(), page_count, output);

        Ok(page_count)
    }

    /// Save `image` as a single-page PDF sized to the image, one point per pixel.
    pub fn write_image_pdf(&self, image: &DynamicImage, output: &Path) -> Result<(), PdfiumError> {
        let width = PdfPoints::new(image.width() as f32);
        let height = PdfPoints::new(image.height() as f32);

        let mut document = self.pdfium.create_new_pdf()?;
        let mut page = document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::Custom(width, height))?;

        page.objects_mut().create_image_object(
            PdfPoints::ZERO,
            PdfPoints::ZERO,
            image,
            Some(width),
            Some(height),
        )?;
        drop(page);

        document.save_to_file(output)?;
        Ok(())
    }
}

fn a4() -> PdfPagePaperSize {
    PdfPagePaperSize::Custom(PdfPoints::new(PAGE_WIDTH), PdfPoints::new(PAGE_HEIGHT))
}
