//! Document conversion, keyed by (input extension, target extension).
//!
//! | input | target | backend |
//! |-------|--------|---------|
//! | docx  | pdf    | LibreOffice |
//! | txt   | pdf    | pdfium text layout |
//! | pdf   | txt    | pdfium text extraction |

use crate::config::{OfficeConfig, PdfConfig};
use crate::error::{ConversionError, Result};
use crate::office;
use crate::pdf_engine::PdfEngine;
use std::path::Path;
use tracing::debug;

/// Substitute for characters outside Latin-1.
const REPLACEMENT: char = '?';

/// The document conversions that exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRoute {
    DocxToPdf,
    TxtToPdf,
    PdfToTxt,
}

impl DocumentRoute {
    /// Route for a lowercased input extension and target extension.
    pub fn resolve(input_extension: &str, target_extension: &str) -> Result<Self> {
        match (input_extension, target_extension) {
            ("docx", "pdf") => Ok(DocumentRoute::DocxToPdf),
            ("txt", "pdf") => Ok(DocumentRoute::TxtToPdf),
            ("pdf", "txt") => Ok(DocumentRoute::PdfToTxt),
            (from, to) => Err(ConversionError::UnsupportedConversion {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }
}

/// Converts between document formats.
#[derive(Debug, Clone, Default)]
pub struct DocumentConverter {
    office: OfficeConfig,
    pdf: PdfConfig,
}

impl DocumentConverter {
    /// Create a document converter.
    pub fn new(office: OfficeConfig, pdf: PdfConfig) -> Self {
        Self { office, pdf }
    }

    /// Convert `input` to `output`. The input extension selects the route.
    pub async fn convert(&self, input: &Path, output: &Path, target_extension: &str) -> Result<()> {
        let input_extension = crate::config::extension_of(input);
        let route = DocumentRoute::resolve(&input_extension, target_extension)?;
        debug!("Document route {:?} for {:?}", route, input.file_name());

        match route {
            DocumentRoute::DocxToPdf => office::convert_to_pdf(&self.office, input, output).await,
            DocumentRoute::TxtToPdf => self.text_to_pdf(input, output),
            DocumentRoute::PdfToTxt => self.pdf_to_text(input, output),
        }
    }

    fn engine(&self) -> Result<&'static PdfEngine> {
        PdfEngine::shared(&self.pdf)
            .map_err(|e| ConversionError::Document(format!("Failed to load pdfium library: {}", e)))
    }

    fn text_to_pdf(&self, input: &Path, output: &Path) -> Result<()> {
        let text = std::fs::read_to_string(input).map_err(|e| {
            ConversionError::Document(format!("Failed to read '{}': {}", input.display(), e))
        })?;
        let lines: Vec<String> = text.lines().map(to_latin1_lossy).collect();

        let pages = self
            .engine()?
            .write_text_pdf(&lines, output)
            .map_err(|e| ConversionError::Document(format!("Failed to write PDF: {}", e)))?;

        debug!("Rendered {} lines onto {} pages", lines.len(), pages);
        Ok(())
    }

    fn pdf_to_text(&self, input: &Path, output: &Path) -> Result<()> {
        let pages = self
            .engine()?
            .extract_page_texts(input)
            .map_err(|e| ConversionError::Document(format!("Failed to read PDF: {}", e)))?;

        std::fs::write(output, join_page_texts(&pages)).map_err(|e| {
            ConversionError::Document(format!("Failed to write '{}': {}", output.display(), e))
        })
    }
}

/// Replace every character outside Latin-1 with `?`.
pub fn to_latin1_lossy(line: &str) -> String {
    line.chars()
        .map(|c| if (c as u32) <= 0xFF { c } else { REPLACEMENT })
        .collect()
}

/// Each non-empty page text followed by a newline.
pub fn join_page_texts(pages: &[String]) -> String {
    let mut out = String::new();
    for text in pages.iter().filter(|t| !t.is_empty()) {
        out.push_str(text);
        out.push('\n');
    }
    out
}
