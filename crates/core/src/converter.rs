//! Conversion dispatcher that routes a request to exactly one handler.

use crate::config::{ConversionRequest, ConverterConfig};
use crate::document::DocumentConverter;
use crate::error::{ConversionError, Result};
use crate::format::FormatFamily;
use crate::media::MediaConverter;
use crate::raster::ImageConverter;
use crate::validation::validate_input;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Main converter.
///
/// Holds one handler per conversion family. Each call to [`Converter::convert`]
/// runs a single handler to completion; nothing is cleaned up on failure.
pub struct Converter {
    image: ImageConverter,
    media: MediaConverter,
    document: DocumentConverter,
    config: ConverterConfig,
}

impl Converter {
    /// Create a new converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Result<Self> {
        config.validate()?;

        debug!(
            "Initializing converter with transcoder={:?}",
            config.media.transcoder_path
        );

        Ok(Self {
            image: ImageConverter::new(config.pdf.clone()),
            media: MediaConverter::new(config.media.clone()),
            document: DocumentConverter::new(config.office.clone(), config.pdf.clone()),
            config,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert `request.input_path` and return the path that was written.
    pub async fn convert(&self, request: &ConversionRequest) -> Result<PathBuf> {
        let start = Instant::now();
        let input = request.input_path.as_path();

        if !input.exists() {
            return Err(ConversionError::InputNotFound(input.to_path_buf()));
        }

        // Garbage tokens belong to the image catch-all.
        if !request.has_valid_target() {
            return Err(ConversionError::Image(format!(
                "unknown image format '{}'",
                request.target_extension
            )));
        }

        let output = request.output_path();
        if !self.config.allow_overwrite && same_file(input, &output) {
            return Err(ConversionError::OutputOverwritesInput(input.to_path_buf()));
        }

        validate_input(input, &self.config.validation)?;

        let target = request.target_extension.as_str();
        let family = FormatFamily::classify(target);
        info!("Converting {:?} to {} ({:?})", input, target, family);

        match family {
            FormatFamily::Media(_) => self.media.convert(input, &output).await?,
            FormatFamily::Document => self.document.convert(input, &output, target).await?,
            FormatFamily::Image => self.image.convert(input, &output, target)?,
        }

        info!("Wrote {:?} in {:?}", output, start.elapsed());
        Ok(output)
    }
}

/// Whether `a` and `b` name the same file.
fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
