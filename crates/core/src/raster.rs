//! Raster image conversion using the `image` crate.
//!
//! Formats without an alpha channel get the source flattened first: JPEG
//! targets are composited over white, PDF targets simply drop alpha.

use crate::config::PdfConfig;
use crate::error::{ConversionError, Result};
use crate::pdf_engine::PdfEngine;
use image::{DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage};
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Background used when flattening transparent images for JPEG.
pub const JPEG_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Converts raster images between formats.
#[derive(Debug, Clone, Default)]
pub struct ImageConverter {
    pdf: PdfConfig,
}

impl ImageConverter {
    /// Create an image converter. `pdf` is used only for PDF targets.
    pub fn new(pdf: PdfConfig) -> Self {
        Self { pdf }
    }

    /// Decode `input` and encode it to `output` as `target_format`.
    pub fn convert(&self, input: &Path, output: &Path, target_format: &str) -> Result<()> {
        let start = Instant::now();

        let image = ImageReader::open(input)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| ConversionError::Image(e.to_string()))?
            .decode()?;

        debug!(
            "Decoded {:?}: {}x{} {:?}",
            input.file_name(),
            image.width(),
            image.height(),
            image.color()
        );

        let image = prepare_for_target(image, target_format);

        if target_format == "pdf" {
            let engine = PdfEngine::shared(&self.pdf)
                .map_err(|e| ConversionError::Image(format!("Failed to load pdfium: {}", e)))?;
            engine
                .write_image_pdf(&image, output)
                .map_err(|e| ConversionError::Image(e.to_string()))?;
        } else {
            let format = codec_for(target_format)?;
            image.save_with_format(output, format)?;
        }

        debug!("Encoded {:?} in {:?}", output, start.elapsed());
        Ok(())
    }
}

/// Resolve the encoder for a target token.
pub fn codec_for(target_format: &str) -> Result<ImageFormat> {
    let format = ImageFormat::from_extension(target_format).ok_or_else(|| {
        ConversionError::Image(format!(
            "unknown image format '{}'",
            target_format.to_uppercase()
        ))
    })?;

    if !format.writing_enabled() {
        return Err(ConversionError::Image(format!(
            "encoding {:?} images is not supported",
            format
        )));
    }
    Ok(format)
}

fn is_jpeg_target(target_format: &str) -> bool {
    matches!(target_format, "jpeg" | "jpg")
}

/// Apply the alpha policy required by the target format.
pub fn prepare_for_target(image: DynamicImage, target_format: &str) -> DynamicImage {
    if !image.color().has_alpha() {
        return image;
    }

    if is_jpeg_target(target_format) {
        DynamicImage::ImageRgb8(flatten_onto(&image, JPEG_BACKGROUND))
    } else if target_format == "pdf" {
        DynamicImage::ImageRgb8(image.to_rgb8())
    } else {
        image
    }
}

/// Composite `image` over an opaque `background`, using alpha as the mask.
pub fn flatten_onto(image: &DynamicImage, background: Rgb<u8>) -> RgbImage {
    let [r, g, b] = background.0;
    let mut rgba = image.to_rgba8();

    for pixel in rgba.pixels_mut() {
        let alpha = pixel[3] as f32 / 255.0;
        if alpha < 1.0 {
            let inv_alpha = 1.0 - alpha;
            pixel[0] = ((pixel[0] as f32 * alpha) + (r as f32 * inv_alpha)) as u8;
            pixel[1] = ((pixel[1] as f32 * alpha) + (g as f32 * inv_alpha)) as u8;
            pixel[2] = ((pixel[2] as f32 * alpha) + (b as f32 * inv_alpha)) as u8;
            pixel[3] = 255;
        }
    }

    DynamicImage::ImageRgba8(rgba).to_rgb8()
}
