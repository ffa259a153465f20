//! # file-convert-core
//!
//! Converts a file to another format chosen by extension.
//!
//! The target extension picks one of three families:
//!
//! - **Media** (`mp4`, `mkv`, `mp3`, `flac`, ...) runs an external transcoder (ffmpeg)
//! - **Document** (`pdf`, `docx`, `txt`, `rtf`) uses LibreOffice or pdfium
//! - **Image** (everything else) decodes and re-encodes with the `image` crate
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use file_convert_core::{ConversionRequest, Converter, ConverterConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let converter = Converter::new(ConverterConfig::discover())?;
//!
//!     let request = ConversionRequest::new("holiday.png", ".JPEG");
//!     let output = converter.convert(&request).await?;
//!
//!     println!("{}", output.display());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod converter;
pub mod document;
pub mod error;
pub mod format;
pub mod media;
pub mod office;
pub mod pdf_engine;
pub mod raster;
pub mod validation;

// Re-export main types for convenience
pub use config::{
    ConversionRequest, ConverterConfig, MediaConfig, OfficeConfig, PdfConfig, ValidationConfig,
};
pub use converter::Converter;
pub use document::DocumentConverter;
pub use error::{ConversionError, Result};
pub use format::{FormatFamily, KnownFormat, MediaKind};
pub use media::MediaConverter;
pub use raster::ImageConverter;

/// Initialize the library's logging.
///
/// Logs go to stderr so stdout stays reserved for the output path.
/// Defaults to `warn` when `RUST_LOG` is unset.
pub fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
