//! Configuration types for file conversion.

use crate::error::{ConversionError, Result};
use crate::format::normalize_token;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Bare command name used when no local transcoder is found.
pub const DEFAULT_TRANSCODER: &str = "ffmpeg";

/// File names probed in the working directory by [`MediaConfig::discover`].
const LOCAL_TRANSCODER_NAMES: &[&str] = &["ffmpeg.exe", "ffmpeg"];

/// Upload size limit applied by [`ValidationConfig::strict`].
pub const STRICT_MAX_INPUT_BYTES: u64 = 50 * 1024 * 1024;

/// Configuration for the external audio/video transcoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Transcoder executable. A bare name is resolved through `PATH` at spawn time.
    /// Default: `ffmpeg`.
    pub transcoder_path: PathBuf,

    /// Encoder preset passed via `-preset`.
    /// Default: `ultrafast`.
    pub preset: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            transcoder_path: PathBuf::from(DEFAULT_TRANSCODER),
            preset: "ultrafast".to_string(),
        }
    }
}

impl MediaConfig {
    /// Use an explicit transcoder executable.
    pub fn with_transcoder(path: impl Into<PathBuf>) -> Self {
        Self {
            transcoder_path: path.into(),
            ..Default::default()
        }
    }

    /// Prefer a transcoder sitting in the current working directory, else `PATH`.
    pub fn discover() -> Self {
        match std::env::current_dir() {
            Ok(dir) => Self::discover_in(&dir),
            Err(_) => Self::default(),
        }
    }

    /// Prefer a transcoder inside `dir`, else the one found on `PATH`.
    pub fn discover_in(dir: &Path) -> Self {
        let local = LOCAL_TRANSCODER_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file());

        let transcoder_path = local.unwrap_or_else(|| {
            which::which(DEFAULT_TRANSCODER).unwrap_or_else(|_| PathBuf::from(DEFAULT_TRANSCODER))
        });

        Self {
            transcoder_path,
            ..Default::default()
        }
    }

    /// Set the encoder preset.
    pub fn preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = preset.into();
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.transcoder_path.as_os_str().is_empty() {
            return Err(ConversionError::InvalidConfig(
                "transcoder_path must not be empty".to_string(),
            ));
        }
        if self.preset.trim().is_empty() {
            return Err(ConversionError::InvalidConfig(
                "preset must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the LibreOffice backend used by docx to pdf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficeConfig {
    /// Path to soffice binary. If None, searches well-known locations and PATH.
    pub soffice_path: Option<PathBuf>,

    /// Timeout for a single document conversion.
    /// Default: 120 seconds.
    pub conversion_timeout: Duration,

    /// Directory for the temporary profile and scratch output.
    /// Default: system temp directory.
    pub temp_dir: Option<PathBuf>,
}

impl Default for OfficeConfig {
    fn default() -> Self {
        Self {
            soffice_path: None,
            conversion_timeout: Duration::from_secs(120),
            temp_dir: None,
        }
    }
}

impl OfficeConfig {
    /// Set the soffice binary path.
    pub fn soffice_path(mut self, path: PathBuf) -> Self {
        self.soffice_path = Some(path);
        self
    }

    /// Set the conversion timeout.
    pub fn conversion_timeout(mut self, timeout: Duration) -> Self {
        self.conversion_timeout = timeout;
        self
    }

    /// Set the temporary directory.
    pub fn temp_dir(mut self, dir: PathBuf) -> Self {
        self.temp_dir = Some(dir);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.conversion_timeout.as_secs() == 0 {
            return Err(ConversionError::InvalidConfig(
                "conversion_timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where to bind the pdfium library from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfConfig {
    /// Directory containing the pdfium shared library.
    /// If None, tries `./`, `/usr/lib`, `/usr/local/lib`, then the system loader.
    pub library_dir: Option<PathBuf>,
}

impl PdfConfig {
    /// Bind pdfium from a specific directory.
    pub fn with_library_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: Some(dir.into()),
        }
    }
}

/// Limits applied to the input file before dispatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Reject inputs larger than this many bytes.
    pub max_input_bytes: Option<u64>,

    /// Reject inputs whose sniffed content type is not on the allow-list.
    pub restrict_input_types: bool,
}

impl ValidationConfig {
    /// The upload-service limits: 50 MiB and a content-type allow-list.
    pub fn strict() -> Self {
        Self {
            max_input_bytes: Some(STRICT_MAX_INPUT_BYTES),
            restrict_input_types: true,
        }
    }

    /// Set the maximum input size.
    pub fn max_input_bytes(mut self, bytes: u64) -> Self {
        self.max_input_bytes = Some(bytes);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_input_bytes == Some(0) {
            return Err(ConversionError::InvalidConfig(
                "max_input_bytes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Combined configuration for the converter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Transcoder configuration.
    pub media: MediaConfig,

    /// LibreOffice configuration.
    pub office: OfficeConfig,

    /// pdfium binding configuration.
    pub pdf: PdfConfig,

    /// Input validation limits.
    pub validation: ValidationConfig,

    /// Allow a conversion whose output path is the input file.
    /// Default: false.
    pub allow_overwrite: bool,
}

impl ConverterConfig {
    /// Default configuration with the transcoder discovered from the working directory.
    pub fn discover() -> Self {
        Self {
            media: MediaConfig::discover(),
            ..Default::default()
        }
    }

    /// Set the media configuration.
    pub fn media(mut self, media: MediaConfig) -> Self {
        self.media = media;
        self
    }

    /// Set the office configuration.
    pub fn office(mut self, office: OfficeConfig) -> Self {
        self.office = office;
        self
    }

    /// Set the pdfium configuration.
    pub fn pdf(mut self, pdf: PdfConfig) -> Self {
        self.pdf = pdf;
        self
    }

    /// Set the validation limits.
    pub fn validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    /// Permit overwriting the input file.
    pub fn allow_overwrite(mut self, enabled: bool) -> Self {
        self.allow_overwrite = enabled;
        self
    }

    /// Validate the entire configuration.
    pub fn validate(&self) -> Result<()> {
        self.media.validate()?;
        self.office.validate()?;
        self.validation.validate()?;
        Ok(())
    }
}

/// A single conversion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Path to the input file.
    pub input_path: PathBuf,

    /// Normalized target extension: lowercase, no leading dot.
    pub target_extension: String,
}

impl ConversionRequest {
    /// Create a new conversion request from a raw target token such as `.PNG`.
    pub fn new(input_path: impl Into<PathBuf>, target: &str) -> Self {
        Self {
            input_path: input_path.into(),
            target_extension: normalize_token(target),
        }
    }

    /// Output path: same directory and stem as the input, new extension.
    ///
    /// A token holding a path separator yields a nested path;
    /// [`Converter::convert`] rejects such tokens before writing anything.
    ///
    /// [`Converter::convert`]: crate::Converter::convert
    pub fn output_path(&self) -> PathBuf {
        let mut name = self
            .input_path
            .file_stem()
            .map(OsString::from)
            .unwrap_or_default();
        if !self.target_extension.is_empty() {
            name.push(".");
            name.push(&self.target_extension);
        }
        self.input_path.with_file_name(name)
    }

    /// Whether the target token could be a file extension at all.
    pub fn has_valid_target(&self) -> bool {
        !self.target_extension.chars().any(std::path::is_separator)
    }

    /// Lowercased extension of the input file, empty if it has none.
    pub fn input_extension(&self) -> String {
        extension_of(&self.input_path)
    }
}

/// Lowercased extension of `path`, empty if it has none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default()
}
