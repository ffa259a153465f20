//! Error types for file conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the file-convert library.
///
/// The `Display` output of each variant carries the category prefix the CLI
/// prints to stderr.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// Wrong number of command-line arguments.
    #[error("Usage: {program} <input_file> <target_format>")]
    Usage { program: String },

    /// Input file not found.
    #[error("File not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The derived output path is the input file itself.
    #[error("Refusing to overwrite input file '{}': target format matches its extension", .0.display())]
    OutputOverwritesInput(PathBuf),

    /// Input failed size or content-type validation.
    #[error("Input rejected: {0}")]
    InputRejected(String),

    /// Image decoding, encoding or codec selection failed.
    #[error("Image Error: {0}")]
    Image(String),

    /// The transcoder ran but exited unsuccessfully.
    #[error("FFmpeg Error: {stderr}")]
    TranscoderFailed { status: Option<i32>, stderr: String },

    /// The transcoder process could not be started.
    #[error("Media Error: {0}")]
    TranscoderSpawn(#[source] std::io::Error),

    /// Document conversion failed inside LibreOffice or pdfium.
    #[error("Document Error: {0}")]
    Document(String),

    /// No document conversion exists for this extension pair.
    #[error("Document Error: conversion from .{from} to {to} is not supported")]
    UnsupportedConversion { from: String, to: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for convenience.
pub type Result<T> = std::result::Result<T, ConversionError>;

impl From<image::ImageError> for ConversionError {
    fn from(e: image::ImageError) -> Self {
        ConversionError::Image(e.to_string())
    }
}
