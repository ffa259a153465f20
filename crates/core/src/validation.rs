//! Input size and content-type checks applied before dispatch.

use crate::config::{extension_of, ValidationConfig};
use crate::error::{ConversionError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes read from the head of the file for sniffing.
const SNIFF_LEN: usize = 4096;

/// Content types accepted by [`ValidationConfig::restrict_input_types`].
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/gif",
    "audio/mpeg",
    "audio/wav",
    "audio/ogg",
    "audio/flac",
    "video/mp4",
    "video/x-matroska",
    "video/quicktime",
    "video/x-msvideo",
    "application/pdf",
    "text/plain",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Detect a content type from the file's leading bytes.
pub fn sniff_mime(path: &Path) -> Result<Option<&'static str>> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    File::open(path)
        .and_then(|f| f.take(SNIFF_LEN as u64).read_to_end(&mut head))
        .map_err(|e| {
            ConversionError::InputRejected(format!("cannot read '{}': {}", path.display(), e))
        })?;
    Ok(sniff_bytes(&head))
}

/// Detect a content type from a byte prefix.
pub fn sniff_bytes(head: &[u8]) -> Option<&'static str> {
    let riff_kind = |kind: &[u8]| head.len() >= 12 && &head[..4] == b"RIFF" && &head[8..12] == kind;

    if head.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if head.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if riff_kind(b"WEBP") {
        Some("image/webp")
    } else if riff_kind(b"WAVE") {
        Some("audio/wav")
    } else if riff_kind(b"AVI ") {
        Some("video/x-msvideo")
    } else if head.starts_with(b"OggS") {
        Some("audio/ogg")
    } else if head.starts_with(b"fLaC") {
        Some("audio/flac")
    } else if head.starts_with(b"ID3") || (head.len() >= 2 && head[0] == 0xFF && head[1] & 0xE0 == 0xE0) {
        Some("audio/mpeg")
    } else if head.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        Some("video/x-matroska")
    } else if head.len() >= 12 && &head[4..8] == b"ftyp" {
        iso_bmff_brand(&head[8..12])
    } else if head.starts_with(b"%PDF") {
        Some("application/pdf")
    } else if head.starts_with(b"PK\x03\x04") {
        if contains(head, b"word/") {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        } else {
            Some("application/zip")
        }
    } else {
        None
    }
}

/// Content type for the major brand of an ISO-BMFF `ftyp` box.
fn iso_bmff_brand(brand: &[u8]) -> Option<&'static str> {
    match brand {
        b"isom" | b"iso2" | b"mp41" | b"mp42" | b"avc1" | b"dash" => Some("video/mp4"),
        b"qt  " => Some("video/quicktime"),
        b"avif" | b"avis" => Some("image/avif"),
        b"heic" | b"heix" | b"mif1" => Some("image/heic"),
        b"M4A " => Some("audio/x-m4a"),
        b"M4V " => Some("video/x-m4v"),
        _ => None,
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Apply the configured limits to `path`.
pub fn validate_input(path: &Path, config: &ValidationConfig) -> Result<()> {
    if let Some(limit) = config.max_input_bytes {
        let size = std::fs::metadata(path)
            .map_err(|e| {
                ConversionError::InputRejected(format!("cannot stat '{}': {}", path.display(), e))
            })?
            .len();
        if size > limit {
            return Err(ConversionError::InputRejected(format!(
                "file is too large ({} bytes). Maximum: {} MB",
                size,
                limit / 1024 / 1024
            )));
        }
    }

    if config.restrict_input_types {
        match sniff_mime(path)? {
            Some(mime) if ALLOWED_MIME_TYPES.contains(&mime) => {}
            None if extension_of(path) == "txt" => {}
            detected => {
                return Err(ConversionError::InputRejected(format!(
                    "file type not allowed. Detected: {}",
                    detected.unwrap_or("unknown")
                )));
            }
        }
    }

    Ok(())
}
