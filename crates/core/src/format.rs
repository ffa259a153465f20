//! Target format table and conversion-family classification.
//!
//! Every token the dispatcher knows about lives in [`FORMAT_TABLE`]. Adding a
//! format means adding one variant and one table row; the compiler then forces
//! [`KnownFormat::family`] to place it in a family.

use serde::{Deserialize, Serialize};

/// Whether a media target is a video or an audio container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Video,
    Audio,
}

/// The handler family a target format belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatFamily {
    /// Raster images. Also the fallback for unknown tokens.
    Image,
    /// Audio and video, handled by the external transcoder.
    Media(MediaKind),
    /// Office documents, plain text and PDF.
    Document,
}

/// Every target format with a fixed place in the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownFormat {
    Jpeg,
    Jpg,
    Png,
    Webp,
    Gif,
    Bmp,
    Tiff,
    Mp4,
    Avi,
    Mov,
    Mkv,
    Webm,
    Mp3,
    Wav,
    Ogg,
    Flac,
    Aac,
    Pdf,
    Docx,
    Txt,
    Rtf,
}

/// Extension token to format mapping.
pub const FORMAT_TABLE: &[(&str, KnownFormat)] = &[
    ("jpeg", KnownFormat::Jpeg),
    ("jpg", KnownFormat::Jpg),
    ("png", KnownFormat::Png),
    ("webp", KnownFormat::Webp),
    ("gif", KnownFormat::Gif),
    ("bmp", KnownFormat::Bmp),
    ("tiff", KnownFormat::Tiff),
    ("mp4", KnownFormat::Mp4),
    ("avi", KnownFormat::Avi),
    ("mov", KnownFormat::Mov),
    ("mkv", KnownFormat::Mkv),
    ("webm", KnownFormat::Webm),
    ("mp3", KnownFormat::Mp3),
    ("wav", KnownFormat::Wav),
    ("ogg", KnownFormat::Ogg),
    ("flac", KnownFormat::Flac),
    ("aac", KnownFormat::Aac),
    ("pdf", KnownFormat::Pdf),
    ("docx", KnownFormat::Docx),
    ("txt", KnownFormat::Txt),
    ("rtf", KnownFormat::Rtf),
];

impl KnownFormat {
    /// Look up a normalized token.
    pub fn from_token(token: &str) -> Option<Self> {
        FORMAT_TABLE
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, f)| *f)
    }

    /// The canonical extension token.
    pub fn token(self) -> &'static str {
        FORMAT_TABLE
            .iter()
            .find(|(_, f)| *f == self)
            .map(|(t, _)| *t)
            .unwrap_or_default()
    }

    /// Family this format is dispatched to.
    pub fn family(self) -> FormatFamily {
        use KnownFormat::*;
        match self {
            Mp4 | Avi | Mov | Mkv | Webm => FormatFamily::Media(MediaKind::Video),
            Mp3 | Wav | Ogg | Flac | Aac => FormatFamily::Media(MediaKind::Audio),
            Pdf | Docx | Txt | Rtf => FormatFamily::Document,
            Jpeg | Jpg | Png | Webp | Gif | Bmp | Tiff => FormatFamily::Image,
        }
    }
}

impl FormatFamily {
    /// Classify a normalized target token.
    ///
    /// Unknown tokens are images: the image handler rejects them itself if
    /// no codec matches.
    pub fn classify(token: &str) -> Self {
        KnownFormat::from_token(token)
            .map(KnownFormat::family)
            .unwrap_or(FormatFamily::Image)
    }

    pub fn is_media(self) -> bool {
        matches!(self, FormatFamily::Media(_))
    }
}

/// Normalize a raw target token: surrounding whitespace trimmed, leading dots
/// stripped, lowercased.
pub fn normalize_token(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_lowercase()
}
