//! Integration tests for file-convert-core.
//!
//! Document tests require:
//! - LibreOffice installed (soffice in PATH) for docx -> pdf
//! - Pdfium library (set PDFIUM_DYNAMIC_LIB_PATH or place in ./) for txt <-> pdf
//!
//! Tests skip themselves when a dependency is missing.
//!
//! Run with: cargo test --package file-convert-core --test integration_tests

use docx_rs::{Docx, Paragraph, Run};
use file_convert_core::{
    config::{ConversionRequest, ConverterConfig, MediaConfig, PdfConfig},
    converter::Converter,
    pdf_engine::PdfEngine,
    ConversionError,
};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Pdfium location from the environment, if given.
fn pdf_config() -> PdfConfig {
    match std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        Ok(path) => PdfConfig::with_library_dir(PathBuf::from(path)),
        Err(_) => PdfConfig::default(),
    }
}

/// Check if pdfium can be bound
fn pdfium_available() -> bool {
    PdfEngine::shared(&pdf_config()).is_ok()
}

/// Check if LibreOffice is available
fn libreoffice_available() -> bool {
    which::which("soffice").is_ok() || which::which("libreoffice").is_ok()
}

macro_rules! require_pdfium {
    () => {
        if !pdfium_available() {
            eprintln!("Skipping test: Pdfium not found");
            return;
        }
    };
}

fn converter() -> Converter {
    Converter::new(ConverterConfig::default().pdf(pdf_config())).unwrap()
}

fn write_rgba_png(path: &Path) {
    RgbaImage::from_fn(64, 64, |x, _| {
        if x < 32 {
            Rgba([200, 10, 10, 0])
        } else {
            Rgba([10, 10, 200, 255])
        }
    })
    .save(path)
    .unwrap();
}

// ============================================================================
// Image Tests
// ============================================================================

#[tokio::test]
async fn test_rgba_png_to_jpeg_is_opaque_white_where_transparent() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("sticker.png");
    write_rgba_png(&input);

    let output = converter()
        .convert(&ConversionRequest::new(&input, "jpeg"))
        .await
        .unwrap();
    assert_eq!(output, dir.path().join("sticker.jpeg"));

    let result = image::open(&output).unwrap();
    assert!(!result.color().has_alpha());
    let pixel = result.to_rgb8().get_pixel(8, 8).0;
    assert!(pixel.iter().all(|&c| c > 240), "expected white, got {pixel:?}");
}

#[tokio::test]
async fn test_png_to_webp_and_gif() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("sticker.png");
    write_rgba_png(&input);

    for target in ["webp", "gif", "tiff"] {
        let output = converter()
            .convert(&ConversionRequest::new(&input, target))
            .await
            .unwrap();
        let decoded = image::open(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 64), "{target}");
    }
}

#[tokio::test]
async fn test_rgba_image_to_pdf() {
    require_pdfium!();

    let dir = TempDir::new().unwrap();
    let input = dir.path().join("sticker.png");
    let output = dir.path().join("sticker.pdf");
    write_rgba_png(&input);

    file_convert_core::ImageConverter::new(pdf_config())
        .convert(&input, &output, "pdf")
        .unwrap();

    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

// ============================================================================
// Document Tests
// ============================================================================

#[tokio::test]
async fn test_txt_to_pdf_to_txt() {
    require_pdfium!();

    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, "Hello PDF\nSecond line \u{2713}\n").unwrap();

    let pdf = converter()
        .convert(&ConversionRequest::new(&input, "pdf"))
        .await
        .unwrap();
    assert!(std::fs::read(&pdf).unwrap().starts_with(b"%PDF"));

    // Extract into a separate stem so the source text is not overwritten.
    let extracted_input = dir.path().join("extracted.pdf");
    std::fs::rename(&pdf, &extracted_input).unwrap();
    let txt = converter()
        .convert(&ConversionRequest::new(&extracted_input, "txt"))
        .await
        .unwrap();

    let text = std::fs::read_to_string(&txt).unwrap();
    assert!(text.contains("Hello PDF"), "got {text:?}");
    assert!(text.contains("Second line ?"), "got {text:?}");
    assert!(text.ends_with('\n'));
}

#[tokio::test]
async fn test_long_text_spans_pages() {
    require_pdfium!();

    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("long.pdf");
    let lines: Vec<String> = (1..=60).map(|i| format!("line {i}")).collect();
    let pages = PdfEngine::shared(&pdf_config())
        .unwrap()
        .write_text_pdf(&lines, &pdf)
        .unwrap();
    assert_eq!(pages, 3);

    let texts = PdfEngine::shared(&pdf_config())
        .unwrap()
        .extract_page_texts(&pdf)
        .unwrap();
    assert_eq!(texts.len(), 3);
    assert!(texts[2].contains("line 60"));
}

#[tokio::test]
async fn test_docx_to_pdf() {
    if !libreoffice_available() {
        eprintln!("Skipping test: LibreOffice not found");
        return;
    }

    let dir = TempDir::new().unwrap();
    let input = dir.path().join("simple.docx");
    let docx = Docx::new().add_paragraph(
        Paragraph::new().add_run(Run::new().add_text("Hello, World! This is a test document.")),
    );
    docx.build().pack(std::fs::File::create(&input).unwrap()).unwrap();

    let output = converter()
        .convert(&ConversionRequest::new(&input, "pdf"))
        .await
        .unwrap();
    assert_eq!(output, dir.path().join("simple.pdf"));
    assert!(std::fs::read(&output).unwrap().starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_rtf_to_docx_is_unsupported() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("memo.rtf");
    std::fs::write(&input, r"{\rtf1\ansi memo}").unwrap();

    let err = converter()
        .convert(&ConversionRequest::new(&input, "docx"))
        .await
        .unwrap_err();
    match &err {
        ConversionError::UnsupportedConversion { from, to } => {
            assert_eq!(from, "rtf");
            assert_eq!(to, "docx");
        }
        e => panic!("Expected UnsupportedConversion, got {:?}", e),
    }
    assert!(!dir.path().join("memo.docx").exists());
}

// ============================================================================
// Media Tests
// ============================================================================

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
#[tokio::test]
async fn test_failing_transcoder_reports_its_stderr() {
    let dir = TempDir::new().unwrap();
    let transcoder = write_script(
        dir.path(),
        "fake-ffmpeg-fail",
        "printf 'Unknown encoder libfoo' >&2\nexit 1",
    );
    let input = dir.path().join("song.wav");
    std::fs::write(&input, b"RIFF\0\0\0\0WAVE").unwrap();

    let config = ConverterConfig::default().media(MediaConfig::with_transcoder(transcoder));
    let err = Converter::new(config)
        .unwrap()
        .convert(&ConversionRequest::new(&input, "mp3"))
        .await
        .unwrap_err();

    match err {
        ConversionError::TranscoderFailed { status, stderr } => {
            assert_eq!(status, Some(1));
            assert_eq!(stderr, "Unknown encoder libfoo");
        }
        e => panic!("Expected TranscoderFailed, got {:?}", e),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_transcoder_receives_input_and_output() {
    let dir = TempDir::new().unwrap();
    // Copies the -i argument to the last argument.
    let transcoder = write_script(
        dir.path(),
        "fake-ffmpeg-copy",
        "for last; do :; done\ncp \"$3\" \"$last\"",
    );
    let input = dir.path().join("clip.mov");
    std::fs::write(&input, b"movie bytes").unwrap();

    let config = ConverterConfig::default().media(MediaConfig::with_transcoder(transcoder));
    let output = Converter::new(config)
        .unwrap()
        .convert(&ConversionRequest::new(&input, "MKV"))
        .await
        .unwrap();

    assert_eq!(output, dir.path().join("clip.mkv"));
    assert_eq!(std::fs::read(&output).unwrap(), b"movie bytes");
}
