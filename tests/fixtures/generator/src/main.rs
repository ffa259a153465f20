//! Sample input generator for file-convert.
//!
//! Writes one input per conversion path into `tests/fixtures/output` so the
//! CLI can be exercised by hand:
//!
//! ```text
//! cargo run -p fixture-generator
//! cargo run -p file-convert-cli -- tests/fixtures/output/transparent.png jpeg
//! ```

use anyhow::Result;
use docx_rs::{Docx, Paragraph, Run};
use image::{GrayAlphaImage, LumaA, Rgba, RgbaImage};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

fn main() -> Result<()> {
    let output_dir = Path::new("tests/fixtures/output");
    fs::create_dir_all(output_dir)?;

    println!("Generating sample inputs...\n");

    // Image inputs
    generate_transparent_png(output_dir)?;
    generate_gray_alpha_png(output_dir)?;

    // Document inputs
    generate_simple_docx(output_dir)?;
    generate_latin1_txt(output_dir)?;
    generate_multipage_txt(output_dir)?;
    generate_rtf(output_dir)?;

    // Error inputs
    generate_corrupt_docx(output_dir)?;

    println!("\nAll samples generated successfully!");
    Ok(())
}

/// RGBA image with a transparent left half, for the JPEG white-background path.
fn generate_transparent_png(output_dir: &Path) -> Result<()> {
    let path = output_dir.join("transparent.png");
    println!("  Creating: {}", path.display());

    let image = RgbaImage::from_fn(256, 128, |x, y| {
        if x < 128 {
            Rgba([255, 0, 0, 0])
        } else {
            Rgba([0, (y * 2) as u8, 255, 255])
        }
    });
    image.save(&path)?;
    Ok(())
}

/// Grayscale image with a radial alpha falloff.
fn generate_gray_alpha_png(output_dir: &Path) -> Result<()> {
    let path = output_dir.join("gray_alpha.png");
    println!("  Creating: {}", path.display());

    let image = GrayAlphaImage::from_fn(128, 128, |x, y| {
        let dx = x as f32 - 64.0;
        let dy = y as f32 - 64.0;
        let alpha = (255.0 - (dx * dx + dy * dy).sqrt() * 4.0).clamp(0.0, 255.0);
        LumaA([32, alpha as u8])
    });
    image.save(&path)?;
    Ok(())
}

/// Generate a simple two-paragraph DOCX for docx -> pdf.
fn generate_simple_docx(output_dir: &Path) -> Result<()> {
    let path = output_dir.join("simple.docx");
    println!("  Creating: {}", path.display());

    let docx = Docx::new()
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text("Hello, World! This is a simple test document.")),
        )
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text("It contains two paragraphs of plain text.")),
        );

    let file = File::create(&path)?;
    docx.build().pack(file)?;
    Ok(())
}

/// Text with characters inside and outside Latin-1, for txt -> pdf.
fn generate_latin1_txt(output_dir: &Path) -> Result<()> {
    let path = output_dir.join("mixed_charset.txt");
    println!("  Creating: {}", path.display());

    let mut file = File::create(&path)?;
    writeln!(file, "Plain ASCII line")?;
    writeln!(file, "Latin-1 survives: café, naïve, £10, ±5")?;
    writeln!(file, "Outside Latin-1 becomes ?: Привіт, →, ✓")?;
    writeln!(file)?;
    writeln!(file, "Line after a blank line")?;
    Ok(())
}

/// Enough lines to spill onto several pages.
fn generate_multipage_txt(output_dir: &Path) -> Result<()> {
    let path = output_dir.join("multipage.txt");
    println!("  Creating: {}", path.display());

    let mut file = File::create(&path)?;
    for i in 1..=80 {
        writeln!(file, "Line {} of the multipage sample", i)?;
    }
    Ok(())
}

/// An RTF file; rtf -> docx is an unsupported pair.
fn generate_rtf(output_dir: &Path) -> Result<()> {
    let path = output_dir.join("memo.rtf");
    println!("  Creating: {}", path.display());

    fs::write(&path, r"{\rtf1\ansi\deff0 {\fonttbl {\f0 Times;}} \f0 A short memo.}")?;
    Ok(())
}

/// Generate a corrupt DOCX.
fn generate_corrupt_docx(output_dir: &Path) -> Result<()> {
    let path = output_dir.join("corrupt.docx");
    println!("  Creating: {}", path.display());

    // Write invalid data (not a valid ZIP/DOCX)
    let mut file = File::create(&path)?;
    file.write_all(b"This is not a valid DOCX file. It's just garbage data.")?;
    Ok(())
}
