//! Office document to PDF conversion through a headless LibreOffice run.
//!
//! Each conversion gets its own user profile so a LibreOffice instance the
//! user already has open does not swallow the request.

use crate::config::OfficeConfig;
use crate::error::{ConversionError, Result};
use async_process::{Command, Stdio};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::TempDir;
use tokio::time::timeout;
use tracing::{debug, info};
use uuid::Uuid;

/// Well-known soffice install locations, checked before PATH.
const SOFFICE_CANDIDATES: &[&str] = &[
    // macOS
    "/Applications/LibreOffice.app/Contents/MacOS/soffice",
    // Linux
    "/usr/bin/soffice",
    "/usr/lib/libreoffice/program/soffice",
    "/opt/libreoffice/program/soffice",
    // Snap (Ubuntu)
    "/snap/bin/libreoffice.soffice",
];

/// Find the soffice binary.
pub fn find_soffice(config: &OfficeConfig) -> Result<PathBuf> {
    if let Some(ref path) = config.soffice_path {
        if path.exists() {
            return Ok(path.clone());
        }
        return Err(ConversionError::Document(format!(
            "LibreOffice not found at '{}'",
            path.display()
        )));
    }

    for candidate in SOFFICE_CANDIDATES {
        let path = PathBuf::from(candidate);
        if path.exists() {
            return Ok(path);
        }
    }

    which::which("soffice")
        .or_else(|_| which::which("libreoffice"))
        .map_err(|_| {
            ConversionError::Document(
                "LibreOffice not found. Please install LibreOffice and ensure 'soffice' is in PATH"
                    .to_string(),
            )
        })
}

fn scratch_dir(config: &OfficeConfig, prefix: &str) -> Result<TempDir> {
    let dir = match &config.temp_dir {
        Some(base) => TempDir::with_prefix_in(prefix, base),
        None => TempDir::with_prefix(prefix),
    };
    dir.map_err(|e| ConversionError::Document(format!("Failed to create temp directory: {}", e)))
}

/// Convert an office document to PDF and place it at `output`.
pub async fn convert_to_pdf(config: &OfficeConfig, input: &Path, output: &Path) -> Result<()> {
    let start = Instant::now();
    let soffice_path = find_soffice(config)?;
    info!("Found LibreOffice at: {:?}", soffice_path);

    let profile_dir = scratch_dir(config, "lo-profile-")?;
    let work_dir = scratch_dir(config, "file-convert-pdf-")?;
    let output_dir = work_dir.path().join(Uuid::new_v4().to_string());
    std::fs::create_dir_all(&output_dir).map_err(|e| {
        ConversionError::Document(format!(
            "Failed to create output directory '{}': {}",
            output_dir.display(),
            e
        ))
    })?;

    let mut cmd = Command::new(&soffice_path);
    cmd.args([
        "--headless",
        "--invisible",
        "--nologo",
        "--nofirststartwizard",
        "--norestore",
    ]);
    cmd.arg(format!(
        "-env:UserInstallation=file://{}",
        profile_dir.path().display()
    ));
    cmd.args(["--convert-to", "pdf", "--outdir"]);
    cmd.arg(&output_dir);
    cmd.arg(input);
    cmd.stdin(Stdio::null());

    let result = timeout(config.conversion_timeout, cmd.output())
        .await
        .map_err(|_| {
            ConversionError::Document(format!(
                "LibreOffice conversion timed out after {} seconds for '{}'",
                config.conversion_timeout.as_secs(),
                input.display()
            ))
        })?
        .map_err(|e| {
            ConversionError::Document(format!("Failed to start LibreOffice process: {}", e))
        })?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(ConversionError::Document(format!(
            "LibreOffice conversion failed for '{}': {}",
            input.display(),
            stderr.trim()
        )));
    }

    let pdf_path = locate_pdf(&output_dir, input).ok_or_else(|| {
        ConversionError::Document(format!(
            "LibreOffice produced no PDF for '{}'",
            input.display()
        ))
    })?;

    move_file(&pdf_path, output)?;

    debug!(
        "Converted {:?} to PDF in {:?}",
        input.file_name(),
        start.elapsed()
    );
    Ok(())
}

/// The PDF LibreOffice wrote for `input`, falling back to any PDF in `dir`.
fn locate_pdf(dir: &Path, input: &Path) -> Option<PathBuf> {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let expected = dir.join(format!("{}.pdf", stem));
    if expected.exists() {
        return Some(expected);
    }

    std::fs::read_dir(dir).ok().and_then(|entries| {
        entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .find(|p| p.extension().map(|ext| ext == "pdf").unwrap_or(false))
    })
}

/// Rename, or copy and remove when the scratch dir is on another filesystem.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| {
            ConversionError::Document(format!("Failed to write '{}': {}", to.display(), e))
        })
}
