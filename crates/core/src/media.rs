//! Audio and video conversion through an external transcoder process.
//!
//! All container and codec knowledge lives in the transcoder; the output
//! format is implied by the output file's extension.

use crate::config::MediaConfig;
use crate::error::{ConversionError, Result};
use async_process::{Command, Stdio};
use std::ffi::OsString;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Runs the configured transcoder for one input/output pair.
#[derive(Debug, Clone, Default)]
pub struct MediaConverter {
    config: MediaConfig,
}

impl MediaConverter {
    /// Create a media converter.
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// The transcoder that will be spawned.
    pub fn transcoder_path(&self) -> &Path {
        &self.config.transcoder_path
    }

    /// Arguments passed to the transcoder, in order.
    pub fn arguments(&self, input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-i".into(),
            input.into(),
            "-preset".into(),
            (&self.config.preset).into(),
            output.into(),
        ]
    }

    /// Transcode `input` into `output`, waiting for the child to finish.
    pub async fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let start = Instant::now();

        debug!(
            "Running {:?} for {:?} -> {:?}",
            self.config.transcoder_path,
            input.file_name(),
            output.file_name()
        );

        let result = Command::new(&self.config.transcoder_path)
            .args(self.arguments(input, output))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(ConversionError::TranscoderSpawn)?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).into_owned();
            debug!(
                "Transcoder exited with {:?} for {:?}",
                result.status.code(),
                input
            );
            return Err(ConversionError::TranscoderFailed {
                status: result.status.code(),
                stderr,
            });
        }

        debug!("Transcoded {:?} in {:?}", input.file_name(), start.elapsed());
        Ok(())
    }
}
