//! ffprobe / ffmpeg backed [`MediaProbe`].

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::config::MediaSettings;
use crate::domain::{MediaProbe, ProbeReport, StreamInfo};
use crate::shared::error::AppError;

/// Marker ffprobe prints when it cannot recognise the container at all.
const UNRECOGNISED_INPUT: &str = "Invalid data found when processing input";

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    #[serde(default)]
    codec_type: String,
    codec_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    #[serde(default)]
    format_name: String,
}

impl FfprobeOutput {
    fn into_report(self) -> ProbeReport {
        ProbeReport {
            format_name: self.format.map(|f| f.format_name).unwrap_or_default(),
            streams: self
                .streams
                .into_iter()
                .map(|s| StreamInfo {
                    codec_type: s.codec_type,
                    codec_name: s.codec_name,
                })
                .collect(),
        }
    }
}

/// Parse `ffprobe -of json` output into a [`ProbeReport`].
fn parse_probe_output(stdout: &[u8]) -> Result<ProbeReport, AppError> {
    let output: FfprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| AppError::MediaTool(format!("ffprobe json parse: {}", e)))?;
    Ok(output.into_report())
}

/// Shells out to the configured ffprobe and ffmpeg binaries.
#[derive(Debug, Clone)]
pub struct FfmpegProbe {
    ffprobe_path: PathBuf,
    ffmpeg_path: PathBuf,
}

impl FfmpegProbe {
    pub fn new(settings: &MediaSettings) -> Self {
        Self {
            ffprobe_path: PathBuf::from(&settings.ffprobe_path),
            ffmpeg_path: PathBuf::from(&settings.ffmpeg_path),
        }
    }
}

#[async_trait]
impl MediaProbe for FfmpegProbe {
    async fn probe(&self, path: &Path) -> Result<ProbeReport, AppError> {
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-show_streams", "-show_format", "-of", "json"])
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AppError::MediaTool(format!("ffprobe spawn error: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains(UNRECOGNISED_INPUT) {
                tracing::debug!(path = %path.display(), "ffprobe did not recognise container");
                return Ok(ProbeReport {
                    format_name: "unknown".to_string(),
                    streams: Vec::new(),
                });
            }
            return Err(AppError::MediaTool(format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        parse_probe_output(&output.stdout)
    }

    async fn extract_first_frame(&self, src: &Path, dst: &Path) -> Result<(), AppError> {
        let output = Command::new(&self.ffmpeg_path)
            .args(["-y", "-v", "error", "-ss", "0", "-i"])
            .arg(src)
            .args(["-frames:v", "1", "-f", "image2"])
            .arg(dst)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AppError::MediaTool(format!("ffmpeg spawn error: {}", e)))?;

        if !output.status.success() {
            return Err(AppError::MediaTool(format!(
                "ffmpeg thumbnail failed with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }
}
