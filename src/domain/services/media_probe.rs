//! Media inspection seam used by the ingestion pipeline.
//!
//! The pipeline only needs two capabilities from a media toolkit: describe the
//! streams inside a container, and render its first frame as a still image.
//! The production implementation shells out to ffprobe/ffmpeg; tests plug in
//! fakes.

use std::path::Path;

use async_trait::async_trait;

use crate::shared::error::AppError;

/// One elementary stream reported by a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    /// `video`, `audio`, `subtitle`, ...
    pub codec_type: String,
    pub codec_name: Option<String>,
}

/// Result of probing a container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbeReport {
    /// Container format as detected by the tool (e.g. `mov,mp4,m4a,3gp,3g2,mj2`).
    pub format_name: String,
    pub streams: Vec<StreamInfo>,
}

impl ProbeReport {
    /// A container is accepted only when it carries at least one stream.
    pub fn is_playable(&self) -> bool {
        !self.streams.is_empty()
    }

    pub fn has_video_stream(&self) -> bool {
        self.streams.iter().any(|s| s.codec_type == "video")
    }
}

#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Describe the container at `path`.
    ///
    /// Tool failures map to `AppError::MediaTool`. An unrecognised container
    /// that the tool still reports on must come back as a report with no
    /// streams, not as an error.
    async fn probe(&self, path: &Path) -> Result<ProbeReport, AppError>;

    /// Decode the first frame of `src` and write it as a still image to `dst`.
    async fn extract_first_frame(&self, src: &Path, dst: &Path) -> Result<(), AppError>;
}
