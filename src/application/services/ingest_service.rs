//! Video Ingestion Pipeline
//!
//! Turns an uploaded media stream into a persisted [`Video`] row, or fails
//! leaving no file behind:
//!
//! 1. derive a content-independent, collision-resistant base name;
//! 2. stream the upload into the video directory (I/O failure aborts here);
//! 3. run format validation and cover extraction concurrently;
//! 4. on the first failure abort, remove every artifact written so far and
//!    report that failure; once both succeed, commit the row.
//!
//! Steps 3 and 4 run under a deadline.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio::task::JoinHandle;

use crate::config::MediaSettings;
use crate::domain::{MediaProbe, Video, VideoRepository};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::shared::hashing::{extension_of, salted_name};
use crate::shared::snowflake::SnowflakeGenerator;

/// URL prefix under which the video directory is served.
pub const VIDEO_URL_PREFIX: &str = "/static/video";
/// URL prefix under which the cover directory is served.
pub const COVER_URL_PREFIX: &str = "/static/cover";

const COVER_EXTENSION: &str = "jpg";

/// One upload as handed over by the HTTP layer.
pub struct VideoUpload<'a> {
    /// Client-side file name; only its extension is kept
    pub file_name: &'a str,
    pub title: &'a str,
    pub body: &'a mut (dyn AsyncRead + Unpin + Send),
}

/// Publishing entry point used by `/publish`.
#[async_trait]
pub trait VideoPublisher: Send + Sync {
    /// Ingest an upload for `author_id`, returning the generated base file name.
    async fn publish(&self, upload: VideoUpload<'_>, author_id: i64) -> Result<String, AppError>;
}

/// Concurrent validate + extract pipeline over a [`MediaProbe`].
pub struct VideoIngestor<V, P>
where
    V: VideoRepository,
    P: MediaProbe + 'static,
{
    videos: Arc<V>,
    probe: Arc<P>,
    id_generator: Arc<SnowflakeGenerator>,
    video_dir: PathBuf,
    cover_dir: PathBuf,
    timeout: Duration,
}

/// Why an ingestion stopped after the upload was persisted.
#[derive(Debug)]
enum Abort {
    Failed(AppError),
    TimedOut,
}

impl<V, P> VideoIngestor<V, P>
where
    V: VideoRepository,
    P: MediaProbe + 'static,
{
    pub fn new(
        videos: Arc<V>,
        probe: Arc<P>,
        id_generator: Arc<SnowflakeGenerator>,
        media: &MediaSettings,
    ) -> Self {
        Self {
            videos,
            probe,
            id_generator,
            video_dir: media.video_path(),
            cover_dir: media.cover_path(),
            timeout: Duration::from_secs(media.ingest_timeout_secs),
        }
    }

    /// Override the validate + extract deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Stream `body` to `path`, removing the partial file on failure.
    async fn persist(
        &self,
        path: &Path,
        body: &mut (dyn AsyncRead + Unpin + Send),
    ) -> Result<u64, AppError> {
        let result = async {
            tokio::fs::create_dir_all(&self.video_dir).await?;
            let mut file = tokio::fs::File::create(path).await?;
            let written = tokio::io::copy(body, &mut file).await?;
            file.flush().await?;
            Ok::<_, std::io::Error>(written)
        }
        .await;

        match result {
            Ok(written) => Ok(written),
            Err(e) => {
                remove_artifact("video", path).await;
                Err(AppError::Io(e))
            }
        }
    }

    /// Run both checks against the persisted file and wait for the verdict.
    async fn check(&self, video_path: &Path, cover_path: &Path) -> Result<(), Abort> {
        tokio::fs::create_dir_all(&self.cover_dir)
            .await
            .map_err(|e| Abort::Failed(AppError::Io(e)))?;

        let mut validate = Check::spawn("validation", {
            let probe = Arc::clone(&self.probe);
            let src = video_path.to_path_buf();
            async move {
                let report = probe.probe(&src).await?;
                if !report.is_playable() {
                    return Err(AppError::InvalidVideoFormat(report.format_name));
                }
                Ok(())
            }
        });

        let mut extract = Check::spawn("extraction", {
            let probe = Arc::clone(&self.probe);
            let src = video_path.to_path_buf();
            let dst = cover_path.to_path_buf();
            async move { probe.extract_first_frame(&src, &dst).await }
        });

        let verdict = tokio::time::timeout(
            self.timeout,
            join_first_failure(&mut validate, &mut extract),
        )
        .await;

        match verdict {
            Ok(result) => result.map_err(Abort::Failed),
            Err(_) => {
                // Dropping a JoinHandle detaches the task; stop both before cleanup.
                validate.stop().await;
                extract.stop().await;
                Err(Abort::TimedOut)
            }
        }
    }

    async fn ingest(&self, upload: VideoUpload<'_>, author_id: i64) -> Result<String, AppError> {
        let title = upload.title.trim();
        if title.is_empty() {
            return Err(AppError::missing("title"));
        }

        let started = Instant::now();
        let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let (name, _salt) = salted_name(&format!("{}{}{}", upload.file_name, title, stamp));
        let video_file = match extension_of(upload.file_name) {
            Some(ext) => format!("{}.{}", name, ext),
            None => name.clone(),
        };
        let (cover_name, _) = salted_name(&format!("{}{}", name, stamp));
        let cover_file = format!("{}.{}", cover_name, COVER_EXTENSION);

        let video_path = self.video_dir.join(&video_file);
        let cover_path = self.cover_dir.join(&cover_file);

        let written = match self.persist(&video_path, upload.body).await {
            Ok(written) => written,
            Err(e) => {
                tracing::warn!(error = %e, file = %video_file, "Failed to persist upload");
                metrics::record_ingest("io_error", started.elapsed().as_secs_f64());
                return Err(e);
            }
        };
        tracing::debug!(file = %video_file, bytes = written, author_id, "Upload persisted");

        if let Err(abort) = self.check(&video_path, &cover_path).await {
            remove_artifact("video", &video_path).await;
            remove_artifact("cover", &cover_path).await;

            let (outcome, error) = match abort {
                Abort::TimedOut => (
                    "timeout",
                    AppError::MediaTool(format!(
                        "ingestion timed out after {}s",
                        self.timeout.as_secs_f64()
                    )),
                ),
                Abort::Failed(e) => (outcome_of(&e), e),
            };
            tracing::info!(file = %video_file, outcome, error = %error, "Ingestion aborted");
            metrics::record_ingest(outcome, started.elapsed().as_secs_f64());
            return Err(error);
        }

        let video = Video::new(
            self.id_generator.generate(),
            author_id,
            format!("{}/{}", VIDEO_URL_PREFIX, video_file),
            format!("{}/{}", COVER_URL_PREFIX, cover_file),
            title,
        );

        if let Err(e) = self.videos.create(&video).await {
            remove_artifact("video", &video_path).await;
            remove_artifact("cover", &cover_path).await;
            metrics::record_ingest("store_error", started.elapsed().as_secs_f64());
            return Err(e);
        }

        tracing::info!(
            video_id = video.id,
            author_id,
            file = %video_file,
            cover = %cover_file,
            "Video committed"
        );
        metrics::record_ingest("committed", started.elapsed().as_secs_f64());
        Ok(name)
    }
}

#[async_trait]
impl<V, P> VideoPublisher for VideoIngestor<V, P>
where
    V: VideoRepository,
    P: MediaProbe + 'static,
{
    async fn publish(&self, upload: VideoUpload<'_>, author_id: i64) -> Result<String, AppError> {
        self.ingest(upload, author_id).await
    }
}

/// A spawned check and whether its handle has already yielded.
struct Check {
    task: &'static str,
    handle: JoinHandle<Result<(), AppError>>,
    resolved: bool,
}

impl Check {
    fn spawn<F>(task: &'static str, future: F) -> Self
    where
        F: Future<Output = Result<(), AppError>> + Send + 'static,
    {
        Self {
            task,
            handle: tokio::spawn(future),
            resolved: false,
        }
    }

    /// Abort the task if it is still pending and wait for it to go away.
    async fn stop(&mut self) {
        if self.resolved {
            return;
        }
        self.handle.abort();
        let _ = (&mut self.handle).await;
        self.resolved = true;
    }
}

/// Wait until both checks succeed or either fails.
///
/// The first failure wins. The sibling is aborted rather than awaited to
/// completion, and the abort is awaited so that any child process it owns
/// is gone before the caller removes artifacts.
async fn join_first_failure(validate: &mut Check, extract: &mut Check) -> Result<(), AppError> {
    while !(validate.resolved && extract.resolved) {
        let outcome = tokio::select! {
            res = &mut validate.handle, if !validate.resolved => {
                validate.resolved = true;
                flatten(validate.task, res)
            }
            res = &mut extract.handle, if !extract.resolved => {
                extract.resolved = true;
                flatten(extract.task, res)
            }
        };

        if let Err(error) = outcome {
            validate.stop().await;
            extract.stop().await;
            return Err(error);
        }
    }

    Ok(())
}

fn flatten(
    task: &str,
    joined: Result<Result<(), AppError>, tokio::task::JoinError>,
) -> Result<(), AppError> {
    match joined {
        Ok(result) => result,
        Err(e) => Err(AppError::Internal(format!("{} task failed: {}", task, e))),
    }
}

fn outcome_of(error: &AppError) -> &'static str {
    match error {
        AppError::InvalidVideoFormat(_) => "invalid_format",
        AppError::Io(_) => "io_error",
        _ => "tool_error",
    }
}

/// Best-effort removal of an ingestion artifact.
async fn remove_artifact(kind: &str, path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            tracing::debug!(artifact = kind, path = %path.display(), "Removed artifact");
            metrics::record_cleanup(kind, true);
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(artifact = kind, path = %path.display(), error = %e, "Failed to remove artifact");
            metrics::record_cleanup(kind, false);
        }
    }
}
