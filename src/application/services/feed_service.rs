//! Feed Service
//!
//! Time-cursor pagination over published videos, plus an author's publish list.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::application::dto::response::{FeedPage, VideoView};
use crate::application::services::assembly::ViewAssembler;
use crate::domain::{VideoRepository, FEED_PAGE_SIZE};
use crate::shared::error::AppError;

#[async_trait]
pub trait FeedService: Send + Sync {
    /// Up to [`FEED_PAGE_SIZE`] videos created strictly before `latest_secs`
    /// (now when absent or zero), newest first.
    async fn feed(&self, viewer: Option<i64>, latest_secs: Option<i64>)
        -> Result<FeedPage, AppError>;

    /// Videos published by `user_id`, newest first.
    async fn publish_list(
        &self,
        viewer: Option<i64>,
        user_id: i64,
    ) -> Result<Vec<VideoView>, AppError>;
}

pub struct FeedServiceImpl<V>
where
    V: VideoRepository,
{
    video_repo: Arc<V>,
    views: Arc<ViewAssembler>,
}

impl<V> FeedServiceImpl<V>
where
    V: VideoRepository,
{
    pub fn new(video_repo: Arc<V>, views: Arc<ViewAssembler>) -> Self {
        Self { video_repo, views }
    }
}

/// Resolve the client cursor. Missing, zero or negative means "now".
fn cursor_from(latest_secs: Option<i64>) -> Result<DateTime<Utc>, AppError> {
    match latest_secs {
        Some(secs) if secs > 0 => DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| AppError::BadRequest("latest_time out of range".into())),
        _ => Ok(Utc::now()),
    }
}

#[async_trait]
impl<V> FeedService for FeedServiceImpl<V>
where
    V: VideoRepository,
{
    async fn feed(
        &self,
        viewer: Option<i64>,
        latest_secs: Option<i64>,
    ) -> Result<FeedPage, AppError> {
        let cursor = cursor_from(latest_secs)?;
        let videos = self.video_repo.find_before(cursor, FEED_PAGE_SIZE).await?;
        // Whole-second cursor with a strict `<` bound: older videos sharing the
        // last item's second are skipped by the next page.
        let next_time = videos
            .last()
            .map(|v| v.created_at.timestamp())
            .unwrap_or(0);

        let video_list = self.views.video_views(viewer, videos).await?;
        Ok(FeedPage {
            next_time,
            video_list,
        })
    }

    async fn publish_list(
        &self,
        viewer: Option<i64>,
        user_id: i64,
    ) -> Result<Vec<VideoView>, AppError> {
        self.views.load_user(user_id).await?;
        let videos = self.video_repo.find_by_author(user_id).await?;
        self.views.video_views(viewer, videos).await
    }
}
