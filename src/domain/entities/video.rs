//! Video entity and repository trait.
//!
//! Maps to the `videos` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Maximum number of videos returned by one feed page.
pub const FEED_PAGE_SIZE: i64 = 30;

/// A published video.
///
/// Maps to the `videos` table:
/// - id: BIGINT PRIMARY KEY
/// - author_id: BIGINT NOT NULL REFERENCES users(id)
/// - play_url / cover_url: TEXT NOT NULL, relative paths such as `/static/video/<name>.mp4`
/// - title: TEXT NOT NULL
/// - favorite_count / comment_count: BIGINT NOT NULL DEFAULT 0
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - deleted_at: TIMESTAMPTZ NULL
///
/// Rows exist only for uploads that passed ingestion. URLs are never
/// stored absolute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: i64,
    pub author_id: i64,
    pub play_url: String,
    pub cover_url: String,
    pub title: String,
    pub favorite_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Video {
    pub fn new(
        id: i64,
        author_id: i64,
        play_url: impl Into<String>,
        cover_url: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id,
            author_id,
            play_url: play_url.into(),
            cover_url: cover_url.into(),
            title: title.into(),
            favorite_count: 0,
            comment_count: 0,
            created_at: Utc::now(),
        }
    }
}

/// Repository trait for Video data access operations.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Insert a video and bump its author's `work_count` in one transaction.
    async fn create(&self, video: &Video) -> Result<Video, AppError>;

    /// Find a live video by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Video>, AppError>;

    /// All videos of an author, newest first.
    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Video>, AppError>;

    /// Up to `limit` videos created strictly before `before`, newest first.
    async fn find_before(&self, before: DateTime<Utc>, limit: i64) -> Result<Vec<Video>, AppError>;

    /// Videos favorited by an account, most recently favorited first.
    async fn find_favorited_by(&self, user_id: i64) -> Result<Vec<Video>, AppError>;
}
