//! Comment entity and repository trait.
//!
//! Maps to the `comments` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::shared::error::AppError;

/// A comment left on a video.
///
/// Maps to the `comments` table:
/// - id: BIGINT PRIMARY KEY
/// - video_id: BIGINT NOT NULL REFERENCES videos(id)
/// - user_id: BIGINT NOT NULL REFERENCES users(id)
/// - content: TEXT NOT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - deleted_at: TIMESTAMPTZ NULL (soft delete)
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: i64,
    pub video_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Short `MM-DD` date shown by clients.
    pub fn create_date(&self) -> String {
        self.created_at.format("%m-%d").to_string()
    }
}

/// Repository trait for comments.
///
/// `create` and `soft_delete` adjust `videos.comment_count` in the same
/// transaction as the comment write.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment and bump the video's comment count.
    ///
    /// Fails with `NotFound` if the video does not exist.
    async fn create(&self, comment: &Comment) -> Result<Comment, AppError>;

    /// Find a live comment by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError>;

    /// Mark a comment deleted and decrement its video's comment count.
    ///
    /// Returns `false` when the comment was already gone.
    async fn soft_delete(&self, comment: &Comment) -> Result<bool, AppError>;

    /// Live comments of a video, newest first.
    async fn find_by_video(&self, video_id: i64) -> Result<Vec<Comment>, AppError>;
}
