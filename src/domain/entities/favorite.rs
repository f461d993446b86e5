//! Favorite (like) edges.
//!
//! Maps to the `favorites` table: `(user_id, video_id)` with a unique index
//! on the pair. Removal hard-deletes the row.

use async_trait::async_trait;

use crate::shared::error::AppError;

/// Repository trait for favorite edges.
///
/// Adding or removing an edge cascades three counter updates in the same
/// transaction: the video's `favorite_count`, the author's
/// `total_favorited` and the actor's `favorite_count`.
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Whether `user_id` has favorited `video_id`.
    async fn exists(&self, user_id: i64, video_id: i64) -> Result<bool, AppError>;

    /// Create the edge with its counter cascade.
    ///
    /// Fails with `AlreadyExists` if the edge is already present and with
    /// `NotFound` if the video does not exist.
    async fn add(&self, user_id: i64, video_id: i64) -> Result<(), AppError>;

    /// Remove the edge with its counter cascade.
    ///
    /// Returns `false` (and writes nothing) when no edge existed.
    async fn remove(&self, user_id: i64, video_id: i64) -> Result<bool, AppError>;
}
