//! Follow edges.
//!
//! Maps to the `follows` table: `(follower_id, followed_id)` with a unique
//! index on the ordered pair. Rows are removed outright on unfollow.

use async_trait::async_trait;

use crate::shared::error::AppError;

/// Repository trait for the follow graph.
///
/// `follow` and `unfollow` adjust `users.follow_count` of the follower and
/// `users.follower_count` of the followed account inside the same
/// transaction as the edge write.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Whether `follower_id` currently follows `followed_id`.
    async fn exists(&self, follower_id: i64, followed_id: i64) -> Result<bool, AppError>;

    /// Create the edge and bump both counters.
    ///
    /// Fails with `AlreadyExists` if the edge is already present.
    async fn follow(&self, follower_id: i64, followed_id: i64) -> Result<(), AppError>;

    /// Remove the edge and decrement both counters.
    ///
    /// Returns `false` (and writes nothing) when no edge existed.
    async fn unfollow(&self, follower_id: i64, followed_id: i64) -> Result<bool, AppError>;

    /// Ids of the accounts `user_id` follows, newest edge first.
    async fn followed_ids(&self, user_id: i64) -> Result<Vec<i64>, AppError>;

    /// Ids of the accounts following `user_id`, newest edge first.
    async fn follower_ids(&self, user_id: i64) -> Result<Vec<i64>, AppError>;
}
