//! Direct message entity and repository trait.
//!
//! Maps to the `messages` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};

use crate::shared::error::AppError;

/// A direct message between two accounts.
///
/// Maps to the `messages` table:
/// - id: BIGINT PRIMARY KEY
/// - from_user_id / to_user_id: BIGINT NOT NULL REFERENCES users(id)
/// - content: TEXT NOT NULL
/// - created_at: TIMESTAMPTZ NOT NULL, whole seconds
///
/// Messages are never edited or deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: i64,
    pub from_user_id: i64,
    pub to_user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Build a message stamped with `now` truncated to whole seconds, so that
    /// "messages after T" polling with second precision never repeats one.
    pub fn new(
        id: i64,
        from_user_id: i64,
        to_user_id: i64,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let created_at = now.duration_trunc(TimeDelta::seconds(1)).unwrap_or(now);
        Self {
            id,
            from_user_id,
            to_user_id,
            content: content.into(),
            created_at,
        }
    }

    /// The other participant from `user_id`'s point of view.
    pub fn peer_of(&self, user_id: i64) -> i64 {
        if self.from_user_id == user_id {
            self.to_user_id
        } else {
            self.from_user_id
        }
    }
}

/// Repository trait for direct messages.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a message.
    async fn create(&self, message: &Message) -> Result<Message, AppError>;

    /// Messages exchanged between `user_a` and `user_b` (either direction)
    /// created strictly after `after`, oldest first.
    async fn find_between(
        &self,
        user_a: i64,
        user_b: i64,
        after: DateTime<Utc>,
    ) -> Result<Vec<Message>, AppError>;

    /// The latest message of every conversation `user_id` takes part in,
    /// newest conversation first.
    async fn latest_per_conversation(&self, user_id: i64) -> Result<Vec<Message>, AppError>;
}
