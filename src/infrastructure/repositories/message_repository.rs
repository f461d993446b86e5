//! Message Repository Implementation
//!
//! PostgreSQL implementation of direct-message storage with "after T" polling
//! and per-conversation summaries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Message, MessageRepository};
use crate::shared::error::AppError;

/// PostgreSQL message repository implementation.
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Creates a new PgMessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for message queries.
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i64,
    from_user_id: i64,
    to_user_id: i64,
    content: String,
    created_at: DateTime<Utc>,
}

impl MessageRow {
    /// Converts database row to domain Message entity.
    fn into_message(self) -> Message {
        Message {
            id: self.id,
            from_user_id: self.from_user_id,
            to_user_id: self.to_user_id,
            content: self.content,
            created_at: self.created_at,
        }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn create(&self, message: &Message) -> Result<Message, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (id, from_user_id, to_user_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, from_user_id, to_user_id, content, created_at
            "#,
        )
        .bind(message.id)
        .bind(message.from_user_id)
        .bind(message.to_user_id)
        .bind(&message.content)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_message())
    }

    async fn find_between(
        &self,
        user_a: i64,
        user_b: i64,
        after: DateTime<Utc>,
    ) -> Result<Vec<Message>, AppError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, from_user_id, to_user_id, content, created_at
            FROM messages
            WHERE ((from_user_id = $1 AND to_user_id = $2)
                OR (from_user_id = $2 AND to_user_id = $1))
              AND created_at > $3
              AND deleted_at IS NULL
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .bind(after)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MessageRow::into_message).collect())
    }

    async fn latest_per_conversation(&self, user_id: i64) -> Result<Vec<Message>, AppError> {
        // Snowflake ids grow with time, so MAX(id) is the latest message of a pair.
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT m.id, m.from_user_id, m.to_user_id, m.content, m.created_at
            FROM messages m
            JOIN (
                SELECT MAX(id) AS id
                FROM messages
                WHERE (from_user_id = $1 OR to_user_id = $1) AND deleted_at IS NULL
                GROUP BY LEAST(from_user_id, to_user_id), GREATEST(from_user_id, to_user_id)
            ) latest ON latest.id = m.id
            ORDER BY m.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MessageRow::into_message).collect())
    }
}
