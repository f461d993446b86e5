//! Comment Repository Implementation
//!
//! Comment writes and `videos.comment_count` move together in one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Comment, CommentRepository};
use crate::infrastructure::database::with_transaction;
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: i64,
    video_id: i64,
    user_id: i64,
    content: String,
    created_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            id: self.id,
            video_id: self.video_id,
            user_id: self.user_id,
            content: self.content,
            created_at: self.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, comment: &Comment) -> Result<Comment, AppError> {
        let comment = comment.clone();
        with_transaction(&self.pool, |mut tx| async move {
            let bumped = sqlx::query(
                "UPDATE videos SET comment_count = comment_count + 1 \
                 WHERE id = $1 AND deleted_at IS NULL",
            )
            .bind(comment.video_id)
            .execute(tx.conn())
            .await?;

            if bumped.rows_affected() == 0 {
                return Err(AppError::not_found("video", "id", comment.video_id));
            }

            let row = sqlx::query_as::<_, CommentRow>(
                r#"
                INSERT INTO comments (id, video_id, user_id, content, created_at)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, video_id, user_id, content, created_at
                "#,
            )
            .bind(comment.id)
            .bind(comment.video_id)
            .bind(comment.user_id)
            .bind(&comment.content)
            .bind(comment.created_at)
            .fetch_one(tx.conn())
            .await?;

            Ok((row.into_comment(), tx))
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, video_id, user_id, content, created_at
            FROM comments
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CommentRow::into_comment))
    }

    async fn soft_delete(&self, comment: &Comment) -> Result<bool, AppError> {
        let (comment_id, video_id) = (comment.id, comment.video_id);
        with_transaction(&self.pool, |mut tx| async move {
            let deleted = sqlx::query(
                "UPDATE comments SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
            )
            .bind(comment_id)
            .execute(tx.conn())
            .await?;

            if deleted.rows_affected() == 0 {
                return Ok((false, tx));
            }

            sqlx::query("UPDATE videos SET comment_count = comment_count - 1 WHERE id = $1")
                .bind(video_id)
                .execute(tx.conn())
                .await?;

            Ok((true, tx))
        })
        .await
    }

    async fn find_by_video(&self, video_id: i64) -> Result<Vec<Comment>, AppError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, video_id, user_id, content, created_at
            FROM comments
            WHERE video_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(video_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentRow::into_comment).collect())
    }
}
