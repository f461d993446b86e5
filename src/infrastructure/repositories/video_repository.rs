//! Video Repository Implementation
//!
//! PostgreSQL implementation of the VideoRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Video, VideoRepository};
use crate::infrastructure::database::with_transaction;
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct VideoRow {
    id: i64,
    author_id: i64,
    play_url: String,
    cover_url: String,
    title: String,
    favorite_count: i64,
    comment_count: i64,
    created_at: DateTime<Utc>,
}

impl VideoRow {
    fn into_video(self) -> Video {
        Video {
            id: self.id,
            author_id: self.author_id,
            play_url: self.play_url,
            cover_url: self.cover_url,
            title: self.title,
            favorite_count: self.favorite_count,
            comment_count: self.comment_count,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL video repository implementation.
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn create(&self, video: &Video) -> Result<Video, AppError> {
        let video = video.clone();
        with_transaction(&self.pool, |mut tx| async move {
            let row = sqlx::query_as::<_, VideoRow>(
                r#"
                INSERT INTO videos (id, author_id, play_url, cover_url, title, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, author_id, play_url, cover_url, title,
                          favorite_count, comment_count, created_at
                "#,
            )
            .bind(video.id)
            .bind(video.author_id)
            .bind(&video.play_url)
            .bind(&video.cover_url)
            .bind(&video.title)
            .bind(video.created_at)
            .fetch_one(tx.conn())
            .await?;

            let updated = sqlx::query(
                "UPDATE users SET work_count = work_count + 1, updated_at = NOW() \
                 WHERE id = $1 AND deleted_at IS NULL",
            )
            .bind(video.author_id)
            .execute(tx.conn())
            .await?;

            if updated.rows_affected() == 0 {
                return Err(AppError::not_found("user", "id", video.author_id));
            }

            Ok((row.into_video(), tx))
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Video>, AppError> {
        let row = sqlx::query_as::<_, VideoRow>(
            r#"
            SELECT id, author_id, play_url, cover_url, title,
                   favorite_count, comment_count, created_at
            FROM videos
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(VideoRow::into_video))
    }

    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Video>, AppError> {
        let rows = sqlx::query_as::<_, VideoRow>(
            r#"
            SELECT id, author_id, play_url, cover_url, title,
                   favorite_count, comment_count, created_at
            FROM videos
            WHERE author_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(VideoRow::into_video).collect())
    }

    async fn find_before(&self, before: DateTime<Utc>, limit: i64) -> Result<Vec<Video>, AppError> {
        let rows = sqlx::query_as::<_, VideoRow>(
            r#"
            SELECT id, author_id, play_url, cover_url, title,
                   favorite_count, comment_count, created_at
            FROM videos
            WHERE created_at < $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(before)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(VideoRow::into_video).collect())
    }

    async fn find_favorited_by(&self, user_id: i64) -> Result<Vec<Video>, AppError> {
        let rows = sqlx::query_as::<_, VideoRow>(
            r#"
            SELECT v.id, v.author_id, v.play_url, v.cover_url, v.title,
                   v.favorite_count, v.comment_count, v.created_at
            FROM favorites f
            JOIN videos v ON v.id = f.video_id
            WHERE f.user_id = $1 AND v.deleted_at IS NULL
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(VideoRow::into_video).collect())
    }
}
