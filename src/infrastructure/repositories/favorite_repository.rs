//! Favorite Repository Implementation
//!
//! Each edge write runs the video / author / actor counter cascade in the
//! same transaction.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use crate::domain::FavoriteRepository;
use crate::infrastructure::database::{is_unique_violation, with_transaction};
use crate::shared::error::AppError;

#[derive(Clone)]
pub struct PgFavoriteRepository {
    pool: PgPool,
}

impl PgFavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Apply `delta` to the three counters touched by a favorite edge.
async fn cascade(
    conn: &mut PgConnection,
    user_id: i64,
    video_id: i64,
    delta: i64,
) -> Result<(), AppError> {
    let author_id = sqlx::query_scalar::<_, i64>(
        "UPDATE videos SET favorite_count = favorite_count + $2 \
         WHERE id = $1 AND deleted_at IS NULL RETURNING author_id",
    )
    .bind(video_id)
    .bind(delta)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::not_found("video", "id", video_id))?;

    sqlx::query(
        "UPDATE users SET total_favorited = total_favorited + $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(author_id)
    .bind(delta)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        "UPDATE users SET favorite_count = favorite_count + $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(user_id)
    .bind(delta)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

#[async_trait]
impl FavoriteRepository for PgFavoriteRepository {
    async fn exists(&self, user_id: i64, video_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = $1 AND video_id = $2)",
        )
        .bind(user_id)
        .bind(video_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    async fn add(&self, user_id: i64, video_id: i64) -> Result<(), AppError> {
        with_transaction(&self.pool, |mut tx| async move {
            cascade(tx.conn(), user_id, video_id, 1).await?;

            sqlx::query("INSERT INTO favorites (user_id, video_id) VALUES ($1, $2)")
                .bind(user_id)
                .bind(video_id)
                .execute(tx.conn())
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        AppError::already_exists("favorite", format!("{user_id}->{video_id}"))
                    } else {
                        AppError::Database(e)
                    }
                })?;

            Ok(((), tx))
        })
        .await
    }

    async fn remove(&self, user_id: i64, video_id: i64) -> Result<bool, AppError> {
        with_transaction(&self.pool, |mut tx| async move {
            let deleted = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND video_id = $2")
                .bind(user_id)
                .bind(video_id)
                .execute(tx.conn())
                .await?;

            if deleted.rows_affected() == 0 {
                return Ok((false, tx));
            }

            cascade(tx.conn(), user_id, video_id, -1).await?;
            Ok((true, tx))
        })
        .await
    }
}
