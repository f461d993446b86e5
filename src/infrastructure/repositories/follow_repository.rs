//! Follow Repository Implementation
//!
//! Edge writes and the follow/follower counter updates share one transaction.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use crate::domain::FollowRepository;
use crate::infrastructure::database::{is_unique_violation, with_transaction};
use crate::shared::error::AppError;

#[derive(Clone)]
pub struct PgFollowRepository {
    pool: PgPool,
}

impl PgFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Shift both sides' counters by `delta`.
async fn adjust_counters(
    conn: &mut PgConnection,
    follower_id: i64,
    followed_id: i64,
    delta: i64,
) -> Result<(), AppError> {
    let follower = sqlx::query(
        "UPDATE users SET follow_count = follow_count + $2, updated_at = NOW() \
         WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(follower_id)
    .bind(delta)
    .execute(&mut *conn)
    .await?;
    if follower.rows_affected() == 0 {
        return Err(AppError::not_found("user", "id", follower_id));
    }

    let followed = sqlx::query(
        "UPDATE users SET follower_count = follower_count + $2, updated_at = NOW() \
         WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(followed_id)
    .bind(delta)
    .execute(&mut *conn)
    .await?;
    if followed.rows_affected() == 0 {
        return Err(AppError::not_found("user", "id", followed_id));
    }

    Ok(())
}

#[async_trait]
impl FollowRepository for PgFollowRepository {
    async fn exists(&self, follower_id: i64, followed_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND followed_id = $2)",
        )
        .bind(follower_id)
        .bind(followed_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    async fn follow(&self, follower_id: i64, followed_id: i64) -> Result<(), AppError> {
        with_transaction(&self.pool, |mut tx| async move {
            sqlx::query("INSERT INTO follows (follower_id, followed_id) VALUES ($1, $2)")
                .bind(follower_id)
                .bind(followed_id)
                .execute(tx.conn())
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        AppError::already_exists(
                            "follow relation",
                            format!("{follower_id}->{followed_id}"),
                        )
                    } else {
                        AppError::Database(e)
                    }
                })?;

            adjust_counters(tx.conn(), follower_id, followed_id, 1).await?;
            Ok(((), tx))
        })
        .await
    }

    async fn unfollow(&self, follower_id: i64, followed_id: i64) -> Result<bool, AppError> {
        with_transaction(&self.pool, |mut tx| async move {
            let deleted =
                sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
                    .bind(follower_id)
                    .bind(followed_id)
                    .execute(tx.conn())
                    .await?;

            if deleted.rows_affected() == 0 {
                return Ok((false, tx));
            }

            adjust_counters(tx.conn(), follower_id, followed_id, -1).await?;
            Ok((true, tx))
        })
        .await
    }

    async fn followed_ids(&self, user_id: i64) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT followed_id FROM follows WHERE follower_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn follower_ids(&self, user_id: i64) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT follower_id FROM follows WHERE followed_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
