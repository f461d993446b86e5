//! Unit of Work Pattern Implementation
//!
//! Provides transactional boundaries for the counter cascades: an edge write
//! and every denormalized counter it touches succeed or fail together.

use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::shared::error::AppError;

/// Transaction context that wraps a SQLx transaction.
pub struct TransactionContext {
    tx: Transaction<'static, Postgres>,
}

impl TransactionContext {
    /// Create a new transaction context.
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx }
    }

    /// Connection to run statements on inside the transaction.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    /// Commit the transaction.
    pub async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await.map_err(AppError::Database)
    }
}

/// Execute a closure within a transaction.
///
/// The closure hands the context back on success and the transaction is
/// committed. On error the context is dropped, which rolls back.
///
/// # Example
/// ```ignore
/// let video = with_transaction(&pool, |mut tx| async move {
///     insert_video(tx.conn(), &video).await?;
///     bump_work_count(tx.conn(), video.author_id).await?;
///     Ok((video, tx))
/// }).await?;
/// ```
pub async fn with_transaction<F, Fut, T>(pool: &PgPool, f: F) -> Result<T, AppError>
where
    F: FnOnce(TransactionContext) -> Fut,
    Fut: std::future::Future<Output = Result<(T, TransactionContext), AppError>>,
{
    let tx = pool.begin().await.map_err(AppError::Database)?;
    let ctx = TransactionContext::new(tx);

    match f(ctx).await {
        Ok((result, ctx)) => {
            ctx.commit().await?;
            Ok(result)
        }
        Err(e) => {
            // Transaction will be automatically rolled back when dropped
            tracing::debug!(error = %e, "Transaction rolled back");
            Err(e)
        }
    }
}
