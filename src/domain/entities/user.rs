//! User (account) entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents an account on the platform.
///
/// Maps to the `users` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - name: VARCHAR(32) NOT NULL, unique among non-deleted rows
/// - password_hash: VARCHAR(255) NOT NULL (Argon2 PHC string, salt embedded)
/// - follow_count / follower_count / total_favorited / work_count / favorite_count:
///   BIGINT NOT NULL DEFAULT 0, denormalized counters
/// - avatar / background_image / signature: TEXT NULL
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - deleted_at: TIMESTAMPTZ NULL (soft delete)
///
/// The counters are caches. They change only inside the transaction that
/// creates or removes the edge they summarize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Login name (unique)
    pub name: String,

    /// Argon2 password hash with per-account salt
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Number of accounts this account follows
    pub follow_count: i64,

    /// Number of accounts following this account
    pub follower_count: i64,

    /// Likes received across all of this account's videos
    pub total_favorited: i64,

    /// Number of published videos
    pub work_count: i64,

    /// Number of likes this account has given
    pub favorite_count: i64,

    pub avatar: Option<String>,

    pub background_image: Option<String>,

    pub signature: Option<String>,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A fresh account with zeroed counters.
    pub fn new(id: i64, name: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            password_hash: password_hash.into(),
            follow_count: 0,
            follower_count: 0,
            total_favorited: 0,
            work_count: 0,
            favorite_count: 0,
            avatar: None,
            background_image: None,
            signature: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository trait for account data access.
///
/// Implementations of this trait handle the actual database interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a live account by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Find a live account by name.
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, AppError>;

    /// Insert a new account.
    ///
    /// Fails with `AlreadyExists` when the name is taken.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Check if a name is already taken by a live account.
    async fn name_exists(&self, name: &str) -> Result<bool, AppError>;
}
