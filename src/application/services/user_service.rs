//! User Service
//!
//! Registration, login and profile lookup.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;

use crate::application::dto::response::UserProfile;
use crate::application::services::assembly::ViewAssembler;
use crate::application::services::token_service::TokenService;
use crate::domain::{User, UserRepository};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Issued credentials for an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub token: String,
}

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create an account and sign it in.
    async fn register(&self, name: &str, password: &str) -> Result<Session, AppError>;

    /// Check credentials and issue a fresh token.
    async fn login(&self, name: &str, password: &str) -> Result<Session, AppError>;

    /// Profile of `user_id` as seen by `viewer`.
    async fn profile(&self, viewer: Option<i64>, user_id: i64) -> Result<UserProfile, AppError>;
}

/// UserService implementation
pub struct UserServiceImpl<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    id_generator: Arc<SnowflakeGenerator>,
    tokens: Arc<TokenService>,
    views: Arc<ViewAssembler>,
}

impl<U> UserServiceImpl<U>
where
    U: UserRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        id_generator: Arc<SnowflakeGenerator>,
        tokens: Arc<TokenService>,
        views: Arc<ViewAssembler>,
    ) -> Self {
        Self {
            user_repo,
            id_generator,
            tokens,
            views,
        }
    }

    /// Hash a password using Argon2id with a fresh per-account salt
    fn hash_password(password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against its hash
    fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn session_for(&self, user: &User) -> Result<Session, AppError> {
        Ok(Session {
            user_id: user.id,
            token: self.tokens.issue(user.id, &user.name)?,
        })
    }
}

#[async_trait]
impl<U> UserService for UserServiceImpl<U>
where
    U: UserRepository,
{
    async fn register(&self, name: &str, password: &str) -> Result<Session, AppError> {
        if name.is_empty() {
            return Err(AppError::missing("username"));
        }
        if password.is_empty() {
            return Err(AppError::missing("password"));
        }

        if self.user_repo.name_exists(name).await? {
            return Err(AppError::already_exists("name", name));
        }

        let user = User::new(self.id_generator.generate(), name, Self::hash_password(password)?);
        let user = self.user_repo.create(&user).await?;
        tracing::info!(user_id = user.id, "Account registered");

        self.session_for(&user)
    }

    async fn login(&self, name: &str, password: &str) -> Result<Session, AppError> {
        if name.is_empty() {
            return Err(AppError::missing("username"));
        }
        if password.is_empty() {
            return Err(AppError::missing("password"));
        }

        let user = self
            .user_repo
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::not_found("user", "name", name))?;

        if !Self::verify_password(password, &user.password_hash)? {
            return Err(AppError::PasswordIncorrect);
        }

        self.session_for(&user)
    }

    async fn profile(&self, viewer: Option<i64>, user_id: i64) -> Result<UserProfile, AppError> {
        self.views.profile_by_id(viewer, user_id).await
    }
}
