//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! ## Available Repositories
//!
//! - **PgUserRepository** - Account records and name lookups
//! - **PgVideoRepository** - Video metadata, feed and publish lists
//! - **PgFollowRepository** - Follow edges with counter cascade
//! - **PgFavoriteRepository** - Favorite edges with counter cascade
//! - **PgCommentRepository** - Comments with comment-count cascade
//! - **PgMessageRepository** - Direct messages
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use crate::infrastructure::repositories::{PgUserRepository, PgVideoRepository};
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let user_repo = PgUserRepository::new(pool.clone());
//!     let video_repo = PgVideoRepository::new(pool.clone());
//! }
//! ```

pub mod comment_repository;
pub mod favorite_repository;
pub mod follow_repository;
pub mod message_repository;
pub mod user_repository;
pub mod video_repository;

pub use comment_repository::PgCommentRepository;
pub use favorite_repository::PgFavoriteRepository;
pub use follow_repository::PgFollowRepository;
pub use message_repository::PgMessageRepository;
pub use user_repository::PgUserRepository;
pub use video_repository::PgVideoRepository;
