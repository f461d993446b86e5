//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **TokenService**: Signed, time-bound identity tokens
//! - **UserService**: Registration, login, profiles
//! - **VideoPublisher**: Concurrent video ingestion pipeline
//! - **FeedService**: Feed pagination and publish lists
//! - **FavoriteService**: Likes and liked-video lists
//! - **CommentService**: Comments on videos
//! - **RelationService**: Follow graph and follow/follower lists
//! - **MessageService**: Direct messages and friend list
//!
//! `ViewAssembler` and `UrlAssembler` turn entities into view-models shared
//! by all of the above.

pub mod assembly;
pub mod comment_service;
pub mod favorite_service;
pub mod feed_service;
pub mod ingest_service;
pub mod message_service;
pub mod relation_service;
pub mod token_service;
pub mod user_service;

pub use assembly::{UrlAssembler, ViewAssembler};
pub use comment_service::{CommentService, CommentServiceImpl};
pub use favorite_service::{FavoriteService, FavoriteServiceImpl};
pub use feed_service::{FeedService, FeedServiceImpl};
pub use ingest_service::{
    VideoIngestor, VideoPublisher, VideoUpload, COVER_URL_PREFIX, VIDEO_URL_PREFIX,
};
pub use message_service::{MessageService, MessageServiceImpl};
pub use relation_service::{RelationService, RelationServiceImpl};
pub use token_service::{Claims, TokenService, TokenVerdict};
pub use user_service::{Session, UserService, UserServiceImpl};
