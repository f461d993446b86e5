//! # Domain Entities
//!
//! Core domain entities of the short-video platform. All entities map
//! directly to their corresponding database tables.
//!
//! - **User**: account with credentials, profile and denormalized counters
//! - **Video**: published video metadata with relative media URLs
//! - **Comment**: text left on a video
//! - **Message**: direct message between two accounts
//!
//! Follow and favorite edges carry no payload beyond their key pair, so they
//! are expressed only through their repository traits.
//!
//! Each repository trait is implemented in the infrastructure layer.

mod comment;
mod favorite;
mod follow;
mod message;
mod user;
mod video;

pub use comment::{Comment, CommentRepository};
pub use favorite::FavoriteRepository;
pub use follow::FollowRepository;
pub use message::{Message, MessageRepository};
pub use user::{User, UserRepository};
pub use video::{Video, VideoRepository, FEED_PAGE_SIZE};
