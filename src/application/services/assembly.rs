//! Profile / Feed Assembly
//!
//! Turns stored entities into response view-models: resolves authors,
//! computes viewer-relative flags and rewrites relative media paths into
//! absolute URLs at read time.

use std::collections::HashMap;
use std::net::{IpAddr, UdpSocket};
use std::sync::Arc;

use crate::application::dto::response::{CommentView, UserProfile, VideoView};
use crate::config::ServerSettings;
use crate::domain::{Comment, FavoriteRepository, FollowRepository, User, UserRepository, Video};
use crate::shared::error::AppError;

/// Prefixes stored relative media paths with the advertised origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlAssembler {
    base: String,
}

impl UrlAssembler {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// Use `server.public_base_url` when configured, otherwise the outbound
    /// interface address of this host with the listening port.
    pub fn from_settings(server: &ServerSettings) -> Self {
        if let Some(base) = server.public_base_url.as_deref().filter(|b| !b.is_empty()) {
            return Self::new(base);
        }

        let host = outbound_ip()
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| server.host.clone());
        Self::new(format!("http://{}:{}", host, server.port))
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn absolute(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }
}

/// Local address the OS would route external traffic through. The UDP
/// "connect" only selects a route; nothing is sent.
fn outbound_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_unspecified()).then_some(ip)
}

/// Builds view-models relative to a viewer.
///
/// Anonymous viewers never trigger follow/favorite lookups; their flags are
/// always `false`.
pub struct ViewAssembler {
    users: Arc<dyn UserRepository>,
    follows: Arc<dyn FollowRepository>,
    favorites: Arc<dyn FavoriteRepository>,
    urls: UrlAssembler,
}

impl ViewAssembler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        follows: Arc<dyn FollowRepository>,
        favorites: Arc<dyn FavoriteRepository>,
        urls: UrlAssembler,
    ) -> Self {
        Self {
            users,
            follows,
            favorites,
            urls,
        }
    }

    pub fn urls(&self) -> &UrlAssembler {
        &self.urls
    }

    /// Load an account by id or fail with `NotFound`.
    pub async fn load_user(&self, user_id: i64) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user", "id", user_id))
    }

    pub async fn profile(&self, viewer: Option<i64>, user: &User) -> Result<UserProfile, AppError> {
        let is_follow = match viewer {
            Some(viewer_id) if viewer_id != user.id => {
                self.follows.exists(viewer_id, user.id).await?
            }
            _ => false,
        };

        Ok(UserProfile {
            id: user.id,
            name: user.name.clone(),
            follow_count: user.follow_count,
            follower_count: user.follower_count,
            is_follow,
            avatar: user.avatar.clone(),
            background_image: user.background_image.clone(),
            signature: user.signature.clone(),
            total_favorited: user.total_favorited,
            work_count: user.work_count,
            favorite_count: user.favorite_count,
        })
    }

    pub async fn profile_by_id(
        &self,
        viewer: Option<i64>,
        user_id: i64,
    ) -> Result<UserProfile, AppError> {
        let user = self.load_user(user_id).await?;
        self.profile(viewer, &user).await
    }

    /// Profiles for a list of ids, keeping order. Ids that no longer resolve
    /// are skipped.
    pub async fn profiles_by_ids(
        &self,
        viewer: Option<i64>,
        ids: &[i64],
    ) -> Result<Vec<UserProfile>, AppError> {
        let mut profiles = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.users.find_by_id(id).await? {
                Some(user) => profiles.push(self.profile(viewer, &user).await?),
                None => tracing::warn!(user_id = id, "Edge points at a missing account"),
            }
        }
        Ok(profiles)
    }

    pub async fn video_views(
        &self,
        viewer: Option<i64>,
        videos: Vec<Video>,
    ) -> Result<Vec<VideoView>, AppError> {
        let mut authors: HashMap<i64, UserProfile> = HashMap::new();
        let mut views = Vec::with_capacity(videos.len());

        for video in videos {
            let author = match authors.get(&video.author_id) {
                Some(profile) => profile.clone(),
                None => {
                    let profile = self.profile_by_id(viewer, video.author_id).await?;
                    authors.insert(video.author_id, profile.clone());
                    profile
                }
            };

            let is_favorite = match viewer {
                Some(viewer_id) => self.favorites.exists(viewer_id, video.id).await?,
                None => false,
            };

            views.push(VideoView {
                id: video.id,
                author,
                play_url: self.urls.absolute(&video.play_url),
                cover_url: self.urls.absolute(&video.cover_url),
                favorite_count: video.favorite_count,
                comment_count: video.comment_count,
                is_favorite,
                title: video.title,
            });
        }

        Ok(views)
    }

    pub async fn comment_view(
        &self,
        viewer: Option<i64>,
        comment: Comment,
    ) -> Result<CommentView, AppError> {
        let user = self.profile_by_id(viewer, comment.user_id).await?;
        Ok(CommentView {
            id: comment.id,
            user,
            create_date: comment.create_date(),
            content: comment.content,
        })
    }
}
