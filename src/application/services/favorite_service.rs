//! Favorite Service
//!
//! Likes are explicit: adding an existing like or removing a missing one is
//! rejected, like follow actions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dto::response::VideoView;
use crate::application::services::assembly::ViewAssembler;
use crate::domain::{ActionType, FavoriteRepository, VideoRepository};
use crate::shared::error::AppError;

#[async_trait]
pub trait FavoriteService: Send + Sync {
    async fn action(&self, user_id: i64, video_id: i64, action: ActionType)
        -> Result<(), AppError>;

    /// Videos `user_id` has liked, most recent like first.
    async fn list(&self, viewer: Option<i64>, user_id: i64) -> Result<Vec<VideoView>, AppError>;
}

pub struct FavoriteServiceImpl<V, F>
where
    V: VideoRepository,
    F: FavoriteRepository,
{
    video_repo: Arc<V>,
    favorite_repo: Arc<F>,
    views: Arc<ViewAssembler>,
}

impl<V, F> FavoriteServiceImpl<V, F>
where
    V: VideoRepository,
    F: FavoriteRepository,
{
    pub fn new(video_repo: Arc<V>, favorite_repo: Arc<F>, views: Arc<ViewAssembler>) -> Self {
        Self {
            video_repo,
            favorite_repo,
            views,
        }
    }
}

#[async_trait]
impl<V, F> FavoriteService for FavoriteServiceImpl<V, F>
where
    V: VideoRepository,
    F: FavoriteRepository,
{
    async fn action(
        &self,
        user_id: i64,
        video_id: i64,
        action: ActionType,
    ) -> Result<(), AppError> {
        if self.video_repo.find_by_id(video_id).await?.is_none() {
            return Err(AppError::not_found("video", "id", video_id));
        }

        let edge = format!("{}->{}", user_id, video_id);
        match action {
            ActionType::Do => {
                if self.favorite_repo.exists(user_id, video_id).await? {
                    return Err(AppError::already_exists("favorite", edge));
                }
                self.favorite_repo.add(user_id, video_id).await?;
                tracing::debug!(user_id, video_id, "Favorited");
            }
            ActionType::Undo => {
                if !self.favorite_repo.remove(user_id, video_id).await? {
                    return Err(AppError::not_found("favorite", "pair", edge));
                }
                tracing::debug!(user_id, video_id, "Unfavorited");
            }
        }

        Ok(())
    }

    async fn list(&self, viewer: Option<i64>, user_id: i64) -> Result<Vec<VideoView>, AppError> {
        self.views.load_user(user_id).await?;
        let videos = self.video_repo.find_favorited_by(user_id).await?;
        self.views.video_views(viewer, videos).await
    }
}
