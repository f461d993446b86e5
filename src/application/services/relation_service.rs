//! Relation Service
//!
//! Follow / unfollow with strict redundancy checks, and the follow and
//! follower lists.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dto::response::UserProfile;
use crate::application::services::assembly::ViewAssembler;
use crate::domain::{ActionType, FollowRepository};
use crate::shared::error::AppError;

#[async_trait]
pub trait RelationService: Send + Sync {
    /// Follow (`Do`) or unfollow (`Undo`) `to_user_id`.
    ///
    /// Self-follow, following twice and unfollowing a stranger are errors.
    async fn action(
        &self,
        follower_id: i64,
        to_user_id: i64,
        action: ActionType,
    ) -> Result<(), AppError>;

    /// Accounts `user_id` follows.
    async fn follow_list(&self, viewer: Option<i64>, user_id: i64)
        -> Result<Vec<UserProfile>, AppError>;

    /// Accounts following `user_id`.
    async fn follower_list(
        &self,
        viewer: Option<i64>,
        user_id: i64,
    ) -> Result<Vec<UserProfile>, AppError>;
}

pub struct RelationServiceImpl<F>
where
    F: FollowRepository,
{
    follow_repo: Arc<F>,
    views: Arc<ViewAssembler>,
}

impl<F> RelationServiceImpl<F>
where
    F: FollowRepository,
{
    pub fn new(follow_repo: Arc<F>, views: Arc<ViewAssembler>) -> Self {
        Self { follow_repo, views }
    }
}

#[async_trait]
impl<F> RelationService for RelationServiceImpl<F>
where
    F: FollowRepository,
{
    async fn action(
        &self,
        follower_id: i64,
        to_user_id: i64,
        action: ActionType,
    ) -> Result<(), AppError> {
        if follower_id == to_user_id {
            return Err(AppError::BadRequest("cannot follow yourself".into()));
        }

        // Target must be a live account.
        self.views.load_user(to_user_id).await?;

        let edge = format!("{}->{}", follower_id, to_user_id);
        match action {
            ActionType::Do => {
                if self.follow_repo.exists(follower_id, to_user_id).await? {
                    return Err(AppError::already_exists("follow relation", edge));
                }
                self.follow_repo.follow(follower_id, to_user_id).await?;
                tracing::debug!(follower_id, to_user_id, "Followed");
            }
            ActionType::Undo => {
                if !self.follow_repo.unfollow(follower_id, to_user_id).await? {
                    return Err(AppError::not_found("follow relation", "pair", edge));
                }
                tracing::debug!(follower_id, to_user_id, "Unfollowed");
            }
        }

        Ok(())
    }

    async fn follow_list(
        &self,
        viewer: Option<i64>,
        user_id: i64,
    ) -> Result<Vec<UserProfile>, AppError> {
        self.views.load_user(user_id).await?;
        let ids = self.follow_repo.followed_ids(user_id).await?;
        self.views.profiles_by_ids(viewer, &ids).await
    }

    async fn follower_list(
        &self,
        viewer: Option<i64>,
        user_id: i64,
    ) -> Result<Vec<UserProfile>, AppError> {
        self.views.load_user(user_id).await?;
        let ids = self.follow_repo.follower_ids(user_id).await?;
        self.views.profiles_by_ids(viewer, &ids).await
    }
}
