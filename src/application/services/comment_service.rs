//! Comment Service

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::application::dto::response::CommentView;
use crate::application::services::assembly::ViewAssembler;
use crate::domain::{Comment, CommentRepository, VideoRepository};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

#[async_trait]
pub trait CommentService: Send + Sync {
    /// Post a comment on a video.
    async fn add(&self, user_id: i64, video_id: i64, content: &str)
        -> Result<CommentView, AppError>;

    /// Delete one of the caller's own comments on `video_id`.
    async fn delete(&self, user_id: i64, video_id: i64, comment_id: i64) -> Result<(), AppError>;

    /// Comments of a video, newest first.
    async fn list(&self, viewer: Option<i64>, video_id: i64) -> Result<Vec<CommentView>, AppError>;
}

pub struct CommentServiceImpl<V, C>
where
    V: VideoRepository,
    C: CommentRepository,
{
    video_repo: Arc<V>,
    comment_repo: Arc<C>,
    id_generator: Arc<SnowflakeGenerator>,
    views: Arc<ViewAssembler>,
}

impl<V, C> CommentServiceImpl<V, C>
where
    V: VideoRepository,
    C: CommentRepository,
{
    pub fn new(
        video_repo: Arc<V>,
        comment_repo: Arc<C>,
        id_generator: Arc<SnowflakeGenerator>,
        views: Arc<ViewAssembler>,
    ) -> Self {
        Self {
            video_repo,
            comment_repo,
            id_generator,
            views,
        }
    }

    async fn require_video(&self, video_id: i64) -> Result<(), AppError> {
        match self.video_repo.find_by_id(video_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("video", "id", video_id)),
        }
    }
}

#[async_trait]
impl<V, C> CommentService for CommentServiceImpl<V, C>
where
    V: VideoRepository,
    C: CommentRepository,
{
    async fn add(
        &self,
        user_id: i64,
        video_id: i64,
        content: &str,
    ) -> Result<CommentView, AppError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::missing("comment_text"));
        }
        self.require_video(video_id).await?;

        let comment = Comment {
            id: self.id_generator.generate(),
            video_id,
            user_id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        let comment = self.comment_repo.create(&comment).await?;
        tracing::debug!(comment_id = comment.id, video_id, user_id, "Comment added");

        self.views.comment_view(Some(user_id), comment).await
    }

    async fn delete(&self, user_id: i64, video_id: i64, comment_id: i64) -> Result<(), AppError> {
        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.video_id == video_id)
            .ok_or_else(|| AppError::not_found("comment", "id", comment_id))?;

        if comment.user_id != user_id {
            return Err(AppError::Forbidden("only the author can delete a comment".into()));
        }

        if !self.comment_repo.soft_delete(&comment).await? {
            return Err(AppError::not_found("comment", "id", comment_id));
        }
        tracing::debug!(comment_id, video_id, user_id, "Comment deleted");

        Ok(())
    }

    async fn list(&self, viewer: Option<i64>, video_id: i64) -> Result<Vec<CommentView>, AppError> {
        self.require_video(video_id).await?;
        let comments = self.comment_repo.find_by_video(video_id).await?;

        let mut views = Vec::with_capacity(comments.len());
        for comment in comments {
            views.push(self.views.comment_view(viewer, comment).await?);
        }
        Ok(views)
    }
}
