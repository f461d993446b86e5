//! Message Service
//!
//! Direct messages between two accounts, polled with a seconds cursor, and
//! the friend list derived from conversations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::application::dto::response::{FriendView, MessageView};
use crate::application::services::assembly::ViewAssembler;
use crate::domain::{ActionType, Message, MessageRepository};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

#[async_trait]
pub trait MessageService: Send + Sync {
    /// Send `content` to `to_user_id`. Only `ActionType::Do` is supported.
    async fn send(
        &self,
        from_user_id: i64,
        to_user_id: i64,
        action: ActionType,
        content: &str,
    ) -> Result<MessageView, AppError>;

    /// Messages between the two accounts newer than `after_secs`, oldest first.
    async fn chat(
        &self,
        user_id: i64,
        peer_id: i64,
        after_secs: Option<i64>,
    ) -> Result<Vec<MessageView>, AppError>;

    /// Conversation partners, newest conversation first.
    async fn friends(&self, user_id: i64) -> Result<Vec<FriendView>, AppError>;
}

impl From<Message> for MessageView {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            to_user_id: message.to_user_id,
            from_user_id: message.from_user_id,
            content: message.content,
            create_time: message.created_at.timestamp(),
        }
    }
}

pub struct MessageServiceImpl<M>
where
    M: MessageRepository,
{
    message_repo: Arc<M>,
    id_generator: Arc<SnowflakeGenerator>,
    views: Arc<ViewAssembler>,
}

impl<M> MessageServiceImpl<M>
where
    M: MessageRepository,
{
    pub fn new(
        message_repo: Arc<M>,
        id_generator: Arc<SnowflakeGenerator>,
        views: Arc<ViewAssembler>,
    ) -> Self {
        Self {
            message_repo,
            id_generator,
            views,
        }
    }
}

#[async_trait]
impl<M> MessageService for MessageServiceImpl<M>
where
    M: MessageRepository,
{
    async fn send(
        &self,
        from_user_id: i64,
        to_user_id: i64,
        action: ActionType,
        content: &str,
    ) -> Result<MessageView, AppError> {
        if action != ActionType::Do {
            return Err(AppError::BadRequest(format!(
                "unsupported action_type {}",
                action
            )));
        }
        if content.trim().is_empty() {
            return Err(AppError::missing("content"));
        }
        self.views.load_user(to_user_id).await?;

        let message = Message::new(
            self.id_generator.generate(),
            from_user_id,
            to_user_id,
            content,
            Utc::now(),
        );
        let message = self.message_repo.create(&message).await?;
        tracing::debug!(message_id = message.id, from_user_id, to_user_id, "Message sent");

        Ok(message.into())
    }

    async fn chat(
        &self,
        user_id: i64,
        peer_id: i64,
        after_secs: Option<i64>,
    ) -> Result<Vec<MessageView>, AppError> {
        let after = DateTime::<Utc>::from_timestamp(after_secs.unwrap_or(0).max(0), 0)
            .ok_or_else(|| AppError::BadRequest("pre_msg_time out of range".into()))?;

        let messages = self.message_repo.find_between(user_id, peer_id, after).await?;
        Ok(messages.into_iter().map(MessageView::from).collect())
    }

    async fn friends(&self, user_id: i64) -> Result<Vec<FriendView>, AppError> {
        let latest = self.message_repo.latest_per_conversation(user_id).await?;

        let mut friends = Vec::with_capacity(latest.len());
        for message in latest {
            let peer = message.peer_of(user_id);
            let user = match self.views.profile_by_id(Some(user_id), peer).await {
                Ok(profile) => profile,
                Err(AppError::NotFound { .. }) => continue,
                Err(e) => return Err(e),
            };
            friends.push(FriendView {
                user,
                msg_type: i32::from(message.from_user_id == user_id),
                message: message.content,
            });
        }
        Ok(friends)
    }
}
