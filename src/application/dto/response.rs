//! Response DTOs
//!
//! Every body shares the `{status_code, status_msg}` envelope; payload
//! fields are flattened next to it.

use serde::Serialize;

/// Success envelope wrapping a payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status_code: i32,
    pub status_msg: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status_code: 0,
            status_msg: "success".to_string(),
            data,
        }
    }
}

/// Payload-free acknowledgement.
#[derive(Debug, Serialize)]
pub struct Ack {}

impl ApiResponse<Ack> {
    pub fn ack() -> Self {
        Self::ok(Ack {})
    }
}

/// Public profile of an account as seen by a (possibly anonymous) viewer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub follow_count: i64,
    pub follower_count: i64,
    pub is_follow: bool,
    pub avatar: Option<String>,
    pub background_image: Option<String>,
    pub signature: Option<String>,
    pub total_favorited: i64,
    pub work_count: i64,
    pub favorite_count: i64,
}

/// Video with its author and absolute media URLs.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VideoView {
    pub id: i64,
    pub author: UserProfile,
    pub play_url: String,
    pub cover_url: String,
    pub favorite_count: i64,
    pub comment_count: i64,
    pub is_favorite: bool,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CommentView {
    pub id: i64,
    pub user: UserProfile,
    pub content: String,
    /// `MM-DD`
    pub create_date: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MessageView {
    pub id: i64,
    pub to_user_id: i64,
    pub from_user_id: i64,
    pub content: String,
    /// Unix seconds
    pub create_time: i64,
}

/// Chat partner with the latest message of the conversation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FriendView {
    #[serde(flatten)]
    pub user: UserProfile,
    pub message: String,
    /// 1 when the viewer sent `message`, 0 when they received it
    #[serde(rename = "msgType")]
    pub msg_type: i32,
}

#[derive(Debug, Serialize)]
pub struct AuthData {
    pub user_id: i64,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserData {
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct FeedPage {
    /// Creation time of the oldest video in the page (Unix seconds), 0 when empty
    pub next_time: i64,
    pub video_list: Vec<VideoView>,
}

#[derive(Debug, Serialize)]
pub struct VideoListData {
    pub video_list: Vec<VideoView>,
}

#[derive(Debug, Serialize)]
pub struct CommentData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<CommentView>,
}

#[derive(Debug, Serialize)]
pub struct CommentListData {
    pub comment_list: Vec<CommentView>,
}

#[derive(Debug, Serialize)]
pub struct UserListData {
    pub user_list: Vec<UserProfile>,
}

#[derive(Debug, Serialize)]
pub struct FriendListData {
    pub user_list: Vec<FriendView>,
}

#[derive(Debug, Serialize)]
pub struct MessageListData {
    pub message_list: Vec<MessageView>,
}
