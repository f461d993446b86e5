//! Request DTOs
//!
//! Query-string shapes of the API. Most identifiers arrive as optional
//! strings and are checked with `shared::validation` so that absent and
//! malformed values map onto `MissingField` / `BadRequest` instead of an
//! extractor rejection.

use serde::Deserialize;
use validator::Validate;

/// `/register` and `/login` credentials
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[serde(default)]
    #[validate(length(max = 32, message = "username must be at most 32 characters"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(max = 32, message = "password must be at most 32 characters"))]
    pub password: String,
}

/// Query carrying a target account, e.g. `/user?user_id=`
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub user_id: Option<String>,
}

/// `/feed?latest_time=`
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Cursor in Unix seconds; absent or `0` means "now"
    pub latest_time: Option<String>,
}

/// `/favorite/action`
#[derive(Debug, Default, Deserialize)]
pub struct FavoriteActionQuery {
    pub video_id: Option<String>,
    pub action_type: Option<String>,
}

/// `/comment/action`
#[derive(Debug, Default, Deserialize)]
pub struct CommentActionQuery {
    pub video_id: Option<String>,
    pub action_type: Option<String>,
    pub comment_text: Option<String>,
    pub comment_id: Option<String>,
}

/// `/comment/list?video_id=`
#[derive(Debug, Default, Deserialize)]
pub struct CommentListQuery {
    pub video_id: Option<String>,
}

/// `/relation/action`
#[derive(Debug, Default, Deserialize)]
pub struct RelationActionQuery {
    pub to_user_id: Option<String>,
    pub action_type: Option<String>,
}

/// `/message/action`
#[derive(Debug, Default, Deserialize)]
pub struct MessageActionQuery {
    pub to_user_id: Option<String>,
    pub action_type: Option<String>,
    pub content: Option<String>,
}

/// `/message/chat`
#[derive(Debug, Default, Deserialize)]
pub struct ChatQuery {
    pub to_user_id: Option<String>,
    /// Unix seconds; only messages strictly newer are returned
    pub pre_msg_time: Option<String>,
}
