//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure. The router under test
//! is the production one, wired over an in-memory store and a fake media
//! probe.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use short_video_server::config::{
    CorsSettings, DatabaseSettings, JwtSettings, MediaSettings, ServerSettings, Settings,
    SnowflakeSettings,
};
use short_video_server::domain::{
    Comment, CommentRepository, FavoriteRepository, FollowRepository, MediaProbe, Message,
    MessageRepository, ProbeReport, StreamInfo, User, UserRepository, Video, VideoRepository,
};
use short_video_server::shared::error::AppError;
use short_video_server::startup::{build_router, AppState, Repositories};

pub const BASE_URL: &str = "http://localhost:8080";

/// Upload bodies starting with this prefix probe as a container without streams.
pub const NOT_A_VIDEO: &[u8] = b"not a video";

// ============================================================================
// In-memory storage
// ============================================================================

#[derive(Default)]
struct State {
    users: BTreeMap<i64, User>,
    videos: BTreeMap<i64, Video>,
    /// (follower, followed), oldest first
    follows: Vec<(i64, i64)>,
    /// (user, video), oldest first
    favorites: Vec<(i64, i64)>,
    comments: BTreeMap<i64, Comment>,
    messages: Vec<Message>,
}

impl State {
    fn user_mut(&mut self, id: i64) -> Result<&mut User, AppError> {
        self.users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("user", "id", id))
    }

    fn video_mut(&mut self, id: i64) -> Result<&mut Video, AppError> {
        self.videos
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("video", "id", id))
    }
}

/// One store backing every repository trait, applying the same counter
/// cascades as the PostgreSQL implementations.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Insert a video with an explicit creation time.
    pub fn seed_video(&self, id: i64, author_id: i64, created_at: DateTime<Utc>) {
        let mut video = Video::new(
            id,
            author_id,
            format!("/static/video/{id}.mp4"),
            format!("/static/cover/{id}.jpg"),
            format!("video {id}"),
        );
        video.created_at = created_at;

        let mut state = self.state.lock();
        if let Some(author) = state.users.get_mut(&author_id) {
            author.work_count += 1;
        }
        state.videos.insert(id, video);
    }

    pub fn user(&self, id: i64) -> Option<User> {
        self.state.lock().users.get(&id).cloned()
    }

    pub fn video(&self, id: i64) -> Option<Video> {
        self.state.lock().videos.get(&id).cloned()
    }

    pub fn videos(&self) -> Vec<Video> {
        self.state.lock().videos.values().cloned().collect()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.state.lock().users.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .state
            .lock()
            .users
            .values()
            .find(|u| u.name == name)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        let mut state = self.state.lock();
        if state.users.values().any(|u| u.name == user.name) {
            return Err(AppError::already_exists("name", &user.name));
        }
        state.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn name_exists(&self, name: &str) -> Result<bool, AppError> {
        Ok(self.state.lock().users.values().any(|u| u.name == name))
    }
}

#[async_trait]
impl VideoRepository for MemoryStore {
    async fn create(&self, video: &Video) -> Result<Video, AppError> {
        let mut state = self.state.lock();
        state.user_mut(video.author_id)?.work_count += 1;
        state.videos.insert(video.id, video.clone());
        Ok(video.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Video>, AppError> {
        Ok(self.state.lock().videos.get(&id).cloned())
    }

    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Video>, AppError> {
        let mut videos: Vec<Video> = self
            .state
            .lock()
            .videos
            .values()
            .filter(|v| v.author_id == author_id)
            .cloned()
            .collect();
        videos.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(videos)
    }

    async fn find_before(&self, before: DateTime<Utc>, limit: i64) -> Result<Vec<Video>, AppError> {
        let mut videos: Vec<Video> = self
            .state
            .lock()
            .videos
            .values()
            .filter(|v| v.created_at < before)
            .cloned()
            .collect();
        videos.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        videos.truncate(limit.max(0) as usize);
        Ok(videos)
    }

    async fn find_favorited_by(&self, user_id: i64) -> Result<Vec<Video>, AppError> {
        let state = self.state.lock();
        Ok(state
            .favorites
            .iter()
            .rev()
            .filter(|(u, _)| *u == user_id)
            .filter_map(|(_, v)| state.videos.get(v).cloned())
            .collect())
    }
}

#[async_trait]
impl FollowRepository for MemoryStore {
    async fn exists(&self, follower_id: i64, followed_id: i64) -> Result<bool, AppError> {
        Ok(self
            .state
            .lock()
            .follows
            .contains(&(follower_id, followed_id)))
    }

    async fn follow(&self, follower_id: i64, followed_id: i64) -> Result<(), AppError> {
        let mut state = self.state.lock();
        if state.follows.contains(&(follower_id, followed_id)) {
            return Err(AppError::already_exists(
                "follow relation",
                format!("{follower_id}->{followed_id}"),
            ));
        }
        state.user_mut(followed_id)?.follower_count += 1;
        state.user_mut(follower_id)?.follow_count += 1;
        state.follows.push((follower_id, followed_id));
        Ok(())
    }

    async fn unfollow(&self, follower_id: i64, followed_id: i64) -> Result<bool, AppError> {
        let mut state = self.state.lock();
        let before = state.follows.len();
        state.follows.retain(|edge| *edge != (follower_id, followed_id));
        if state.follows.len() == before {
            return Ok(false);
        }
        state.user_mut(followed_id)?.follower_count -= 1;
        state.user_mut(follower_id)?.follow_count -= 1;
        Ok(true)
    }

    async fn followed_ids(&self, user_id: i64) -> Result<Vec<i64>, AppError> {
        Ok(self
            .state
            .lock()
            .follows
            .iter()
            .rev()
            .filter(|(f, _)| *f == user_id)
            .map(|(_, t)| *t)
            .collect())
    }

    async fn follower_ids(&self, user_id: i64) -> Result<Vec<i64>, AppError> {
        Ok(self
            .state
            .lock()
            .follows
            .iter()
            .rev()
            .filter(|(_, t)| *t == user_id)
            .map(|(f, _)| *f)
            .collect())
    }
}

#[async_trait]
impl FavoriteRepository for MemoryStore {
    async fn exists(&self, user_id: i64, video_id: i64) -> Result<bool, AppError> {
        Ok(self.state.lock().favorites.contains(&(user_id, video_id)))
    }

    async fn add(&self, user_id: i64, video_id: i64) -> Result<(), AppError> {
        let mut state = self.state.lock();
        if state.favorites.contains(&(user_id, video_id)) {
            return Err(AppError::already_exists(
                "favorite",
                format!("{user_id}->{video_id}"),
            ));
        }
        let video = state.video_mut(video_id)?;
        video.favorite_count += 1;
        let author_id = video.author_id;
        state.user_mut(author_id)?.total_favorited += 1;
        state.user_mut(user_id)?.favorite_count += 1;
        state.favorites.push((user_id, video_id));
        Ok(())
    }

    async fn remove(&self, user_id: i64, video_id: i64) -> Result<bool, AppError> {
        let mut state = self.state.lock();
        let before = state.favorites.len();
        state.favorites.retain(|edge| *edge != (user_id, video_id));
        if state.favorites.len() == before {
            return Ok(false);
        }
        let video = state.video_mut(video_id)?;
        video.favorite_count -= 1;
        let author_id = video.author_id;
        state.user_mut(author_id)?.total_favorited -= 1;
        state.user_mut(user_id)?.favorite_count -= 1;
        Ok(true)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, comment: &Comment) -> Result<Comment, AppError> {
        let mut state = self.state.lock();
        state.video_mut(comment.video_id)?.comment_count += 1;
        state.comments.insert(comment.id, comment.clone());
        Ok(comment.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError> {
        Ok(self.state.lock().comments.get(&id).cloned())
    }

    async fn soft_delete(&self, comment: &Comment) -> Result<bool, AppError> {
        let mut state = self.state.lock();
        if state.comments.remove(&comment.id).is_none() {
            return Ok(false);
        }
        state.video_mut(comment.video_id)?.comment_count -= 1;
        Ok(true)
    }

    async fn find_by_video(&self, video_id: i64) -> Result<Vec<Comment>, AppError> {
        let mut comments: Vec<Comment> = self
            .state
            .lock()
            .comments
            .values()
            .filter(|c| c.video_id == video_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(comments)
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn create(&self, message: &Message) -> Result<Message, AppError> {
        self.state.lock().messages.push(message.clone());
        Ok(message.clone())
    }

    async fn find_between(
        &self,
        user_a: i64,
        user_b: i64,
        after: DateTime<Utc>,
    ) -> Result<Vec<Message>, AppError> {
        let mut messages: Vec<Message> = self
            .state
            .lock()
            .messages
            .iter()
            .filter(|m| {
                (m.from_user_id == user_a && m.to_user_id == user_b)
                    || (m.from_user_id == user_b && m.to_user_id == user_a)
            })
            .filter(|m| m.created_at > after)
            .cloned()
            .collect();
        messages.sort_by_key(|m| (m.created_at, m.id));
        Ok(messages)
    }

    async fn latest_per_conversation(&self, user_id: i64) -> Result<Vec<Message>, AppError> {
        let mut latest: BTreeMap<i64, Message> = BTreeMap::new();
        for message in self.state.lock().messages.iter() {
            if message.from_user_id != user_id && message.to_user_id != user_id {
                continue;
            }
            let peer = message.peer_of(user_id);
            match latest.get(&peer) {
                Some(current) if current.id >= message.id => {}
                _ => {
                    latest.insert(peer, message.clone());
                }
            }
        }
        let mut messages: Vec<Message> = latest.into_values().collect();
        messages.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(messages)
    }
}

// ============================================================================
// Fake media probe
// ============================================================================

/// Reports one video stream unless the file starts with [`NOT_A_VIDEO`];
/// "extracts" covers by writing a fixed JPEG marker.
pub struct FakeProbe;

#[async_trait]
impl MediaProbe for FakeProbe {
    async fn probe(&self, path: &Path) -> Result<ProbeReport, AppError> {
        let bytes = tokio::fs::read(path).await?;
        if bytes.starts_with(NOT_A_VIDEO) {
            return Ok(ProbeReport {
                format_name: "unknown".into(),
                streams: vec![],
            });
        }
        Ok(ProbeReport {
            format_name: "mov,mp4,m4a,3gp,3g2,mj2".into(),
            streams: vec![StreamInfo {
                codec_type: "video".into(),
                codec_name: Some("h264".into()),
            }],
        })
    }

    async fn extract_first_frame(&self, _src: &Path, dst: &Path) -> Result<(), AppError> {
        tokio::fs::write(dst, [0xFF, 0xD8, 0xFF, 0xD9]).await?;
        Ok(())
    }
}

// ============================================================================
// Test application
// ============================================================================

pub fn test_settings(media_root: &Path) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 8080,
            public_base_url: Some(BASE_URL.into()),
        },
        database: DatabaseSettings {
            url: "postgres://localhost/unused".into(),
            max_connections: 1,
            min_connections: 0,
            acquire_timeout: 1,
            run_migrations: false,
        },
        jwt: JwtSettings {
            secret: "integration-test-secret-0123456789abcdef".into(),
            token_ttl_seconds: 3600,
            issuer: "dy-svc".into(),
        },
        media: MediaSettings {
            root: media_root.display().to_string(),
            video_dir: "video".into(),
            cover_dir: "cover".into(),
            ffmpeg_path: "ffmpeg".into(),
            ffprobe_path: "ffprobe".into(),
            ingest_timeout_secs: 10,
            max_upload_bytes: 1024 * 1024,
        },
        snowflake: SnowflakeSettings { machine_id: 1 },
        cors: CorsSettings {
            allowed_origins: vec![],
        },
        environment: "test".into(),
    }
}

/// Test application builder
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub media_root: TempDir,
}

/// A registered account
pub struct Account {
    pub user_id: i64,
    pub token: String,
}

impl TestApp {
    /// Create a new test application over an empty store
    pub fn new() -> Self {
        let media_root = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::default());
        let repos = Repositories {
            users: store.clone(),
            videos: store.clone(),
            follows: store.clone(),
            favorites: store.clone(),
            comments: store.clone(),
            messages: store.clone(),
        };
        let state = AppState::new(
            test_settings(media_root.path()),
            None,
            repos,
            Arc::new(FakeProbe),
        );

        Self {
            router: build_router(state),
            store,
            media_root,
        }
    }

    /// Send a request and return the HTTP status with the parsed JSON body
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Make a POST request with query parameters only
    pub async fn post(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Make a GET request with a bearer token
    pub async fn get_auth(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Make a POST request with a bearer token
    pub async fn post_auth(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// POST a multipart upload to `/publish`
    pub async fn publish(
        &self,
        token: Option<&str>,
        form_token: Option<&str>,
        title: &str,
        file_name: &str,
        data: &[u8],
    ) -> (StatusCode, Value) {
        let boundary = "test-boundary-7MA4YWxkTrZu0gW";
        let mut body = Vec::new();
        let mut text_part = |name: &str, value: &str| {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        };
        text_part("title", title);
        if let Some(t) = form_token {
            text_part("token", t);
        }
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"data\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let mut builder = Request::builder()
            .method("POST")
            .uri("/publish")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            );
        if let Some(t) = token {
            builder = builder.header("Authorization", format!("Bearer {}", t));
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    /// Register an account and return its id and token
    pub async fn register(&self, username: &str) -> Account {
        let (status, json) = self
            .post(&format!("/register?username={}&password=secret123", username))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status_code"], 0, "register failed: {}", json);
        Account {
            user_id: json["user_id"].as_i64().unwrap(),
            token: json["token"].as_str().unwrap().to_string(),
        }
    }
}

/// Generate a unique test username
pub fn unique_username() -> String {
    format!("user_{}", &uuid::Uuid::new_v4().simple().to_string()[..8])
}
