//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{
    CommentService, CommentServiceImpl, FavoriteService, FavoriteServiceImpl, FeedService,
    FeedServiceImpl, MessageService, MessageServiceImpl, RelationService, RelationServiceImpl,
    TokenService, UrlAssembler, UserService, UserServiceImpl, VideoIngestor, VideoPublisher,
    ViewAssembler,
};
use crate::config::Settings;
use crate::domain::services::MediaProbe;
use crate::domain::{
    CommentRepository, FavoriteRepository, FollowRepository, MessageRepository, UserRepository,
    VideoRepository,
};
use crate::infrastructure::database;
use crate::infrastructure::media::FfmpegProbe;
use crate::infrastructure::repositories::{
    PgCommentRepository, PgFavoriteRepository, PgFollowRepository, PgMessageRepository,
    PgUserRepository, PgVideoRepository,
};
use crate::presentation::http::handlers::health;
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};
use crate::shared::snowflake::SnowflakeGenerator;

/// Application state shared across handlers.
///
/// Services are constructed once here and shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// `None` when the state is backed by non-SQL repositories
    pub db: Option<PgPool>,
    pub settings: Arc<Settings>,
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserService>,
    pub feed: Arc<dyn FeedService>,
    pub publisher: Arc<dyn VideoPublisher>,
    pub favorites: Arc<dyn FavoriteService>,
    pub comments: Arc<dyn CommentService>,
    pub relations: Arc<dyn RelationService>,
    pub messages: Arc<dyn MessageService>,
}

/// Storage backends the services are built over.
pub struct Repositories<U, V, Fo, Fa, C, M> {
    pub users: Arc<U>,
    pub videos: Arc<V>,
    pub follows: Arc<Fo>,
    pub favorites: Arc<Fa>,
    pub comments: Arc<C>,
    pub messages: Arc<M>,
}

impl Repositories<
    PgUserRepository,
    PgVideoRepository,
    PgFollowRepository,
    PgFavoriteRepository,
    PgCommentRepository,
    PgMessageRepository,
>
{
    /// PostgreSQL repositories sharing one pool
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            videos: Arc::new(PgVideoRepository::new(pool.clone())),
            follows: Arc::new(PgFollowRepository::new(pool.clone())),
            favorites: Arc::new(PgFavoriteRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool.clone())),
            messages: Arc::new(PgMessageRepository::new(pool.clone())),
        }
    }
}

impl AppState {
    /// Wire every service over the given repositories and media probe.
    pub fn new<U, V, Fo, Fa, C, M, P>(
        settings: Settings,
        db: Option<PgPool>,
        repos: Repositories<U, V, Fo, Fa, C, M>,
        probe: Arc<P>,
    ) -> Self
    where
        U: UserRepository + 'static,
        V: VideoRepository + 'static,
        Fo: FollowRepository + 'static,
        Fa: FavoriteRepository + 'static,
        C: CommentRepository + 'static,
        M: MessageRepository + 'static,
        P: MediaProbe + 'static,
    {
        let snowflake = Arc::new(SnowflakeGenerator::new(
            settings.snowflake.machine_id as u64,
            0u64, // Default node_id
        ));
        let tokens = Arc::new(TokenService::new(&settings.jwt));

        let urls = UrlAssembler::from_settings(&settings.server);
        tracing::info!(base = %urls.base(), "Media URLs resolved");
        let views = Arc::new(ViewAssembler::new(
            repos.users.clone(),
            repos.follows.clone(),
            repos.favorites.clone(),
            urls,
        ));

        let users = Arc::new(UserServiceImpl::new(
            repos.users.clone(),
            snowflake.clone(),
            tokens.clone(),
            views.clone(),
        ));
        let feed = Arc::new(FeedServiceImpl::new(repos.videos.clone(), views.clone()));
        let publisher = Arc::new(VideoIngestor::new(
            repos.videos.clone(),
            probe,
            snowflake.clone(),
            &settings.media,
        ));
        let favorites = Arc::new(FavoriteServiceImpl::new(
            repos.videos.clone(),
            repos.favorites.clone(),
            views.clone(),
        ));
        let comments = Arc::new(CommentServiceImpl::new(
            repos.videos.clone(),
            repos.comments.clone(),
            snowflake.clone(),
            views.clone(),
        ));
        let relations = Arc::new(RelationServiceImpl::new(repos.follows.clone(), views.clone()));
        let messages = Arc::new(MessageServiceImpl::new(
            repos.messages.clone(),
            snowflake,
            views,
        ));

        Self {
            db,
            settings: Arc::new(settings),
            tokens,
            users,
            feed,
            publisher,
            favorites,
            comments,
            relations,
            messages,
        }
    }
}

/// Wrap the API router with tracing and CORS layers.
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);
    logging::add_tracing(routes::create_router(state)).layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        health::init_server_start();

        // Create database pool
        let db = database::create_pool(&settings.database).await?;
        tracing::info!("Database connection pool created");

        if settings.database.run_migrations {
            database::run_migrations(&db).await?;
            tracing::info!("Database migrations applied");
        }

        let probe = Arc::new(FfmpegProbe::new(&settings.media));
        let repos = Repositories::postgres(&db);
        let addr = settings.server_addr();

        let state = AppState::new(settings, Some(db), repos, probe);
        let router = build_router(state);

        // Bind to address
        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
