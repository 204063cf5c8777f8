//! Chirp server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use chirp_api::{AppState, auth_middleware, router as api_router};
use chirp_common::Config;
use chirp_core::{AccountService, FeedService, FollowService, MessageService};
use chirp_db::repositories::{FollowRepository, LikeRepository, MessageRepository, UserRepository};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tower_sessions::{
    Expiry, MemoryStore, SessionManagerLayer,
    cookie::{Key, SameSite},
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Resolves once SIGINT or SIGTERM arrives (SIGTERM on Unix only).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("SIGINT received, shutting down"),
        () = terminate => info!("SIGTERM received, shutting down"),
    }
}

/// Liveness probe (no auth).
async fn health() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chirp=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting chirp");

    let config = Config::load()?;

    let db = chirp_db::init(&config).await?;
    info!("Database pool ready");

    chirp_db::migrate(&db).await?;
    info!("Schema is up to date");

    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));
    let message_repo = MessageRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));

    let account_service = AccountService::new(user_repo.clone());
    let follow_service = FollowService::new(follow_repo.clone(), user_repo);
    let message_service = MessageService::new(message_repo.clone(), like_repo);
    let feed_service = FeedService::new(message_repo, follow_repo);

    let state = AppState {
        account_service,
        follow_service,
        message_service,
        feed_service,
    };

    // Sessions are process-local: the in-memory store and the cookie signing
    // key both live exactly as long as the process.
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_name(config.session.cookie_name.clone())
        .with_secure(config.session.secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            config.session.expiry_minutes,
        )))
        .with_signed(Key::generate());

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}
