//! Twenty48 Web Server
//!
//! HTTP server exposing the score ranking and a 2048 game session.
//! Endpoints:
//! - GET  /health        - Health check
//! - GET  /metrics       - Prometheus metrics
//! - GET  /ranking       - Weekly and all-time top scores
//! - POST /ranking       - Submit a score
//! - POST /game/new      - Start a new game
//! - GET  /game/state    - Get current game state
//! - POST /move          - Slide the tiles in one direction
//! - GET  /hint          - Ask the move advisor for a direction

use advisor::{Advisor, AdvisorConfig};
use anyhow::Context;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use games_twenty48::SpawnPolicy;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

mod game;
mod handlers;
mod metrics;
mod ranking;
mod types;

use game::GameSession;
use handlers::{
    get_game_state, get_hint, get_ranking, health, make_move, metrics_handler, new_game,
    submit_ranking,
};
use ranking::RankingStore;

/// Shared application state
pub struct AppState {
    /// Current game session
    pub session: Mutex<GameSession>,
    /// Score boards; the mutex serialises read-modify-write of the file
    pub ranking: Mutex<RankingStore>,
    /// Move advisor used by /hint
    pub advisor: Advisor,
    /// Spawn distribution for new games
    pub spawn: SpawnPolicy,
    /// CORS allowed origins (empty = any)
    pub allowed_origins: Vec<String>,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Create the application router with the given state.
/// This is separated out for testing purposes.
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/ranking", get(get_ranking).post(submit_ranking))
        .route("/game/new", post(new_game))
        .route("/game/state", get(get_game_state))
        .route("/move", post(make_move))
        .route("/hint", get(get_hint))
        .layer(cors)
        .with_state(state)
}

/// Create application state for testing: fixed seed, fast advisor,
/// ranking file under `data_dir`.
#[cfg(test)]
pub fn create_test_state(data_dir: &std::path::Path) -> Arc<AppState> {
    let spawn = SpawnPolicy::default();
    let ranking = RankingStore::load(data_dir.join("ranking.json"), 10)
        .expect("Failed to create ranking store");
    let advisor =
        Advisor::new(AdvisorConfig::for_testing()).expect("Failed to create advisor");

    Arc::new(AppState {
        session: Mutex::new(GameSession::new(Some(42), spawn)),
        ranking: Mutex::new(ranking),
        advisor,
        spawn,
        allowed_origins: Vec::new(),
    })
}

/// Creates a future that completes when a shutdown signal is received.
/// Handles Ctrl+C on all platforms.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from config.toml with env var overrides
    let config = engine_config::load_config();

    // Initialize tracing (RUST_LOG wins over the configured level)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.common.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    metrics::init_metrics();

    let data_dir = config.common.data_dir.clone();
    info!(
        "Configuration: data_dir={}, ranking capacity={}, advisor trials={} depth={}",
        data_dir, config.ranking.capacity, config.advisor.trials, config.advisor.max_depth
    );
    if config.web.allowed_origins.is_empty() {
        warn!("No allowed_origins configured, accepting requests from any origin");
    }

    let spawn = SpawnPolicy::new(config.spawn.decay).context("Invalid [spawn] config")?;
    let advisor = Advisor::new(AdvisorConfig::from(config.advisor.clone()))
        .context("Invalid [advisor] config")?;

    let ranking_path = config.ranking.path(&data_dir);
    let ranking = RankingStore::load(&ranking_path, config.ranking.capacity)
        .with_context(|| format!("Failed to load ranking from {}", ranking_path))?;
    info!("Ranking loaded from {}", ranking.path().display());

    let state = Arc::new(AppState {
        session: Mutex::new(GameSession::new(None, spawn)),
        ranking: Mutex::new(ranking),
        advisor,
        spawn,
        allowed_origins: config.web.allowed_origins.clone(),
    });
    metrics::GAMES_CREATED.inc();

    // Build router
    let app = create_app(state);

    let addr = format!("{}:{}", config.web.host, config.web.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

// ============================================================================
// Integration Tests
// ============================================================================
