//! Game-related handlers.

use axum::{extract::State, http::StatusCode, Json};
use games_twenty48::{Direction, EngineError, MoveOutcome};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::game::GameSession;
use crate::metrics;
use crate::types::{GameStateResponse, HintResponse, MoveRequest, MoveResponse, NewGameRequest};
use crate::AppState;

/// Get current game state.
pub async fn get_game_state(State(state): State<Arc<AppState>>) -> Json<GameStateResponse> {
    let session = state.session.lock().await;
    Json(session.to_response())
}

/// Start a new game.
pub async fn new_game(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewGameRequest>,
) -> Json<GameStateResponse> {
    let mut session = state.session.lock().await;
    *session = GameSession::new(req.seed, state.spawn);
    metrics::GAMES_CREATED.inc();
    Json(session.to_response())
}

/// Slide the tiles in one direction.
pub async fn make_move(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, (StatusCode, String)> {
    let direction: Direction = req
        .direction
        .parse()
        .map_err(|e: EngineError| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let mut session = state.session.lock().await;

    let outcome = session.apply(direction).map_err(|e| match e {
        EngineError::GameOver => (StatusCode::BAD_REQUEST, e.to_string()),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Move failed: {}", other),
        ),
    })?;

    match outcome {
        MoveOutcome::Applied(result) => {
            metrics::MOVES_APPLIED.inc();
            if result.terminal {
                metrics::GAMES_FINISHED.inc();
            }
            Ok(Json(MoveResponse::new(session.to_response(), result)))
        }
        MoveOutcome::Rejected { direction } => {
            metrics::MOVES_REJECTED.inc();
            Err((
                StatusCode::BAD_REQUEST,
                format!("Illegal move: nothing can slide {}", direction),
            ))
        }
    }
}

/// Recommend a direction with the move advisor.
pub async fn get_hint(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HintResponse>, (StatusCode, String)> {
    let mut session = state.session.lock().await;
    if session.is_game_over() {
        return Err((StatusCode::BAD_REQUEST, "Game is already over".to_string()));
    }

    let start = Instant::now();
    let rec = session
        .hint(&state.advisor)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let elapsed = start.elapsed();
    metrics::HINT_SECONDS.observe(elapsed.as_secs_f64());
    debug!(direction = %rec.direction, elapsed_ms = elapsed.as_millis() as u64, "Hint computed");

    Ok(Json(rec.into()))
}
