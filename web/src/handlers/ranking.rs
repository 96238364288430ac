//! Ranking handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{error, info};

use crate::metrics;
use crate::ranking::{RankingBoards, RankingEntry};
use crate::types::RankingSubmission;
use crate::AppState;

/// Current weekly and all-time boards.
pub async fn get_ranking(State(state): State<Arc<AppState>>) -> Json<RankingBoards> {
    let mut ranking = state.ranking.lock().await;
    Json(ranking.boards())
}

/// Submit a score; responds with the updated boards.
pub async fn submit_ranking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RankingSubmission>,
) -> Result<Json<RankingBoards>, (StatusCode, String)> {
    let score = req
        .score
        .ok_or((StatusCode::BAD_REQUEST, "Score not defined".to_string()))?;
    let name = req
        .name
        .ok_or((StatusCode::BAD_REQUEST, "Username not defined".to_string()))?;
    let time = req
        .time
        .ok_or((StatusCode::BAD_REQUEST, "Time not defined".to_string()))?;

    let mut ranking = state.ranking.lock().await;
    let boards = ranking
        .submit(RankingEntry { name, score, time })
        .map_err(|e| {
            error!("Failed to store ranking: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to store ranking".to_string(),
            )
        })?;

    metrics::RANKING_SUBMISSIONS.inc();
    info!(score, time, "Ranking updated");
    Ok(Json(boards))
}
