//! Prometheus metrics for the web server component.
//!
//! Tracks game sessions, move outcomes, ranking submissions and advisor
//! latency.

use lazy_static::lazy_static;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder};
use std::sync::Once;
use tracing::warn;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ========== Game Session Metrics ==========

    /// Total game sessions created
    pub static ref GAMES_CREATED: IntCounter = IntCounter::with_opts(
        Opts::new("web_games_created_total", "Total game sessions created")
    ).unwrap();

    /// Moves that changed the grid
    pub static ref MOVES_APPLIED: IntCounter = IntCounter::with_opts(
        Opts::new("web_moves_applied_total", "Total moves applied across all games")
    ).unwrap();

    /// Moves rejected because nothing could slide
    pub static ref MOVES_REJECTED: IntCounter = IntCounter::with_opts(
        Opts::new("web_moves_rejected_total", "Total illegal moves rejected")
    ).unwrap();

    /// Games that reached the terminal state
    pub static ref GAMES_FINISHED: IntCounter = IntCounter::with_opts(
        Opts::new("web_games_finished_total", "Total games played to the end")
    ).unwrap();

    // ========== Ranking ==========

    pub static ref RANKING_SUBMISSIONS: IntCounter = IntCounter::with_opts(
        Opts::new("web_ranking_submissions_total", "Accepted ranking submissions")
    ).unwrap();

    // ========== Advisor ==========

    /// Time for the advisor to compute a hint
    pub static ref HINT_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new("web_hint_seconds", "Time for the advisor to recommend a move")
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0])
    ).unwrap();
}

static INIT: Once = Once::new();

/// Initialize and register all metrics with the registry.
/// Safe to call multiple times - only initializes once.
pub fn init_metrics() {
    INIT.call_once(|| {
        REGISTRY.register(Box::new(GAMES_CREATED.clone())).unwrap();
        REGISTRY.register(Box::new(MOVES_APPLIED.clone())).unwrap();
        REGISTRY.register(Box::new(MOVES_REJECTED.clone())).unwrap();
        REGISTRY.register(Box::new(GAMES_FINISHED.clone())).unwrap();
        REGISTRY
            .register(Box::new(RANKING_SUBMISSIONS.clone()))
            .unwrap();
        REGISTRY.register(Box::new(HINT_SECONDS.clone())).unwrap();
    });
}

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_init() {
        init_metrics();
        init_metrics();
    }

    #[test]
    fn test_encode_metrics() {
        init_metrics();
        GAMES_CREATED.inc();
        let output = encode_metrics();
        assert!(output.contains("web_games_created_total"));
        assert!(output.contains("web_moves_applied_total"));
    }
}
