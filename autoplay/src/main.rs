//! Autoplay - plays 2048 games with the move advisor
//!
//! Each game starts from a single tile and always takes the direction the
//! advisor recommends until no direction can change the grid. Aggregate
//! results go to `<data_dir>/autoplay_stats.json` after every game.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

mod config;
mod player;
mod stats;

use crate::config::Config;
use crate::player::Autoplayer;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;

    let games_description = match config.game_limit() {
        Some(games) => games.to_string(),
        None => "unlimited".to_string(),
    };
    info!(
        games = config.games,
        data_dir = %config.data_dir,
        "Autoplay will run {} games", games_description
    );

    let player = Arc::new(Autoplayer::new(config)?);

    // Setup graceful shutdown
    let shutdown_player = Arc::clone(&player);
    let shutdown_handle = tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received, stopping autoplay...");
                shutdown_player.shutdown();
            }
            Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    let run_result = player.run().await;
    shutdown_handle.abort();

    match run_result {
        Ok(()) => {
            info!("Autoplay completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Autoplay failed: {}", e);
            Err(e)
        }
    }
}
