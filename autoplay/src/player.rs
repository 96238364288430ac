//! Game loop that always follows the move advisor.

use advisor::Advisor;
use anyhow::{anyhow, bail, Result};
use games_twenty48::{GameState, MoveOutcome, SpawnPolicy};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::stats::{AutoplayStats, GameSummary};

pub struct Autoplayer {
    config: Config,
    advisor: Advisor,
    spawn: SpawnPolicy,
    stats: AutoplayStats,
    base_seed: Option<u64>,
    games_played: AtomicU32,
    shutdown_signal: AtomicBool,
}

impl Autoplayer {
    pub fn new(config: Config) -> Result<Self> {
        let advisor = Advisor::new(config.advisor_config())?;
        let spawn = config.spawn_policy()?;
        let stats = AutoplayStats::new(&config.data_dir);
        let base_seed = config.resolved_seed();

        info!(
            trials = advisor.config().trials,
            max_depth = advisor.config().max_depth,
            decay = spawn.decay(),
            seed = ?base_seed,
            "Autoplayer initialized"
        );

        Ok(Self {
            config,
            advisor,
            spawn,
            stats,
            base_seed,
            games_played: AtomicU32::new(0),
            shutdown_signal: AtomicBool::new(false),
        })
    }

    pub async fn run(&self) -> Result<()> {
        let limit = self.config.game_limit();

        // Progress bar for bounded runs (only when stderr is a TTY)
        let progress = match limit {
            Some(games)
                if !self.config.no_progress
                    && std::io::IsTerminal::is_terminal(&std::io::stderr()) =>
            {
                let pb = ProgressBar::new(games as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} games ({eta})")
                        .map_err(|e| anyhow!("Invalid progress template: {}", e))?
                        .progress_chars("#>-"),
                );
                Some(pb)
            }
            _ => None,
        };

        loop {
            if self.is_shutting_down() {
                info!("Shutdown signal received, stopping autoplay");
                break;
            }

            let played = self.games_played.load(Ordering::Relaxed);
            if limit.is_some_and(|max| played >= max) {
                info!("Reached maximum games ({}), stopping", played);
                break;
            }

            match self.play_game(played).await {
                Ok(Some(summary)) => {
                    self.games_played.fetch_add(1, Ordering::Relaxed);
                    self.stats.record_game(&summary);
                    self.stats.write_stats();
                    if let Some(ref pb) = progress {
                        pb.inc(1);
                    }
                    let log = || {
                        info!(
                            game = played + 1,
                            score = summary.score,
                            moves = summary.moves,
                            highest_tile = 1u64 << summary.max_level,
                            "Game over"
                        )
                    };
                    match progress {
                        Some(ref pb) => pb.suspend(log),
                        None => log(),
                    }
                }
                // Interrupted mid-game; nothing to record
                Ok(None) => break,
                Err(e) => {
                    error!("Game {} failed: {}", played + 1, e);
                    return Err(e);
                }
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("done");
        }

        let snapshot = self.stats.snapshot();
        info!(
            games = snapshot.games_completed,
            best_score = snapshot.best_score,
            avg_score = format!("{:.1}", snapshot.avg_score),
            highest_tile = snapshot.highest_tile,
            "Autoplay stopped"
        );
        Ok(())
    }

    /// Play one game to the end. Returns `None` if shutdown interrupted it.
    pub async fn play_game(&self, index: u32) -> Result<Option<GameSummary>> {
        let mut rng = match self.base_seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed.wrapping_add(index as u64)),
            None => ChaCha20Rng::from_entropy(),
        };
        let mut state = GameState::with_policy(self.spawn, &mut rng);
        let delay = self.config.move_delay();

        while !state.is_terminal() {
            if self.is_shutting_down() {
                return Ok(None);
            }

            self.step(&mut state, &mut rng)?;

            let moves = state.moves();
            if self.config.log_interval > 0 && moves % self.config.log_interval == 0 {
                info!(
                    game = index + 1,
                    moves,
                    score = state.score(),
                    max_level = state.max_level(),
                    "Progress"
                );
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        Ok(Some(GameSummary {
            score: state.score(),
            moves: state.moves(),
            max_level: state.max_level(),
        }))
    }

    /// Ask the advisor and apply its direction.
    fn step<R: Rng + ?Sized>(&self, state: &mut GameState, rng: &mut R) -> Result<()> {
        let rec = self.advisor.recommend(state, rng)?;
        match state.apply_move(rec.direction, rng)? {
            MoveOutcome::Applied(result) => {
                debug!(
                    direction = %result.direction,
                    score_delta = result.score_delta,
                    terminal = result.terminal,
                    "Move applied"
                );
                Ok(())
            }
            MoveOutcome::Rejected { direction } => {
                bail!("Advisor recommended illegal move {}", direction)
            }
        }
    }

    pub fn shutdown(&self) {
        self.shutdown_signal.store(true, Ordering::Relaxed);
        info!("Shutdown signal set");
    }

    fn is_shutting_down(&self) -> bool {
        self.shutdown_signal.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> &AutoplayStats {
        &self.stats
    }
}
