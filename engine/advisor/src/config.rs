//! Advisor configuration parameters.

use crate::search::AdvisorError;

/// Configuration for the lookahead search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorConfig {
    /// Independent rollouts per candidate direction.
    pub trials: u32,

    /// Rollout depth. The root move is depth 1; recursion stops at this depth.
    pub max_depth: u32,

    /// Base cost of a simulated slide that leaves the grid full.
    /// Multiplied by the remaining depth budget, so an early dead end costs
    /// more than a late one.
    pub terminal_penalty: u64,

    /// Extra depth added to the penalty multiplier so it stays positive at
    /// `max_depth`.
    pub penalty_slack: u32,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            trials: 10,
            max_depth: 6,
            terminal_penalty: 1000,
            penalty_slack: 10,
        }
    }
}

impl From<engine_config::AdvisorConfig> for AdvisorConfig {
    fn from(config: engine_config::AdvisorConfig) -> Self {
        Self {
            trials: config.trials,
            max_depth: config.max_depth,
            terminal_penalty: config.terminal_penalty,
            penalty_slack: config.penalty_slack,
        }
    }
}

impl AdvisorConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            trials: 2,
            max_depth: 3,
            terminal_penalty: 1000,
            penalty_slack: 10,
        }
    }

    /// Builder pattern: set rollouts per direction.
    pub fn with_trials(mut self, trials: u32) -> Self {
        self.trials = trials;
        self
    }

    /// Builder pattern: set rollout depth.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_terminal_penalty(mut self, penalty: u64) -> Self {
        self.terminal_penalty = penalty;
        self
    }

    pub fn validate(&self) -> Result<(), AdvisorError> {
        if self.trials == 0 {
            return Err(AdvisorError::InvalidConfig("trials must be > 0".into()));
        }
        if self.max_depth == 0 {
            return Err(AdvisorError::InvalidConfig(
                "max_depth must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Value of a full-grid leaf reached at `depth`.
    pub fn full_grid_penalty(&self, depth: u32) -> u64 {
        let remaining = (self.max_depth + self.penalty_slack).saturating_sub(depth);
        self.terminal_penalty.saturating_mul(u64::from(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdvisorConfig::default();
        assert_eq!(config.trials, 10);
        assert_eq!(config.max_depth, 6);
        assert_eq!(config.terminal_penalty, 1000);
        assert_eq!(config.penalty_slack, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = AdvisorConfig::default()
            .with_trials(4)
            .with_max_depth(2)
            .with_terminal_penalty(50);
        assert_eq!(config.trials, 4);
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.terminal_penalty, 50);
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        assert!(AdvisorConfig::default().with_trials(0).validate().is_err());
        assert!(AdvisorConfig::default().with_max_depth(0).validate().is_err());
    }

    #[test]
    fn test_full_grid_penalty_shrinks_with_depth() {
        let config = AdvisorConfig::default();
        assert_eq!(config.full_grid_penalty(1), 15_000);
        assert_eq!(config.full_grid_penalty(6), 10_000);
        assert!(config.full_grid_penalty(2) > config.full_grid_penalty(3));
        // Never underflows
        assert_eq!(config.full_grid_penalty(100), 0);
    }

    #[test]
    fn test_from_central_config() {
        let central = engine_config::AdvisorConfig {
            trials: 3,
            max_depth: 4,
            terminal_penalty: 500,
            penalty_slack: 2,
        };
        let config = AdvisorConfig::from(central);
        assert_eq!(
            config,
            AdvisorConfig {
                trials: 3,
                max_depth: 4,
                terminal_penalty: 500,
                penalty_slack: 2,
            }
        );
    }
}
