//! Tunable parameters for the incremental pathfinding pool.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameters that shape search budgets, move costs and pool behaviour.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfindingConfig {
    /// Frontier entries a single search step may pop before yielding.
    pub expansions_per_step: u32,
    /// Base cost of a horizontal or vertical move.
    pub straight_cost: u32,
    /// Base cost of a diagonal move.
    pub diagonal_cost: u32,
    /// Random rows tried when looking for an open spawn-edge start.
    pub start_attempts: u32,
    /// Random pool picks tried before an agent falls back to a partial path.
    pub acquire_attempts: u32,
    /// Full paths created when a level starts.
    pub precomputed_paths: usize,
    /// Seed for the pool's random number generator.
    pub seed: u64,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            expansions_per_step: 25,
            straight_cost: 3,
            diagonal_cost: 4,
            start_attempts: 100,
            acquire_attempts: 500,
            precomputed_paths: 30,
            seed: 0x5eed_1a4e_0f_d3f3,
        }
    }
}

impl PathfindingConfig {
    /// Checks that the configuration describes a usable search.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.expansions_per_step == 0 {
            return Err(ConfigError::ZeroExpansionBudget);
        }
        if self.straight_cost == 0 {
            return Err(ConfigError::ZeroMoveCost);
        }
        if self.diagonal_cost < self.straight_cost {
            return Err(ConfigError::DiagonalCheaperThanStraight {
                straight: self.straight_cost,
                diagonal: self.diagonal_cost,
            });
        }
        Ok(())
    }

    /// Cheapest cost of any single move, used to keep the heuristic admissible.
    #[must_use]
    pub fn cheapest_move(&self) -> u32 {
        self.straight_cost.min(self.diagonal_cost)
    }
}

/// Reasons a [`PathfindingConfig`] may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A zero expansion budget would never advance any search.
    #[error("expansions_per_step must be greater than zero")]
    ZeroExpansionBudget,
    /// Zero-cost moves make every route equally attractive.
    #[error("straight_cost must be greater than zero")]
    ZeroMoveCost,
    /// Diagonals must cost at least as much as straight moves.
    #[error("diagonal_cost {diagonal} is cheaper than straight_cost {straight}")]
    DiagonalCheaperThanStraight {
        /// Configured straight move cost.
        straight: u32,
        /// Configured diagonal move cost.
        diagonal: u32,
    },
}
