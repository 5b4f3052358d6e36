#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player abilities that temporarily reshape the level.
//!
//! The crystal spike barrier blocks a handful of tiles for a few seconds,
//! preferring tiles agents stand on or head for. Spikes are temporary, so
//! they never check route criticality: a spike may strand paths, and the
//! pool retries them once the tiles open again.

use std::time::Duration;

use lane_defence_core::{AgentView, BlockView, Command, Event, Tile};
use log::debug;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Tuning for the crystal spike barrier.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    cooldown: Duration,
    duration: Duration,
    spike_count: usize,
    random_attempts: u32,
    seed: u64,
}

impl Config {
    /// Creates a configuration with explicit timings and spike budget.
    #[must_use]
    pub const fn new(
        cooldown: Duration,
        duration: Duration,
        spike_count: usize,
        random_attempts: u32,
        seed: u64,
    ) -> Self {
        Self {
            cooldown,
            duration,
            spike_count,
            random_attempts,
            seed,
        }
    }

    /// Default timings with a caller-chosen seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Duration::from_secs(20), Duration::from_secs(5), 8, 200, 0)
    }
}

/// Pure system that owns ability cooldowns and active effects.
#[derive(Debug)]
pub struct Abilities {
    config: Config,
    cooldown_left: Duration,
    active: Vec<ActiveSpike>,
    rng: ChaCha8Rng,
}

#[derive(Clone, Debug)]
struct ActiveSpike {
    tiles: Vec<Tile>,
    time_left: Duration,
}

impl Abilities {
    /// Creates the ability system with a ready barrier.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cooldown_left: Duration::ZERO,
            active: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// Reports whether the barrier can be raised now.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cooldown_left.is_zero()
    }

    /// Time until the barrier can be raised again.
    #[must_use]
    pub const fn cooldown_remaining(&self) -> Duration {
        self.cooldown_left
    }

    /// Number of spiked tiles currently standing.
    #[must_use]
    pub fn active_spikes(&self) -> usize {
        self.active.iter().map(|spike| spike.tiles.len()).sum()
    }

    /// Advances cooldowns and emits `UnblockTile` for expired spikes.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let mut elapsed = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => elapsed = elapsed.saturating_add(*dt),
                Event::LevelConfigured { .. } => {
                    self.active.clear();
                    self.cooldown_left = Duration::ZERO;
                }
                _ => {}
            }
        }

        if elapsed.is_zero() {
            return;
        }

        self.cooldown_left = self.cooldown_left.saturating_sub(elapsed);
        for spike in &mut self.active {
            spike.time_left = spike.time_left.saturating_sub(elapsed);
            if spike.time_left.is_zero() {
                out.extend(spike.tiles.iter().map(|tile| Command::UnblockTile { tile: *tile }));
            }
        }
        self.active.retain(|spike| !spike.time_left.is_zero());
    }

    /// Raises the crystal spike barrier if it is off cooldown.
    ///
    /// Returns whether any spike was placed.
    pub fn use_crystal_spike(
        &mut self,
        agents: &AgentView,
        blocks: &BlockView<'_>,
        out: &mut Vec<Command>,
    ) -> bool {
        if !self.is_ready() {
            return false;
        }

        let tiles = self.choose_spike_tiles(agents, blocks);
        if tiles.is_empty() {
            return false;
        }

        debug!("raising {} crystal spikes", tiles.len());
        out.extend(tiles.iter().map(|tile| Command::BlockTile { tile: *tile }));
        self.active.push(ActiveSpike {
            tiles,
            time_left: self.config.duration,
        });
        self.cooldown_left = self.config.cooldown;
        true
    }

    fn choose_spike_tiles(&mut self, agents: &AgentView, blocks: &BlockView<'_>) -> Vec<Tile> {
        let grid = blocks.grid();
        let budget = self.config.spike_count;
        let mut chosen: Vec<Tile> = Vec::with_capacity(budget);
        let offer = |tile: Tile, chosen: &mut Vec<Tile>| {
            if chosen.len() < budget
                && grid.contains(tile)
                && !blocks.is_blocked(tile)
                && !chosen.contains(&tile)
            {
                chosen.push(tile);
            }
        };

        let mut snapshots: Vec<_> = agents.iter().collect();
        snapshots.shuffle(&mut self.rng);

        for agent in &snapshots {
            offer(agent.tile, &mut chosen);
        }
        for target in snapshots.iter().filter_map(|agent| agent.target) {
            offer(target, &mut chosen);
        }

        let (columns, rows) = (grid.columns(), grid.rows());
        if columns > 0 && rows > 0 {
            for _ in 0..self.config.random_attempts {
                if chosen.len() >= budget {
                    break;
                }
                let column = i32::try_from(self.rng.gen_range(0..columns)).unwrap_or(0);
                let row = i32::try_from(self.rng.gen_range(0..rows)).unwrap_or(0);
                offer(Tile::new(column, row), &mut chosen);
            }
        }

        chosen
    }
}
