#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that releases agents in escalating waves.

use std::time::Duration;

use lane_defence_core::{AgentView, Command, Event};
use log::info;

const MIN_SPAWN_GAP: Duration = Duration::from_millis(250);
const MIN_SPAWN_GAP_SECS: f64 = 0.25;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    wave_limit: Option<u32>,
}

impl Config {
    /// Creates a configuration that stops after `wave_limit` waves, if provided.
    #[must_use]
    pub const fn new(wave_limit: Option<u32>) -> Self {
        Self { wave_limit }
    }
}

/// Pure system that emits spawn commands on a wave cadence.
///
/// A new wave starts only after the previous one was fully released and the
/// field is clear of agents.
#[derive(Debug)]
pub struct Spawning {
    wave_limit: Option<u32>,
    wave: u32,
    remaining: u32,
    spawn_gap: Duration,
    accumulator: Duration,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            wave_limit: config.wave_limit,
            wave: 0,
            remaining: 0,
            spawn_gap: MIN_SPAWN_GAP,
            accumulator: Duration::ZERO,
        }
    }

    /// Number of the wave currently being released, zero before the first.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Consumes events and the agent view to emit spawn commands.
    pub fn handle(&mut self, events: &[Event], agents: &AgentView, out: &mut Vec<Command>) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                Event::LevelConfigured { .. } => self.reset(),
                _ => {}
            }
        }

        if accumulated.is_zero() {
            return;
        }

        if self.remaining == 0 && (!agents.is_empty() || !self.start_next_wave()) {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        while self.remaining > 0 && self.accumulator >= self.spawn_gap {
            self.accumulator -= self.spawn_gap;
            self.remaining -= 1;
            out.push(Command::SpawnAgent);
        }
    }

    fn reset(&mut self) {
        self.wave = 0;
        self.remaining = 0;
        self.accumulator = Duration::ZERO;
    }

    fn start_next_wave(&mut self) -> bool {
        if self.wave_limit.is_some_and(|limit| self.wave >= limit) {
            return false;
        }

        self.wave += 1;
        self.remaining = wave_size(self.wave);
        self.spawn_gap = spawn_gap(self.wave);
        self.accumulator = Duration::ZERO;
        info!(
            "wave {} releases {} agents every {:?}",
            self.wave, self.remaining, self.spawn_gap
        );
        true
    }
}

/// Agents released by wave `wave`: `floor(wave^1.5) + 4`.
#[must_use]
pub fn wave_size(wave: u32) -> u32 {
    (f64::from(wave).powf(1.5).floor() as u32).saturating_add(4)
}

/// Delay between two spawns of wave `wave`: `3 - wave^0.6` seconds, at least 0.25.
#[must_use]
pub fn spawn_gap(wave: u32) -> Duration {
    let seconds = 3.0 - f64::from(wave).powf(0.6);
    Duration::from_secs_f64(seconds.max(MIN_SPAWN_GAP_SECS))
}
