//! Headless driver that wires the world to its systems and tallies the run.

use std::{fmt, time::Duration};

use anyhow::{ensure, Result};
use lane_defence_core::{Command, Event, ObstacleKind, PathfindingConfig, Tile, TileGrid};
use lane_defence_system_abilities::{self as abilities, Abilities};
use lane_defence_system_movement::Movement;
use lane_defence_system_spawning::{self as spawning, Spawning};
use lane_defence_world::{self as world, query, World};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const OBSTACLE_KINDS: [ObstacleKind; 3] = [
    ObstacleKind::Turret,
    ObstacleKind::Bunker,
    ObstacleKind::Beacon,
];
const HOTTEST_REPORTED: usize = 5;

/// Level shape and scripted behaviour for a single run.
#[derive(Clone, Debug)]
pub(crate) struct SimulationOptions {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) tile_length: u32,
    pub(crate) tick: Duration,
    pub(crate) step_interval: Duration,
    pub(crate) walls: u32,
    pub(crate) obstacles: u32,
    pub(crate) spikes: bool,
    pub(crate) waves: Option<u32>,
}

/// Owns the world and every system for the duration of a run.
pub(crate) struct Simulation {
    world: World,
    movement: Movement,
    spawning: Spawning,
    abilities: Abilities,
    rng: ChaCha8Rng,
    options: SimulationOptions,
    obstacle_period: u32,
    tally: Tally,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Tally {
    ticks: u32,
    agents_spawned: u64,
    paths_repaired: u64,
    paths_reset: u64,
    obstacles_placed: u32,
    obstacles_rejected: u32,
    spikes_raised: u32,
}

impl Simulation {
    /// Configures the level, scatters walls and precomputes the path pool.
    pub(crate) fn new(options: SimulationOptions, config: PathfindingConfig) -> Result<Self> {
        ensure!(
            options.columns > 0 && options.rows > 0,
            "level must have at least one column and one row"
        );
        ensure!(options.tile_length > 0, "tile length must be positive");
        ensure!(!options.tick.is_zero(), "tick duration must be positive");

        let grid = TileGrid::new(options.columns, options.rows, options.tile_length);
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed ^ 0x5ca7_7e4d);
        let walls = scatter_walls(grid, options.walls, &mut rng);
        let precomputed = config.precomputed_paths;
        let step_interval = options.step_interval;

        let mut simulation = Self {
            world: World::with_config(config.clone()),
            movement: Movement::default(),
            spawning: Spawning::new(spawning::Config::new(options.waves)),
            abilities: Abilities::new(abilities::Config::with_seed(config.seed)),
            rng,
            obstacle_period: 0,
            options,
            tally: Tally::default(),
        };

        info!(
            "configuring {}x{} level with {} walls",
            grid.columns(),
            grid.rows(),
            walls.len()
        );
        simulation.submit(vec![
            Command::ConfigureLevel {
                grid,
                blocked: walls,
            },
            Command::ConfigureAgentStep { step_interval },
            Command::PrecomputePaths { count: precomputed },
        ]);
        Ok(simulation)
    }

    /// Runs the simulation for `ticks` ticks and reports the outcome.
    pub(crate) fn run(&mut self, ticks: u32) -> Summary {
        if self.options.obstacles > 0 {
            self.obstacle_period = (ticks / (self.options.obstacles + 1)).max(1);
        }

        for _ in 0..ticks {
            self.tick();
        }
        self.summary()
    }

    fn tick(&mut self) {
        self.tally.ticks += 1;
        self.submit(vec![Command::Tick {
            dt: self.options.tick,
        }]);

        if self.obstacle_due() {
            let command = self.random_obstacle();
            self.submit(vec![command]);
        }

        if self.options.spikes && self.abilities.is_ready() {
            let agents = query::agent_view(&self.world);
            if !agents.is_empty() {
                let mut commands = Vec::new();
                let blocks = query::block_view(&self.world);
                if self
                    .abilities
                    .use_crystal_spike(&agents, &blocks, &mut commands)
                {
                    self.tally.spikes_raised += 1;
                }
                self.submit(commands);
            }
        }
    }

    fn obstacle_due(&self) -> bool {
        self.obstacle_period > 0
            && self.tally.ticks % self.obstacle_period == 0
            && self.tally.obstacles_placed + self.tally.obstacles_rejected < self.options.obstacles
    }

    fn random_obstacle(&mut self) -> Command {
        let grid = query::tile_grid(&self.world);
        let kind = OBSTACLE_KINDS[self.rng.gen_range(0..OBSTACLE_KINDS.len())];
        let origin = random_tile(grid, &mut self.rng);
        Command::PlaceObstacle { kind, origin }
    }

    /// Applies commands and feeds the resulting events through every system
    /// until no system has anything left to say.
    fn submit(&mut self, commands: Vec<Command>) {
        let mut commands = commands;
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            if events.is_empty() {
                break;
            }
            self.record(&events);

            let agents = query::agent_view(&self.world);
            self.movement.handle(&events, &agents, &mut commands);
            self.spawning.handle(&events, &agents, &mut commands);
            self.abilities.handle(&events, &mut commands);
        }
    }

    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::AgentSpawned { .. } => self.tally.agents_spawned += 1,
                Event::PathRepaired { .. } => self.tally.paths_repaired += 1,
                Event::PathReset { .. } => self.tally.paths_reset += 1,
                Event::ObstaclePlaced { kind, region, .. } => {
                    self.tally.obstacles_placed += 1;
                    debug!("placed {kind:?} over {region:?}");
                }
                Event::ObstaclePlacementRejected {
                    kind,
                    origin,
                    reason,
                } => {
                    self.tally.obstacles_rejected += 1;
                    debug!("rejected {kind:?} at {origin:?}: {reason}");
                }
                _ => {}
            }
        }
    }

    fn summary(&self) -> Summary {
        let paths = query::path_summary(&self.world);
        Summary {
            ticks: self.tally.ticks,
            waves: self.spawning.wave(),
            paths_complete: paths.complete,
            paths_searching: paths.searching,
            paths_unreachable: paths.unreachable,
            paths_repaired: self.tally.paths_repaired,
            paths_reset: self.tally.paths_reset,
            agents_spawned: self.tally.agents_spawned,
            agents_exited: query::agents_exited(&self.world),
            agents_active: query::agent_view(&self.world).len(),
            obstacles_placed: self.tally.obstacles_placed,
            obstacles_rejected: self.tally.obstacles_rejected,
            spikes_raised: self.tally.spikes_raised,
            hottest: query::hottest_tiles(&self.world, HOTTEST_REPORTED),
        }
    }
}

/// End-of-run report printed by the binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) ticks: u32,
    pub(crate) waves: u32,
    pub(crate) paths_complete: usize,
    pub(crate) paths_searching: usize,
    pub(crate) paths_unreachable: usize,
    pub(crate) paths_repaired: u64,
    pub(crate) paths_reset: u64,
    pub(crate) agents_spawned: u64,
    pub(crate) agents_exited: u64,
    pub(crate) agents_active: usize,
    pub(crate) obstacles_placed: u32,
    pub(crate) obstacles_rejected: u32,
    pub(crate) spikes_raised: u32,
    pub(crate) hottest: Vec<(Tile, u64)>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ticks:     {} (wave {})", self.ticks, self.waves)?;
        writeln!(
            f,
            "paths:     {} complete, {} searching, {} unreachable",
            self.paths_complete, self.paths_searching, self.paths_unreachable
        )?;
        writeln!(
            f,
            "repairs:   {} repaired, {} reset",
            self.paths_repaired, self.paths_reset
        )?;
        writeln!(
            f,
            "agents:    {} spawned, {} exited, {} on the field",
            self.agents_spawned, self.agents_exited, self.agents_active
        )?;
        writeln!(
            f,
            "obstacles: {} placed, {} rejected",
            self.obstacles_placed, self.obstacles_rejected
        )?;
        writeln!(f, "spikes:    {}", self.spikes_raised)?;
        if self.hottest.is_empty() {
            return writeln!(f, "hottest:   none");
        }
        writeln!(f, "hottest:")?;
        for (tile, count) in &self.hottest {
            writeln!(f, "  ({:>3}, {:>3})  {count}", tile.column(), tile.row())?;
        }
        Ok(())
    }
}

/// Picks distinct interior tiles, leaving the goal column and spawn edge open.
fn scatter_walls(grid: TileGrid, count: u32, rng: &mut ChaCha8Rng) -> Vec<Tile> {
    let mut walls: Vec<Tile> = Vec::new();
    if grid.columns() < 3 {
        return walls;
    }

    let attempts = count.saturating_mul(4);
    for _ in 0..attempts {
        if walls.len() >= count as usize {
            break;
        }
        let tile = random_tile(grid, rng);
        if tile.column() == 0 || tile.column() + 1 == grid.spawn_column() {
            continue;
        }
        if !walls.contains(&tile) {
            walls.push(tile);
        }
    }
    walls
}

fn random_tile(grid: TileGrid, rng: &mut ChaCha8Rng) -> Tile {
    let column = rng.gen_range(0..grid.spawn_column());
    let rows = i32::try_from(grid.rows()).unwrap_or(i32::MAX);
    Tile::new(column, rng.gen_range(0..rows))
}
