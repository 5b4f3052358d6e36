#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state for Lane Defence.
//!
//! The world owns the blocking grid, the path pool, the heat map, placed
//! obstacles and every agent. All mutation flows through [`apply`]; changes to
//! the blocked tiles are forwarded to the pool inside the same call so no
//! agent ever follows a route through a tile known to be blocked.

mod blocking;
mod heat;
mod obstacles;

use std::time::Duration;

use lane_defence_core::{
    AgentId, Command, Event, ObstacleId, ObstacleKind, PathId, PathStatus, PathfindingConfig,
    PlacementError, RemovalError, Tile, TileGrid, TileRect,
};
use lane_defence_system_pathfinding::{PathChange, PathChangeKind, PathPool, StepOutcome};
use log::{debug, info};

pub use blocking::BlockGrid;
pub use heat::HeatMap;

use obstacles::ObstacleRegistry;

const DEFAULT_GRID: TileGrid = TileGrid::new(20, 12, 32);
const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(250);

/// Represents the authoritative Lane Defence level state.
#[derive(Debug)]
pub struct World {
    config: PathfindingConfig,
    blocks: BlockGrid,
    pool: PathPool,
    heat: HeatMap,
    obstacles: ObstacleRegistry,
    agents: Vec<Agent>,
    next_agent_id: AgentId,
    step_interval: Duration,
    agents_exited: u64,
}

impl World {
    /// Creates a world with the default pathfinding configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PathfindingConfig::default())
    }

    /// Creates a world whose pool searches with the provided configuration.
    #[must_use]
    pub fn with_config(config: PathfindingConfig) -> Self {
        Self {
            blocks: BlockGrid::new(DEFAULT_GRID),
            pool: PathPool::new(DEFAULT_GRID, config.clone()),
            config,
            heat: HeatMap::default(),
            obstacles: ObstacleRegistry::new(),
            agents: Vec::new(),
            next_agent_id: AgentId::new(0),
            step_interval: DEFAULT_STEP_INTERVAL,
            agents_exited: 0,
        }
    }

    fn configure_level(&mut self, grid: TileGrid, blocked: Vec<Tile>) {
        self.blocks = BlockGrid::new(grid);
        for tile in blocked {
            let _ = self.blocks.block(tile);
        }
        self.pool = PathPool::new(grid, self.config.clone());
        self.heat.clear();
        self.obstacles.clear();
        self.agents.clear();
        self.next_agent_id = AgentId::new(0);
        self.agents_exited = 0;
        info!(
            "level configured: {}x{} tiles of {} units, {} blocked",
            grid.columns(),
            grid.rows(),
            grid.tile_length(),
            self.blocks.blocked_count()
        );
    }

    fn block_tile(&mut self, tile: Tile, out_events: &mut Vec<Event>) {
        if !self.blocks.block(tile) {
            return;
        }
        out_events.push(Event::TileBlocked { tile });
        let changes = self.pool.on_block(tile, &self.blocks.view());
        push_path_changes(changes, out_events);
    }

    fn unblock_tile(&mut self, tile: Tile, out_events: &mut Vec<Event>) {
        if !self.blocks.unblock(tile) {
            return;
        }
        out_events.push(Event::TileUnblocked { tile });
        let changes = self.pool.on_unblock(tile);
        push_path_changes(changes, out_events);
    }

    fn advance_search(&mut self, out_events: &mut Vec<Event>) {
        match self.pool.advance_one_step(&self.blocks.view()) {
            Some((path, StepOutcome::Complete)) => {
                out_events.push(Event::PathCompleted { path });
            }
            Some((path, StepOutcome::Unreachable)) => {
                out_events.push(Event::PathUnreachable { path });
            }
            Some((_, StepOutcome::Pending)) | None => {}
        }
    }

    fn place_obstacle(&mut self, kind: ObstacleKind, origin: Tile, out_events: &mut Vec<Event>) {
        let region = TileRect::from_origin_and_size(origin, kind.footprint());
        if let Err(reason) = self.check_placement(kind, &region) {
            debug!("rejected {kind:?} at {origin:?}: {reason}");
            out_events.push(Event::ObstaclePlacementRejected {
                kind,
                origin,
                reason,
            });
            return;
        }

        let obstacle = self.obstacles.insert(kind, region);
        out_events.push(Event::ObstaclePlaced {
            obstacle,
            kind,
            region,
        });
        if kind.blocks_movement() {
            for tile in region.tiles() {
                self.block_tile(tile, out_events);
            }
        }
    }

    fn check_placement(&self, kind: ObstacleKind, region: &TileRect) -> Result<(), PlacementError> {
        if !self.blocks.grid().contains_rect(region) {
            return Err(PlacementError::OutOfBounds);
        }
        if self.blocks.is_rect_blocked(region) || self.obstacles.overlaps(region) {
            return Err(PlacementError::Occupied);
        }
        // the footprint as a whole has to leave one completed route open
        if kind.blocks_movement() && self.pool.is_region_critical(region) {
            return Err(PlacementError::SealsRoute);
        }
        Ok(())
    }

    fn remove_obstacle(&mut self, obstacle: ObstacleId, out_events: &mut Vec<Event>) {
        let Some(removed) = self.obstacles.remove(obstacle) else {
            out_events.push(Event::ObstacleRemovalRejected {
                obstacle,
                reason: RemovalError::MissingObstacle,
            });
            return;
        };

        out_events.push(Event::ObstacleRemoved {
            obstacle,
            region: removed.region,
        });
        if removed.kind.blocks_movement() {
            for tile in removed.region.tiles() {
                self.unblock_tile(tile, out_events);
            }
        }
    }

    fn spawn_agent(&mut self, out_events: &mut Vec<Event>) {
        let path = self.pool.acquire_path(&self.blocks.view());
        let Some(tile) = self.pool.path(path).map(|pooled| pooled.start()) else {
            return;
        };

        let agent = self.next_agent_id;
        self.next_agent_id = AgentId::new(agent.get().wrapping_add(1));
        let target = self.pool.path(path).and_then(|pooled| pooled.next_waypoint(tile));
        self.agents.push(Agent {
            id: agent,
            tile,
            path,
            target,
            accumulator: Duration::ZERO,
        });
        out_events.push(Event::AgentSpawned { agent, path, tile });
    }

    fn step_agent(&mut self, agent: AgentId, out_events: &mut Vec<Event>) {
        let Some(index) = self.agents.iter().position(|candidate| candidate.id == agent) else {
            return;
        };
        if self.agents[index].accumulator < self.step_interval {
            return;
        }

        match self.decide_step(&self.agents[index]) {
            StepDecision::Wait => {
                let waiting = &mut self.agents[index];
                waiting.accumulator = waiting.accumulator.min(self.step_interval);
                out_events.push(Event::AgentWaiting { agent });
            }
            StepDecision::Reroute => {
                let tile = self.agents[index].tile;
                let (path, waypoint) = self.pool.acquire_partial_path(tile, &self.blocks.view());
                let rerouted = &mut self.agents[index];
                rerouted.path = path;
                rerouted.target = (waypoint != tile).then_some(waypoint);
                debug!("agent {agent:?} rerouted onto {path:?} toward {waypoint:?}");
                out_events.push(Event::AgentRerouted {
                    agent,
                    path,
                    waypoint,
                });
            }
            StepDecision::Advance(to) => {
                let moving = &mut self.agents[index];
                let from = moving.tile;
                moving.tile = to;
                moving.accumulator = moving.accumulator.saturating_sub(self.step_interval);
                moving.target = self
                    .pool
                    .path(moving.path)
                    .and_then(|pooled| pooled.next_waypoint(to));
                if self.blocks.grid().contains(to) {
                    self.heat.record_crossing(from, to);
                }
                out_events.push(Event::AgentAdvanced { agent, from, to });

                if to.is_goal() {
                    let _ = self.agents.remove(index);
                    self.agents_exited = self.agents_exited.saturating_add(1);
                    out_events.push(Event::AgentExited { agent });
                }
            }
        }
    }

    fn decide_step(&self, agent: &Agent) -> StepDecision {
        let Some(path) = self.pool.path(agent.path) else {
            return StepDecision::Reroute;
        };
        match path.status() {
            PathStatus::Complete => {}
            PathStatus::Searching => return StepDecision::Wait,
            // enclosed agents wait for an unblock to retry their own search
            PathStatus::Unreachable if path.start() == agent.tile => return StepDecision::Wait,
            PathStatus::Unreachable => return StepDecision::Reroute,
        }

        let target = path.next_waypoint(agent.tile).or_else(|| {
            agent
                .target
                .filter(|target| target.touches(agent.tile) && path.contains(*target))
        });
        match target {
            Some(target) if !self.blocks.is_blocked(target) => StepDecision::Advance(target),
            _ => StepDecision::Reroute,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn push_path_changes(changes: Vec<PathChange>, out_events: &mut Vec<Event>) {
    for change in changes {
        out_events.push(match change.kind {
            PathChangeKind::Repaired => Event::PathRepaired { path: change.path },
            PathChangeKind::Reset => Event::PathReset { path: change.path },
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureLevel { grid, blocked } => {
            world.configure_level(grid, blocked);
            out_events.push(Event::LevelConfigured { grid });
        }
        Command::PrecomputePaths { count } => {
            world.pool.precompute(count, &world.blocks.view());
        }
        Command::ConfigureAgentStep { step_interval } => {
            world.step_interval = step_interval;
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            for agent in &mut world.agents {
                agent.accumulator = agent.accumulator.saturating_add(dt);
            }
            world.advance_search(out_events);
        }
        Command::BlockTile { tile } => world.block_tile(tile, out_events),
        Command::UnblockTile { tile } => world.unblock_tile(tile, out_events),
        Command::BlockRect { rect } => {
            for tile in rect.tiles() {
                world.block_tile(tile, out_events);
            }
        }
        Command::UnblockRect { rect } => {
            for tile in rect.tiles() {
                world.unblock_tile(tile, out_events);
            }
        }
        Command::PlaceObstacle { kind, origin } => world.place_obstacle(kind, origin, out_events),
        Command::RemoveObstacle { obstacle } => world.remove_obstacle(obstacle, out_events),
        Command::SpawnAgent => world.spawn_agent(out_events),
        Command::StepAgent { agent } => world.step_agent(agent, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use lane_defence_core::{
        AgentSnapshot, AgentView, BlockView, ObstacleId, ObstacleKind, PathId, PathStatus, Tile,
        TileGrid, TileRect,
    };
    use lane_defence_system_pathfinding::Path;

    use super::World;

    /// Dimensions of the active level.
    #[must_use]
    pub fn tile_grid(world: &World) -> TileGrid {
        world.blocks.grid()
    }

    /// Read-only view of the blocked tiles.
    #[must_use]
    pub fn block_view(world: &World) -> BlockView<'_> {
        world.blocks.view()
    }

    /// Reports whether the tile is blocked; tiles outside the grid read as open.
    #[must_use]
    pub fn is_blocked(world: &World, tile: Tile) -> bool {
        world.blocks.is_blocked(tile)
    }

    /// Reports whether the tile containing the world point is blocked.
    #[must_use]
    pub fn is_point_blocked(world: &World, x: i32, y: i32) -> bool {
        world.blocks.is_point_blocked(x, y)
    }

    /// Reports whether any tile of the rectangle is blocked.
    #[must_use]
    pub fn is_rect_blocked(world: &World, rect: &TileRect) -> bool {
        world.blocks.is_rect_blocked(rect)
    }

    /// Reports whether any tile touched by the world-space rectangle is blocked.
    #[must_use]
    pub fn is_world_rect_blocked(world: &World, x: i32, y: i32, width: u32, height: u32) -> bool {
        world.blocks.is_world_rect_blocked(x, y, width, height)
    }

    /// Reports whether blocking the tile would cut every completed full path.
    #[must_use]
    pub fn is_tile_critical(world: &World, tile: Tile) -> bool {
        world.pool.is_tile_critical(tile)
    }

    /// Looks up a pooled path.
    #[must_use]
    pub fn path(world: &World, path: PathId) -> Option<&Path> {
        world.pool.path(path)
    }

    /// Waypoint that follows `current` on the path, once the path is complete.
    #[must_use]
    pub fn next_waypoint(world: &World, path: PathId, current: Tile) -> Option<Tile> {
        world.pool.path(path)?.next_waypoint(current)
    }

    /// Number of completed full paths passing through the tile.
    #[must_use]
    pub fn point_usage(world: &World, tile: Tile) -> u32 {
        world.pool.point_usage(tile)
    }

    /// Number of agent crossings recorded into the tile.
    #[must_use]
    pub fn heat(world: &World, tile: Tile) -> u64 {
        world.heat.count(tile)
    }

    /// The `n` tiles agents crossed most often.
    #[must_use]
    pub fn hottest_tiles(world: &World, n: usize) -> Vec<(Tile, u64)> {
        world.heat.top(n)
    }

    /// Tallies pooled paths by lifecycle state.
    #[must_use]
    pub fn path_summary(world: &World) -> PathSummary {
        world
            .pool
            .iter()
            .fold(PathSummary::default(), |mut summary, path| {
                match path.status() {
                    PathStatus::Searching => summary.searching += 1,
                    PathStatus::Complete => summary.complete += 1,
                    PathStatus::Unreachable => summary.unreachable += 1,
                }
                summary
            })
    }

    /// Captures a read-only view of the agents in the level.
    #[must_use]
    pub fn agent_view(world: &World) -> AgentView {
        let snapshots = world
            .agents
            .iter()
            .map(|agent| AgentSnapshot {
                id: agent.id,
                tile: agent.tile,
                path: agent.path,
                target: agent.target,
                ready_for_step: agent.accumulator >= world.step_interval,
                accumulated: agent.accumulator,
            })
            .collect();
        AgentView::from_snapshots(snapshots)
    }

    /// Number of agents that crossed the left edge since the level started.
    #[must_use]
    pub fn agents_exited(world: &World) -> u64 {
        world.agents_exited
    }

    /// Simulated time an agent must accumulate between steps.
    #[must_use]
    pub fn step_interval(world: &World) -> Duration {
        world.step_interval
    }

    /// Obstacles currently placed, ordered by identifier.
    #[must_use]
    pub fn obstacles(world: &World) -> Vec<ObstacleSnapshot> {
        world
            .obstacles
            .iter()
            .map(|obstacle| ObstacleSnapshot {
                id: obstacle.id,
                kind: obstacle.kind,
                region: obstacle.region,
            })
            .collect()
    }

    /// Number of pooled paths in each lifecycle state.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct PathSummary {
        /// Paths whose search is still running.
        pub searching: usize,
        /// Paths with completed waypoints.
        pub complete: usize,
        /// Paths that exhausted their frontier.
        pub unreachable: usize,
    }

    /// Read-only description of a placed obstacle.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ObstacleSnapshot {
        /// Identifier assigned by the world.
        pub id: ObstacleId,
        /// Type of the obstacle.
        pub kind: ObstacleKind,
        /// Tiles covered by the obstacle.
        pub region: TileRect,
    }
}

#[derive(Clone, Debug)]
struct Agent {
    id: AgentId,
    tile: Tile,
    path: PathId,
    target: Option<Tile>,
    accumulator: Duration,
}

enum StepDecision {
    Wait,
    Reroute,
    Advance(Tile),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(columns: u32, rows: u32, blocked: Vec<Tile>) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureLevel {
                grid: TileGrid::new(columns, rows, 32),
                blocked,
            },
            &mut events,
        );
        world
    }

    #[test]
    fn configure_level_replaces_grid_and_blocks() {
        let world = configured(6, 4, vec![Tile::new(2, 2), Tile::new(9, 9)]);

        assert_eq!(query::tile_grid(&world), TileGrid::new(6, 4, 32));
        assert!(query::is_blocked(&world, Tile::new(2, 2)));
        assert!(!query::is_blocked(&world, Tile::new(9, 9)));
        assert_eq!(query::path_summary(&world), query::PathSummary::default());
    }

    #[test]
    fn blocking_twice_only_notifies_once() {
        let mut world = configured(6, 4, Vec::new());
        let mut events = Vec::new();

        apply(&mut world, Command::BlockTile { tile: Tile::new(1, 1) }, &mut events);
        apply(&mut world, Command::BlockTile { tile: Tile::new(1, 1) }, &mut events);

        assert_eq!(events, vec![Event::TileBlocked { tile: Tile::new(1, 1) }]);
    }

    #[test]
    fn tick_advances_one_search_step() {
        let mut world = configured(3, 1, Vec::new());
        let mut events = Vec::new();
        apply(&mut world, Command::PrecomputePaths { count: 1 }, &mut events);

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced {
                    dt: Duration::from_millis(16)
                },
                Event::PathCompleted {
                    path: PathId::new(0)
                },
            ]
        );
    }

    #[test]
    fn agents_are_not_stepped_before_their_interval() {
        let mut world = configured(3, 1, Vec::new());
        let mut events = Vec::new();
        apply(&mut world, Command::SpawnAgent, &mut events);
        let agent = query::agent_view(&world).iter().next().map(|snapshot| snapshot.id);
        let agent = agent.expect("spawned agent");
        events.clear();

        apply(&mut world, Command::StepAgent { agent }, &mut events);

        assert!(events.is_empty());
    }
}
