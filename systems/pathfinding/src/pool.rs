//! Shared pool of incrementally computed paths.

use lane_defence_core::{
    BlockView, PathId, PathKind, PathStatus, PathfindingConfig, Tile, TileGrid, TileRect,
};
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    neighbors::neighbors,
    repair::{cuts_corner, RepairOutcome},
    search::{SearchState, StepOutcome},
    usage::PointUsage,
};

/// A pooled path shared by every agent that follows it.
#[derive(Clone, Debug)]
pub struct Path {
    id: PathId,
    kind: PathKind,
    search: SearchState,
}

impl Path {
    /// Identifier agents use to look the path up again.
    #[must_use]
    pub const fn id(&self) -> PathId {
        self.id
    }

    /// Whether the path starts on the spawn edge or was created on demand.
    #[must_use]
    pub const fn kind(&self) -> PathKind {
        self.kind
    }

    /// Tile the path begins at.
    #[must_use]
    pub const fn start(&self) -> Tile {
        self.search.start()
    }

    /// Lifecycle state of the underlying search.
    #[must_use]
    pub fn status(&self) -> PathStatus {
        self.search.status()
    }

    /// Reports whether the search has stopped, either complete or unreachable.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status() != PathStatus::Searching
    }

    /// Completed waypoints from start to goal.
    #[must_use]
    pub fn waypoints(&self) -> Option<&[Tile]> {
        self.search.waypoints()
    }

    /// Reports whether the completed path passes through the tile.
    #[must_use]
    pub fn contains(&self, tile: Tile) -> bool {
        self.waypoints()
            .is_some_and(|waypoints| waypoints.contains(&tile))
    }

    /// Whether a diagonal step of the completed path passes the corner of `tile`.
    #[must_use]
    pub fn cuts_corner_at(&self, tile: Tile) -> bool {
        self.waypoints().is_some_and(|waypoints| {
            waypoints
                .windows(2)
                .any(|pair| cuts_corner(pair[0], pair[1], tile))
        })
    }

    /// Waypoint that follows `current`, if `current` lies on the completed path.
    #[must_use]
    pub fn next_waypoint(&self, current: Tile) -> Option<Tile> {
        let waypoints = self.waypoints()?;
        let index = waypoints.iter().position(|tile| *tile == current)?;
        waypoints.get(index + 1).copied()
    }
}

/// How a path was affected by a change of the blocked tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathChangeKind {
    /// The completed waypoints were patched in place.
    Repaired,
    /// The path dropped its progress and searches again.
    Reset,
}

/// Notification that a pooled path changed in response to blocking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathChange {
    /// Path that changed.
    pub path: PathId,
    /// What happened to it.
    pub kind: PathChangeKind,
}

/// Owns every path of the current level and schedules their searches.
///
/// Partial paths sit in front of full paths so that a stranded agent's route
/// is searched before the background pool.
#[derive(Debug)]
pub struct PathPool {
    grid: TileGrid,
    config: PathfindingConfig,
    paths: Vec<Path>,
    usage: PointUsage,
    rng: ChaCha8Rng,
    next_id: u32,
}

impl PathPool {
    /// Creates an empty pool for the provided level geometry.
    #[must_use]
    pub fn new(grid: TileGrid, config: PathfindingConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            grid,
            config,
            paths: Vec::new(),
            usage: PointUsage::default(),
            rng,
            next_id: 0,
        }
    }

    /// Configuration the pool searches with.
    #[must_use]
    pub fn config(&self) -> &PathfindingConfig {
        &self.config
    }

    /// Level geometry the pool searches across.
    #[must_use]
    pub const fn grid(&self) -> TileGrid {
        self.grid
    }

    /// Queues `count` full paths from random open spawn-edge rows.
    pub fn precompute(&mut self, count: usize, view: &BlockView<'_>) {
        for _ in 0..count {
            let start = self.find_start(view);
            let _ = self.insert(PathKind::Full, start);
        }
        info!(
            "queued {count} full paths on a {}x{} grid",
            self.grid.columns(),
            self.grid.rows()
        );
    }

    /// Picks a spawn-edge tile whose in-grid neighbour is open.
    ///
    /// Falls back to any spawn-edge row when every attempt hits a blocked tile.
    pub fn find_start(&mut self, view: &BlockView<'_>) -> Tile {
        let column = self.grid.spawn_column();
        let rows = self.grid.rows().max(1);

        for _ in 0..self.config.start_attempts {
            let row = self.random_row(rows);
            if !view.is_blocked(Tile::new(column - 1, row)) {
                return Tile::new(column, row);
            }
        }

        let row = self.random_row(rows);
        warn!(
            "no open spawn row found after {} attempts, using row {row}",
            self.config.start_attempts
        );
        Tile::new(column, row)
    }

    fn random_row(&mut self, rows: u32) -> i32 {
        i32::try_from(self.rng.gen_range(0..rows)).unwrap_or(0)
    }

    fn insert(&mut self, kind: PathKind, start: Tile) -> PathId {
        let id = PathId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let path = Path {
            id,
            kind,
            search: SearchState::new(start, &self.config),
        };
        match kind {
            PathKind::Full => self.paths.push(path),
            PathKind::Partial => self.paths.insert(0, path),
        }
        id
    }

    /// Advances the first searching path in pool order by one bounded step.
    ///
    /// Returns `None` when no path is searching.
    pub fn advance_one_step(&mut self, view: &BlockView<'_>) -> Option<(PathId, StepOutcome)> {
        let path = self
            .paths
            .iter_mut()
            .find(|path| path.status() == PathStatus::Searching)?;

        let outcome = path.search.step(view, &self.usage, &self.config);
        match outcome {
            StepOutcome::Pending => {}
            StepOutcome::Complete => {
                if let Some(waypoints) = path.search.waypoints() {
                    if path.kind == PathKind::Full {
                        self.usage.add(waypoints);
                    }
                    debug!("path {:?} completed with {} waypoints", path.id, waypoints.len());
                }
            }
            StepOutcome::Unreachable => {
                warn!("path {:?} from {:?} cannot reach the goal", path.id, path.start());
            }
        }

        Some((path.id, outcome))
    }

    /// Hands out a completed full path, or a partial path from a fresh start.
    pub fn acquire_path(&mut self, view: &BlockView<'_>) -> PathId {
        let full: Vec<usize> = self
            .paths
            .iter()
            .enumerate()
            .filter(|(_, path)| path.kind == PathKind::Full)
            .map(|(index, _)| index)
            .collect();

        if !full.is_empty() {
            let spawn_column = self.grid.spawn_column();
            for _ in 0..self.config.acquire_attempts {
                let index = full[self.rng.gen_range(0..full.len())];
                let path = &self.paths[index];
                if path.status() == PathStatus::Complete && path.start().column() == spawn_column {
                    return path.id;
                }
            }
        }

        let start = self.find_start(view);
        let (id, _) = self.acquire_partial_path(start, view);
        id
    }

    /// Finds or creates a path usable by an agent standing on `tile`.
    ///
    /// Returns the path together with the tile the agent should head for.
    /// Unreachable paths are only handed back when one already starts on
    /// `tile`, since a new search from there would fail the same way.
    pub fn acquire_partial_path(&mut self, tile: Tile, view: &BlockView<'_>) -> (PathId, Tile) {
        if let Some(path) = self.paths.iter().find(|path| {
            path.status() != PathStatus::Unreachable
                && (path.contains(tile) || path.start() == tile)
        }) {
            return (path.id, tile);
        }

        for neighbor in neighbors(tile, view) {
            if let Some(path) = self.paths.iter().find(|path| path.contains(neighbor)) {
                return (path.id, neighbor);
            }
        }

        if let Some(path) = self.paths.iter().find(|path| path.start() == tile) {
            return (path.id, tile);
        }

        let id = self.insert(PathKind::Partial, tile);
        debug!("created partial path {id:?} from {tile:?}");
        (id, tile)
    }

    /// Number of completed full paths that pass through the tile.
    #[must_use]
    pub fn point_usage(&self, tile: Tile) -> u32 {
        self.usage.count(tile)
    }

    /// Repairs or resets every path affected by a newly blocked tile.
    pub fn on_block(&mut self, tile: Tile, view: &BlockView<'_>) -> Vec<PathChange> {
        let mut changes = Vec::new();

        for path in &mut self.paths {
            match path.status() {
                PathStatus::Complete if path.contains(tile) || path.cuts_corner_at(tile) => {
                    let counted = path.kind == PathKind::Full;
                    if counted {
                        if let Some(waypoints) = path.search.waypoints() {
                            self.usage.remove(waypoints);
                        }
                    }

                    let kind = match path.search.repair(tile, view) {
                        RepairOutcome::Exhausted | RepairOutcome::Untouched => {
                            path.search.reset(&self.config);
                            debug!("path {:?} reset around {tile:?}", path.id);
                            PathChangeKind::Reset
                        }
                        outcome => {
                            if counted {
                                if let Some(waypoints) = path.search.waypoints() {
                                    self.usage.add(waypoints);
                                }
                            }
                            debug!("path {:?} patched around {tile:?}: {outcome:?}", path.id);
                            PathChangeKind::Repaired
                        }
                    };
                    changes.push(PathChange { path: path.id, kind });
                }
                PathStatus::Searching if path.search.touches(tile) => {
                    path.search.reset(&self.config);
                    debug!("search {:?} restarted after {tile:?} was blocked", path.id);
                    changes.push(PathChange {
                        path: path.id,
                        kind: PathChangeKind::Reset,
                    });
                }
                _ => {}
            }
        }

        changes
    }

    /// Gives unreachable paths another chance after a tile opened up.
    ///
    /// Searches that already opened or closed a tile around the opening
    /// restart too, since their frontier would never look at it again.
    pub fn on_unblock(&mut self, tile: Tile) -> Vec<PathChange> {
        let mut changes = Vec::new();

        for path in &mut self.paths {
            let stale = match path.status() {
                PathStatus::Unreachable => true,
                PathStatus::Searching => surrounding(tile).any(|near| path.search.touches(near)),
                PathStatus::Complete => false,
            };
            if stale {
                path.search.reset(&self.config);
                debug!("path {:?} retried after {tile:?} was unblocked", path.id);
                changes.push(PathChange {
                    path: path.id,
                    kind: PathChangeKind::Reset,
                });
            }
        }

        changes
    }

    /// Reports whether blocking the tile would cut every known route.
    ///
    /// Every completed full path has to pass through the tile, which holds
    /// trivially while no full path is complete.
    #[must_use]
    pub fn is_tile_critical(&self, tile: Tile) -> bool {
        self.completed_full().all(|path| path.contains(tile))
    }

    /// Reports whether blocking every tile of `region` would cut every known
    /// route, even when no single tile of it is critical on its own.
    #[must_use]
    pub fn is_region_critical(&self, region: &TileRect) -> bool {
        self.completed_full()
            .all(|path| region.tiles().any(|tile| path.contains(tile)))
    }

    fn completed_full(&self) -> impl Iterator<Item = &Path> {
        self.paths
            .iter()
            .filter(|path| path.kind == PathKind::Full && path.status() == PathStatus::Complete)
    }

    /// Looks a path up by identifier.
    #[must_use]
    pub fn path(&self, id: PathId) -> Option<&Path> {
        self.paths.iter().find(|path| path.id == id)
    }

    /// Iterates paths in scheduling order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter()
    }

    /// Number of pooled paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Reports whether the pool holds no paths.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Drops every path along with its usage counts.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.usage.clear();
    }
}

/// The tile itself and its eight surrounding tiles.
fn surrounding(tile: Tile) -> impl Iterator<Item = Tile> {
    (-1..=1).flat_map(move |columns| (-1..=1).map(move |rows| tile.offset(columns, rows)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_cells(grid: TileGrid) -> Vec<bool> {
        vec![false; grid.tile_count()]
    }

    #[test]
    fn partial_paths_are_scheduled_first() {
        let grid = TileGrid::new(6, 4, 32);
        let cells = open_cells(grid);
        let view = BlockView::new(&cells, grid);
        let mut pool = PathPool::new(grid, PathfindingConfig::default());
        pool.precompute(2, &view);

        let (partial, waypoint) = pool.acquire_partial_path(Tile::new(3, 2), &view);

        assert_eq!(waypoint, Tile::new(3, 2));
        assert_eq!(pool.iter().next().map(Path::id), Some(partial));
        assert_eq!(pool.iter().next().map(Path::kind), Some(PathKind::Partial));
        assert_eq!(pool.advance_one_step(&view).map(|(id, _)| id), Some(partial));
    }

    #[test]
    fn next_waypoint_follows_completed_route() {
        let grid = TileGrid::new(3, 1, 32);
        let cells = open_cells(grid);
        let view = BlockView::new(&cells, grid);
        let mut pool = PathPool::new(grid, PathfindingConfig::default());
        pool.precompute(1, &view);
        while pool.advance_one_step(&view).is_some() {}

        let path = pool.iter().next().expect("pooled path");

        assert!(path.is_done());
        assert_eq!(path.start(), Tile::new(3, 0));
        assert_eq!(path.next_waypoint(Tile::new(3, 0)), Some(Tile::new(2, 0)));
        assert_eq!(path.next_waypoint(Tile::new(-1, 0)), None);
        assert_eq!(path.next_waypoint(Tile::new(9, 9)), None);
    }

    #[test]
    fn every_tile_is_critical_until_a_full_path_completes() {
        let grid = TileGrid::new(4, 4, 32);
        let cells = open_cells(grid);
        let view = BlockView::new(&cells, grid);
        let mut pool = PathPool::new(grid, PathfindingConfig::default());

        assert!(pool.is_tile_critical(Tile::new(0, 0)));
        pool.precompute(1, &view);
        assert!(pool.is_tile_critical(Tile::new(2, 3)));

        while pool.advance_one_step(&view).is_some() {}

        let path = pool.iter().next().expect("pooled path");
        let on_route = path.waypoints().expect("completed path")[1];
        let off_route = grid_tiles(grid)
            .find(|tile| !path.contains(*tile))
            .expect("tile off the route");
        assert!(pool.is_tile_critical(on_route));
        assert!(!pool.is_tile_critical(off_route));
    }

    fn grid_tiles(grid: TileGrid) -> impl Iterator<Item = Tile> {
        let columns = i32::try_from(grid.columns()).expect("columns fit");
        let rows = i32::try_from(grid.rows()).expect("rows fit");
        (0..rows).flat_map(move |row| (0..columns).map(move |column| Tile::new(column, row)))
    }

    #[test]
    fn clear_drops_paths_and_usage() {
        let grid = TileGrid::new(3, 1, 32);
        let cells = open_cells(grid);
        let view = BlockView::new(&cells, grid);
        let mut pool = PathPool::new(grid, PathfindingConfig::default());
        pool.precompute(1, &view);
        while pool.advance_one_step(&view).is_some() {}
        assert_eq!(pool.point_usage(Tile::new(1, 0)), 1);

        pool.clear();

        assert!(pool.is_empty());
        assert_eq!(pool.point_usage(Tile::new(1, 0)), 0);
    }
}
