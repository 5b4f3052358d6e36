#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views such as [`BlockView`] and [`AgentView`], and respond exclusively with
//! new command batches.

mod config;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{ConfigError, PathfindingConfig};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the active level: grid dimensions plus the initially blocked tiles.
    ///
    /// Paths, agents, obstacles and the heat map from the previous level are discarded.
    ConfigureLevel {
        /// Dimensions and tile length of the new level.
        grid: TileGrid,
        /// Tiles that start out blocked, as supplied by the level loader.
        blocked: Vec<Tile>,
    },
    /// Creates the requested number of full paths that start on the spawn edge.
    PrecomputePaths {
        /// Number of full paths to add to the pool.
        count: usize,
    },
    /// Updates the duration an agent must accumulate before attempting another step.
    ConfigureAgentStep {
        /// Minimum simulated time required between successive agent steps.
        step_interval: Duration,
    },
    /// Advances the simulation clock and runs exactly one bounded search step.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Marks a single tile as blocked.
    BlockTile {
        /// Tile that should stop being traversable.
        tile: Tile,
    },
    /// Clears the blocked flag of a single tile.
    UnblockTile {
        /// Tile that should become traversable again.
        tile: Tile,
    },
    /// Marks every tile in the rectangle as blocked.
    BlockRect {
        /// Tile-aligned footprint to block.
        rect: TileRect,
    },
    /// Clears the blocked flag of every tile in the rectangle.
    UnblockRect {
        /// Tile-aligned footprint to unblock.
        rect: TileRect,
    },
    /// Requests placement of an obstacle anchored at the provided origin tile.
    PlaceObstacle {
        /// Type of obstacle to construct.
        kind: ObstacleKind,
        /// Upper-left tile of the obstacle footprint.
        origin: Tile,
    },
    /// Requests removal of an existing obstacle.
    RemoveObstacle {
        /// Identifier of the obstacle targeted for removal.
        obstacle: ObstacleId,
    },
    /// Requests a new agent on a path chosen by the pool.
    SpawnAgent,
    /// Requests that an agent advance toward its next waypoint.
    StepAgent {
        /// Identifier of the agent attempting to move.
        agent: AgentId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a new level became active.
    LevelConfigured {
        /// Grid of the level that was loaded.
        grid: TileGrid,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// A search reached a goal tile and now exposes its waypoints.
    PathCompleted {
        /// Path that finished searching.
        path: PathId,
    },
    /// A search exhausted its frontier without reaching a goal tile.
    PathUnreachable {
        /// Path that can no longer make progress.
        path: PathId,
    },
    /// A completed path was patched locally around a newly blocked tile.
    PathRepaired {
        /// Path whose waypoints changed.
        path: PathId,
    },
    /// A path discarded its progress and restarted from its start tile.
    PathReset {
        /// Path that is searching again.
        path: PathId,
    },
    /// Confirms that a tile changed from traversable to blocked.
    TileBlocked {
        /// Tile that became blocked.
        tile: Tile,
    },
    /// Confirms that a tile changed from blocked to traversable.
    TileUnblocked {
        /// Tile that became traversable.
        tile: Tile,
    },
    /// Confirms that an obstacle was placed into the world.
    ObstaclePlaced {
        /// Identifier assigned to the obstacle by the world.
        obstacle: ObstacleId,
        /// Type of obstacle that was placed.
        kind: ObstacleKind,
        /// Tiles covered by the obstacle.
        region: TileRect,
    },
    /// Confirms that an obstacle was removed from the world.
    ObstacleRemoved {
        /// Identifier of the obstacle that was removed.
        obstacle: ObstacleId,
        /// Tiles previously covered by the obstacle.
        region: TileRect,
    },
    /// Reports that an obstacle placement request was rejected.
    ObstaclePlacementRejected {
        /// Type of obstacle requested for placement.
        kind: ObstacleKind,
        /// Origin tile provided in the placement request.
        origin: Tile,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that an obstacle removal request was rejected.
    ObstacleRemovalRejected {
        /// Identifier of the obstacle targeted for removal.
        obstacle: ObstacleId,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
    /// Confirms that an agent entered the level.
    AgentSpawned {
        /// Identifier assigned to the agent.
        agent: AgentId,
        /// Path the agent follows.
        path: PathId,
        /// Tile the agent occupies after spawning.
        tile: Tile,
    },
    /// Confirms that an agent moved between two tiles.
    AgentAdvanced {
        /// Identifier of the agent that moved.
        agent: AgentId,
        /// Tile the agent left.
        from: Tile,
        /// Tile the agent entered.
        to: Tile,
    },
    /// Reports that a stranded agent switched to another path.
    AgentRerouted {
        /// Identifier of the stranded agent.
        agent: AgentId,
        /// Path the agent follows from now on.
        path: PathId,
        /// Waypoint the agent heads for while the path resolves.
        waypoint: Tile,
    },
    /// Reports that an agent could not move because its path is still searching.
    AgentWaiting {
        /// Identifier of the waiting agent.
        agent: AgentId,
    },
    /// Reports that an agent crossed the left edge and left the level.
    AgentExited {
        /// Identifier of the agent that left.
        agent: AgentId,
    },
}

/// Location of a single tile expressed in whole-tile column and row indices.
///
/// Columns are signed: negative columns lie past the left edge and count as
/// goal tiles, columns at or beyond the grid width form the spawn edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile {
    column: i32,
    row: i32,
}

impl Tile {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column index of the tile.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the tile.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the tile that contains the provided world-space point.
    ///
    /// Flooring division keeps points left of the origin on negative columns,
    /// so `x = -1` maps to column `-1` rather than `0`.
    #[must_use]
    pub fn from_world(x: i32, y: i32, tile_length: u32) -> Self {
        let length = tile_length_i32(tile_length);
        Self::new(x.div_euclid(length), y.div_euclid(length))
    }

    /// World-space position of the tile's upper-left corner.
    #[must_use]
    pub fn world_origin(&self, tile_length: u32) -> (i32, i32) {
        let length = tile_length_i32(tile_length);
        (
            self.column.saturating_mul(length),
            self.row.saturating_mul(length),
        )
    }

    /// Reports whether the tile lies past the left edge of the playable area.
    #[must_use]
    pub const fn is_goal(&self) -> bool {
        self.column < 0
    }

    /// Returns the tile shifted by the provided column and row deltas.
    #[must_use]
    pub const fn offset(&self, columns: i32, rows: i32) -> Self {
        Self::new(
            self.column.saturating_add(columns),
            self.row.saturating_add(rows),
        )
    }

    /// Reports whether `other` is one of the eight tiles surrounding this one.
    #[must_use]
    pub fn touches(&self, other: Tile) -> bool {
        *self != other
            && self.column.abs_diff(other.column) <= 1
            && self.row.abs_diff(other.row) <= 1
    }

    /// Reports whether `other` is a diagonal neighbour of this tile.
    #[must_use]
    pub fn is_diagonal_to(&self, other: Tile) -> bool {
        self.column.abs_diff(other.column) == 1 && self.row.abs_diff(other.row) == 1
    }
}

fn tile_length_i32(tile_length: u32) -> i32 {
    i32::try_from(tile_length).unwrap_or(i32::MAX).max(1)
}

/// Axis-aligned rectangle expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    origin: Tile,
    size: TileRectSize,
}

impl TileRect {
    /// Constructs a rectangle from an origin tile and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: Tile, size: TileRectSize) -> Self {
        Self { origin, size }
    }

    /// Returns the smallest rectangle covering every tile that the world-space
    /// rectangle touches, including partial overlaps.
    ///
    /// Zero-sized rectangles still cover the tile that contains their origin.
    #[must_use]
    pub fn covering_world_rect(x: i32, y: i32, width: u32, height: u32, tile_length: u32) -> Self {
        let origin = Tile::from_world(x, y, tile_length);
        let far_x = x.saturating_add(extent(width));
        let far_y = y.saturating_add(extent(height));
        let far = Tile::from_world(far_x, far_y, tile_length);
        let columns = far.column().abs_diff(origin.column()).saturating_add(1);
        let rows = far.row().abs_diff(origin.row()).saturating_add(1);
        Self::from_origin_and_size(origin, TileRectSize::new(columns, rows))
    }

    /// Upper-left tile that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Tile {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole tiles.
    #[must_use]
    pub const fn size(&self) -> TileRectSize {
        self.size
    }

    /// Reports whether the rectangle covers the provided tile.
    #[must_use]
    pub fn contains(&self, tile: Tile) -> bool {
        let column = i64::from(tile.column()) - i64::from(self.origin.column());
        let row = i64::from(tile.row()) - i64::from(self.origin.row());
        (0..i64::from(self.size.width())).contains(&column)
            && (0..i64::from(self.size.height())).contains(&row)
    }

    /// Reports whether the two rectangles share at least one tile.
    #[must_use]
    pub fn overlaps(&self, other: &TileRect) -> bool {
        self.tiles().any(|tile| other.contains(tile))
    }

    /// Iterates the covered tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        let width = i32::try_from(self.size.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(self.size.height()).unwrap_or(i32::MAX);
        (0..height).flat_map(move |row| {
            (0..width).map(move |column| self.origin.offset(column, row))
        })
    }
}

fn extent(length: u32) -> i32 {
    i32::try_from(length.saturating_sub(1)).unwrap_or(i32::MAX)
}

/// Size of a [`TileRect`] measured in whole tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRectSize {
    width: u32,
    height: u32,
}

impl TileRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Describes the discrete tile layout of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_length: u32,
}

impl TileGrid {
    /// Creates a new tile grid description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, tile_length: u32) -> Self {
        Self {
            columns,
            rows,
            tile_length,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> u32 {
        self.tile_length
    }

    /// Total width of the grid measured in world units.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.columns.saturating_mul(self.tile_length)
    }

    /// Total height of the grid measured in world units.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.rows.saturating_mul(self.tile_length)
    }

    /// Column index of the spawn edge, one past the rightmost in-grid column.
    #[must_use]
    pub fn spawn_column(&self) -> i32 {
        i32::try_from(self.columns).unwrap_or(i32::MAX)
    }

    /// Reports whether the tile lies inside the grid.
    #[must_use]
    pub fn contains(&self, tile: Tile) -> bool {
        self.index(tile).is_some()
    }

    /// Reports whether the row lies inside the grid.
    #[must_use]
    pub fn contains_row(&self, row: i32) -> bool {
        u32::try_from(row).map_or(false, |row| row < self.rows)
    }

    /// Reports whether every tile of the rectangle lies inside the grid.
    #[must_use]
    pub fn contains_rect(&self, rect: &TileRect) -> bool {
        let size = rect.size();
        if size.width() == 0 || size.height() == 0 {
            return false;
        }
        let far = rect.origin().offset(extent(size.width()), extent(size.height()));
        self.contains(rect.origin()) && self.contains(far)
    }

    /// Dense row-major index of an in-grid tile, derived from the real column count.
    #[must_use]
    pub fn index(&self, tile: Tile) -> Option<usize> {
        let column = u32::try_from(tile.column()).ok()?;
        let row = u32::try_from(tile.row()).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Number of in-grid tiles.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(0)
    }
}

/// Read-only view into the dense blocked-tile grid.
#[derive(Clone, Copy, Debug)]
pub struct BlockView<'a> {
    cells: &'a [bool],
    grid: TileGrid,
}

impl<'a> BlockView<'a> {
    /// Captures a new block view backed by the provided row-major flags.
    #[must_use]
    pub fn new(cells: &'a [bool], grid: TileGrid) -> Self {
        Self { cells, grid }
    }

    /// Reports whether the tile is blocked. Off-grid tiles are never blocked.
    #[must_use]
    pub fn is_blocked(&self, tile: Tile) -> bool {
        self.grid
            .index(tile)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Grid the view describes.
    #[must_use]
    pub const fn grid(&self) -> TileGrid {
        self.grid
    }
}

/// Stable identifier of a path owned by the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathId(u32);

impl PathId {
    /// Creates a new path identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the path identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the agent identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a placed obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(u32);

impl ObstacleId {
    /// Creates a new obstacle identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the obstacle identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Distinguishes precomputed spawn-edge paths from on-demand rescue paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathKind {
    /// Starts on the spawn edge and is eligible for normal agent assignment.
    Full,
    /// Created from an arbitrary tile to unstick an agent.
    Partial,
}

/// Lifecycle state of a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathStatus {
    /// The search is still running across ticks.
    Searching,
    /// The path reached a goal tile and exposes its waypoints.
    Complete,
    /// The frontier emptied before any goal tile was reached.
    Unreachable,
}

/// Types of obstacles that can be placed in the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Single-tile defensive tower.
    Turret,
    /// Fortified two-by-two emplacement.
    Bunker,
    /// Decorative marker that agents walk over.
    Beacon,
}

impl ObstacleKind {
    /// Reports whether the obstacle stops agents from entering its tiles.
    #[must_use]
    pub const fn blocks_movement(self) -> bool {
        match self {
            Self::Turret | Self::Bunker => true,
            Self::Beacon => false,
        }
    }

    /// Footprint of the obstacle measured in tiles.
    #[must_use]
    pub const fn footprint(self) -> TileRectSize {
        match self {
            Self::Turret | Self::Beacon => TileRectSize::new(1, 1),
            Self::Bunker => TileRectSize::new(2, 2),
        }
    }
}

/// Reasons an obstacle placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The requested footprint extends beyond the configured grid bounds.
    #[error("obstacle footprint extends beyond the grid")]
    OutOfBounds,
    /// The requested footprint overlaps a blocked tile or another obstacle.
    #[error("obstacle footprint overlaps an occupied tile")]
    Occupied,
    /// Blocking the footprint would cut every confirmed route to the goal.
    #[error("obstacle would seal off every confirmed route")]
    SealsRoute,
}

/// Reasons an obstacle removal request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum RemovalError {
    /// No obstacle with the provided identifier exists.
    #[error("no obstacle with the requested identifier exists")]
    MissingObstacle,
}

/// Immutable representation of a single agent's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentSnapshot {
    /// Unique identifier assigned to the agent.
    pub id: AgentId,
    /// Tile currently occupied by the agent.
    pub tile: Tile,
    /// Path the agent follows.
    pub path: PathId,
    /// Waypoint the agent is heading for, if resolved.
    pub target: Option<Tile>,
    /// Indicates whether the agent accrued enough time to advance.
    pub ready_for_step: bool,
    /// Duration accumulated toward the next step.
    pub accumulated: Duration,
}

/// Read-only snapshot describing all agents within the level.
#[derive(Clone, Debug, Default)]
pub struct AgentView {
    snapshots: Vec<AgentSnapshot>,
}

impl AgentView {
    /// Creates a new agent view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AgentSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured agent snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
        self.snapshots.iter()
    }

    /// Number of agents captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no agents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AgentSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_points_floor_into_tiles() {
        assert_eq!(Tile::from_world(288, 64, 32), Tile::new(9, 2));
        assert_eq!(Tile::from_world(319, 95, 32), Tile::new(9, 2));
        assert_eq!(Tile::from_world(-1, 0, 32), Tile::new(-1, 0));
        assert_eq!(Tile::new(9, 2).world_origin(32), (288, 64));
    }

    #[test]
    fn grid_index_uses_real_width() {
        let grid = TileGrid::new(1_500, 3, 32);
        let wide = Tile::new(1_200, 0);
        let next_row = Tile::new(0, 1);
        assert_eq!(grid.index(wide), Some(1_200));
        assert_eq!(grid.index(next_row), Some(1_500));
        assert_ne!(grid.index(wide), grid.index(Tile::new(200, 1)));
        assert_eq!(grid.index(Tile::new(-1, 0)), None);
        assert_eq!(grid.index(Tile::new(1_500, 0)), None);
    }

    #[test]
    fn covering_rect_counts_partial_overlap() {
        let rect = TileRect::covering_world_rect(40, 10, 30, 30, 32);
        assert_eq!(rect.origin(), Tile::new(1, 0));
        assert_eq!(rect.size(), TileRectSize::new(2, 2));
        assert!(rect.contains(Tile::new(2, 1)));
        assert!(!rect.contains(Tile::new(3, 1)));

        let aligned = TileRect::covering_world_rect(64, 64, 32, 32, 32);
        assert_eq!(aligned.size(), TileRectSize::new(1, 1));
    }

    #[test]
    fn rect_tiles_iterate_row_major() {
        let rect = TileRect::from_origin_and_size(Tile::new(3, 4), TileRectSize::new(2, 2));
        let tiles: Vec<Tile> = rect.tiles().collect();
        assert_eq!(
            tiles,
            vec![
                Tile::new(3, 4),
                Tile::new(4, 4),
                Tile::new(3, 5),
                Tile::new(4, 5),
            ]
        );
    }

    #[test]
    fn grid_rejects_rects_hanging_off_the_edge() {
        let grid = TileGrid::new(4, 4, 32);
        let inside = TileRect::from_origin_and_size(Tile::new(2, 2), TileRectSize::new(2, 2));
        let outside = TileRect::from_origin_and_size(Tile::new(3, 3), TileRectSize::new(2, 2));
        assert!(grid.contains_rect(&inside));
        assert!(!grid.contains_rect(&outside));
    }

    #[test]
    fn block_view_treats_off_grid_as_open() {
        let grid = TileGrid::new(2, 1, 32);
        let cells = vec![true, false];
        let view = BlockView::new(&cells, grid);
        assert!(view.is_blocked(Tile::new(0, 0)));
        assert!(!view.is_blocked(Tile::new(1, 0)));
        assert!(!view.is_blocked(Tile::new(-1, 0)));
        assert!(!view.is_blocked(Tile::new(0, 7)));
    }

    #[test]
    fn touches_excludes_self_and_distant_tiles() {
        let origin = Tile::new(3, 3);
        assert!(origin.touches(Tile::new(4, 4)));
        assert!(origin.touches(Tile::new(2, 3)));
        assert!(!origin.touches(origin));
        assert!(!origin.touches(Tile::new(5, 3)));
        assert!(origin.is_diagonal_to(Tile::new(2, 2)));
        assert!(!origin.is_diagonal_to(Tile::new(2, 3)));
    }

    #[test]
    fn obstacle_capabilities_are_explicit() {
        assert!(ObstacleKind::Turret.blocks_movement());
        assert!(ObstacleKind::Bunker.blocks_movement());
        assert!(!ObstacleKind::Beacon.blocks_movement());
        assert_eq!(ObstacleKind::Bunker.footprint(), TileRectSize::new(2, 2));
    }

    #[test]
    fn placement_errors_render_messages() {
        assert_eq!(
            PlacementError::SealsRoute.to_string(),
            "obstacle would seal off every confirmed route"
        );
    }
}
