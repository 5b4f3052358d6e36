//! Tile-granularity occupancy grid that decides where agents may stand.

use lane_defence_core::{BlockView, Tile, TileGrid, TileRect};

/// Dense blocked flags for every in-grid tile of the active level.
///
/// Tiles outside the grid always read as open and writes to them are ignored.
#[derive(Clone, Debug)]
pub struct BlockGrid {
    grid: TileGrid,
    cells: Vec<bool>,
}

impl BlockGrid {
    /// Creates a fully open grid with the provided dimensions.
    #[must_use]
    pub fn new(grid: TileGrid) -> Self {
        Self {
            grid,
            cells: vec![false; grid.tile_count()],
        }
    }

    /// Dimensions the grid was created with.
    #[must_use]
    pub const fn grid(&self) -> TileGrid {
        self.grid
    }

    /// Dense index of an in-grid tile.
    #[must_use]
    pub fn index_of(&self, tile: Tile) -> Option<usize> {
        self.grid.index(tile)
    }

    /// Reports whether the tile is blocked.
    #[must_use]
    pub fn is_blocked(&self, tile: Tile) -> bool {
        self.index_of(tile)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Reports whether the tile containing the world point is blocked.
    #[must_use]
    pub fn is_point_blocked(&self, x: i32, y: i32) -> bool {
        self.is_blocked(Tile::from_world(x, y, self.grid.tile_length()))
    }

    /// Blocks the tile, returning whether its state changed.
    pub fn block(&mut self, tile: Tile) -> bool {
        self.set(tile, true)
    }

    /// Unblocks the tile, returning whether its state changed.
    pub fn unblock(&mut self, tile: Tile) -> bool {
        self.set(tile, false)
    }

    fn set(&mut self, tile: Tile, blocked: bool) -> bool {
        let Some(cell) = self.index_of(tile).and_then(|index| self.cells.get_mut(index)) else {
            return false;
        };
        if *cell == blocked {
            return false;
        }
        *cell = blocked;
        true
    }

    /// Reports whether any tile of the rectangle is blocked.
    #[must_use]
    pub fn is_rect_blocked(&self, rect: &TileRect) -> bool {
        rect.tiles().any(|tile| self.is_blocked(tile))
    }

    /// Reports whether any tile touched by the world-space rectangle is blocked.
    #[must_use]
    pub fn is_world_rect_blocked(&self, x: i32, y: i32, width: u32, height: u32) -> bool {
        let rect = TileRect::covering_world_rect(x, y, width, height, self.grid.tile_length());
        self.is_rect_blocked(&rect)
    }

    /// Blocks every tile of the rectangle and returns the ones that changed.
    pub fn block_rect(&mut self, rect: &TileRect) -> Vec<Tile> {
        rect.tiles().filter(|tile| self.block(*tile)).collect()
    }

    /// Unblocks every tile of the rectangle and returns the ones that changed.
    pub fn unblock_rect(&mut self, rect: &TileRect) -> Vec<Tile> {
        rect.tiles().filter(|tile| self.unblock(*tile)).collect()
    }

    /// Number of blocked tiles.
    #[must_use]
    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|blocked| **blocked).count()
    }

    /// Read-only view handed to the pathfinding system.
    #[must_use]
    pub fn view(&self) -> BlockView<'_> {
        BlockView::new(&self.cells, self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::TileRectSize;

    #[test]
    fn block_and_unblock_report_changes() {
        let mut blocks = BlockGrid::new(TileGrid::new(4, 3, 32));
        let tile = Tile::new(2, 1);

        assert!(blocks.block(tile));
        assert!(!blocks.block(tile));
        assert!(blocks.is_blocked(tile));
        assert!(blocks.unblock(tile));
        assert!(!blocks.unblock(tile));
        assert!(!blocks.is_blocked(tile));
    }

    #[test]
    fn out_of_grid_tiles_read_open_and_ignore_writes() {
        let mut blocks = BlockGrid::new(TileGrid::new(4, 3, 32));

        for tile in [Tile::new(-1, 0), Tile::new(4, 0), Tile::new(0, 3), Tile::new(0, -2)] {
            assert!(!blocks.block(tile));
            assert!(!blocks.is_blocked(tile));
            assert_eq!(blocks.index_of(tile), None);
        }
        assert_eq!(blocks.blocked_count(), 0);
    }

    #[test]
    fn world_points_resolve_to_their_tile() {
        let mut blocks = BlockGrid::new(TileGrid::new(10, 10, 32));
        let _ = blocks.block(Tile::new(9, 2));

        assert!(blocks.is_point_blocked(288, 64));
        assert!(blocks.is_point_blocked(319, 95));
        assert!(!blocks.is_point_blocked(287, 64));
    }

    #[test]
    fn rect_helpers_cover_partial_overlap() {
        let mut blocks = BlockGrid::new(TileGrid::new(10, 10, 32));
        let rect = TileRect::from_origin_and_size(Tile::new(1, 1), TileRectSize::new(2, 2));
        let _ = blocks.block(Tile::new(2, 1));

        let changed = blocks.block_rect(&rect);

        assert_eq!(changed, vec![Tile::new(1, 1), Tile::new(1, 2), Tile::new(2, 2)]);
        assert!(blocks.is_rect_blocked(&rect));
        assert!(blocks.is_world_rect_blocked(90, 90, 4, 4));
        assert!(!blocks.is_world_rect_blocked(100, 100, 20, 20));

        let cleared = blocks.unblock_rect(&rect);
        assert_eq!(cleared.len(), 4);
        assert_eq!(blocks.blocked_count(), 0);
    }
}
