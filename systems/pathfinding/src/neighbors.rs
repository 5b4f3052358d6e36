//! Movement rules shared by the search and the repair engine.

use lane_defence_core::{BlockView, Tile};

/// Returns the tiles an agent standing on `tile` may move to next.
///
/// Tiles at or beyond the spawn column only lead straight left. Every other
/// tile reaches its eight surrounding tiles, minus blocked tiles, rows outside
/// the grid, the spawn column itself, and diagonals that would cut past a
/// blocked orthogonal tile.
#[must_use]
pub fn neighbors(tile: Tile, view: &BlockView<'_>) -> Neighbors {
    let mut neighbors = Neighbors::default();
    let grid = view.grid();
    let spawn_column = grid.spawn_column();

    if tile.column() >= spawn_column {
        let left = tile.offset(-1, 0);
        if !view.is_blocked(left) {
            neighbors.push(left);
        }
        return neighbors;
    }

    for column_delta in -1..=1 {
        for row_delta in -1..=1 {
            if column_delta == 0 && row_delta == 0 {
                continue;
            }

            let candidate = tile.offset(column_delta, row_delta);
            if candidate.column() >= spawn_column || !grid.contains_row(candidate.row()) {
                continue;
            }
            if view.is_blocked(candidate) {
                continue;
            }
            if column_delta != 0 && row_delta != 0 {
                let beside = tile.offset(column_delta, 0);
                let above_or_below = tile.offset(0, row_delta);
                if view.is_blocked(beside) || view.is_blocked(above_or_below) {
                    continue;
                }
            }

            neighbors.push(candidate);
        }
    }

    neighbors
}

/// Fixed-capacity set of up to eight neighbouring tiles.
#[derive(Clone, Debug, Default)]
pub struct Neighbors {
    buffer: [Option<Tile>; 8],
    len: usize,
    cursor: usize,
}

impl Neighbors {
    fn push(&mut self, tile: Tile) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(tile);
            self.len += 1;
        }
    }

    /// Reports whether the tile is one of the collected neighbours.
    #[must_use]
    pub fn contains(&self, tile: Tile) -> bool {
        self.as_tiles().any(|candidate| candidate == tile)
    }

    /// Number of collected neighbours.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Reports whether no neighbour is reachable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates the collected neighbours without consuming the set.
    pub fn as_tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.buffer[..self.len].iter().flatten().copied()
    }
}

impl Iterator for Neighbors {
    type Item = Tile;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}
