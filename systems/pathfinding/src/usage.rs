//! Completed-path membership counts that drive the crowding penalty.

use std::collections::HashMap;

use lane_defence_core::Tile;

/// Number of completed full paths passing through each tile.
///
/// Distinct from the agent heat map: this counter follows path geometry, not
/// agent movement, and shrinks again when a contributing path is repaired or
/// reset.
#[derive(Clone, Debug, Default)]
pub struct PointUsage {
    counts: HashMap<Tile, u32>,
}

impl PointUsage {
    /// Number of counted paths that include the tile.
    #[must_use]
    pub fn count(&self, tile: Tile) -> u32 {
        self.counts.get(&tile).copied().unwrap_or(0)
    }

    pub(crate) fn add(&mut self, waypoints: &[Tile]) {
        for tile in distinct(waypoints) {
            let count = self.counts.entry(tile).or_insert(0);
            *count = count.saturating_add(1);
        }
    }

    pub(crate) fn remove(&mut self, waypoints: &[Tile]) {
        for tile in distinct(waypoints) {
            if let Some(count) = self.counts.get_mut(&tile) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    let _ = self.counts.remove(&tile);
                }
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.counts.clear();
    }
}

fn distinct(waypoints: &[Tile]) -> impl Iterator<Item = Tile> + '_ {
    waypoints
        .iter()
        .enumerate()
        .filter(|(index, tile)| !waypoints[..*index].contains(*tile))
        .map(|(_, tile)| *tile)
}
