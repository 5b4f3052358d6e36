//! Agent traversal counts exposed to external readers.

use std::collections::HashMap;

use lane_defence_core::Tile;

/// Monotonic per-tile counter of agent crossings.
///
/// The counter only grows during a level and is never consulted by the
/// search cost function.
#[derive(Clone, Debug, Default)]
pub struct HeatMap {
    counts: HashMap<Tile, u64>,
}

impl HeatMap {
    /// Records an agent moving from `from` into `to`.
    pub fn record_crossing(&mut self, from: Tile, to: Tile) {
        if from == to {
            return;
        }
        let count = self.counts.entry(to).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Number of crossings recorded into the tile.
    #[must_use]
    pub fn count(&self, tile: Tile) -> u64 {
        self.counts.get(&tile).copied().unwrap_or(0)
    }

    /// The `n` busiest tiles, busiest first and ties ordered by tile.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<(Tile, u64)> {
        let mut ranked: Vec<(Tile, u64)> = self
            .counts
            .iter()
            .map(|(tile, count)| (*tile, *count))
            .collect();
        ranked.sort_by(|left, right| right.1.cmp(&left.1).then(left.0.cmp(&right.0)));
        ranked.truncate(n);
        ranked
    }

    pub(crate) fn clear(&mut self) {
        self.counts.clear();
    }
}
