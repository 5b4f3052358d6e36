//! Registry of obstacles placed into the level.

use std::collections::BTreeMap;

use lane_defence_core::{ObstacleId, ObstacleKind, TileRect};

/// Obstacle stored inside the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Obstacle {
    pub(crate) id: ObstacleId,
    pub(crate) kind: ObstacleKind,
    pub(crate) region: TileRect,
}

/// Stores obstacles and hands out identifiers.
#[derive(Debug)]
pub(crate) struct ObstacleRegistry {
    entries: BTreeMap<ObstacleId, Obstacle>,
    next_obstacle_id: ObstacleId,
}

impl ObstacleRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_obstacle_id: ObstacleId::new(0),
        }
    }

    pub(crate) fn insert(&mut self, kind: ObstacleKind, region: TileRect) -> ObstacleId {
        let id = self.next_obstacle_id;
        self.next_obstacle_id = ObstacleId::new(id.get().wrapping_add(1));
        let _ = self.entries.insert(id, Obstacle { id, kind, region });
        id
    }

    pub(crate) fn remove(&mut self, id: ObstacleId) -> Option<Obstacle> {
        self.entries.remove(&id)
    }

    /// Reports whether any registered footprint shares a tile with `region`.
    pub(crate) fn overlaps(&self, region: &TileRect) -> bool {
        self.entries
            .values()
            .any(|obstacle| obstacle.region.overlaps(region))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.entries.values()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::{Tile, TileRectSize};

    #[test]
    fn identifiers_are_allocated_sequentially() {
        let mut registry = ObstacleRegistry::new();
        let region = TileRect::from_origin_and_size(Tile::new(0, 0), TileRectSize::new(1, 1));

        let first = registry.insert(ObstacleKind::Turret, region);
        let second = registry.insert(ObstacleKind::Beacon, region);

        assert_eq!(first, ObstacleId::new(0));
        assert_eq!(second, ObstacleId::new(1));
    }

    #[test]
    fn overlap_checks_every_footprint() {
        let mut registry = ObstacleRegistry::new();
        let bunker = TileRect::from_origin_and_size(Tile::new(2, 2), ObstacleKind::Bunker.footprint());
        let id = registry.insert(ObstacleKind::Bunker, bunker);

        let touching = TileRect::from_origin_and_size(Tile::new(3, 3), TileRectSize::new(1, 1));
        let beside = TileRect::from_origin_and_size(Tile::new(4, 2), TileRectSize::new(1, 1));
        assert!(registry.overlaps(&touching));
        assert!(!registry.overlaps(&beside));

        let removed = registry.remove(id).expect("registered obstacle");
        assert_eq!(removed.region, bunker);
        assert!(!registry.overlaps(&touching));
        assert!(registry.remove(id).is_none());
    }
}
