//! Time-sliced A* search toward the left edge of the level.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap, HashSet},
};

use lane_defence_core::{BlockView, PathStatus, PathfindingConfig, Tile};

use crate::{
    neighbors::neighbors,
    repair::{self, RepairOutcome},
    usage::PointUsage,
};

/// Result of advancing a search by one bounded step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The expansion budget ran out before a goal tile was reached.
    Pending,
    /// A goal tile was reached and the waypoints are available.
    Complete,
    /// The frontier emptied without reaching any goal tile.
    Unreachable,
}

/// A single path's search, advanced incrementally across ticks.
///
/// The search maps only exist while searching; completion replaces them with
/// the waypoint sequence, and only [`SearchState::reset`] goes back.
#[derive(Clone, Debug)]
pub struct SearchState {
    start: Tile,
    phase: SearchPhase,
}

#[derive(Clone, Debug)]
enum SearchPhase {
    Searching(Frontier),
    Complete(Vec<Tile>),
    Unreachable,
}

impl SearchState {
    /// Creates a search that begins at `start`.
    #[must_use]
    pub fn new(start: Tile, config: &PathfindingConfig) -> Self {
        Self {
            start,
            phase: SearchPhase::Searching(Frontier::seeded(start, config)),
        }
    }

    /// Tile the search expands from.
    #[must_use]
    pub const fn start(&self) -> Tile {
        self.start
    }

    /// Lifecycle state of the search.
    #[must_use]
    pub fn status(&self) -> PathStatus {
        match self.phase {
            SearchPhase::Searching(_) => PathStatus::Searching,
            SearchPhase::Complete(_) => PathStatus::Complete,
            SearchPhase::Unreachable => PathStatus::Unreachable,
        }
    }

    /// Ordered waypoints from start to goal, once the search completed.
    #[must_use]
    pub fn waypoints(&self) -> Option<&[Tile]> {
        match &self.phase {
            SearchPhase::Complete(waypoints) => Some(waypoints),
            _ => None,
        }
    }

    /// Reports whether an in-flight search has already opened or visited the tile.
    #[must_use]
    pub fn touches(&self, tile: Tile) -> bool {
        match &self.phase {
            SearchPhase::Searching(frontier) => {
                frontier.open.contains(&tile) || frontier.closed.contains(&tile)
            }
            _ => false,
        }
    }

    /// Pops at most `expansions_per_step` frontier entries.
    pub fn step(
        &mut self,
        view: &BlockView<'_>,
        usage: &PointUsage,
        config: &PathfindingConfig,
    ) -> StepOutcome {
        let expansion = match &mut self.phase {
            SearchPhase::Searching(frontier) => frontier.expand(view, usage, config),
            SearchPhase::Complete(_) => return StepOutcome::Complete,
            SearchPhase::Unreachable => return StepOutcome::Unreachable,
        };

        match expansion {
            Expansion::Pending => StepOutcome::Pending,
            Expansion::Reached(waypoints) => {
                self.phase = SearchPhase::Complete(waypoints);
                StepOutcome::Complete
            }
            Expansion::Exhausted => {
                self.phase = SearchPhase::Unreachable;
                StepOutcome::Unreachable
            }
        }
    }

    /// Discards all progress and searches again from the start tile.
    pub fn reset(&mut self, config: &PathfindingConfig) {
        self.phase = SearchPhase::Searching(Frontier::seeded(self.start, config));
    }

    /// Patches completed waypoints around a newly blocked tile, or widens
    /// diagonal steps that cut past it when it is not a waypoint.
    ///
    /// Searching and unreachable states are left untouched.
    pub(crate) fn repair(&mut self, blocked: Tile, view: &BlockView<'_>) -> RepairOutcome {
        let SearchPhase::Complete(waypoints) = &mut self.phase else {
            return RepairOutcome::Untouched;
        };
        match repair::repair(waypoints, blocked, view) {
            RepairOutcome::Untouched => repair::widen(waypoints, blocked, view),
            outcome => outcome,
        }
    }
}

enum Expansion {
    Pending,
    Reached(Vec<Tile>),
    Exhausted,
}

#[derive(Clone, Debug)]
struct Frontier {
    queue: BinaryHeap<Reverse<QueueEntry>>,
    open: HashSet<Tile>,
    closed: HashSet<Tile>,
    scores: HashMap<Tile, u32>,
    came_from: HashMap<Tile, Tile>,
    sequence: u64,
    cheapest_move: u32,
}

/// Heap entry ordered by priority, then insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry {
    priority: u32,
    sequence: u64,
    score: u32,
    tile: Tile,
}

impl Frontier {
    fn seeded(start: Tile, config: &PathfindingConfig) -> Self {
        let mut frontier = Self {
            queue: BinaryHeap::new(),
            open: HashSet::new(),
            closed: HashSet::new(),
            scores: HashMap::new(),
            came_from: HashMap::new(),
            sequence: 0,
            cheapest_move: config.cheapest_move(),
        };
        let _ = frontier.open.insert(start);
        let _ = frontier.scores.insert(start, 0);
        frontier.push(start, 0);
        frontier
    }

    fn expand(
        &mut self,
        view: &BlockView<'_>,
        usage: &PointUsage,
        config: &PathfindingConfig,
    ) -> Expansion {
        for _ in 0..config.expansions_per_step {
            let Some(Reverse(entry)) = self.queue.pop() else {
                return Expansion::Exhausted;
            };

            // superseded by a cheaper push or already expanded
            if self.closed.contains(&entry.tile) || self.scores.get(&entry.tile) != Some(&entry.score)
            {
                continue;
            }

            if entry.tile.is_goal() {
                return Expansion::Reached(self.trace(entry.tile));
            }

            let _ = self.open.remove(&entry.tile);
            let _ = self.closed.insert(entry.tile);

            for neighbor in neighbors(entry.tile, view) {
                if self.closed.contains(&neighbor) {
                    continue;
                }

                let score = entry
                    .score
                    .saturating_add(move_cost(entry.tile, neighbor, usage, config));
                let improves = self
                    .scores
                    .get(&neighbor)
                    .map_or(true, |known| score < *known);
                if improves {
                    let _ = self.scores.insert(neighbor, score);
                    let _ = self.came_from.insert(neighbor, entry.tile);
                    let _ = self.open.insert(neighbor);
                    self.push(neighbor, score);
                }
            }
        }

        Expansion::Pending
    }

    fn push(&mut self, tile: Tile, score: u32) {
        let priority = score.saturating_add(self.heuristic(tile));
        self.queue.push(Reverse(QueueEntry {
            priority,
            sequence: self.sequence,
            score,
            tile,
        }));
        self.sequence = self.sequence.wrapping_add(1);
    }

    /// Cheapest possible remaining cost: one move per column left of the tile.
    fn heuristic(&self, tile: Tile) -> u32 {
        if tile.is_goal() {
            return 0;
        }
        let columns_to_goal = u32::try_from(tile.column()).unwrap_or(0).saturating_add(1);
        columns_to_goal.saturating_mul(self.cheapest_move)
    }

    fn trace(&self, goal: Tile) -> Vec<Tile> {
        let mut waypoints = vec![goal];
        let mut current = goal;
        while let Some(previous) = self.came_from.get(&current) {
            current = *previous;
            waypoints.push(current);
        }
        waypoints.reverse();
        waypoints
    }
}

fn move_cost(from: Tile, to: Tile, usage: &PointUsage, config: &PathfindingConfig) -> u32 {
    let base = if from.is_diagonal_to(to) {
        config.diagonal_cost
    } else {
        config.straight_cost
    };
    base.saturating_add(usage.count(to))
}
