#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Incremental, repairable pathfinding toward the left edge of a lane.
//!
//! Searches are time sliced: [`PathPool::advance_one_step`] spends a bounded
//! number of expansions per call so many paths can be maintained without
//! stalling the simulation loop. Completed paths are shared between agents and
//! patched locally when a tile on them becomes blocked.

mod neighbors;
mod pool;
mod repair;
mod search;
mod usage;

pub use neighbors::{neighbors, Neighbors};
pub use pool::{Path, PathChange, PathChangeKind, PathPool};
pub use repair::{cuts_corner, repair, widen, RepairOutcome};
pub use search::{SearchState, StepOutcome};
pub use usage::PointUsage;
