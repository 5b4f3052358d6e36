//! Bounded local patching of completed paths around a newly blocked tile.

use lane_defence_core::{BlockView, Tile};

use crate::neighbors::{neighbors, Neighbors};

/// Result of attempting to patch a path around a blocked waypoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepairOutcome {
    /// The blocked tile is not one of the path's waypoints.
    Untouched,
    /// The neighbouring waypoints touch, so the blocked waypoint was dropped.
    Removed,
    /// The blocked waypoint was swapped for a tile both neighbours reach.
    Replaced,
    /// The blocked waypoint was swapped for a two-tile detour.
    Bridged,
    /// A diagonal step past the blocked tile was split into two straight steps.
    Widened,
    /// No local patch exists; the path needs a full search.
    Exhausted,
}

/// Patches `waypoints` so they avoid `blocked`, if a cheap local fix exists.
///
/// The first and last waypoints are never patched. The search is greedy and
/// bounded to two hops around the blocked waypoint, so the patched route is
/// valid but not necessarily shortest.
pub fn repair(waypoints: &mut Vec<Tile>, blocked: Tile, view: &BlockView<'_>) -> RepairOutcome {
    let Some(index) = waypoints.iter().position(|tile| *tile == blocked) else {
        return RepairOutcome::Untouched;
    };
    let outcome = replace_waypoint(waypoints, index, view);
    if outcome == RepairOutcome::Exhausted || widen_corners(waypoints, blocked, view).is_none() {
        return RepairOutcome::Exhausted;
    }

    collapse_loops(waypoints);
    outcome
}

/// Splits diagonal steps that cut past `blocked` into two straight steps
/// through the other corner.
pub fn widen(waypoints: &mut Vec<Tile>, blocked: Tile, view: &BlockView<'_>) -> RepairOutcome {
    match widen_corners(waypoints, blocked, view) {
        Some(true) => {
            collapse_loops(waypoints);
            RepairOutcome::Widened
        }
        Some(false) => RepairOutcome::Untouched,
        None => RepairOutcome::Exhausted,
    }
}

/// Reports whether the diagonal step `from -> to` passes the corner of `tile`.
#[must_use]
pub fn cuts_corner(from: Tile, to: Tile, tile: Tile) -> bool {
    from.is_diagonal_to(to) && corners(from, to).contains(&tile)
}

fn corners(from: Tile, to: Tile) -> [Tile; 2] {
    [
        Tile::new(to.column(), from.row()),
        Tile::new(from.column(), to.row()),
    ]
}

fn replace_waypoint(
    waypoints: &mut Vec<Tile>,
    index: usize,
    view: &BlockView<'_>,
) -> RepairOutcome {
    if index == 0 || index + 1 >= waypoints.len() {
        return RepairOutcome::Exhausted;
    }

    let before = waypoints[index - 1];
    let after = waypoints[index + 1];
    let before_neighbors = neighbors(before, view);
    let after_neighbors = neighbors(after, view);

    if before_neighbors.contains(after) {
        let _ = waypoints.remove(index);
        RepairOutcome::Removed
    } else if let Some(common) = before_neighbors
        .as_tiles()
        .find(|tile| after_neighbors.contains(*tile))
    {
        waypoints[index] = common;
        RepairOutcome::Replaced
    } else if let Some((first, second)) = find_bridge(&before_neighbors, &after_neighbors, view) {
        waypoints[index] = first;
        waypoints.insert(index + 1, second);
        RepairOutcome::Bridged
    } else {
        RepairOutcome::Exhausted
    }
}

/// Returns `None` when the other corner is blocked too, otherwise whether
/// anything changed.
fn widen_corners(waypoints: &mut Vec<Tile>, blocked: Tile, view: &BlockView<'_>) -> Option<bool> {
    let mut widened = false;
    let mut index = 0;
    while index + 1 < waypoints.len() {
        let (from, to) = (waypoints[index], waypoints[index + 1]);
        if cuts_corner(from, to, blocked) {
            let corner = corners(from, to).into_iter().find(|tile| *tile != blocked)?;
            if view.is_blocked(corner) {
                return None;
            }
            waypoints.insert(index + 1, corner);
            widened = true;
        }
        index += 1;
    }
    Some(widened)
}

fn find_bridge(
    before_neighbors: &Neighbors,
    after_neighbors: &Neighbors,
    view: &BlockView<'_>,
) -> Option<(Tile, Tile)> {
    before_neighbors.as_tiles().find_map(|first| {
        neighbors(first, view)
            .find(|second| after_neighbors.contains(*second))
            .map(|second| (first, second))
    })
}

/// Cuts out any stretch between two visits of the same tile.
///
/// A splice may reuse a tile that already appears elsewhere on the path;
/// looking waypoints up by position would then cycle forever.
fn collapse_loops(waypoints: &mut Vec<Tile>) {
    let mut index = 0;
    while index < waypoints.len() {
        let tile = waypoints[index];
        if let Some(offset) = waypoints[index + 1..].iter().rposition(|other| *other == tile) {
            let _ = waypoints.drain(index + 1..=index + 1 + offset);
        }
        index += 1;
    }
}
