use std::collections::HashMap;

use lane_defence_core::{BlockView, PathKind, PathStatus, PathfindingConfig, Tile, TileGrid};
use lane_defence_system_pathfinding::{neighbors, PathChangeKind, PathPool};

struct Level {
    grid: TileGrid,
    cells: Vec<bool>,
}

impl Level {
    fn open(columns: u32, rows: u32) -> Self {
        let grid = TileGrid::new(columns, rows, 32);
        Self {
            grid,
            cells: vec![false; grid.tile_count()],
        }
    }

    fn set(&mut self, tile: Tile, blocked: bool) {
        let index = self.grid.index(tile).expect("tile inside grid");
        self.cells[index] = blocked;
    }

    fn view(&self) -> BlockView<'_> {
        BlockView::new(&self.cells, self.grid)
    }
}

fn settle(pool: &mut PathPool, view: &BlockView<'_>) {
    for _ in 0..10_000 {
        if pool.advance_one_step(view).is_none() {
            return;
        }
    }
    panic!("pool did not settle");
}

fn assert_valid_route(waypoints: &[Tile], view: &BlockView<'_>) {
    assert!(waypoints.last().is_some_and(|tile| tile.column() < 0));
    assert!(waypoints.windows(2).all(|pair| pair[0].touches(pair[1])));
    assert!(waypoints.iter().all(|tile| !view.is_blocked(*tile)));
}

#[test]
fn completed_paths_reach_goal_around_blocks() {
    let mut level = Level::open(12, 8);
    for row in 0..6 {
        level.set(Tile::new(5, row), true);
    }
    let mut pool = PathPool::new(level.grid, PathfindingConfig::default());
    pool.precompute(6, &level.view());

    settle(&mut pool, &level.view());

    assert_eq!(pool.len(), 6);
    for path in pool.iter() {
        assert_eq!(path.status(), PathStatus::Complete);
        assert_eq!(path.kind(), PathKind::Full);
        assert_eq!(path.start().column(), 12);
        assert_valid_route(path.waypoints().expect("waypoints"), &level.view());
    }
}

#[test]
fn walls_funnelling_through_corner_make_it_critical() {
    let mut level = Level::open(5, 4);
    for row in 1..4 {
        level.set(Tile::new(1, row), true);
    }
    let mut pool = PathPool::new(level.grid, PathfindingConfig::default());
    pool.precompute(5, &level.view());
    settle(&mut pool, &level.view());

    assert!(pool.is_tile_critical(Tile::new(0, 0)));
    assert!(pool.is_tile_critical(Tile::new(1, 0)));
    assert!(!pool.is_tile_critical(Tile::new(0, 3)));
    assert!(pool.is_tile_critical(Tile::new(2, 0)));
    assert!(!pool.is_tile_critical(Tile::new(1, 2)));
}

#[test]
fn partial_path_from_existing_start_reuses_it() {
    let level = Level::open(8, 6);
    let mut pool = PathPool::new(level.grid, PathfindingConfig::default());
    pool.precompute(3, &level.view());
    let existing = pool.iter().next().map(|path| (path.id(), path.start())).expect("path");

    let (path, waypoint) = pool.acquire_partial_path(existing.1, &level.view());

    assert_eq!(path, existing.0);
    assert_eq!(waypoint, existing.1);
    assert_eq!(pool.len(), 3);
}

#[test]
fn partial_path_joins_neighbouring_route() {
    let level = Level::open(8, 1);
    let mut pool = PathPool::new(level.grid, PathfindingConfig::default());
    pool.precompute(1, &level.view());
    settle(&mut pool, &level.view());
    let full = pool.iter().next().map(|path| path.id()).expect("path");

    // tiles beyond the spawn edge only lead left, onto the path start
    let (path, waypoint) = pool.acquire_partial_path(Tile::new(9, 0), &level.view());

    assert_eq!(path, full);
    assert_eq!(waypoint, Tile::new(8, 0));
    assert_eq!(pool.len(), 1);
}

#[test]
fn blocking_a_waypoint_repairs_or_resets_without_leaving_stale_routes() {
    let mut level = Level::open(10, 10);
    let mut pool = PathPool::new(level.grid, PathfindingConfig::default());
    pool.precompute(4, &level.view());
    settle(&mut pool, &level.view());

    let blocked = pool
        .iter()
        .next()
        .and_then(|path| path.waypoints())
        .map(|waypoints| waypoints[waypoints.len() / 2])
        .expect("waypoint");
    level.set(blocked, true);

    let changes = pool.on_block(blocked, &level.view());

    assert!(!changes.is_empty());
    for change in &changes {
        let path = pool.path(change.path).expect("changed path");
        match change.kind {
            PathChangeKind::Repaired => {
                assert_valid_route(path.waypoints().expect("waypoints"), &level.view());
            }
            PathChangeKind::Reset => assert_eq!(path.status(), PathStatus::Searching),
        }
    }

    settle(&mut pool, &level.view());
    for path in pool.iter() {
        assert_valid_route(path.waypoints().expect("waypoints"), &level.view());
    }
}

#[test]
fn unblocking_retries_unreachable_paths() {
    let mut level = Level::open(5, 3);
    for row in 0..3 {
        level.set(Tile::new(2, row), true);
    }
    let mut pool = PathPool::new(level.grid, PathfindingConfig::default());
    pool.precompute(2, &level.view());
    settle(&mut pool, &level.view());
    assert!(pool.iter().all(|path| path.status() == PathStatus::Unreachable));
    assert!(pool.advance_one_step(&level.view()).is_none());

    level.set(Tile::new(2, 1), false);
    let changes = pool.on_unblock(Tile::new(2, 1));

    assert_eq!(changes.len(), 2);
    assert!(changes.iter().all(|change| change.kind == PathChangeKind::Reset));
    settle(&mut pool, &level.view());
    for path in pool.iter() {
        let waypoints = path.waypoints().expect("waypoints");
        assert!(waypoints.contains(&Tile::new(2, 1)));
        assert_valid_route(waypoints, &level.view());
    }
}

#[test]
fn opening_a_wall_restarts_searches_that_passed_it_by() {
    let mut level = Level::open(8, 3);
    for row in 0..3 {
        level.set(Tile::new(2, row), true);
    }
    let config = PathfindingConfig {
        expansions_per_step: 1,
        ..PathfindingConfig::default()
    };
    let mut pool = PathPool::new(level.grid, config);
    pool.precompute(1, &level.view());
    for _ in 0..13 {
        let _ = pool.advance_one_step(&level.view());
    }
    let path = pool.iter().next().map(|path| path.id()).expect("pooled path");
    assert_eq!(pool.path(path).map(|path| path.status()), Some(PathStatus::Searching));

    level.set(Tile::new(2, 1), false);
    let changes = pool.on_unblock(Tile::new(2, 1));

    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].path, path);
    assert_eq!(changes[0].kind, PathChangeKind::Reset);
    settle(&mut pool, &level.view());
    let waypoints = pool
        .path(path)
        .and_then(|path| path.waypoints())
        .expect("completed path");
    assert!(waypoints.contains(&Tile::new(2, 1)));
    assert_valid_route(waypoints, &level.view());
}

#[test]
fn blocking_a_cut_corner_keeps_routes_legal() {
    let mut level = Level::open(6, 3);
    level.set(Tile::new(3, 0), true);
    level.set(Tile::new(3, 1), true);
    let mut pool = PathPool::new(level.grid, PathfindingConfig::default());
    let (path, _) = pool.acquire_partial_path(Tile::new(5, 0), &level.view());
    settle(&mut pool, &level.view());
    let waypoints = pool
        .path(path)
        .and_then(|path| path.waypoints())
        .map(<[Tile]>::to_vec)
        .expect("completed path");
    let corner = waypoints
        .windows(2)
        .find(|pair| pair[0].is_diagonal_to(pair[1]))
        .map(|pair| Tile::new(pair[1].column(), pair[0].row()))
        .expect("route changes rows diagonally");
    assert!(!waypoints.contains(&corner));

    level.set(corner, true);
    let changes = pool.on_block(corner, &level.view());

    assert_eq!(changes.len(), 1);
    settle(&mut pool, &level.view());
    let view = level.view();
    let waypoints = pool
        .path(path)
        .and_then(|path| path.waypoints())
        .expect("completed path");
    assert_valid_route(waypoints, &view);
    assert!(waypoints
        .windows(2)
        .all(|pair| neighbors(pair[0], &view).contains(pair[1])));
}

#[test]
fn point_usage_never_drops_while_paths_complete() {
    let level = Level::open(8, 6);
    let mut pool = PathPool::new(level.grid, PathfindingConfig::default());
    pool.precompute(5, &level.view());
    let tiles: Vec<Tile> = (-1..=8)
        .flat_map(|column| (0..6).map(move |row| Tile::new(column, row)))
        .collect();
    let mut previous: HashMap<Tile, u32> = HashMap::new();

    while pool.advance_one_step(&level.view()).is_some() {
        for tile in &tiles {
            let count = pool.point_usage(*tile);
            let before = previous.insert(*tile, count).unwrap_or(0);
            assert!(count >= before, "usage of {tile:?} dropped");
        }
    }

    let total: u32 = tiles.iter().map(|tile| pool.point_usage(*tile)).sum();
    assert!(total > 0);
}

#[test]
fn acquire_path_prefers_completed_full_paths() {
    let level = Level::open(8, 6);
    let mut pool = PathPool::new(level.grid, PathfindingConfig::default());
    pool.precompute(3, &level.view());
    settle(&mut pool, &level.view());

    let id = pool.acquire_path(&level.view());

    let path = pool.path(id).expect("acquired path");
    assert_eq!(path.kind(), PathKind::Full);
    assert_eq!(path.status(), PathStatus::Complete);
    assert_eq!(pool.len(), 3);
}

#[test]
fn acquire_path_without_pool_falls_back_to_partial() {
    let level = Level::open(8, 6);
    let mut pool = PathPool::new(level.grid, PathfindingConfig::default());

    let id = pool.acquire_path(&level.view());

    let path = pool.path(id).expect("acquired path");
    assert_eq!(path.kind(), PathKind::Partial);
    assert_eq!(path.start().column(), 8);
}
