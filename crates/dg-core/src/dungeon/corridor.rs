//! Corridor routing
//!
//! Finds a randomized weighted shortest path between two cells with
//! Dijkstra's algorithm over 4-connected neighbors, then carves it into the
//! grid. Stepping onto a free tile is cheaper than digging through a blocked
//! one, so corridors prefer to reuse rooms and earlier corridors. Every step
//! cost is scaled by a random factor in `[1, 2)`, which gives corridors their
//! wandering texture.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;

use crate::GenError;
use crate::consts::{BLOCKED_STEP_COST, FREE_STEP_COST};
use crate::rng::GameRng;

use super::grid::{ORTHOGONAL, Point, TileGrid};
use super::tileset::Tileset;

/// A routed path from source to target
#[derive(Debug, Clone, PartialEq)]
pub struct CorridorPath {
    /// Cells from source to target inclusive
    pub cells: Vec<Point>,
    /// Sum of the step costs taken
    pub cost: f64,
}

/// Frontier entry; ordered so the max-heap pops the cheapest cell first
#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f64,
    idx: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Whether routing may step onto `p`
fn is_routable(grid: &TileGrid, p: Point) -> bool {
    grid.in_interior(p) && !grid.is_blocked_corner(p)
}

/// Find a path from `from` to `to`.
///
/// Cells on the grid's outer ring and reserved corners are never expanded.
/// Fails with [`GenError::NoPath`] if either endpoint is unroutable or the
/// target cannot be reached.
pub fn find_path(
    grid: &TileGrid,
    tileset: &Tileset,
    from: Point,
    to: Point,
    rng: &mut GameRng,
) -> Result<CorridorPath, GenError> {
    let no_path = GenError::NoPath { from, to };
    if !is_routable(grid, from) || !is_routable(grid, to) {
        return Err(no_path);
    }
    let (Some(source), Some(target)) = (grid.index(from), grid.index(to)) else {
        return Err(no_path);
    };

    let cells = grid.width() * grid.height();
    let mut dist = vec![f64::INFINITY; cells];
    let mut parent: Vec<Option<usize>> = vec![None; cells];
    let mut settled = vec![false; cells];
    let mut frontier = BinaryHeap::new();

    dist[source] = 0.0;
    frontier.push(Frontier {
        cost: 0.0,
        idx: source,
    });

    let mut reached = false;
    while let Some(Frontier { cost, idx }) = frontier.pop() {
        if settled[idx] {
            continue;
        }
        settled[idx] = true;
        if idx == target {
            reached = true;
            break;
        }

        let p = grid.point_at(idx);
        for (dx, dy) in ORTHOGONAL {
            let Some(n) = grid.offset(p, dx, dy) else {
                continue;
            };
            if !is_routable(grid, n) {
                continue;
            }
            let Some(ni) = grid.index(n) else { continue };
            if settled[ni] {
                continue;
            }

            let base = match grid.get(n) {
                Some(t) if tileset.is_free(t) => FREE_STEP_COST,
                _ => BLOCKED_STEP_COST,
            };
            let next = cost + base * rng.jitter();
            if next < dist[ni] {
                dist[ni] = next;
                parent[ni] = Some(idx);
                frontier.push(Frontier { cost: next, idx: ni });
            }
        }
    }

    if !reached {
        return Err(no_path);
    }

    let mut path = vec![to];
    let mut cur = target;
    while let Some(prev) = parent[cur] {
        path.push(grid.point_at(prev));
        cur = prev;
    }
    path.reverse();

    Ok(CorridorPath {
        cells: path,
        cost: dist[target],
    })
}

/// Rewrite every blocked cell on `path` to a random free tile.
/// Returns the number of cells dug.
pub fn carve(
    grid: &mut TileGrid,
    tileset: &Tileset,
    path: &CorridorPath,
    rng: &mut GameRng,
) -> usize {
    let mut dug = 0;
    for &p in path.cells.iter().rev() {
        if grid.get(p).is_some_and(|t| tileset.is_blocked(t)) {
            let tile = tileset.random_free_tile(rng);
            grid.set(p, tile);
            dug += 1;
        }
    }
    dug
}

/// Route and carve a corridor between two cells, returning its cost
pub fn dig_corridor(
    grid: &mut TileGrid,
    tileset: &Tileset,
    from: Point,
    to: Point,
    rng: &mut GameRng,
) -> Result<f64, GenError> {
    let path = find_path(grid, tileset, from, to, rng)?;
    let dug = carve(grid, tileset, &path, rng);
    debug!(
        "corridor ({}, {}) -> ({}, {}): {} cells, {} dug, cost {:.2}",
        from.x,
        from.y,
        to.x,
        to.y,
        path.cells.len(),
        dug,
        path.cost
    );
    Ok(path.cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tileset() -> Tileset {
        Tileset::new(4, 5).unwrap()
    }

    fn is_4_connected(cells: &[Point]) -> bool {
        cells
            .windows(2)
            .all(|w| w[0].x.abs_diff(w[1].x) + w[0].y.abs_diff(w[1].y) == 1)
    }

    #[test]
    fn test_path_on_blank_grid() {
        let ts = tileset();
        let grid = TileGrid::new(12, 12, ts.default_tile());
        let mut rng = GameRng::new(42);
        let from = Point::new(1, 1);
        let to = Point::new(10, 10);

        let path = find_path(&grid, &ts, from, to, &mut rng).unwrap();
        assert_eq!(path.cells.first(), Some(&from));
        assert_eq!(path.cells.last(), Some(&to));
        assert!(is_4_connected(&path.cells));
        assert!(path.cells.iter().all(|&p| grid.in_interior(p)));
        // 18 steps through blocked tiles, each costing in [2, 4)
        assert!(path.cost >= 36.0 && path.cost < 72.0);
    }

    #[test]
    fn test_same_cell_path() {
        let ts = tileset();
        let grid = TileGrid::new(5, 5, ts.default_tile());
        let mut rng = GameRng::new(1);
        let p = Point::new(2, 2);
        let path = find_path(&grid, &ts, p, p, &mut rng).unwrap();
        assert_eq!(path.cells, vec![p]);
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn test_carve_only_changes_blocked_cells() {
        let ts = tileset();
        let mut grid = TileGrid::new(10, 5, ts.default_tile());
        let mut rng = GameRng::new(7);
        for x in 1..9 {
            grid.set(Point::new(x, 2), 1);
        }
        let before = grid.clone();

        let cost = dig_corridor(&mut grid, &ts, Point::new(1, 2), Point::new(8, 2), &mut rng)
            .unwrap();
        assert!(cost > 0.0);
        for idx in 0..grid.tiles().len() {
            let old = before.tiles()[idx];
            let new = grid.tiles()[idx];
            if ts.is_free(old) {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn test_carved_path_is_free() {
        let ts = tileset();
        let mut grid = TileGrid::new(15, 15, ts.default_tile());
        let mut rng = GameRng::new(11);
        let path = find_path(&grid, &ts, Point::new(2, 3), Point::new(12, 11), &mut rng).unwrap();
        let dug = carve(&mut grid, &ts, &path, &mut rng);
        assert_eq!(dug, path.cells.len());
        for &p in &path.cells {
            assert!(ts.is_free(grid.get(p).unwrap()));
        }
        let reach = grid.reachable_from(Point::new(2, 3), &ts);
        assert!(reach.contains(&Point::new(12, 11)));
    }

    #[test]
    fn test_prefers_free_tiles() {
        let ts = tileset();
        let blank = TileGrid::new(12, 7, ts.default_tile());
        let mut open = blank.clone();
        for x in 1..11 {
            open.set(Point::new(x, 3), 0);
        }
        let from = Point::new(1, 3);
        let to = Point::new(10, 3);
        let mut rng = GameRng::new(3);

        // nine free steps cost under 2 each; nine dug steps cost at least 2 each
        let cheap = find_path(&open, &ts, from, to, &mut rng).unwrap();
        let dear = find_path(&blank, &ts, from, to, &mut rng).unwrap();
        assert!(cheap.cost < 18.0);
        assert!(dear.cost >= 18.0);
    }

    #[test]
    fn test_blocked_corner_cuts_only_path() {
        let ts = tileset();
        // the interior is a single row, y = 1
        let mut grid = TileGrid::new(9, 3, ts.default_tile());
        grid.reserve_corner(Point::new(4, 1), &ts);
        let mut rng = GameRng::new(5);

        let err = find_path(&grid, &ts, Point::new(1, 1), Point::new(7, 1), &mut rng).unwrap_err();
        assert_eq!(
            err,
            GenError::NoPath {
                from: Point::new(1, 1),
                to: Point::new(7, 1)
            }
        );
    }

    #[test]
    fn test_route_avoids_corners() {
        let ts = tileset();
        let mut grid = TileGrid::new(9, 5, ts.default_tile());
        grid.reserve_corner(Point::new(4, 2), &ts);
        let mut rng = GameRng::new(5);
        let path = find_path(&grid, &ts, Point::new(1, 2), Point::new(7, 2), &mut rng).unwrap();
        assert!(!path.cells.contains(&Point::new(4, 2)));
        assert!(is_4_connected(&path.cells));
    }

    #[test]
    fn test_unroutable_endpoints() {
        let ts = tileset();
        let mut grid = TileGrid::new(9, 9, ts.default_tile());
        grid.reserve_corner(Point::new(3, 3), &ts);
        let mut rng = GameRng::new(5);
        assert!(find_path(&grid, &ts, Point::new(0, 4), Point::new(5, 5), &mut rng).is_err());
        assert!(find_path(&grid, &ts, Point::new(3, 3), Point::new(5, 5), &mut rng).is_err());
        assert!(find_path(&grid, &ts, Point::new(5, 5), Point::new(20, 5), &mut rng).is_err());
    }

    #[test]
    fn test_jitter_varies_paths() {
        let ts = tileset();
        let grid = TileGrid::new(20, 20, ts.default_tile());
        let mut rng = GameRng::new(99);
        let from = Point::new(2, 2);
        let to = Point::new(17, 17);
        let first = find_path(&grid, &ts, from, to, &mut rng).unwrap();
        let differs = (0..10).any(|_| {
            let again = find_path(&grid, &ts, from, to, &mut rng).unwrap();
            again.cells != first.cells
        });
        assert!(differs);
    }

    #[test]
    fn test_same_seed_same_path() {
        let ts = tileset();
        let grid = TileGrid::new(20, 20, ts.default_tile());
        let from = Point::new(2, 2);
        let to = Point::new(17, 9);
        let a = find_path(&grid, &ts, from, to, &mut GameRng::new(8)).unwrap();
        let b = find_path(&grid, &ts, from, to, &mut GameRng::new(8)).unwrap();
        assert_eq!(a, b);
    }
}
