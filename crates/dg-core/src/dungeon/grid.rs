//! Tile grid
//!
//! Owns the 2D array of tile ids, the placed rooms, and the set of
//! reserved corner cells that corridors may never cross. Tiles are stored
//! column-major (`x * height + y`), the same order the map artifact uses.

use std::collections::VecDeque;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::rng::GameRng;

use super::room::Room;
use super::tileset::{TileId, Tileset};

/// Grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// 4-connected neighbor offsets
pub const ORTHOGONAL: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// 8-connected neighbor offsets
pub const SURROUNDING: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// The map being generated
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<TileId>,
    rooms: Vec<Room>,
    blocked_corners: HashSet<Point>,
}

impl TileGrid {
    /// Create a grid holding `default_tile` everywhere
    pub fn new(width: usize, height: usize, default_tile: TileId) -> Self {
        Self {
            width,
            height,
            tiles: vec![default_tile; width * height],
            rooms: Vec::new(),
            blocked_corners: HashSet::new(),
        }
    }

    /// Rebuild a grid from stored parts. Corner reservations are derived
    /// from the rooms. Returns `None` if `tiles` has the wrong length.
    pub fn from_parts(
        width: usize,
        height: usize,
        tiles: Vec<TileId>,
        rooms: Vec<Room>,
    ) -> Option<Self> {
        if tiles.len() != width * height {
            return None;
        }
        let blocked_corners = rooms
            .iter()
            .flat_map(|r| r.corners())
            .filter(|p| p.x < width && p.y < height)
            .collect();
        Some(Self {
            width,
            height,
            tiles,
            rooms,
            blocked_corners,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tiles in column-major order
    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    /// Placed rooms, indexed by placement order
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, idx: usize) -> Option<&Room> {
        self.rooms.get(idx)
    }

    pub fn blocked_corners(&self) -> &HashSet<Point> {
        &self.blocked_corners
    }

    pub fn is_blocked_corner(&self, p: Point) -> bool {
        self.blocked_corners.contains(&p)
    }

    pub fn in_bounds(&self, p: Point) -> bool {
        p.x < self.width && p.y < self.height
    }

    /// Inside the grid and off its outermost ring of cells
    pub fn in_interior(&self, p: Point) -> bool {
        p.x >= 1 && p.y >= 1 && p.x + 1 < self.width && p.y + 1 < self.height
    }

    /// Column-major index of `p`, if in bounds
    pub fn index(&self, p: Point) -> Option<usize> {
        self.in_bounds(p).then(|| p.x * self.height + p.y)
    }

    /// Point at a column-major index
    pub fn point_at(&self, idx: usize) -> Point {
        Point::new(idx / self.height, idx % self.height)
    }

    pub fn get(&self, p: Point) -> Option<TileId> {
        self.index(p).map(|i| self.tiles[i])
    }

    /// Write a tile. Returns false when `p` is out of bounds.
    pub fn set(&mut self, p: Point, tile: TileId) -> bool {
        match self.index(p) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Neighbor of `p` offset by `(dx, dy)`, if in bounds
    pub fn offset(&self, p: Point, dx: isize, dy: isize) -> Option<Point> {
        let x = p.x.checked_add_signed(dx)?;
        let y = p.y.checked_add_signed(dy)?;
        let q = Point::new(x, y);
        self.in_bounds(q).then_some(q)
    }

    /// Whether `room` can be stamped: it and its corners sit inside the
    /// grid, none of its cells is a reserved corner, and none of its own
    /// corners would land on a free tile.
    pub fn can_place(&self, room: &Room, tileset: &Tileset) -> bool {
        if room.width == 0 || room.height == 0 || room.x == 0 || room.y == 0 {
            return false;
        }
        if room.x + room.width >= self.width || room.y + room.height >= self.height {
            return false;
        }
        if room.cells().any(|p| self.is_blocked_corner(p)) {
            return false;
        }
        room.corners()
            .iter()
            .all(|&c| self.get(c).is_some_and(|t| tileset.is_blocked(t)))
    }

    /// Fill the room with free tiles, reserve its corners and append it to
    /// the room list. Returns the new room's index.
    pub fn stamp_room(&mut self, room: Room, tileset: &Tileset, rng: &mut GameRng) -> usize {
        for p in room.cells() {
            let tile = tileset.random_free_tile(rng);
            self.set(p, tile);
        }
        for corner in room.corners() {
            self.reserve_corner(corner, tileset);
        }
        self.rooms.push(room);
        self.rooms.len() - 1
    }

    /// Permanently block a cell against corridor routing and mark it as wall
    pub fn reserve_corner(&mut self, p: Point, tileset: &Tileset) {
        if self.set(p, tileset.wall_tile()) {
            self.blocked_corners.insert(p);
        }
    }

    /// Surround every free tile with walls wherever it still borders an
    /// untouched (default) tile, including diagonally.
    pub fn finish_walls(&mut self, tileset: &Tileset) -> usize {
        let default = tileset.default_tile();
        let wall = tileset.wall_tile();
        let mut placed = 0;

        for idx in 0..self.tiles.len() {
            if tileset.is_blocked(self.tiles[idx]) {
                continue;
            }
            let p = self.point_at(idx);
            for (dx, dy) in SURROUNDING {
                if let Some(n) = self.offset(p, dx, dy)
                    && let Some(ni) = self.index(n)
                    && self.tiles[ni] == default
                {
                    self.tiles[ni] = wall;
                    placed += 1;
                }
            }
        }
        placed
    }

    /// Free cells 4-connected to `start` (empty if `start` is not free)
    pub fn reachable_from(&self, start: Point, tileset: &Tileset) -> HashSet<Point> {
        let mut seen = HashSet::new();
        if !self.get(start).is_some_and(|t| tileset.is_free(t)) {
            return seen;
        }

        let mut queue = VecDeque::from([start]);
        seen.insert(start);
        while let Some(p) = queue.pop_front() {
            for (dx, dy) in ORTHOGONAL {
                if let Some(n) = self.offset(p, dx, dy)
                    && !seen.contains(&n)
                    && self.get(n).is_some_and(|t| tileset.is_free(t))
                {
                    seen.insert(n);
                    queue.push_back(n);
                }
            }
        }
        seen
    }

    /// Count tiles matching a predicate
    pub fn count(&self, pred: impl Fn(TileId) -> bool) -> usize {
        self.tiles.iter().filter(|&&t| pred(t)).count()
    }
}
