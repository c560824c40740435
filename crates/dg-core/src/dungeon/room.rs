//! Rectangular rooms
//!
//! Rooms are axis-aligned rectangles in grid coordinates. They are created by
//! rejection sampling during placement and never change afterwards; every
//! other component refers to a room by its index in the grid's room list.

use serde::{Deserialize, Serialize};

use crate::rng::GameRng;

use super::grid::Point;

/// A placed room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// Left x coordinate
    pub x: usize,
    /// Top y coordinate
    pub y: usize,
    /// Width in cells
    pub width: usize,
    /// Height in cells
    pub height: usize,
}

impl Room {
    /// Create a new room
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Sample a room of random size in `min_size..=max_size` at a random
    /// position leaving a one-cell border around it.
    ///
    /// Returns `None` when a room of the sampled size cannot fit.
    pub fn sample(
        grid_width: usize,
        grid_height: usize,
        min_size: usize,
        max_size: usize,
        rng: &mut GameRng,
    ) -> Option<Room> {
        let width = rng.range_inclusive(min_size, max_size);
        let height = rng.range_inclusive(min_size, max_size);

        if width.saturating_add(2) > grid_width || height.saturating_add(2) > grid_height {
            return None;
        }

        let x = rng.range_inclusive(1, grid_width - width - 1);
        let y = rng.range_inclusive(1, grid_height - height - 1);
        Some(Room::new(x, y, width, height))
    }

    /// Euclidean distance between the two bounding boxes; zero when they
    /// touch or overlap.
    pub fn gap_distance(&self, other: &Room) -> f64 {
        let dx = axis_gap(self.x, self.width, other.x, other.width);
        let dy = axis_gap(self.y, self.height, other.y, other.height);
        ((dx * dx + dy * dy) as f64).sqrt()
    }

    /// Whether this room keeps strictly more than `tolerance` away from
    /// every room in `others`
    pub fn is_separated(&self, others: &[Room], tolerance: f64) -> bool {
        others.iter().all(|r| self.gap_distance(r) > tolerance)
    }

    /// Check if point is inside room
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    /// Pick one of the room's cells with uniform probability
    pub fn random_point(&self, rng: &mut GameRng) -> Point {
        let idx = rng.rn2(self.area() as u32) as usize;
        Point::new(self.x + idx % self.width, self.y + idx / self.width)
    }

    /// Get room area (interior cells)
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// The four cells diagonally outside the room's corners.
    ///
    /// Rooms are always placed at least one cell away from the grid edge,
    /// so these never underflow for placed rooms.
    pub fn corners(&self) -> [Point; 4] {
        let left = self.x.saturating_sub(1);
        let top = self.y.saturating_sub(1);
        let right = self.x + self.width;
        let bottom = self.y + self.height;
        [
            Point::new(left, top),
            Point::new(right, top),
            Point::new(left, bottom),
            Point::new(right, bottom),
        ]
    }

    /// Every cell of the room, column by column
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (self.x..self.x + self.width)
            .flat_map(move |x| (self.y..self.y + self.height).map(move |y| Point::new(x, y)))
    }
}

/// Separation along one axis between `[a, a + a_len)` and `[b, b + b_len)`
fn axis_gap(a: usize, a_len: usize, b: usize, b_len: usize) -> usize {
    if a >= b + b_len {
        a - (b + b_len)
    } else if b >= a + a_len {
        b - (a + a_len)
    } else {
        0
    }
}
