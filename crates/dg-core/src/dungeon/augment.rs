//! Extra corridors
//!
//! A spanning tree alone can force long detours between rooms that sit
//! close together. After the tree is dug, the augmenter repeatedly picks the
//! room pair whose travel distance over the dug corridors is largest
//! relative to their direct gap distance, digs a corridor between them, and
//! relaxes the distance table, until no pair exceeds the ratio threshold.

use log::{debug, info};
use serde::Serialize;

use crate::GenError;
use crate::consts::EXTRA_EDGE_RATIO;
use crate::rng::GameRng;

use super::corridor::dig_corridor;
use super::graph::{RoomGraph, TreeDistances};
use super::grid::TileGrid;
use super::tileset::Tileset;

/// A corridor dug between two rooms
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Corridor {
    pub from_room: usize,
    pub to_room: usize,
    /// Routed path cost
    pub cost: f64,
}

/// Outcome of an augmentation pass
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AugmentReport {
    /// Extra corridors in the order they were dug
    pub added: Vec<Corridor>,
    /// Largest remaining ratio when the pass stopped, if any pair qualified
    pub final_ratio: Option<f64>,
    /// Whether the pass stopped on the iteration cap rather than the threshold
    pub hit_cap: bool,
}

/// Room pair with the largest tree-to-direct distance ratio.
///
/// Skips self pairs, pairs at zero gap distance, and pairs that already
/// have their own corridor.
pub fn max_ratio_pair(graph: &RoomGraph, distances: &TreeDistances) -> Option<(usize, usize, f64)> {
    let n = graph.len();
    let mut best: Option<(usize, usize, f64)> = None;
    for i in 0..n {
        for j in (i + 1)..n {
            let direct = graph.weight(i, j);
            if direct <= 0.0 || distances.has_direct(i, j) {
                continue;
            }
            let ratio = distances.get(i, j) / direct;
            if best.is_none_or(|(_, _, r)| ratio > r) {
                best = Some((i, j, ratio));
            }
        }
    }
    best
}

/// Greedy extra-edge pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeAugmenter {
    threshold: f64,
}

impl Default for EdgeAugmenter {
    fn default() -> Self {
        Self {
            threshold: EXTRA_EDGE_RATIO,
        }
    }
}

impl EdgeAugmenter {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Dig extra corridors until the worst ratio falls below the threshold.
    ///
    /// Corridor endpoints are random cells of the two rooms. The number of
    /// iterations is capped at `n²` for `n` rooms.
    pub fn run(
        &self,
        grid: &mut TileGrid,
        tileset: &Tileset,
        graph: &RoomGraph,
        distances: &mut TreeDistances,
        rng: &mut GameRng,
    ) -> Result<AugmentReport, GenError> {
        let n = graph.len();
        let cap = n * n;
        let mut report = AugmentReport::default();

        loop {
            let Some((i, j, ratio)) = max_ratio_pair(graph, distances) else {
                report.final_ratio = None;
                break;
            };
            report.final_ratio = Some(ratio);
            if ratio < self.threshold {
                break;
            }
            if report.added.len() >= cap {
                report.hit_cap = true;
                break;
            }

            let (Some(a), Some(b)) = (grid.room(i).copied(), grid.room(j).copied()) else {
                break;
            };
            let from = a.random_point(rng);
            let to = b.random_point(rng);
            let cost = dig_corridor(grid, tileset, from, to, rng)?;
            distances.add_edge(i, j, cost);
            debug!("extra corridor {i} <-> {j}: ratio {ratio:.2}, cost {cost:.2}");
            report.added.push(Corridor {
                from_room: i,
                to_room: j,
                cost,
            });
        }

        info!("Added {} extra corridors.", report.added.len());
        Ok(report)
    }
}
