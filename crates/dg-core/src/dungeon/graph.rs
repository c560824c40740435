//! Room graph, minimum spanning tree and tree distances
//!
//! Rooms are addressed by their index in the grid's room list. All tables
//! here are dense `n × n` matrices stored row-major.

use super::room::Room;

/// Complete weighted graph over the placed rooms, weighted by gap distance
#[derive(Debug, Clone, PartialEq)]
pub struct RoomGraph {
    n: usize,
    weights: Vec<f64>,
}

impl RoomGraph {
    /// Build the graph over `rooms`
    pub fn new(rooms: &[Room]) -> Self {
        let n = rooms.len();
        let mut weights = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let w = rooms[i].gap_distance(&rooms[j]);
                weights[i * n + j] = w;
                weights[j * n + i] = w;
            }
        }
        Self { n, weights }
    }

    /// Number of rooms
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Direct (gap) distance between rooms `i` and `j`
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.weights[i * self.n + j]
    }

    /// Minimum spanning tree by Prim's algorithm over the dense matrix.
    ///
    /// Starts from room 0; ties go to the lowest room index, so the result
    /// depends only on the room layout.
    pub fn minimum_spanning_tree(&self) -> SpanningTree {
        let n = self.n;
        let mut edges = Vec::with_capacity(n.saturating_sub(1));
        if n == 0 {
            return SpanningTree { edges };
        }

        let mut in_tree = vec![false; n];
        let mut best = vec![f64::INFINITY; n];
        let mut parent = vec![0usize; n];
        in_tree[0] = true;
        for i in 1..n {
            best[i] = self.weight(0, i);
        }

        for _ in 1..n {
            let mut next = None;
            for i in 0..n {
                if in_tree[i] {
                    continue;
                }
                match next {
                    Some(cur) if best[i] >= best[cur] => {}
                    _ => next = Some(i),
                }
            }
            let Some(v) = next else { break };

            in_tree[v] = true;
            edges.push((parent[v], v));
            for i in 0..n {
                if !in_tree[i] && self.weight(v, i) < best[i] {
                    best[i] = self.weight(v, i);
                    parent[i] = v;
                }
            }
        }

        SpanningTree { edges }
    }
}

/// Edge set of a spanning tree over the rooms, as `(parent, child)` pairs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpanningTree {
    edges: Vec<(usize, usize)>,
}

impl SpanningTree {
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Total gap-distance weight of the tree
    pub fn total_weight(&self, graph: &RoomGraph) -> f64 {
        self.edges.iter().map(|&(a, b)| graph.weight(a, b)).sum()
    }

    /// Whether the edges connect all `num_rooms` rooms.
    ///
    /// An edge naming a room outside `0..num_rooms` never spans.
    pub fn spans(&self, num_rooms: usize) -> bool {
        // component label per room; a merge relabels the whole class
        let mut classes: Vec<usize> = (0..num_rooms).collect();
        for &(a, b) in &self.edges {
            let (Some(&keep), Some(&old)) = (classes.get(a), classes.get(b)) else {
                return false;
            };
            for class in classes.iter_mut().filter(|c| **c == old) {
                *class = keep;
            }
        }
        classes.windows(2).all(|w| w[0] == w[1])
    }
}

/// All-pairs shortest distances over the dug corridors (tree edges plus any
/// extra edges), weighted by routed corridor cost.
///
/// Built once from the tree, then kept current by relaxation as edges are
/// added.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeDistances {
    n: usize,
    dist: Vec<f64>,
    direct: Vec<bool>,
}

impl TreeDistances {
    /// Compute distances over a tree given as `(a, b, cost)` edges.
    ///
    /// Rooms not joined by any path are at infinite distance.
    pub fn from_tree(n: usize, edges: &[(usize, usize, f64)]) -> Self {
        let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        let mut direct = vec![false; n * n];
        for &(a, b, cost) in edges {
            adjacency[a].push((b, cost));
            adjacency[b].push((a, cost));
            direct[a * n + b] = true;
            direct[b * n + a] = true;
        }

        let mut dist = vec![f64::INFINITY; n * n];
        let mut stack = Vec::new();
        for source in 0..n {
            let row = &mut dist[source * n..(source + 1) * n];
            row[source] = 0.0;
            stack.push(source);
            while let Some(v) = stack.pop() {
                for &(w, cost) in &adjacency[v] {
                    if row[w].is_infinite() {
                        row[w] = row[v] + cost;
                        stack.push(w);
                    }
                }
            }
        }

        Self { n, dist, direct }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, a: usize, b: usize) -> f64 {
        self.dist[a * self.n + b]
    }

    /// Whether a corridor was dug directly between `a` and `b`
    pub fn has_direct(&self, a: usize, b: usize) -> bool {
        self.direct[a * self.n + b]
    }

    /// Add an edge `(i, j)` of the given cost and relax every pair through it
    pub fn add_edge(&mut self, i: usize, j: usize, cost: f64) {
        let n = self.n;
        self.direct[i * n + j] = true;
        self.direct[j * n + i] = true;

        let to_i: Vec<f64> = (0..n).map(|a| self.get(a, i)).collect();
        let to_j: Vec<f64> = (0..n).map(|a| self.get(a, j)).collect();
        for a in 0..n {
            for b in 0..n {
                let via_ij = to_i[a] + cost + to_j[b];
                let via_ji = to_j[a] + cost + to_i[b];
                let cell = &mut self.dist[a * n + b];
                *cell = cell.min(via_ij).min(via_ji);
            }
        }
    }
}
