//! Dijkstra over `(node, image)` states with an image bound.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use tracing::trace;

use crate::graph::{EdgeId, HopEdge, HopGraph};
use crate::lattice::Image;

use super::types::{Parent, PeriodicState, SearchCfg};

/// Best distances and parent pointers over every state reached within the
/// image bound.
#[derive(Clone, Debug, Default)]
pub struct DijkstraResult {
    pub best: BTreeMap<PeriodicState, f64>,
    pub parent: BTreeMap<PeriodicState, Parent>,
}

impl DijkstraResult {
    #[inline]
    pub fn distance(&self, state: &PeriodicState) -> Option<f64> {
        self.best.get(state).copied()
    }

    /// Source → `target` states, or `None` if `target` was never reached.
    pub fn path_to(&self, target: PeriodicState) -> Option<Vec<PeriodicState>> {
        self.best
            .contains_key(&target)
            .then(|| reconstruct_path(&self.parent, target))
    }

    /// Edges used along the path to `target`, in walking order.
    pub fn edges_to(&self, target: PeriodicState) -> Option<Vec<EdgeId>> {
        let path = self.path_to(target)?;
        Some(
            path.iter()
                .skip(1)
                .filter_map(|s| self.parent.get(s).map(|p| p.edge))
                .collect(),
        )
    }
}

/// Periodic Dijkstra weighted by each edge's `cost`.
pub fn periodic_dijkstra(graph: &HopGraph, sources: &[usize], cfg: SearchCfg) -> DijkstraResult {
    periodic_dijkstra_by(graph, sources, cfg, |e| e.cost)
}

/// Periodic Dijkstra with a caller-chosen edge weight.
///
/// Sources start at image (0,0,0). Walking a stored edge `(u, v, j)` forward
/// moves from image `i` to `i + j`; walking it from `v` to `u` moves to `i - j`.
/// States with any `|image component| > cfg.max_image` are never entered.
/// There is no early exit: the whole bounded state space reachable from the
/// sources is settled. Weights must be non-negative.
pub fn periodic_dijkstra_by<W>(
    graph: &HopGraph,
    sources: &[usize],
    cfg: SearchCfg,
    weight: W,
) -> DijkstraResult
where
    W: Fn(&HopEdge) -> f64,
{
    let mut res = DijkstraResult::default();
    let mut queue = BinaryHeap::new();
    for &s in sources {
        let state = PeriodicState::new(s, Image::ZERO);
        res.best.insert(state, 0.0);
        queue.push(MinScored(0.0, state));
    }
    while let Some(MinScored(cost, cur)) = queue.pop() {
        if res.best.get(&cur).is_some_and(|&b| cost > b) {
            continue; // stale entry
        }
        for adj in graph.adjacent(cur.node) {
            let next_image = cur.image + adj.image;
            if next_image.max_abs() > cfg.max_image {
                continue;
            }
            let w = weight(graph.edge(adj.edge));
            debug_assert!(w >= 0.0, "negative edge weight {w}");
            let next = PeriodicState::new(adj.to, next_image);
            let new_cost = cost + w;
            if res.best.get(&next).map_or(true, |&b| new_cost < b) {
                res.best.insert(next, new_cost);
                res.parent.insert(
                    next,
                    Parent {
                        state: cur,
                        edge: adj.edge,
                    },
                );
                queue.push(MinScored(new_cost, next));
            }
        }
    }
    trace!(states = res.best.len(), "periodic dijkstra settled");
    res
}

/// Walk parent pointers from `target` back to a source; returns source → target.
pub fn reconstruct_path(
    parent: &BTreeMap<PeriodicState, Parent>,
    target: PeriodicState,
) -> Vec<PeriodicState> {
    let mut path = vec![target];
    let mut cur = target;
    // Sources have no parent; parent chains form a tree rooted at them.
    while let Some(p) = parent.get(&cur) {
        cur = p.state;
        path.push(cur);
    }
    path.reverse();
    path
}

/// Heap entry ordered so the smallest score pops first; ties pop the smaller state.
#[derive(Clone, Copy, Debug)]
struct MinScored(f64, PeriodicState);

impl PartialEq for MinScored {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MinScored {}

impl PartialOrd for MinScored {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MinScored {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .partial_cmp(&self.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.1.cmp(&self.1))
    }
}
