//! Percolating pathway extraction and canonicalization.

use serde::Serialize;
use tracing::{debug, warn};

use crate::cfg::PathCfg;
use crate::error::{MapperError, Result};
use crate::graph::{EdgeId, HopEdge, HopGraph, HopLabel};
use crate::lattice::Image;
use crate::periodic::{periodic_dijkstra, PeriodicState, SearchCfg};

use super::FullPathMapper;

/// One hop of an extracted pathway, identified with an edge of the mapper's graph.
///
/// Extraction yields steps in the edge's stored orientation; [`modify_path`]
/// may flip them into walking order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HopStep {
    pub edge: EdgeId,
    pub iindex: usize,
    pub eindex: usize,
    pub to_jimage: Image,
    pub hop_label: HopLabel,
}

impl HopStep {
    pub fn from_edge(id: EdgeId, e: &HopEdge) -> Self {
        Self {
            edge: id,
            iindex: e.iindex,
            eindex: e.eindex,
            to_jimage: e.to_jimage,
            hop_label: e.hop_label,
        }
    }

    /// The same hop walked the other way.
    #[inline]
    pub fn flipped(self) -> Self {
        Self {
            iindex: self.eindex,
            eindex: self.iindex,
            to_jimage: -self.to_jimage,
            ..self
        }
    }

    #[inline]
    pub fn crosses_cell(&self) -> bool {
        !self.to_jimage.is_zero()
    }
}

/// Lazy per-node pathway extraction over a mapper's graph.
///
/// The graph is pruned once, at construction. Each `next` runs one periodic
/// search from the next node that has an escape route.
#[derive(Clone, Debug)]
pub struct IntercollatingPaths<'a> {
    mapper: &'a FullPathMapper,
    pruned: HopGraph,
    search: SearchCfg,
    next_node: usize,
}

impl<'a> IntercollatingPaths<'a> {
    pub(super) fn new(mapper: &'a FullPathMapper, cfg: PathCfg) -> Self {
        let pruned = mapper.graph().pruned(cfg.max_val);
        debug!(
            kept = pruned.num_edges(),
            total = mapper.graph().num_edges(),
            max_val = cfg.max_val,
            "graph pruned for pathway search"
        );
        Self {
            mapper,
            pruned,
            search: SearchCfg {
                max_image: cfg.max_image,
            },
            next_node: 0,
        }
    }

    /// Cheapest route from `(u, 0)` to some `(u, image != 0)`, as hops of the
    /// unpruned graph in stored orientation.
    fn escape_path(&self, u: usize) -> Result<Option<Vec<HopStep>>> {
        let res = periodic_dijkstra(&self.pruned, &[u], self.search);
        // `best` iterates in state order, so ties resolve to the smallest image.
        let target = res
            .best
            .iter()
            .filter(|(s, _)| s.node == u && !s.image.is_zero())
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(s, _)| *s);
        let Some(target) = target else {
            return Ok(None);
        };
        let Some(states) = res.path_to(target) else {
            return Ok(None);
        };
        let steps = states
            .windows(2)
            .map(|w| match_step(self.mapper.graph(), w[0], w[1]))
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(steps))
    }
}

impl Iterator for IntercollatingPaths<'_> {
    type Item = Result<(usize, Vec<HopStep>)>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_node < self.pruned.num_nodes() {
            let u = self.next_node;
            self.next_node += 1;
            match self.escape_path(u) {
                Ok(Some(path)) => return Some(Ok((u, path))),
                Ok(None) => debug!(node = u, "no percolating route"),
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

/// The unique edge of `graph` that joins two consecutive search states.
///
/// The stored image must equal the image difference when the step walks the
/// edge forward and its negation when it walks backward; self-loops accept
/// either sign.
fn match_step(graph: &HopGraph, s1: PeriodicState, s2: PeriodicState) -> Result<HopStep> {
    let (a, b) = if s1.node <= s2.node {
        (s1.node, s2.node)
    } else {
        (s2.node, s1.node)
    };
    let diff = s2.image - s1.image;
    let mut found = graph.edges_between(a, b).filter(|(_, e)| {
        if a == b {
            e.to_jimage == diff || e.to_jimage == -diff
        } else if s1.node == a {
            e.to_jimage == diff
        } else {
            e.to_jimage == -diff
        }
    });
    match (found.next(), found.next()) {
        (Some((id, e)), None) => Ok(HopStep::from_edge(id, e)),
        (first, second) => {
            let n = usize::from(first.is_some()) + usize::from(second.is_some()) + found.count();
            Err(MapperError::PathEdgeMismatch {
                from: s1.node,
                to: s2.node,
                image_diff: diff,
                found: n,
            })
        }
    }
}

/// Orient `path` into one connected walk, starting from `start`.
fn chain_from(path: &[HopStep], start: usize) -> Option<Vec<HopStep>> {
    let mut at = start;
    let mut walk = Vec::with_capacity(path.len());
    for &h in path {
        let oriented = if h.iindex == at {
            h
        } else if h.eindex == at {
            h.flipped()
        } else {
            return None;
        };
        at = oriented.eindex;
        walk.push(oriented);
    }
    Some(walk)
}

/// Canonical form of a percolating path.
///
/// The hops are oriented head to tail into a closed walk and rotated so that
/// the single cell-crossing hop comes last, in its stored direction (the walk
/// is reversed when needed). Paths that do not close, or that cross the cell
/// boundary zero or several times, have no canonical form.
pub fn modify_path(path: &[HopStep]) -> Option<Vec<HopStep>> {
    let first = path.first()?;
    let walk = [first.iindex, first.eindex]
        .into_iter()
        .filter_map(|start| chain_from(path, start).filter(|w| w.last().is_some_and(|l| l.eindex == start)))
        .next()?;
    let mut crossings = walk.iter().enumerate().filter(|(_, h)| h.crosses_cell());
    let k = match (crossings.next(), crossings.next()) {
        (Some((k, _)), None) => k,
        _ => return None,
    };
    let mut walk = if walk[k] != path[k] {
        // Crossing hop ended up against its stored orientation.
        walk.iter().rev().map(|h| h.flipped()).collect::<Vec<_>>()
    } else {
        walk
    };
    let k = walk.iter().position(|h| h.crosses_cell())?;
    walk.rotate_left(k + 1);
    Some(walk)
}

/// Canonicalize a stream of paths, skipping (with a warning) those that
/// cannot be canonicalized.
pub fn modify_paths<I>(paths: I) -> impl Iterator<Item = Vec<HopStep>>
where
    I: IntoIterator<Item = Vec<HopStep>>,
{
    paths.into_iter().filter_map(|p| {
        let out = modify_path(&p);
        if out.is_none() {
            warn!(hops = p.len(), "path has no single cell-crossing closed form; skipped");
        }
        out
    })
}

/// Site visiting order of a chained hop list starting at `start_u`.
///
/// Returns `[start_u, e_1, ..., e_n]`; each hop must begin at the previous hop's
/// end site.
pub fn get_hop_site_sequence(hops: &[HopStep], start_u: usize) -> Result<Vec<usize>> {
    if hops.is_empty() {
        return Err(MapperError::EmptyHopList);
    }
    let mut seq = Vec::with_capacity(hops.len() + 1);
    seq.push(start_u);
    for (position, h) in hops.iter().enumerate() {
        let previous = *seq.last().unwrap_or(&start_u);
        if h.iindex != previous {
            return Err(MapperError::BrokenHopSequence {
                position,
                iindex: h.iindex,
                eindex: h.eindex,
                previous,
            });
        }
        seq.push(h.eindex);
    }
    Ok(seq)
}
