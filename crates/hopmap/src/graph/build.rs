//! Graph construction from candidate sites and a neighbor search.

use std::collections::BTreeSet;

use tracing::debug;

use crate::hop::MigrationHop;
use crate::lattice::{Image, Structure};
use crate::neighbors::NeighborSearch;

use super::types::{AttrMap, HopEdge, HopGraph, HopLabel};

/// Build the periodic hop multigraph over `sites` (nodes = site indices).
///
/// Every pair within `cutoff` becomes one edge, stored with `iindex <= eindex`
/// (reverse duplicates from the neighbor search collapse). Edges come out sorted
/// by `(iindex, eindex, to_jimage)`. Each edge starts in its own label; the
/// classifier merges labels afterwards.
pub fn build_graph(sites: &Structure, cutoff: f64, nn: &dyn NeighborSearch) -> HopGraph {
    let mut keys: BTreeSet<(usize, usize, Image)> = BTreeSet::new();
    for n in nn.neighbors(sites, cutoff) {
        keys.insert(canonical_key(n.from, n.to, n.image));
    }
    let lattice = &sites.lattice;
    let edges: Vec<HopEdge> = keys
        .into_iter()
        .enumerate()
        .map(|(k, (u, v, to_jimage))| {
            let isite = sites.sites[u].clone();
            let esite = sites.sites[v].translated(to_jimage);
            let ipos = isite.frac_coords;
            let epos = esite.frac_coords;
            let hop = MigrationHop::new(isite, esite, u, v, lattice);
            let hop_distance = hop.length;
            HopEdge {
                iindex: u,
                eindex: v,
                to_jimage,
                ipos,
                epos,
                ipos_cart: lattice.cart_coords(&ipos),
                epos_cart: lattice.cart_coords(&epos),
                hop,
                hop_distance,
                hop_label: HopLabel(k),
                cost: hop_distance,
                data: AttrMap::new(),
            }
        })
        .collect();
    debug!(nodes = sites.len(), edges = edges.len(), cutoff, "hop graph built");
    HopGraph::from_edges(sites.len(), edges)
}

/// Stored orientation of the hop `(u, v, image)`.
#[inline]
pub(crate) fn canonical_key(u: usize, v: usize, image: Image) -> (usize, usize, Image) {
    use std::cmp::Ordering;
    match u.cmp(&v) {
        Ordering::Less => (u, v, image),
        Ordering::Greater => (v, u, -image),
        Ordering::Equal => (u, u, image.sign_canonical()),
    }
}
