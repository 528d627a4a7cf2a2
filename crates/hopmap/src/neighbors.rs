//! Neighbor search over periodic images.
//!
//! The graph builder only needs "all site pairs within a cutoff, with the image
//! of the second site". [`NeighborSearch`] is that narrow seam; [`CutoffNeighbors`]
//! is an explicit image enumeration good for the small candidate-site sets the
//! mapper works on.

use serde::Serialize;
use tracing::warn;

use crate::cfg::COINCIDENT_EPS;
use crate::lattice::{Image, Structure};

/// One neighbor relation: site `to` in image `image` lies `distance` Å from
/// site `from` of the reference cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Neighbor {
    pub from: usize,
    pub to: usize,
    pub image: Image,
    pub distance: f64,
}

/// External nearest-neighbor service.
pub trait NeighborSearch {
    /// All `(from, to, image)` triples with `0 < distance <= cutoff`, from both
    /// endpoints' perspective.
    fn neighbors(&self, structure: &Structure, cutoff: f64) -> Vec<Neighbor>;
}

/// Brute-force search over every image that can hold a site within the cutoff.
#[derive(Clone, Copy, Debug, Default)]
pub struct CutoffNeighbors;

impl NeighborSearch for CutoffNeighbors {
    fn neighbors(&self, structure: &Structure, cutoff: f64) -> Vec<Neighbor> {
        let Some(inv) = structure.lattice.matrix.try_inverse() else {
            warn!("singular lattice; neighbor search skipped");
            return Vec::new();
        };
        // Interplanar spacing along axis i is 1 / |column i of M⁻¹|. Sites are
        // not wrapped, so the spread of their coordinates widens the reach.
        let reach: Vec<i32> = (0..3)
            .map(|i| {
                let (lo, hi) = structure
                    .sites
                    .iter()
                    .map(|s| s.frac_coords[i])
                    .fold((0.0_f64, 0.0_f64), |(lo, hi), x| (lo.min(x), hi.max(x)));
                (cutoff * inv.column(i).norm()).ceil() as i32 + 1 + (hi - lo).ceil() as i32
            })
            .collect();
        let mut out = Vec::new();
        for (u, su) in structure.sites.iter().enumerate() {
            for (v, sv) in structure.sites.iter().enumerate() {
                let d = sv.frac_coords - su.frac_coords;
                for a in -reach[0]..=reach[0] {
                    for b in -reach[1]..=reach[1] {
                        for c in -reach[2]..=reach[2] {
                            let image = Image::new(a, b, c);
                            let dist = structure
                                .lattice
                                .cart_coords(&(d + image.to_vector()))
                                .norm();
                            if dist > COINCIDENT_EPS && dist <= cutoff {
                                out.push(Neighbor {
                                    from: u,
                                    to: v,
                                    image,
                                    distance: dist,
                                });
                            }
                        }
                    }
                }
            }
        }
        out
    }
}
