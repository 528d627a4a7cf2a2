//! Structure matching of single-cation entries onto the empty host.

use nalgebra::Vector3;
use tracing::trace;

use crate::cfg::EntryPathCfg;
use crate::lattice::{wrap_frac, Lattice, Site, Structure};

/// External structure-comparison service.
pub trait StructureMatcher {
    /// `s2` re-expressed on `s1`'s lattice and origin, or `None` if the two
    /// structures do not match.
    fn get_s2_like_s1(&self, s1: &Structure, s2: &Structure) -> Option<Structure>;

    fn fit(&self, s1: &Structure, s2: &Structure) -> bool {
        self.get_s2_like_s1(s1, s2).is_some()
    }
}

/// Matcher comparing lattice parameters and host sites up to an origin shift.
///
/// Sites of `ignored_species` take no part in the comparison and are carried
/// along by the shift. Site tolerance `stol` is in units of `(V / n)^(1/3)`.
#[derive(Clone, Debug)]
pub struct LatticeMatcher {
    pub ltol: f64,
    pub stol: f64,
    /// Degrees.
    pub angle_tol: f64,
    pub ignored_species: Vec<String>,
}

impl LatticeMatcher {
    pub fn new(cfg: &EntryPathCfg, ignored_species: &str) -> Self {
        Self {
            ltol: cfg.ltol,
            stol: cfg.stol,
            angle_tol: cfg.angle_tol,
            ignored_species: vec![ignored_species.to_string()],
        }
    }

    fn lattices_match(&self, l1: &Lattice, l2: &Lattice) -> bool {
        let lengths = l1
            .abc()
            .iter()
            .zip(l2.abc())
            .all(|(a, b)| (b / a - 1.0).abs() <= self.ltol);
        let angles = l1
            .angles()
            .iter()
            .zip(l2.angles())
            .all(|(a, b)| (a - b).abs() <= self.angle_tol);
        lengths && angles
    }

    fn host<'s>(&self, s: &'s Structure) -> Vec<&'s Site> {
        s.sites
            .iter()
            .filter(|site| !self.ignored_species.contains(&site.species))
            .collect()
    }

    /// One-to-one assignment of shifted `h2` sites onto `h1` within `tol` (Å).
    fn overlays(
        lattice: &Lattice,
        h1: &[&Site],
        h2: &[&Site],
        shift: &Vector3<f64>,
        tol: f64,
    ) -> bool {
        let mut used = vec![false; h1.len()];
        h2.iter().all(|s2| {
            let moved = s2.frac_coords + shift;
            let hit = (0..h1.len()).find(|&k| {
                !used[k]
                    && h1[k].species == s2.species
                    && lattice.pbc_distance(&h1[k].frac_coords, &moved).0 <= tol
            });
            match hit {
                Some(k) => {
                    used[k] = true;
                    true
                }
                None => false,
            }
        })
    }
}

impl StructureMatcher for LatticeMatcher {
    fn get_s2_like_s1(&self, s1: &Structure, s2: &Structure) -> Option<Structure> {
        if !self.lattices_match(&s1.lattice, &s2.lattice) {
            trace!("lattice parameters differ");
            return None;
        }
        let (h1, h2) = (self.host(s1), self.host(s2));
        if h1.len() != h2.len() {
            trace!(n1 = h1.len(), n2 = h2.len(), "host site counts differ");
            return None;
        }
        let tol = self.stol * (s1.lattice.volume() / h1.len().max(1) as f64).cbrt();
        // Candidate origin shifts bring some host site of s2 onto the first host site of s1.
        let shifts: Vec<Vector3<f64>> = match h1.first() {
            None => vec![Vector3::zeros()],
            Some(anchor) => h2
                .iter()
                .filter(|s| s.species == anchor.species)
                .map(|s| anchor.frac_coords - s.frac_coords)
                .collect(),
        };
        let shift = shifts
            .into_iter()
            .find(|t| Self::overlays(&s1.lattice, &h1, &h2, t, tol))?;
        let sites = s2
            .sites
            .iter()
            .map(|s| Site {
                frac_coords: wrap_frac(&(s.frac_coords + shift)),
                ..s.clone()
            })
            .collect();
        Some(Structure::new(s1.lattice.clone(), sites))
    }
}
