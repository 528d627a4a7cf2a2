//! Single migration hop between two sites.

use serde::Serialize;

use crate::cfg::LENGTH_EPS;
use crate::lattice::{Lattice, Site};
use crate::symmetry::SpaceGroup;

/// Displacement of the migrating species from `isite` to `esite`.
///
/// `esite` is stored at the periodic image the hop actually reaches, so
/// `esite - isite` is the physical displacement.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MigrationHop {
    pub isite: Site,
    pub esite: Site,
    /// Midpoint of the hop; disambiguates hops whose endpoints coincide up to
    /// translation but whose displacements differ.
    pub msite: Site,
    pub iindex: usize,
    pub eindex: usize,
    pub length: f64,
}

impl MigrationHop {
    pub fn new(isite: Site, esite: Site, iindex: usize, eindex: usize, lattice: &Lattice) -> Self {
        let mid = (isite.frac_coords + esite.frac_coords) * 0.5;
        let length = lattice
            .cart_coords(&(esite.frac_coords - isite.frac_coords))
            .norm();
        let msite = Site::new(isite.species.clone(), mid);
        Self {
            isite,
            esite,
            msite,
            iindex,
            eindex,
            length,
        }
    }

    /// Symmetry equivalence of two hops (direction-insensitive).
    ///
    /// Lengths must agree and some operation must map `{i, m, e}` of `other`
    /// onto `{i, m, e}` of `self`.
    pub fn is_equivalent(&self, other: &MigrationHop, sg: &SpaceGroup) -> bool {
        if (self.length - other.length).abs() > LENGTH_EPS {
            return false;
        }
        sg.are_symmetrically_equivalent(
            &[self.isite.clone(), self.msite.clone(), self.esite.clone()],
            &[other.isite.clone(), other.msite.clone(), other.esite.clone()],
        )
    }

    /// Same hop walked the other way.
    pub fn reversed(&self) -> Self {
        Self {
            isite: self.esite.clone(),
            esite: self.isite.clone(),
            msite: self.msite.clone(),
            iindex: self.eindex,
            eindex: self.iindex,
            length: self.length,
        }
    }
}
