//! Candidate cation sites from computed entries.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cfg::{BASE_COLLISION_R, SITE_MERGE_R};
use crate::lattice::{MergeMode, Site, Structure};
use crate::symmetry::SpaceGroup;

/// A relaxed structure with its total energy (eV).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComputedEntry {
    pub entry_id: String,
    pub energy: f64,
    pub structure: Structure,
}

/// Every symmetry image of the cation sites of `entry` on the host lattice.
///
/// `entry` must already be expressed on the base lattice. Each generated site
/// carries `inserted_energy = (E_entry - E_base) / n_cations`. Images closer
/// than the site-merge radius collapse onto the first one found.
pub fn all_symmetry_sites(
    entry: &ComputedEntry,
    base: &ComputedEntry,
    migrating_specie: &str,
    sg: &SpaceGroup,
) -> Structure {
    let cations: Vec<&Site> = entry
        .structure
        .sites
        .iter()
        .filter(|s| s.species == migrating_specie)
        .collect();
    let mut out = Structure::new(base.structure.lattice.clone(), Vec::new());
    if cations.is_empty() {
        return out;
    }
    let inserted_energy = (entry.energy - base.energy) / cations.len() as f64;
    out.sites = cations
        .iter()
        .map(|s| Site {
            inserted_energy: Some(inserted_energy),
            ..s.wrapped()
        })
        .collect();
    for op in &sg.ops {
        let images: Vec<Site> = out.sites.iter().map(|s| op.apply(s).wrapped()).collect();
        out.sites.extend(images);
        out.merge_sites(SITE_MERGE_R, MergeMode::Delete);
    }
    debug!(entry = %entry.entry_id, sites = out.len(), "symmetry sites generated");
    out
}

/// Union of the symmetry sites of all entries, minus sites that collide with
/// a host atom, with near-duplicates averaged.
pub fn full_sites(
    translated: &[ComputedEntry],
    base: &ComputedEntry,
    migrating_specie: &str,
    sg: &SpaceGroup,
) -> Structure {
    let generated: Vec<Site> = translated
        .iter()
        .flat_map(|e| all_symmetry_sites(e, base, migrating_specie, sg).sites)
        .collect();
    let n_generated = generated.len();
    let kept: Vec<Site> = generated
        .into_iter()
        .filter(|s| {
            base.structure
                .sites_in_sphere(&s.frac_coords, BASE_COLLISION_R)
                .is_empty()
        })
        .collect();
    let mut res = Structure::new(base.structure.lattice.clone(), kept);
    if res.len() > 1 {
        res.merge_sites(SITE_MERGE_R, MergeMode::Average);
    }
    debug!(generated = n_generated, kept = res.len(), "full site list assembled");
    res
}
