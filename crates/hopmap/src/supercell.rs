//! Supercell ↔ unit-cell hop correspondence.
//!
//! A hop found in a 2×2×2 supercell is the image of some unit-cell hop under a
//! lattice translation, possibly walked the other way. These helpers recover
//! that correspondence and use it to cross-check the unique-hop count of a
//! unit-cell map against a supercell map of the same material.
//!
//! Supercell fractional coordinates are scaled by 2 to express them in
//! unit-cell fractions.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, error};

use crate::cfg::ALMOST_EPS;
use crate::error::{MapperError, Result};
use crate::graph::HopLabel;
use crate::hop::MigrationHop;
use crate::lattice::Image;
use crate::mapper::FullPathMapper;

/// Element-wise equality within a loose tolerance; slices of different length never match.
pub fn almost(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < ALMOST_EPS)
}

/// Translation (and direction) taking a unit-cell hop onto a supercell hop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct UcMatch {
    pub shift: Image,
    /// The unit-cell hop runs opposite to the supercell hop.
    pub flip: bool,
}

/// Whether `sc_hop` (2×2×2 supercell) is `uc_hop` translated by a lattice vector.
///
/// Midpoints decide the translation; endpoints then decide the direction.
pub fn check_uc_hop(sc_hop: &MigrationHop, uc_hop: &MigrationHop) -> Option<UcMatch> {
    let sc_i = sc_hop.isite.frac_coords * 2.0;
    let sc_e = sc_hop.esite.frac_coords * 2.0;
    let sc_m = sc_hop.msite.frac_coords * 2.0;
    let d = sc_m - uc_hop.msite.frac_coords;
    let shift = Image::round_from(&d);
    if !almost(d.as_slice(), shift.to_vector().as_slice()) {
        return None;
    }
    let t = shift.to_vector();
    let tmp_i = uc_hop.isite.frac_coords + t;
    let tmp_e = uc_hop.esite.frac_coords + t;
    if almost(tmp_i.as_slice(), sc_i.as_slice()) && almost(tmp_e.as_slice(), sc_e.as_slice()) {
        Some(UcMatch { shift, flip: false })
    } else if almost(tmp_e.as_slice(), sc_i.as_slice()) && almost(tmp_i.as_slice(), sc_e.as_slice())
    {
        Some(UcMatch { shift, flip: true })
    } else {
        None
    }
}

/// Unit-cell edge a supercell hop corresponds to.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScHopMapping {
    pub uc_u: usize,
    pub uc_v: usize,
    pub hop: MigrationHop,
    pub shift: Image,
    pub flip: bool,
    pub hop_label: HopLabel,
}

/// First edge of the unit-cell map (in graph order) matching `sc_hop`.
pub fn map_hop_sc2uc(sc_hop: &MigrationHop, uc: &FullPathMapper) -> Result<ScHopMapping> {
    uc.graph()
        .edges()
        .iter()
        .find_map(|e| {
            let m = check_uc_hop(sc_hop, &e.hop)?;
            almost(&[e.hop.length], &[sc_hop.length]).then(|| ScHopMapping {
                uc_u: e.iindex,
                uc_v: e.eindex,
                hop: e.hop.clone(),
                shift: m.shift,
                flip: m.flip,
                hop_label: e.hop_label,
            })
        })
        .ok_or(MapperError::UnmatchedSupercellHop)
}

/// Cross-check unique-hop counts between a unit-cell map and a 2×2×2
/// supercell map of the same material.
///
/// Every supercell unique hop is mapped to a unit-cell label. The check passes
/// when the supercell has as many unique hops as the unit cell and they hit
/// every unit-cell label. A mismatch is logged, not raised; only a supercell
/// hop without any unit-cell counterpart is an error.
pub fn validate_unique_hop_count(uc: &FullPathMapper, sc: &FullPathMapper) -> Result<bool> {
    let mut hit = BTreeSet::new();
    for (_, e) in sc.unique_hops() {
        let m = map_hop_sc2uc(&e.hop, uc)?;
        debug!(sc_label = e.hop_label.0, uc_label = m.hop_label.0, flip = m.flip, "supercell hop mapped");
        hit.insert(m.hop_label);
    }
    let ok = sc.num_unique_hops() == uc.num_unique_hops() && hit.len() == uc.num_unique_hops();
    if !ok {
        error!(
            name = uc.name.as_deref().unwrap_or(""),
            uc_unique = uc.num_unique_hops(),
            sc_unique = sc.num_unique_hops(),
            uc_labels_hit = hit.len(),
            "unique hop count mismatch between unit cell and supercell"
        );
    }
    Ok(ok)
}
