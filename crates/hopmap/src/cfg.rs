//! Tolerance defaults and run configuration.
//!
//! Policy
//! - Numeric tolerances are fixed constants; they are not meant to be tuned per
//!   run. Physical knobs (cutoffs, symprec, pruning threshold) live in small
//!   `Copy` config structs with `Default` impls.

/// Cation sites closer than this (Å) to a host site are discarded.
pub(crate) const BASE_COLLISION_R: f64 = 1.0;
/// Cation sites closer than this (Å) to each other are merged.
pub(crate) const SITE_MERGE_R: f64 = 1.0;
/// Loose equality used by the supercell/unit-cell hop comparison.
pub(crate) const ALMOST_EPS: f64 = 1e-4;
/// Two hops with lengths further apart than this (Å) are never equivalent.
pub(crate) const LENGTH_EPS: f64 = 1e-3;
/// Distances below this are treated as the same point (Å).
pub(crate) const COINCIDENT_EPS: f64 = 1e-8;

/// Construction parameters of a [`crate::FullPathMapper`].
#[derive(Clone, Copy, Debug)]
pub struct MapperCfg {
    /// Neighbor-search cutoff in Å; no hop is longer than this.
    pub max_path_length: f64,
    /// Symmetry precision (fractional) used for site/hop equivalence.
    pub symprec: f64,
    /// Vacancy mode is declared but not implemented.
    pub vac_mode: bool,
}

impl Default for MapperCfg {
    fn default() -> Self {
        Self {
            max_path_length: 10.0,
            symprec: 0.1,
            vac_mode: false,
        }
    }
}

/// Pathway extraction parameters.
#[derive(Clone, Copy, Debug)]
pub struct PathCfg {
    /// Edges with `cost > max_val` are removed before the search.
    pub max_val: f64,
    /// Largest image offset (per axis) the search may wander to.
    pub max_image: i32,
}

impl Default for PathCfg {
    fn default() -> Self {
        Self {
            max_val: 100_000.0,
            max_image: 1,
        }
    }
}

/// Parameters of the entry-based mapper (structure matching + site generation).
#[derive(Clone, Copy, Debug)]
pub struct EntryPathCfg {
    pub max_path_length: f64,
    /// Fractional length tolerance of the structure matcher.
    pub ltol: f64,
    /// Site tolerance of the structure matcher.
    pub stol: f64,
    pub symprec: f64,
    /// Angle tolerance in degrees.
    pub angle_tol: f64,
}

impl Default for EntryPathCfg {
    fn default() -> Self {
        Self {
            max_path_length: 4.0,
            ltol: 0.2,
            stol: 0.3,
            symprec: 0.1,
            angle_tol: 5.0,
        }
    }
}

/// Charge-density analysis parameters.
#[derive(Clone, Copy, Debug)]
pub struct ChargeCfg {
    /// Radius (Å) of the tube around a hop and of the averaging sphere.
    pub tube_radius: f64,
    /// Number of interpolation intervals along a hop.
    pub n_images: usize,
}

impl Default for ChargeCfg {
    fn default() -> Self {
        Self {
            tube_radius: 1.0,
            n_images: 20,
        }
    }
}
