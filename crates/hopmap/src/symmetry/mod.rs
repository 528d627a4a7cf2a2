//! Symmetry operations and the site-equivalence test.
//!
//! Operation discovery is an external service ([`SymmetryFinder`]); this module
//! only applies known operations. Equivalence of site sets follows the usual
//! space-group convention: each transformed site must coincide with one of the
//! reference sites up to a lattice translation, independently per site.

mod types;

pub use types::{is_periodic_image, FixedOps, SpaceGroup, SymmOp, SymmetryFinder};
