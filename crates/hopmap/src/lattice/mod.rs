//! Periodic lattice geometry.
//!
//! Purpose
//! - Hold the crystal description the mapper works on: a lattice, sites in
//!   fractional coordinates, and integer image offsets.
//! - Provide the minimum-image distance used by the neighbor search, the site
//!   merging of the entry-based mapper and the charge-grid masks.
//!
//! Conventions
//! - Lattice vectors are the rows of `Lattice::matrix`; lengths in Å.
//! - A site at fractional `f` in image `j` sits at `f + j`.

mod image;
mod types;

pub use image::Image;
pub use types::{wrap_frac, Lattice, MergeMode, Site, Structure};
