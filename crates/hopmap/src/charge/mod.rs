//! Charge-density decoration of hops.
//!
//! Purpose
//! - Integrate a volumetric charge density around each unique hop (a tube
//!   along the segment and spheres at interpolated positions) and broadcast the
//!   results to every symmetry-equivalent edge.
//! - Rank percolating pathways by the charge a migrating ion crosses.
//!
//! Conventions
//! - Grid points sit at cell-centred fractional positions `(i + 0.5)/n`.
//! - Reported charges are `Σ data / ngridpts / volume` over the masked points,
//!   i.e. the grid's native units divided by the cell volume.
//!
//! The density itself is external: callers implement [`ChargeDensity`] or load
//! values into a [`VolumetricGrid`].

mod analysis;
mod grid;

pub use analysis::{get_least_chg_path, populate_edges_with_chg_density_info, ChargeGrid, ChargeProfile};
pub use grid::{grid_frac_coords, ChargeDensity, VolumetricGrid};

#[cfg(test)]
mod tests;
