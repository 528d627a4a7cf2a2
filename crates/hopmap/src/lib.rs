//! Periodic migration-hop mapping for crystal structures.
//!
//! Finds every hop a migrating ion can make between its candidate sites in a
//! periodic crystal, groups hops into symmetry-equivalence classes, decorates
//! the classes with physical data, and extracts percolating pathways: routes
//! that leave the reference cell and reach the same site in a neighboring cell.
//!
//! Layout
//! - `lattice`, `symmetry`, `neighbors`: crystal description and the external
//!   services (symmetry finder, neighbor search) behind traits.
//! - `graph`: the periodic multigraph; `group`: union-find classification.
//! - `periodic`: Dijkstra over `(node, image)` states.
//! - `mapper`: the full hop map, decoration, pathway extraction.
//! - `charge`, `entry`, `supercell`: charge-density decoration, the
//!   entry-based map, and supercell cross-checks.
//!
//! API Policy
//! - The crate is consumed by the workspace CLI. There is no stable public API;
//!   [`api`] and [`prelude`] are the curated surfaces.

pub mod api;
pub mod cfg;
pub mod charge;
pub mod entry;
pub mod error;
pub mod graph;
pub mod group;
pub mod hop;
pub mod lattice;
pub mod mapper;
pub mod neighbors;
pub mod periodic;
pub mod supercell;
pub mod symmetry;

#[cfg(test)]
mod fixtures;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::{ChargeCfg, EntryPathCfg, MapperCfg, PathCfg};
pub use error::{MapperError, Result};
pub use mapper::FullPathMapper;
pub use nalgebra::{Matrix3 as Mat3, Vector3 as Vec3};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::{ChargeCfg, EntryPathCfg, MapperCfg, PathCfg};
    pub use crate::error::{MapperError, Result};
    pub use crate::graph::{Attr, AttrMap, HopEdge, HopLabel};
    pub use crate::lattice::{Image, Lattice, Site, Structure};
    pub use crate::mapper::{modify_path, FullPathMapper, HopStep};
    pub use crate::symmetry::{FixedOps, SymmOp, SymmetryFinder};
    pub use nalgebra::{Matrix3 as Mat3, Vector3 as Vec3};
}
