//! Curated API for the workspace (UNSTABLE).
//!
//! Important
//! - Not a public API. A convenience surface for the CLI and experiments;
//!   breaking changes are allowed.
//! - Prefer these re-exports for consistency across callers.

// Crystal description and services
pub use crate::lattice::{wrap_frac, Image, Lattice, MergeMode, Site, Structure};
pub use crate::neighbors::{CutoffNeighbors, Neighbor, NeighborSearch};
pub use crate::symmetry::{FixedOps, SpaceGroup, SymmOp, SymmetryFinder};
// Graph and classification
pub use crate::graph::{build_graph, Attr, AttrMap, EdgeId, HopEdge, HopGraph, HopLabel};
pub use crate::group::generic_groupby;
pub use crate::hop::MigrationHop;
// Search
pub use crate::periodic::{
    periodic_dijkstra, periodic_dijkstra_by, reconstruct_path, DijkstraResult, PeriodicState,
    SearchCfg,
};
// Mapper
pub use crate::mapper::{
    get_hop_site_sequence, group_and_label_hops, modify_path, modify_paths, FullPathMapper,
    HopRecord, HopStep, IntercollatingPaths, MapperSummary,
};
// Charge density
pub use crate::charge::{
    get_least_chg_path, grid_frac_coords, populate_edges_with_chg_density_info, ChargeDensity,
    ChargeGrid, ChargeProfile, VolumetricGrid,
};
// Entry-based mapper
pub use crate::entry::{
    all_symmetry_sites, full_sites, ComputedEntry, ComputedEntryPath, EntryPathSummary,
    LatticeMatcher, StructureMatcher,
};
// Supercell cross-checks
pub use crate::supercell::{
    almost, check_uc_hop, map_hop_sc2uc, validate_unique_hop_count, ScHopMapping, UcMatch,
};
