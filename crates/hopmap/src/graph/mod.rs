//! Periodic hop multigraph: builder and data types.
//!
//! Purpose
//! - Nodes are candidate sites of the migrating species in one reference cell;
//!   edges are hops to a neighbor in some periodic image (`to_jimage`).
//! - Several edges may join the same pair of nodes with different images.
//!
//! Invariants
//! - Each physical hop is stored once, with `iindex <= eindex`; self-loops keep
//!   the image whose first non-zero component is positive.
//! - `epos == ipos_of(eindex) + to_jimage`, hence `(u, v, img)` and
//!   `(v, u, -img)` describe the same displacement reversed.

mod build;
mod types;

pub use build::build_graph;
pub(crate) use build::canonical_key;
pub use types::{Adjacent, Attr, AttrMap, EdgeId, HopEdge, HopGraph, HopLabel};
