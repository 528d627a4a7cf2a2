//! Periodic shortest paths.
//!
//! Purpose
//! - Shortest paths on the infinite periodic lattice represented by a
//!   [`HopGraph`](crate::graph::HopGraph): a node is only meaningful together
//!   with the image it is seen in, so the search runs over `(node, image)`.
//!
//! Why this design
//! - The lattice is unbounded; bounding every image component by `max_image`
//!   keeps the state space finite (`N · (2·max_image + 1)³` states).
//! - Callers need several targets (every image of the start node), so the
//!   search settles all reachable states instead of stopping at a target.
//!
//! Sign convention
//! - Forward along a stored edge adds `to_jimage`, backward subtracts it. With
//!   this convention the image of a state is the cumulative displacement (in
//!   cells) from the source, and consecutive states of a reconstructed path
//!   differ by exactly one edge's `±to_jimage`.

mod dijkstra;
mod types;

pub use dijkstra::{periodic_dijkstra, periodic_dijkstra_by, reconstruct_path, DijkstraResult};
pub use types::{Parent, PeriodicState, SearchCfg};
