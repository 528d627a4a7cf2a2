//! Search state and configuration for the periodic Dijkstra.

use crate::graph::EdgeId;
use crate::lattice::Image;

/// Traversal state: a node of the quotient graph seen in a given image.
///
/// Two states with the same node but different images are distinct and carry
/// their own best distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodicState {
    pub node: usize,
    pub image: Image,
}

impl PeriodicState {
    #[inline]
    pub fn new(node: usize, image: Image) -> Self {
        Self { node, image }
    }
}

/// Parent pointer: predecessor state and the edge walked from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parent {
    pub state: PeriodicState,
    pub edge: EdgeId,
}

/// Search configuration.
///
/// The default bound is one cell in each direction, the same bound the
/// pathway extraction uses (`PathCfg::max_image`).
#[derive(Clone, Copy, Debug)]
pub struct SearchCfg {
    /// Per-axis bound on the image offset; keeps the periodic state space finite.
    pub max_image: i32,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self { max_image: 1 }
    }
}
