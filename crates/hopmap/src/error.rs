//! Error types for hop mapping and path extraction.

use thiserror::Error;

use crate::graph::HopLabel;
use crate::lattice::Image;

/// Result type alias for mapper operations.
pub type Result<T> = std::result::Result<T, MapperError>;

/// Errors raised by the mapper. None of them are transient.
#[derive(Debug, Error)]
pub enum MapperError {
    /// A reconstructed search step matched zero or several edges of the graph.
    #[error("step {from} -> {to} (image diff {image_diff:?}) matched {found} edges, expected exactly 1")]
    PathEdgeMismatch {
        from: usize,
        to: usize,
        image_diff: Image,
        found: usize,
    },

    /// A hop list does not chain from the previous endpoint.
    #[error("hop {position} ({iindex} -> {eindex}) does not continue from site {previous}")]
    BrokenHopSequence {
        position: usize,
        iindex: usize,
        eindex: usize,
        previous: usize,
    },

    /// Direction-dependent data held in a fixed-layout array cannot be flipped safely.
    #[error("attribute `{key}` is an array; only list values can be flipped with the hop direction")]
    AmbiguousFlip { key: String },

    /// Integration radius for the charge analysis must be positive.
    #[error("the integration radius must be positive (got {radius})")]
    NonPositiveRadius { radius: f64 },

    /// A cost key is not present on the representative edge.
    #[error("hop label {label:?} has no attribute `{key}`")]
    MissingAttribute { label: HopLabel, key: String },

    /// A cost key is present but not a number.
    #[error("attribute `{key}` on hop label {label:?} is not numeric")]
    NonNumericAttribute { label: HopLabel, key: String },

    /// The label is not present in the unique-hops mapping.
    #[error("unknown hop label {0:?}")]
    UnknownLabel(HopLabel),

    /// A hop list was empty where at least one hop is required.
    #[error("empty hop list")]
    EmptyHopList,

    /// Construction in vacancy mode.
    #[error("vacancy mode is not implemented")]
    VacancyModeUnsupported,

    /// No base structure site could be matched to the supercell hop.
    #[error("supercell hop has no matching unit-cell hop")]
    UnmatchedSupercellHop,

    /// Grid data length disagrees with the declared grid shape.
    #[error("grid of shape {shape:?} needs {expected} values, got {found}")]
    GridShapeMismatch {
        shape: [usize; 3],
        expected: usize,
        found: usize,
    },

    /// The lattice matrix is singular.
    #[error("lattice matrix is singular")]
    SingularLattice,
}
