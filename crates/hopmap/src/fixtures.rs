//! Small crystal fixtures shared by unit tests.

use nalgebra::vector;

use crate::lattice::{Lattice, Site, Structure};
use crate::symmetry::{SpaceGroup, SymmOp};

/// 1-D chain along a: Li at x = 0 and x = 0.5 of a 6 Å cell (spacing 3 Å),
/// plus one O host atom far from the chain.
pub(crate) fn chain() -> Structure {
    Structure::new(
        Lattice::orthorhombic(6.0, 10.0, 10.0),
        vec![
            Site::new("Li", vector![0.0, 0.0, 0.0]),
            Site::new("O", vector![0.25, 0.5, 0.5]),
            Site::new("Li", vector![0.5, 0.0, 0.0]),
        ],
    )
}

/// 1-D chain with uneven spacing: Li at x = 0 and x = 0.4 of a 5 Å cell, so
/// the two hops are 2 Å and 3 Å long.
pub(crate) fn uneven_chain() -> Structure {
    Structure::new(
        Lattice::orthorhombic(5.0, 10.0, 10.0),
        vec![
            Site::new("Li", vector![0.0, 0.0, 0.0]),
            Site::new("Li", vector![0.4, 0.0, 0.0]),
        ],
    )
}

/// Square net of Li (a = b = 3 Å, c = 10 Å), one site per cell.
pub(crate) fn square_net() -> Structure {
    Structure::new(
        Lattice::orthorhombic(3.0, 3.0, 10.0),
        vec![Site::new("Li", vector![0.0, 0.0, 0.0])],
    )
}

/// Identity + mirror through x = 0.
pub(crate) fn mirror_x() -> SpaceGroup {
    SpaceGroup {
        ops: vec![SymmOp::identity(), SymmOp::mirror(0)],
        symprec: 1e-3,
    }
}
