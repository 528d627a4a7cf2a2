//! Symmetry operations in fractional coordinates and the equivalence test.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::lattice::{Site, Structure};

/// Space-group operation `f ↦ R f + t` acting on fractional coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "SymmOpRepr", into = "SymmOpRepr")]
pub struct SymmOp {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

#[derive(Serialize, Deserialize)]
struct SymmOpRepr {
    rotation: [[f64; 3]; 3],
    #[serde(default)]
    translation: [f64; 3],
}

impl From<SymmOpRepr> for SymmOp {
    fn from(r: SymmOpRepr) -> Self {
        let m = r.rotation;
        Self {
            rotation: Matrix3::new(
                m[0][0], m[0][1], m[0][2], //
                m[1][0], m[1][1], m[1][2], //
                m[2][0], m[2][1], m[2][2],
            ),
            translation: Vector3::from(r.translation),
        }
    }
}

impl From<SymmOp> for SymmOpRepr {
    fn from(op: SymmOp) -> Self {
        let m = op.rotation;
        Self {
            rotation: [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
                [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
            ],
            translation: [op.translation.x, op.translation.y, op.translation.z],
        }
    }
}

impl SymmOp {
    #[inline]
    pub fn new(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros())
    }

    /// Pure lattice-fraction translation.
    #[inline]
    pub fn translation(t: Vector3<f64>) -> Self {
        Self::new(Matrix3::identity(), t)
    }

    /// Mirror `x ↦ -x` along fractional axis `axis`.
    pub fn mirror(axis: usize) -> Self {
        let mut r = Matrix3::identity();
        r[(axis, axis)] = -1.0;
        Self::new(r, Vector3::zeros())
    }

    #[inline]
    pub fn inversion() -> Self {
        Self::new(-Matrix3::identity(), Vector3::zeros())
    }

    #[inline]
    pub fn operate(&self, frac: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * frac + self.translation
    }

    #[inline]
    pub fn apply(&self, site: &Site) -> Site {
        Site {
            frac_coords: self.operate(&site.frac_coords),
            ..site.clone()
        }
    }
}

/// Operations of a space group together with the precision they were found at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpaceGroup {
    pub ops: Vec<SymmOp>,
    /// Fractional tolerance for "same site up to a lattice translation".
    pub symprec: f64,
}

impl SpaceGroup {
    /// Group containing only the identity (P1).
    pub fn trivial(symprec: f64) -> Self {
        Self {
            ops: vec![SymmOp::identity()],
            symprec,
        }
    }

    /// `true` if some operation maps every site of `sites2` onto a periodic
    /// image of a site in `sites1`.
    pub fn are_symmetrically_equivalent(&self, sites1: &[Site], sites2: &[Site]) -> bool {
        self.ops.iter().any(|op| {
            sites2.iter().all(|s2| {
                let moved = op.apply(s2);
                sites1
                    .iter()
                    .any(|s1| is_periodic_image(s1, &moved, self.symprec))
            })
        })
    }
}

/// Same species and fractional coordinates equal up to an integer translation.
#[inline]
pub fn is_periodic_image(a: &Site, b: &Site, tol: f64) -> bool {
    if a.species != b.species {
        return false;
    }
    let d = b.frac_coords - a.frac_coords;
    d.iter().all(|x| (x - x.round()).abs() <= tol)
}

/// External symmetry service: finds the operations of a structure.
///
/// Space-group discovery is out of scope for this crate; callers plug in an
/// analyzer or hand over known operations through [`FixedOps`].
pub trait SymmetryFinder {
    fn analyze(&self, structure: &Structure, symprec: f64) -> SpaceGroup;
}

/// Symmetry service returning a fixed, caller-supplied list of operations.
#[derive(Clone, Debug, Default)]
pub struct FixedOps(pub Vec<SymmOp>);

impl SymmetryFinder for FixedOps {
    fn analyze(&self, _structure: &Structure, symprec: f64) -> SpaceGroup {
        if self.0.is_empty() {
            return SpaceGroup::trivial(symprec);
        }
        SpaceGroup {
            ops: self.0.clone(),
            symprec,
        }
    }
}
