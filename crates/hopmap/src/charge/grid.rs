//! Volumetric charge data on a periodic grid.

use nalgebra::Vector3;

use crate::error::{MapperError, Result};
use crate::hop::MigrationHop;
use crate::lattice::Structure;

/// External charge-density service.
///
/// `total` is laid out with the first axis slowest: value `(i, j, k)` lives at
/// `(i * nb + j) * nc + k` for a grid of shape `[na, nb, nc]`.
pub trait ChargeDensity {
    fn structure(&self) -> &Structure;
    fn grid_shape(&self) -> [usize; 3];
    fn total(&self) -> &[f64];

    #[inline]
    fn ngridpts(&self) -> usize {
        self.grid_shape().iter().product()
    }

    #[inline]
    fn volume(&self) -> f64 {
        self.structure().lattice.volume()
    }

    /// Positions of the migrating ion along `hop`: `n_images + 1` fractional
    /// points from `isite` to `esite`, both endpoints included.
    fn path_images(&self, hop: &MigrationHop, n_images: usize) -> Vec<Vector3<f64>> {
        let (a, b) = (hop.isite.frac_coords, hop.esite.frac_coords);
        let n = n_images.max(1);
        (0..=n)
            .map(|k| a + (b - a) * (k as f64 / n as f64))
            .collect()
    }
}

/// In-memory grid, e.g. an all-electron charge density read by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumetricGrid {
    structure: Structure,
    shape: [usize; 3],
    total: Vec<f64>,
}

impl VolumetricGrid {
    pub fn new(structure: Structure, shape: [usize; 3], total: Vec<f64>) -> Result<Self> {
        let expected = shape.iter().product();
        if total.len() != expected {
            return Err(MapperError::GridShapeMismatch {
                shape,
                expected,
                found: total.len(),
            });
        }
        Ok(Self {
            structure,
            shape,
            total,
        })
    }

    /// Grid filled by evaluating `f` at every cell-centred fractional point.
    pub fn from_fn<F>(structure: Structure, shape: [usize; 3], f: F) -> Self
    where
        F: Fn(&Vector3<f64>) -> f64,
    {
        let total = grid_frac_coords(shape).iter().map(f).collect();
        Self {
            structure,
            shape,
            total,
        }
    }
}

impl ChargeDensity for VolumetricGrid {
    fn structure(&self) -> &Structure {
        &self.structure
    }

    fn grid_shape(&self) -> [usize; 3] {
        self.shape
    }

    fn total(&self) -> &[f64] {
        &self.total
    }
}

/// Cell-centred fractional coordinates `((i + 0.5)/na, (j + 0.5)/nb, (k + 0.5)/nc)`
/// in the same order as [`ChargeDensity::total`].
pub fn grid_frac_coords(shape: [usize; 3]) -> Vec<Vector3<f64>> {
    let [na, nb, nc] = shape;
    let axis = |n: usize| -> Vec<f64> { (0..n).map(|i| (i as f64 + 0.5) / n as f64).collect() };
    let (aa, bb, cc) = (axis(na), axis(nb), axis(nc));
    let mut out = Vec::with_capacity(na * nb * nc);
    for &a in &aa {
        for &b in &bb {
            for &c in &cc {
                out.push(Vector3::new(a, b, c));
            }
        }
    }
    out
}
