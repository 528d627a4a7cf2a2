//! Integer lattice-image offsets.

use std::ops::{Add, AddAssign, Neg, Sub};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Number of lattice repeats along (a, b, c) separating a periodic image from the
/// reference cell.
///
/// Ordered lexicographically so search results iterate deterministically.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Image(pub [i32; 3]);

impl Image {
    pub const ZERO: Image = Image([0, 0, 0]);

    #[inline]
    pub fn new(a: i32, b: i32, c: i32) -> Self {
        Self([a, b, c])
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == [0, 0, 0]
    }

    /// Largest absolute component.
    #[inline]
    pub fn max_abs(&self) -> i32 {
        self.0.iter().map(|c| c.abs()).max().unwrap_or(0)
    }

    #[inline]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.0[0] as f64, self.0[1] as f64, self.0[2] as f64)
    }

    /// Round a fractional displacement to the nearest image.
    #[inline]
    pub fn round_from(v: &Vector3<f64>) -> Self {
        Self([v.x.round() as i32, v.y.round() as i32, v.z.round() as i32])
    }

    /// Representative of `{self, -self}` whose first non-zero component is positive.
    ///
    /// A self-loop `(u, u, img)` and `(u, u, -img)` are the same hop; this picks
    /// the stored one.
    #[inline]
    pub fn sign_canonical(self) -> Self {
        match self.0.iter().find(|c| **c != 0) {
            Some(c) if *c < 0 => -self,
            _ => self,
        }
    }
}

impl From<[i32; 3]> for Image {
    fn from(v: [i32; 3]) -> Self {
        Self(v)
    }
}

impl Add for Image {
    type Output = Image;
    #[inline]
    fn add(self, rhs: Image) -> Image {
        Image([
            self.0[0] + rhs.0[0],
            self.0[1] + rhs.0[1],
            self.0[2] + rhs.0[2],
        ])
    }
}

impl AddAssign for Image {
    #[inline]
    fn add_assign(&mut self, rhs: Image) {
        *self = *self + rhs;
    }
}

impl Sub for Image {
    type Output = Image;
    #[inline]
    fn sub(self, rhs: Image) -> Image {
        self + (-rhs)
    }
}

impl Neg for Image {
    type Output = Image;
    #[inline]
    fn neg(self) -> Image {
        Image([-self.0[0], -self.0[1], -self.0[2]])
    }
}
