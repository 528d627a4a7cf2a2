//! Lattice, site and structure types.
//!
//! - `Lattice`: rows of `matrix` are the lattice vectors a, b, c (Å).
//!   Cartesian = `matrixᵀ · frac`.
//! - `Site`: species label + fractional coordinates (+ optional insertion energy).
//! - `Structure`: lattice + sites; owns its sites.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use super::Image;
use crate::error::{MapperError, Result};

/// Periodic lattice. Serialized as three row vectors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[[f64; 3]; 3]", into = "[[f64; 3]; 3]")]
pub struct Lattice {
    pub matrix: Matrix3<f64>,
}

impl From<[[f64; 3]; 3]> for Lattice {
    fn from(rows: [[f64; 3]; 3]) -> Self {
        Self::from_rows(rows)
    }
}

impl From<Lattice> for [[f64; 3]; 3] {
    fn from(l: Lattice) -> Self {
        let m = l.matrix;
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ]
    }
}

impl Lattice {
    #[inline]
    pub fn new(matrix: Matrix3<f64>) -> Self {
        Self { matrix }
    }

    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self {
            matrix: Matrix3::new(
                rows[0][0], rows[0][1], rows[0][2], //
                rows[1][0], rows[1][1], rows[1][2], //
                rows[2][0], rows[2][1], rows[2][2],
            ),
        }
    }

    #[inline]
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Self {
        Self::new(Matrix3::from_diagonal(&Vector3::new(a, b, c)))
    }

    #[inline]
    pub fn cubic(a: f64) -> Self {
        Self::orthorhombic(a, a, a)
    }

    /// Lattice vector `i` (0 = a, 1 = b, 2 = c).
    #[inline]
    pub fn vector(&self, i: usize) -> Vector3<f64> {
        self.matrix.row(i).transpose()
    }

    #[inline]
    pub fn cart_coords(&self, frac: &Vector3<f64>) -> Vector3<f64> {
        self.matrix.transpose() * frac
    }

    pub fn frac_coords(&self, cart: &Vector3<f64>) -> Result<Vector3<f64>> {
        let inv = self
            .matrix
            .transpose()
            .try_inverse()
            .ok_or(MapperError::SingularLattice)?;
        Ok(inv * cart)
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.matrix.determinant().abs()
    }

    /// Lattice parameters |a|, |b|, |c|.
    pub fn abc(&self) -> [f64; 3] {
        [
            self.vector(0).norm(),
            self.vector(1).norm(),
            self.vector(2).norm(),
        ]
    }

    /// Lattice angles α (b,c), β (a,c), γ (a,b) in degrees.
    pub fn angles(&self) -> [f64; 3] {
        let angle = |u: Vector3<f64>, v: Vector3<f64>| {
            (u.dot(&v) / (u.norm() * v.norm()))
                .clamp(-1.0, 1.0)
                .acos()
                .to_degrees()
        };
        let (a, b, c) = (self.vector(0), self.vector(1), self.vector(2));
        [angle(b, c), angle(a, c), angle(a, b)]
    }

    /// Minimum-image distance between two fractional positions.
    ///
    /// Returns the distance and the image `j` such that `f2 + j` is the copy of
    /// `f2` closest to `f1`.
    pub fn pbc_distance(&self, f1: &Vector3<f64>, f2: &Vector3<f64>) -> (f64, Image) {
        let d = f2 - f1;
        let base = -Image::round_from(&d);
        let mut best = (f64::INFINITY, base);
        // Rounding is exact for orthogonal cells; scan the shell for skewed ones.
        for i in -1..=1 {
            for j in -1..=1 {
                for k in -1..=1 {
                    let img = base + Image::new(i, j, k);
                    let dist = self.cart_coords(&(d + img.to_vector())).norm();
                    if dist < best.0 {
                        best = (dist, img);
                    }
                }
            }
        }
        best
    }
}

/// A site of a periodic structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub species: String,
    pub frac_coords: Vector3<f64>,
    /// Insertion energy per cation (eV) when the site comes from a computed entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_energy: Option<f64>,
}

impl Site {
    #[inline]
    pub fn new(species: impl Into<String>, frac_coords: Vector3<f64>) -> Self {
        Self {
            species: species.into(),
            frac_coords,
            inserted_energy: None,
        }
    }

    /// Same site moved to another periodic image.
    #[inline]
    pub fn translated(&self, image: Image) -> Self {
        Self {
            frac_coords: self.frac_coords + image.to_vector(),
            ..self.clone()
        }
    }

    /// Fractional coordinates folded into `[0, 1)`.
    #[inline]
    pub fn wrapped(&self) -> Self {
        Self {
            frac_coords: wrap_frac(&self.frac_coords),
            ..self.clone()
        }
    }
}

/// How clustered sites are merged by [`Structure::merge_sites`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeMode {
    /// Keep the first site of each cluster.
    Delete,
    /// Replace each cluster by its (periodically unwrapped) mean position.
    Average,
}

/// Periodic structure: lattice plus owned sites.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub lattice: Lattice,
    pub sites: Vec<Site>,
}

impl Structure {
    #[inline]
    pub fn new(lattice: Lattice, sites: Vec<Site>) -> Self {
        Self { lattice, sites }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    #[inline]
    pub fn cart_coords(&self, i: usize) -> Vector3<f64> {
        self.lattice.cart_coords(&self.sites[i].frac_coords)
    }

    /// Copy holding only the sites of `species`, in their original order.
    pub fn only_species(&self, species: &str) -> Structure {
        Structure {
            lattice: self.lattice.clone(),
            sites: self
                .sites
                .iter()
                .filter(|s| s.species == species)
                .cloned()
                .collect(),
        }
    }

    /// Sites whose minimum-image distance to `frac` is below `r`, with that distance.
    pub fn sites_in_sphere(&self, frac: &Vector3<f64>, r: f64) -> Vec<(usize, f64)> {
        self.sites
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                let (d, _) = self.lattice.pbc_distance(frac, &s.frac_coords);
                (d < r).then_some((i, d))
            })
            .collect()
    }

    /// Cluster sites closer than `tol` (Å) and collapse each cluster.
    ///
    /// Clusters are formed greedily in site order against the first member of
    /// each cluster.
    pub fn merge_sites(&mut self, tol: f64, mode: MergeMode) {
        let mut clusters: Vec<Vec<Site>> = Vec::new();
        for site in self.sites.drain(..) {
            let hit = clusters.iter_mut().find(|c| {
                let (d, _) = self.lattice.pbc_distance(&c[0].frac_coords, &site.frac_coords);
                c[0].species == site.species && d < tol
            });
            match hit {
                Some(c) => {
                    // Store the member at the image closest to the cluster head.
                    let (_, img) = self.lattice.pbc_distance(&c[0].frac_coords, &site.frac_coords);
                    c.push(site.translated(img));
                }
                None => clusters.push(vec![site]),
            }
        }
        self.sites = clusters
            .into_iter()
            .map(|c| match mode {
                MergeMode::Delete => c[0].clone(),
                MergeMode::Average => average_cluster(&c),
            })
            .collect();
    }
}

fn average_cluster(cluster: &[Site]) -> Site {
    let n = cluster.len() as f64;
    let mean = cluster
        .iter()
        .fold(Vector3::zeros(), |acc, s| acc + s.frac_coords)
        / n;
    let energies: Vec<f64> = cluster.iter().filter_map(|s| s.inserted_energy).collect();
    let inserted_energy =
        (!energies.is_empty()).then(|| energies.iter().sum::<f64>() / energies.len() as f64);
    Site {
        species: cluster[0].species.clone(),
        frac_coords: wrap_frac(&mean),
        inserted_energy,
    }
}

/// Fold fractional coordinates into `[0, 1)`.
#[inline]
pub fn wrap_frac(f: &Vector3<f64>) -> Vector3<f64> {
    f.map(|x| {
        let w = x - x.floor();
        // x.floor() can round a tiny negative up to 1.0
        if w >= 1.0 {
            0.0
        } else {
            w
        }
    })
}
