//! Charge integrals along hops and their broadcast onto a hop map.

use std::collections::BTreeMap;

use nalgebra::Vector3;
use tracing::{debug, info};

use crate::cfg::{ChargeCfg, COINCIDENT_EPS};
use crate::error::{MapperError, Result};
use crate::graph::{Attr, AttrMap, HopLabel};
use crate::hop::MigrationHop;
use crate::lattice::Image;
use crate::mapper::{FullPathMapper, HopStep};

use super::grid::{grid_frac_coords, ChargeDensity};

/// Averaged charge sampled along one hop.
#[derive(Clone, Debug, PartialEq)]
pub struct ChargeProfile {
    /// Largest sphere average along the hop.
    pub max: f64,
    pub averages: Vec<f64>,
    pub positions: Vec<Vector3<f64>>,
}

impl ChargeProfile {
    /// `[{position, average_charge}, ...]`, as stored on representative edges.
    pub fn to_images_attr(&self) -> Attr {
        Attr::List(
            self.positions
                .iter()
                .zip(&self.averages)
                .map(|(p, c)| {
                    Attr::Map(BTreeMap::from([
                        ("position".to_string(), Attr::from(*p)),
                        ("average_charge".to_string(), Attr::Number(*c)),
                    ]))
                })
                .collect(),
        )
    }
}

/// Charge density plus its precomputed grid coordinates.
pub struct ChargeGrid<'a> {
    density: &'a dyn ChargeDensity,
    fcoords: Vec<Vector3<f64>>,
}

impl<'a> ChargeGrid<'a> {
    pub fn new(density: &'a dyn ChargeDensity) -> Self {
        Self {
            density,
            fcoords: grid_frac_coords(density.grid_shape()),
        }
    }

    /// Charge inside a cylinder of `radius` around the hop segment, divided by
    /// the number of grid points and the cell volume.
    ///
    /// Grid points of the 27 cells around the reference cell are tested, so
    /// tubes longer than one cell are cropped.
    pub fn chg_between_sites_tube(&self, hop: &MigrationHop, radius: f64) -> Result<f64> {
        if radius <= 0.0 {
            return Err(MapperError::NonPositiveRadius { radius });
        }
        let lattice = &self.density.structure().lattice;
        let ipos = lattice.cart_coords(&hop.isite.frac_coords);
        let seg = lattice.cart_coords(&hop.esite.frac_coords) - ipos;
        let len = seg.norm();
        if len < COINCIDENT_EPS {
            return Ok(0.0);
        }
        let axis = seg / len;
        let total = self.density.total();
        let mut sum = 0.0;
        for (f, &chg) in self.fcoords.iter().zip(total) {
            let inside = neighbor_images().any(|img| {
                let rel = lattice.cart_coords(&(f + img.to_vector())) - ipos;
                let proj = rel.dot(&axis);
                proj >= 0.0 && proj < len && rel.cross(&axis).norm() < radius
            });
            if inside {
                sum += chg;
            }
        }
        Ok(sum / self.density.ngridpts() as f64 / self.density.volume())
    }

    /// Sphere-averaged charge at each of the `n_images + 1` positions along
    /// the hop. A sphere that contains no grid point averages to 0.
    pub fn avg_chg_at_max(
        &self,
        hop: &MigrationHop,
        radius: f64,
        n_images: usize,
    ) -> Result<ChargeProfile> {
        if radius <= 0.0 {
            return Err(MapperError::NonPositiveRadius { radius });
        }
        let lattice = &self.density.structure().lattice;
        let total = self.density.total();
        let volume = self.density.volume();
        let positions = self.density.path_images(hop, n_images);
        let averages: Vec<f64> = positions
            .iter()
            .map(|c| {
                let (count, sum) = self
                    .fcoords
                    .iter()
                    .zip(total)
                    .filter(|(f, _)| lattice.pbc_distance(f, c).0 < radius)
                    .fold((0usize, 0.0), |(n, s), (_, &chg)| (n + 1, s + chg));
                if count == 0 {
                    0.0
                } else {
                    // sum / ngridpts / (volume * count / ngridpts)
                    sum / (volume * count as f64)
                }
            })
            .collect();
        let max = averages.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok(ChargeProfile {
            max,
            averages,
            positions,
        })
    }
}

fn neighbor_images() -> impl Iterator<Item = Image> {
    (-1..=1).flat_map(|a| (-1..=1).flat_map(move |b| (-1..=1).map(move |c| Image::new(a, b, c))))
}

/// Decorate every label of `mapper` with its charge integrals.
///
/// Every edge receives `chg_total` (0 without a density). With a density,
/// every edge also receives `max_avg_chg`, and the representative stores the
/// sampled profile under `images`.
pub fn populate_edges_with_chg_density_info(
    mapper: &mut FullPathMapper,
    density: Option<&dyn ChargeDensity>,
    cfg: ChargeCfg,
) -> Result<()> {
    let grid = density.map(ChargeGrid::new);
    let reps: Vec<(HopLabel, MigrationHop)> = mapper
        .unique_hops()
        .map(|(label, e)| (label, e.hop.clone()))
        .collect();
    for (label, hop) in reps {
        let chg_total = match &grid {
            Some(g) => g.chg_between_sites_tube(&hop, cfg.tube_radius)?,
            None => 0.0,
        };
        let mut data = AttrMap::from([("chg_total".to_string(), Attr::Number(chg_total))]);
        if let Some(g) = &grid {
            let profile = g.avg_chg_at_max(&hop, cfg.tube_radius, cfg.n_images)?;
            data.insert("max_avg_chg".to_string(), Attr::Number(profile.max));
            if let Some(rep) = mapper.unique_hop_mut(label) {
                rep.data.insert("images".to_string(), profile.to_images_attr());
            }
        }
        mapper.add_data_to_similar_edges(label, &data, None)?;
        debug!(label = label.0, chg_total, "charge decoration");
    }
    info!(
        labels = mapper.num_unique_hops(),
        with_grid = density.is_some(),
        "edges populated with charge density info"
    );
    Ok(())
}

/// Among the extracted pathways, the one with the least charge per unit
/// length, `Σ chg_total / Σ hop length`. `None` when nothing percolates.
pub fn get_least_chg_path(mapper: &FullPathMapper, max_val: f64) -> Result<Option<Vec<HopStep>>> {
    let mut best: Option<(f64, Vec<HopStep>)> = None;
    for item in mapper.get_intercollating_path(max_val) {
        let (_, path) = item?;
        let mut sum_chg = 0.0;
        let mut sum_len = 0.0;
        for h in &path {
            let e = mapper.graph().edge(h.edge);
            sum_chg += e
                .number("chg_total")
                .ok_or_else(|| MapperError::MissingAttribute {
                    label: e.hop_label,
                    key: "chg_total".to_string(),
                })?;
            sum_len += e.hop_distance;
        }
        let avg = sum_chg / sum_len;
        if best.as_ref().map_or(true, |(b, _)| avg < *b) {
            best = Some((avg, path));
        }
    }
    Ok(best.map(|(_, p)| p))
}
