//! Flat, serializable view of a mapper.

use nalgebra::Vector3;
use serde::Serialize;

use crate::graph::{Attr, AttrMap, HopEdge, HopLabel};
use crate::lattice::Image;

use super::FullPathMapper;

/// Keys lifted into dedicated [`HopRecord`] fields.
const LIFTED_KEYS: [&str; 3] = ["max_avg_chg", "chg_total", "images"];

/// One hop of the summary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HopRecord {
    pub hop_label: HopLabel,
    pub iindex: usize,
    pub eindex: usize,
    pub to_jimage: Image,
    pub ipos: Vector3<f64>,
    pub epos: Vector3<f64>,
    pub ipos_cart: Vector3<f64>,
    pub epos_cart: Vector3<f64>,
    pub hop_distance: f64,
    pub cost: f64,
    pub max_avg_chg: Option<f64>,
    pub chg_total: Option<f64>,
    /// Interpolated positions along the hop; only on unique hops.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Attr>,
    /// Remaining decoration data.
    #[serde(flatten)]
    pub extra: AttrMap,
}

impl HopRecord {
    fn from_edge(e: &HopEdge, with_images: bool) -> Self {
        let extra = e
            .data
            .iter()
            .filter(|(k, _)| !LIFTED_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self {
            hop_label: e.hop_label,
            iindex: e.iindex,
            eindex: e.eindex,
            to_jimage: e.to_jimage,
            ipos: e.ipos,
            epos: e.epos,
            ipos_cart: e.ipos_cart,
            epos_cart: e.epos_cart,
            hop_distance: e.hop_distance,
            cost: e.cost,
            max_avg_chg: e.number("max_avg_chg"),
            chg_total: e.number("chg_total"),
            images: with_images.then(|| e.data.get("images").cloned()).flatten(),
            extra,
        }
    }
}

/// Every hop in graph order plus the unique hops in label order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapperSummary {
    pub name: Option<String>,
    pub migrating_specie: String,
    pub max_path_length: f64,
    pub symprec: f64,
    pub hops: Vec<HopRecord>,
    pub unique_hops: Vec<HopRecord>,
}

impl MapperSummary {
    pub(super) fn from_mapper(m: &FullPathMapper) -> Self {
        Self {
            name: m.name.clone(),
            migrating_specie: m.migrating_specie.clone(),
            max_path_length: m.cfg.max_path_length,
            symprec: m.cfg.symprec,
            hops: m
                .graph()
                .edges()
                .iter()
                .map(|e| HopRecord::from_edge(e, false))
                .collect(),
            unique_hops: m
                .unique_hops()
                .map(|(_, e)| HopRecord::from_edge(e, true))
                .collect(),
        }
    }
}
