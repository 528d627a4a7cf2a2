//! Data types of the periodic hop multigraph.
//!
//! Kept small and explicit so `build`, the classifier and the search engine
//! read easily.

use std::collections::{BTreeMap, BTreeSet};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::hop::MigrationHop;
use crate::lattice::Image;

/// Identifier types for clarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

/// Symmetry-equivalence class of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HopLabel(pub usize);

/// Attribute value attached to an edge by the decoration layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Attr {
    Number(f64),
    Text(String),
    /// Ordered, direction-dependent profile (e.g. charge sampled along the hop).
    /// Reversed when broadcast onto an edge of opposite orientation.
    List(Vec<Attr>),
    /// Fixed-layout numeric block (e.g. a position). Has no direction.
    Array(Vec<f64>),
    Map(BTreeMap<String, Attr>),
}

impl Attr {
    /// Direction-dependent list of numbers.
    pub fn profile(values: impl IntoIterator<Item = f64>) -> Self {
        Attr::List(values.into_iter().map(Attr::Number).collect())
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Attr::Number(x) => Some(*x),
            _ => None,
        }
    }
}

impl From<f64> for Attr {
    fn from(x: f64) -> Self {
        Attr::Number(x)
    }
}

impl From<&str> for Attr {
    fn from(s: &str) -> Self {
        Attr::Text(s.to_string())
    }
}

impl From<Vector3<f64>> for Attr {
    fn from(v: Vector3<f64>) -> Self {
        Attr::Array(v.iter().copied().collect())
    }
}

pub type AttrMap = BTreeMap<String, Attr>;

/// One hop of the multigraph, stored once with `iindex <= eindex`.
///
/// The physical hop runs from site `iindex` in the reference cell to site
/// `eindex` in image `to_jimage`; the reverse hop is `(eindex, iindex, -to_jimage)`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HopEdge {
    pub iindex: usize,
    pub eindex: usize,
    pub to_jimage: Image,
    pub ipos: Vector3<f64>,
    pub epos: Vector3<f64>,
    pub ipos_cart: Vector3<f64>,
    pub epos_cart: Vector3<f64>,
    pub hop: MigrationHop,
    pub hop_distance: f64,
    pub hop_label: HopLabel,
    /// Search weight; starts as `hop_distance`.
    pub cost: f64,
    /// Decoration data (charge integrals, energies, ...).
    pub data: AttrMap,
}

impl HopEdge {
    /// Attribute lookup covering the built-in scalars and the decoration data.
    pub fn value(&self, key: &str) -> Option<Attr> {
        match key {
            "hop_distance" => Some(Attr::Number(self.hop_distance)),
            "cost" => Some(Attr::Number(self.cost)),
            _ => self.data.get(key).cloned(),
        }
    }

    /// Numeric decoration value, if present and numeric.
    #[inline]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.value(key).and_then(|a| a.as_number())
    }

    #[inline]
    pub fn crosses_cell(&self) -> bool {
        !self.to_jimage.is_zero()
    }
}

/// Traversal entry of the adjacency list: from the owning node, edge `edge`
/// leads to `to` in image `image` (relative to the owner's image).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Adjacent {
    pub to: usize,
    pub image: Image,
    pub edge: EdgeId,
}

/// Periodic multigraph over the candidate sites of one reference cell.
///
/// Adjacency lists hold both traversal directions of every edge and are
/// rebuilt whenever the edge set changes.
#[derive(Clone, Debug, Default)]
pub struct HopGraph {
    num_nodes: usize,
    edges: Vec<HopEdge>,
    adj: Vec<Vec<Adjacent>>,
}

impl HopGraph {
    pub fn from_edges(num_nodes: usize, edges: Vec<HopEdge>) -> Self {
        let mut adj = vec![Vec::new(); num_nodes];
        for (k, e) in edges.iter().enumerate() {
            adj[e.iindex].push(Adjacent {
                to: e.eindex,
                image: e.to_jimage,
                edge: EdgeId(k),
            });
            adj[e.eindex].push(Adjacent {
                to: e.iindex,
                image: -e.to_jimage,
                edge: EdgeId(k),
            });
        }
        Self {
            num_nodes,
            edges,
            adj,
        }
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn edges(&self) -> &[HopEdge] {
        &self.edges
    }

    /// Mutable edge data; the edge set itself is fixed.
    #[inline]
    pub(crate) fn edges_mut(&mut self) -> &mut [HopEdge] {
        &mut self.edges
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &HopEdge {
        &self.edges[id.0]
    }

    #[inline]
    pub fn adjacent(&self, node: usize) -> &[Adjacent] {
        &self.adj[node]
    }

    /// Edges stored as `(a, b)` (callers sort the pair first).
    pub fn edges_between(&self, a: usize, b: usize) -> impl Iterator<Item = (EdgeId, &HopEdge)> {
        self.edges
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.iindex == a && e.eindex == b)
            .map(|(k, e)| (EdgeId(k), e))
    }

    /// Edges carrying `label`.
    pub fn edges_with_label(&self, label: HopLabel) -> impl Iterator<Item = (EdgeId, &HopEdge)> {
        self.edges
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.hop_label == label)
            .map(|(k, e)| (EdgeId(k), e))
    }

    pub fn labels(&self) -> BTreeSet<HopLabel> {
        self.edges.iter().map(|e| e.hop_label).collect()
    }

    /// Value copy without the edges whose cost exceeds `max_cost`.
    pub fn pruned(&self, max_cost: f64) -> HopGraph {
        let kept = self
            .edges
            .iter()
            .filter(|e| e.cost <= max_cost)
            .cloned()
            .collect();
        HopGraph::from_edges(self.num_nodes, kept)
    }
}
