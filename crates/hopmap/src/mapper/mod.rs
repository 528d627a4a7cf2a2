//! Full hop map of a structure: labeled graph, unique hops, decoration.
//!
//! Purpose
//! - Own the periodic hop graph of one structure together with its symmetry
//!   context, label every edge with its equivalence class, and keep one
//!   representative edge per class.
//! - Decorate classes with physical data (costs, charge integrals) and extract
//!   percolating pathways from the decorated graph.
//!
//! Ownership
//! - `FullPathMapper` is the single owner of the graph. Decoration goes through
//!   `&mut self`; there is no interior mutability, so concurrent decoration is
//!   ruled out by the borrow checker rather than by convention.
//! - Query results (paths, summaries) are fresh values and never alias the graph.

mod pathway;
mod summary;

pub use pathway::{get_hop_site_sequence, modify_path, modify_paths, HopStep, IntercollatingPaths};
pub use summary::{HopRecord, MapperSummary};

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::cfg::{MapperCfg, PathCfg};
use crate::error::{MapperError, Result};
use crate::graph::{build_graph, Attr, AttrMap, EdgeId, HopEdge, HopGraph, HopLabel};
use crate::group::generic_groupby;
use crate::hop::MigrationHop;
use crate::lattice::Structure;
use crate::neighbors::{CutoffNeighbors, NeighborSearch};
use crate::symmetry::{SpaceGroup, SymmetryFinder};

/// Every hop of the migrating species in a structure, grouped by symmetry.
#[derive(Clone, Debug)]
pub struct FullPathMapper {
    pub structure: Structure,
    pub migrating_specie: String,
    pub cfg: MapperCfg,
    pub name: Option<String>,
    symm: SpaceGroup,
    only_sites: Structure,
    graph: HopGraph,
    unique_hops: BTreeMap<HopLabel, EdgeId>,
}

impl FullPathMapper {
    /// Build, label and index the hop graph using the default neighbor search.
    pub fn new(
        structure: Structure,
        migrating_specie: &str,
        cfg: MapperCfg,
        finder: &dyn SymmetryFinder,
    ) -> Result<Self> {
        Self::with_neighbor_search(structure, migrating_specie, cfg, finder, &CutoffNeighbors)
    }

    pub fn with_neighbor_search(
        structure: Structure,
        migrating_specie: &str,
        cfg: MapperCfg,
        finder: &dyn SymmetryFinder,
        nn: &dyn NeighborSearch,
    ) -> Result<Self> {
        if cfg.vac_mode {
            return Err(MapperError::VacancyModeUnsupported);
        }
        let symm = finder.analyze(&structure, cfg.symprec);
        let only_sites = structure.only_species(migrating_specie);
        let mut graph = build_graph(&only_sites, cfg.max_path_length, nn);
        let n_labels = group_and_label_hops(&mut graph, &symm);
        let unique_hops = representatives(&graph);
        info!(
            specie = migrating_specie,
            sites = only_sites.len(),
            hops = graph.num_edges(),
            unique = n_labels,
            "hop map built"
        );
        Ok(Self {
            structure,
            migrating_specie: migrating_specie.to_string(),
            cfg,
            name: None,
            symm,
            only_sites,
            graph,
            unique_hops,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[inline]
    pub fn graph(&self) -> &HopGraph {
        &self.graph
    }

    #[inline]
    pub fn symmetry(&self) -> &SpaceGroup {
        &self.symm
    }

    /// Candidate sites of the migrating species (the graph's nodes).
    #[inline]
    pub fn only_sites(&self) -> &Structure {
        &self.only_sites
    }

    #[inline]
    pub fn num_unique_hops(&self) -> usize {
        self.unique_hops.len()
    }

    /// Representative edge of every label, ordered by label.
    pub fn unique_hops(&self) -> impl Iterator<Item = (HopLabel, &HopEdge)> {
        self.unique_hops
            .iter()
            .map(|(&label, &id)| (label, self.graph.edge(id)))
    }

    pub fn unique_hop(&self, label: HopLabel) -> Option<&HopEdge> {
        self.unique_hops.get(&label).map(|&id| self.graph.edge(id))
    }

    pub(crate) fn unique_hop_mut(&mut self, label: HopLabel) -> Option<&mut HopEdge> {
        let id = *self.unique_hops.get(&label)?;
        self.graph.edges_mut().get_mut(id.0)
    }

    /// Insert `data` on every edge labeled `target_label`.
    ///
    /// With a reference hop, edges whose initial site is not symmetry-equivalent
    /// to the reference's initial site run the other way: their copies of
    /// list values are reversed. Array values cannot be flipped meaningfully, so
    /// they make the whole call fail before any edge is touched. A numeric
    /// `"cost"` entry sets the search weight. Returns the number of edges updated.
    pub fn add_data_to_similar_edges(
        &mut self,
        target_label: HopLabel,
        data: &AttrMap,
        m_hop: Option<&MigrationHop>,
    ) -> Result<usize> {
        if !self.unique_hops.contains_key(&target_label) {
            return Err(MapperError::UnknownLabel(target_label));
        }
        let targets: Vec<(EdgeId, bool)> = self
            .graph
            .edges_with_label(target_label)
            .map(|(id, e)| {
                let flip = m_hop.is_some_and(|r| {
                    !self
                        .symm
                        .are_symmetrically_equivalent(&[r.isite.clone()], &[e.hop.isite.clone()])
                });
                (id, flip)
            })
            .collect();
        if targets.iter().any(|(_, flip)| *flip) {
            if let Some((k, _)) = data.iter().find(|(_, v)| matches!(v, Attr::Array(_))) {
                return Err(MapperError::AmbiguousFlip { key: k.clone() });
            }
        }
        let edges = self.graph.edges_mut();
        for &(id, flip) in &targets {
            let e = &mut edges[id.0];
            for (k, v) in data {
                match (k.as_str(), v) {
                    ("cost", Attr::Number(x)) => e.cost = *x,
                    (_, Attr::List(items)) if flip => {
                        e.data
                            .insert(k.clone(), Attr::List(items.iter().rev().cloned().collect()));
                    }
                    _ => {
                        e.data.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        debug!(label = target_label.0, edges = targets.len(), keys = data.len(), "edges decorated");
        Ok(targets.len())
    }

    /// Set `cost` on every edge to the product of `cost_keys` read from its
    /// label's representative.
    pub fn assign_cost_to_graph(&mut self, cost_keys: &[&str]) -> Result<()> {
        let mut costs = Vec::with_capacity(self.unique_hops.len());
        for (label, rep) in self.unique_hops() {
            let mut cost = 1.0;
            for &key in cost_keys {
                let value = rep.value(key).ok_or_else(|| MapperError::MissingAttribute {
                    label,
                    key: key.to_string(),
                })?;
                cost *= value
                    .as_number()
                    .ok_or_else(|| MapperError::NonNumericAttribute {
                        label,
                        key: key.to_string(),
                    })?;
            }
            costs.push((label, cost));
        }
        for (label, cost) in costs {
            let data = AttrMap::from([("cost".to_string(), Attr::Number(cost))]);
            self.add_data_to_similar_edges(label, &data, None)?;
        }
        Ok(())
    }

    /// Lazily extract, per node, the cheapest route that leaves the reference
    /// cell and comes back to the same node in a neighboring cell.
    ///
    /// Each call starts a fresh pass; nodes without such a route are skipped.
    pub fn get_intercollating_path(&self, max_val: f64) -> IntercollatingPaths<'_> {
        IntercollatingPaths::new(
            self,
            PathCfg {
                max_val,
                ..PathCfg::default()
            },
        )
    }

    /// Same as [`Self::get_intercollating_path`] with an explicit config.
    pub fn intercollating_paths(&self, cfg: PathCfg) -> IntercollatingPaths<'_> {
        IntercollatingPaths::new(self, cfg)
    }

    /// Flat, serializable view of all hops and unique hops.
    pub fn get_summary_dict(&self) -> MapperSummary {
        MapperSummary::from_mapper(self)
    }
}

/// Label every edge by symmetry equivalence of its hop; returns the number of labels.
pub fn group_and_label_hops(graph: &mut HopGraph, symm: &SpaceGroup) -> usize {
    let labels = generic_groupby(graph.edges(), |a, b| a.hop.is_equivalent(&b.hop, symm));
    for (e, l) in graph.edges_mut().iter_mut().zip(&labels) {
        e.hop_label = HopLabel(*l);
    }
    labels.iter().copied().max().map_or(0, |m| m + 1)
}

/// First edge (in graph order) of every label.
fn representatives(graph: &HopGraph) -> BTreeMap<HopLabel, EdgeId> {
    let mut out = BTreeMap::new();
    for (k, e) in graph.edges().iter().enumerate() {
        out.entry(e.hop_label).or_insert(EdgeId(k));
    }
    out
}

#[cfg(test)]
mod tests;
