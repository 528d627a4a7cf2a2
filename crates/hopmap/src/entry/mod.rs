//! Hop map built from computed entries.
//!
//! Purpose
//! - Start from an empty host (the base entry) and a set of relaxed structures
//!   each holding migrating cations at some positions.
//! - Map every cation structure back onto the host, generate all symmetry
//!   images of the cation sites, drop sites that collide with host atoms,
//!   merge near-duplicates, and build a [`FullPathMapper`] on host + sites.
//! - Optionally decorate the hops with charge-density integrals.
//!
//! Services
//! - Structure comparison ([`StructureMatcher`]), symmetry
//!   ([`SymmetryFinder`]) and the charge density
//!   ([`ChargeDensity`](crate::charge::ChargeDensity)) are plugged in by the
//!   caller; [`LatticeMatcher`] and [`VolumetricGrid`](crate::charge::VolumetricGrid)
//!   are the shipped defaults.

mod matcher;
mod sites;

pub use matcher::{LatticeMatcher, StructureMatcher};
pub use sites::{all_symmetry_sites, full_sites, ComputedEntry};

use serde::Serialize;
use tracing::info;

use crate::cfg::{ChargeCfg, EntryPathCfg, MapperCfg, PathCfg};
use crate::charge::{self, ChargeDensity};
use crate::error::Result;
use crate::lattice::Structure;
use crate::mapper::{FullPathMapper, HopRecord, HopStep};
use crate::symmetry::SymmetryFinder;

/// Entry-based hop map with optional charge density.
pub struct ComputedEntryPath {
    pub base_entry: ComputedEntry,
    /// Entries that matched the base structure.
    pub single_cat_entries: Vec<ComputedEntry>,
    pub full_sites: Structure,
    pub cfg: EntryPathCfg,
    mapper: FullPathMapper,
    density: Option<Box<dyn ChargeDensity>>,
}

impl ComputedEntryPath {
    /// Match, generate sites and build the map using [`LatticeMatcher`].
    pub fn new(
        base_entry: ComputedEntry,
        single_cat_entries: Vec<ComputedEntry>,
        migrating_specie: &str,
        cfg: EntryPathCfg,
        finder: &dyn SymmetryFinder,
    ) -> Result<Self> {
        let matcher = LatticeMatcher::new(&cfg, migrating_specie);
        Self::with_matcher(base_entry, single_cat_entries, migrating_specie, cfg, finder, &matcher)
    }

    pub fn with_matcher(
        base_entry: ComputedEntry,
        single_cat_entries: Vec<ComputedEntry>,
        migrating_specie: &str,
        cfg: EntryPathCfg,
        finder: &dyn SymmetryFinder,
        matcher: &dyn StructureMatcher,
    ) -> Result<Self> {
        let n_entries = single_cat_entries.len();
        let (fitted, translated): (Vec<ComputedEntry>, Vec<ComputedEntry>) = single_cat_entries
            .into_iter()
            .filter_map(|ent| {
                let structure = matcher.get_s2_like_s1(&base_entry.structure, &ent.structure)?;
                let moved = ComputedEntry {
                    structure,
                    ..ent.clone()
                };
                Some((ent, moved))
            })
            .unzip();
        info!(fitted = fitted.len(), total = n_entries, "entries matched to base");
        let sg = finder.analyze(&base_entry.structure, cfg.symprec);
        let sites = full_sites(&translated, &base_entry, migrating_specie, &sg);
        Self::assemble(base_entry, fitted, sites, migrating_specie, cfg, finder)
    }

    /// Build the map on precomputed cation sites, skipping matching and site generation.
    pub fn from_full_sites(
        base_entry: ComputedEntry,
        full_sites_struct: Structure,
        migrating_specie: &str,
        cfg: EntryPathCfg,
        finder: &dyn SymmetryFinder,
    ) -> Result<Self> {
        Self::assemble(base_entry, Vec::new(), full_sites_struct, migrating_specie, cfg, finder)
    }

    fn assemble(
        base_entry: ComputedEntry,
        single_cat_entries: Vec<ComputedEntry>,
        full_sites: Structure,
        migrating_specie: &str,
        cfg: EntryPathCfg,
        finder: &dyn SymmetryFinder,
    ) -> Result<Self> {
        let mut all_sites = full_sites.sites.clone();
        all_sites.extend(base_entry.structure.sites.iter().cloned());
        let structure = Structure::new(base_entry.structure.lattice.clone(), all_sites);
        let mapper_cfg = MapperCfg {
            max_path_length: cfg.max_path_length,
            symprec: cfg.symprec,
            vac_mode: false,
        };
        let mapper = FullPathMapper::new(structure, migrating_specie, mapper_cfg, finder)?
            .with_name(base_entry.entry_id.clone());
        Ok(Self {
            base_entry,
            single_cat_entries,
            full_sites,
            cfg,
            mapper,
            density: None,
        })
    }

    /// Attach the charge density used by the charge decoration.
    pub fn with_charge_density(mut self, density: impl ChargeDensity + 'static) -> Self {
        self.density = Some(Box::new(density));
        self
    }

    #[inline]
    pub fn mapper(&self) -> &FullPathMapper {
        &self.mapper
    }

    #[inline]
    pub fn mapper_mut(&mut self) -> &mut FullPathMapper {
        &mut self.mapper
    }

    pub fn populate_edges_with_chg_density_info(&mut self, cfg: ChargeCfg) -> Result<()> {
        charge::populate_edges_with_chg_density_info(&mut self.mapper, self.density.as_deref(), cfg)
    }

    /// Least-charge pathway over the unpruned graph.
    pub fn get_least_chg_path(&self) -> Result<Option<Vec<HopStep>>> {
        charge::get_least_chg_path(&self.mapper, PathCfg::default().max_val)
    }

    pub fn get_summary_dict(&self) -> EntryPathSummary {
        let inner = self.mapper.get_summary_dict();
        EntryPathSummary {
            base_task_id: self.base_entry.entry_id.clone(),
            base_structure: self.base_entry.structure.clone(),
            inserted_ids: self
                .single_cat_entries
                .iter()
                .map(|e| e.entry_id.clone())
                .collect(),
            migrating_specie: self.mapper.migrating_specie.clone(),
            max_path_length: self.cfg.max_path_length,
            ltol: self.cfg.ltol,
            stol: self.cfg.stol,
            angle_tol: self.cfg.angle_tol,
            full_sites_struct: self.full_sites.clone(),
            hops: inner.hops,
            unique_hops: inner.unique_hops,
        }
    }
}

/// Summary of an entry-based map, for persistence.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntryPathSummary {
    pub base_task_id: String,
    pub base_structure: Structure,
    pub inserted_ids: Vec<String>,
    pub migrating_specie: String,
    pub max_path_length: f64,
    pub ltol: f64,
    pub stol: f64,
    pub angle_tol: f64,
    pub full_sites_struct: Structure,
    pub hops: Vec<HopRecord>,
    pub unique_hops: Vec<HopRecord>,
}
