//! JSON job description: the structure to map and how to map it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use hopmap::api::{FixedOps, Structure, SymmOp};
use hopmap::{FullPathMapper, MapperCfg};
use serde::Deserialize;

/// Input of the `hops` and `paths` subcommands.
///
/// `ops` are the symmetry operations of the structure in fractional
/// coordinates; an empty list means P1.
#[derive(Debug, Deserialize)]
pub struct Job {
    pub structure: Structure,
    pub migrating_specie: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ops: Vec<SymmOp>,
    #[serde(default)]
    pub max_path_length: Option<f64>,
    #[serde(default)]
    pub symprec: Option<f64>,
    /// Attributes multiplied into each edge cost; empty keeps `hop_distance`.
    #[serde(default)]
    pub cost_keys: Vec<String>,
}

impl Job {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading job {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing job {}", path.display()))
    }

    pub fn mapper_cfg(&self) -> MapperCfg {
        let d = MapperCfg::default();
        MapperCfg {
            max_path_length: self.max_path_length.unwrap_or(d.max_path_length),
            symprec: self.symprec.unwrap_or(d.symprec),
            vac_mode: false,
        }
    }

    /// Build the mapper and apply the configured costs.
    pub fn build(&self) -> Result<FullPathMapper> {
        let mut m = FullPathMapper::new(
            self.structure.clone(),
            &self.migrating_specie,
            self.mapper_cfg(),
            &FixedOps(self.ops.clone()),
        )?;
        if let Some(name) = &self.name {
            m = m.with_name(name.clone());
        }
        if !self.cost_keys.is_empty() {
            let keys: Vec<&str> = self.cost_keys.iter().map(String::as_str).collect();
            m.assign_cost_to_graph(&keys)
                .context("assigning costs from job cost_keys")?;
        }
        Ok(m)
    }
}
