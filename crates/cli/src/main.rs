mod job;
mod provenance;
mod table;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hopmap::api::{get_hop_site_sequence, modify_path, HopStep};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::job::Job;
use crate::provenance::Payload;

#[derive(Parser)]
#[command(name = "hopmap")]
#[command(about = "Map migration hops and percolating pathways in crystals")]
struct Cmd {
    /// Optional run tag; propagated to provenance and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Build the hop map and write the summary JSON (plus an optional CSV hop table)
    Hops {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Extract canonical percolating pathways as JSON
    Paths {
        #[arg(long)]
        input: PathBuf,
        /// Edges costing more than this are pruned before the search
        #[arg(long, default_value_t = 100_000.0)]
        max_val: f64,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Hops { input, out, csv } => hops(&input, &out, csv.as_deref(), cmd.tag),
        Action::Paths {
            input,
            max_val,
            out,
        } => paths(&input, max_val, out.as_deref(), cmd.tag),
        Action::Report => report(cmd.tag),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

fn hops(input: &Path, out: &Path, csv: Option<&Path>, tag: Option<String>) -> Result<()> {
    let job = Job::load(input)?;
    let m = job.build()?;
    tracing::info!(
        input = %input.display(),
        hops = m.graph().num_edges(),
        unique = m.num_unique_hops(),
        tag = ?tag,
        "hops"
    );

    ensure_parent(out)?;
    fs::write(out, serde_json::to_vec_pretty(&m.get_summary_dict())?)
        .with_context(|| format!("writing {}", out.display()))?;

    let params = json!({
        "migrating_specie": job.migrating_specie,
        "max_path_length": m.cfg.max_path_length,
        "symprec": m.cfg.symprec,
        "n_ops": job.ops.len(),
        "cost_keys": job.cost_keys,
    });
    provenance::write_sidecar(
        out,
        Payload::new(params.clone())
            .with_input(input)
            .with_tag(tag.clone()),
    )?;

    if let Some(csv) = csv {
        ensure_parent(csv)?;
        let mut df = table::hop_table(&m)?;
        table::write_csv(&mut df, csv)?;
        tracing::info!(rows = df.height(), cols = df.width(), "hop_table");
        provenance::write_sidecar(csv, Payload::new(params).with_input(input).with_tag(tag))?;
    }
    Ok(())
}

/// One canonical pathway.
#[derive(Serialize)]
struct PathOut {
    start: usize,
    sites: Vec<usize>,
    hops: Vec<HopStep>,
}

fn collect_paths(job: &Job, max_val: f64) -> Result<Vec<PathOut>> {
    let m = job.build()?;
    let mut out = Vec::new();
    for item in m.get_intercollating_path(max_val) {
        let (u, raw) = item?;
        let Some(hops) = modify_path(&raw) else {
            tracing::warn!(node = u, "path has no canonical form; skipped");
            continue;
        };
        let start = hops.first().map_or(u, |h| h.iindex);
        let sites = get_hop_site_sequence(&hops, start)?;
        out.push(PathOut { start, sites, hops });
    }
    Ok(out)
}

fn paths(input: &Path, max_val: f64, out: Option<&Path>, tag: Option<String>) -> Result<()> {
    let job = Job::load(input)?;
    let found = collect_paths(&job, max_val)?;
    tracing::info!(input = %input.display(), max_val, paths = found.len(), tag = ?tag, "paths");
    let text = serde_json::to_string_pretty(&found)?;
    match out {
        Some(path) => {
            ensure_parent(path)?;
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            let payload = Payload::new(json!({ "max_val": max_val }))
                .with_input(input)
                .with_tag(tag);
            provenance::write_sidecar(path, payload)?;
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn report(tag: Option<String>) -> Result<()> {
    let obj = provenance::block(&Payload::new(json!({})).with_tag(tag), &[]);
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
