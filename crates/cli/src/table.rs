//! Tabular hop export (one row per edge).

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use hopmap::FullPathMapper;
use polars::prelude::*;

/// Columns: label, endpoints, image, distance, cost and charge totals.
pub fn hop_table(m: &FullPathMapper) -> PolarsResult<DataFrame> {
    let edges = m.graph().edges();
    let col_u32 = |f: fn(&hopmap::api::HopEdge) -> usize| -> Vec<u32> {
        edges.iter().map(|e| f(e) as u32).collect()
    };
    let col_img = |axis: usize| -> Vec<i32> { edges.iter().map(|e| e.to_jimage.0[axis]).collect() };
    df!(
        "hop_label" => col_u32(|e| e.hop_label.0),
        "iindex" => col_u32(|e| e.iindex),
        "eindex" => col_u32(|e| e.eindex),
        "image_a" => col_img(0),
        "image_b" => col_img(1),
        "image_c" => col_img(2),
        "hop_distance" => edges.iter().map(|e| e.hop_distance).collect::<Vec<f64>>(),
        "cost" => edges.iter().map(|e| e.cost).collect::<Vec<f64>>(),
        "chg_total" => edges.iter().map(|e| e.number("chg_total")).collect::<Vec<Option<f64>>>(),
        "max_avg_chg" => edges.iter().map(|e| e.number("max_avg_chg")).collect::<Vec<Option<f64>>>()
    )
}

pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .finish(df)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
