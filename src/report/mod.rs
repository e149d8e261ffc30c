//! CSV report writing.
//!
//! Each record collection becomes one CSV file in the output directory.
//! Collections are written independently: empty ones are skipped and a
//! failed write is logged without aborting the others, so one bad sheet
//! never costs the rest of the report.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{error, info};
use serde::Serialize;
use serde_json::Value;

use crate::dataset::BenchmarkEntry;
use crate::source::{CatalogRecord, PricedRecord};

pub const PRICING_FILE: &str = "azure_vms.csv";
pub const CATALOG_FILE: &str = "aws_vms.csv";
pub const BENCHMARK_FILE: &str = "coremark_scores.csv";

/// Column appended to catalog rows for the classified vendor.
const VENDOR_COLUMN: &str = "CPU Vendor";

/// Writes every non-empty collection to `out_dir` and returns the files
/// produced. Only failure to create the directory itself is an error.
pub fn export_all(
    out_dir: &Path,
    pricing: &[PricedRecord],
    catalog: &[CatalogRecord],
    benchmarks: &[BenchmarkEntry],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let mut written = Vec::new();

    if !pricing.is_empty() {
        let path = out_dir.join(PRICING_FILE);
        let result = write_serialized(&path, pricing);
        record_outcome(&mut written, path, pricing.len(), result);
    }
    if !catalog.is_empty() {
        let path = out_dir.join(CATALOG_FILE);
        let result = write_catalog(&path, catalog);
        record_outcome(&mut written, path, catalog.len(), result);
    }
    if !benchmarks.is_empty() {
        let path = out_dir.join(BENCHMARK_FILE);
        let result = write_serialized(&path, benchmarks);
        record_outcome(&mut written, path, benchmarks.len(), result);
    }

    Ok(written)
}

fn record_outcome(written: &mut Vec<PathBuf>, path: PathBuf, rows: usize, result: Result<()>) {
    match result {
        Ok(()) => {
            info!("Wrote {} ({} rows)", path.display(), rows);
            written.push(path);
        }
        Err(err) => error!("Skipping {}: {:#}", path.display(), err),
    }
}

/// Writes a fixed-shape collection; headers come from the serde renames.
fn write_serialized<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes catalog records. Their shape varies by mirror, so the header is
/// the union of field names across all records, with the vendor column
/// appended last.
fn write_catalog(path: &Path, records: &[CatalogRecord]) -> Result<()> {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for key in record.fields.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))?;

    let mut header = columns.clone();
    header.push(VENDOR_COLUMN);
    writer.write_record(&header)?;

    for record in records {
        let mut row: Vec<String> = columns
            .iter()
            .map(|column| cell(record.fields.get(*column)))
            .collect();
        row.push(record.vendor.to_string());
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Renders a JSON value into a CSV cell. Strings go in bare, missing and
/// null values become empty cells, everything else keeps its JSON form.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
