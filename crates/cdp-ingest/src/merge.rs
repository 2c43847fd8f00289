//! Multi-source dataset consolidation.
//!
//! The merged header is the alphabetically sorted union of the input
//! headers, NOT the canonical per-source order. Downstream consumers expect
//! sorted headers; keep the divergence.

use anyhow::{Context, Result};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a merge did: final schema, row count, and which inputs took part.
#[derive(Debug)]
pub struct MergeSummary {
    /// Sorted union of the merged inputs' columns
    pub columns: Vec<String>,
    /// Total rows written
    pub records: usize,
    /// Inputs that contributed, in input order
    pub merged: Vec<PathBuf>,
    /// Inputs skipped because they do not exist
    pub skipped: Vec<PathBuf>,
}

/// Union-merge tabular files into `output`.
///
/// Missing inputs are skipped with a warning, never fatal. Rows are written
/// in input order; columns an input lacks are left empty. An empty input set
/// produces an empty output file and a zero-record summary, not an error.
pub fn merge(inputs: &[PathBuf], output: impl AsRef<Path>) -> Result<MergeSummary> {
    let output = output.as_ref();

    let mut merged = Vec::new();
    let mut skipped = Vec::new();
    for input in inputs {
        if input.exists() {
            merged.push(input.clone());
        } else {
            warn!(path = %input.display(), "input dataset not found, skipping");
            skipped.push(input.clone());
        }
    }

    if merged.is_empty() {
        warn!("no input datasets found, writing empty output");
        std::fs::File::create(output)
            .with_context(|| format!("Failed to create {}", output.display()))?;
        return Ok(MergeSummary {
            columns: Vec::new(),
            records: 0,
            merged,
            skipped,
        });
    }

    // First pass: union the headers.
    let mut columns = BTreeSet::new();
    for input in &merged {
        let mut reader = csv::Reader::from_path(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        for column in reader.headers()? {
            columns.insert(column.to_string());
        }
    }
    let columns: Vec<String> = columns.into_iter().collect();

    // Second pass: rewrite every row under the unioned schema.
    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("Failed to open {} for writing", output.display()))?;
    writer.write_record(&columns)?;

    let mut records = 0usize;
    for input in &merged {
        info!(path = %input.display(), "merging");
        let mut reader = csv::Reader::from_path(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;

        let positions: HashMap<String, usize> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, column)| (column.to_string(), idx))
            .collect();

        for row in reader.records() {
            let row = row.with_context(|| format!("Bad row in {}", input.display()))?;
            let unioned: Vec<&str> = columns
                .iter()
                .map(|column| {
                    positions
                        .get(column)
                        .and_then(|&idx| row.get(idx))
                        .unwrap_or("")
                })
                .collect();
            writer.write_record(unioned)?;
            records += 1;
        }
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", output.display()))?;

    info!(
        records,
        inputs = merged.len(),
        output = %output.display(),
        "merge complete"
    );
    Ok(MergeSummary {
        columns,
        records,
        merged,
        skipped,
    })
}
