//! CSV output for canonical records.

use anyhow::{Context, Result};
use cdp_common::types::{CanonicalProduct, CANONICAL_COLUMNS};
use std::path::Path;
use tracing::info;

/// Write records to `path` in the canonical column order, header first.
///
/// Parent directories are created as needed. An unwritable output path is
/// the one fatal condition in the pipeline; the error carries the path.
pub fn write_dataset(path: impl AsRef<Path>, records: &[CanonicalProduct]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;

    writer.write_record(CANONICAL_COLUMNS)?;
    for record in records {
        writer.write_record(record.to_row())?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    info!(records = records.len(), path = %path.display(), "dataset written");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn record(name: &str, sizes: &str) -> CanonicalProduct {
        CanonicalProduct {
            brand: "RARE RABBIT".to_string(),
            category: "Shirts".to_string(),
            discount: 0,
            discount_display_label: String::new(),
            gender: "Men".to_string(),
            image_url: String::new(),
            images: String::new(),
            mrp: 1000,
            name: name.to_string(),
            price: 1000,
            primary_colour: String::new(),
            product_id: "1".to_string(),
            product_url: String::new(),
            rating: 0.0,
            rating_count: 0,
            season: "New Arrival".to_string(),
            sizes: sizes.to_string(),
            year: 2026,
        }
    }

    #[test]
    fn test_writes_canonical_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        write_dataset(&path, &[record("Shirt", "S,M")]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(String::from)
            .collect();
        assert_eq!(header, CANONICAL_COLUMNS.to_vec());
    }

    #[test]
    fn test_comma_bearing_fields_survive_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        write_dataset(&path, &[record("Shirt", "S,M,L")]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let row = reader.records().next().unwrap().unwrap();
        // sizes is column 16 of the canonical order
        assert_eq!(&row[16], "S,M,L");
        assert_eq!(row.len(), CANONICAL_COLUMNS.len());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/per-source/products.csv");
        write_dataset(&path, &[]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_path_is_fatal_with_diagnostic() {
        let err = write_dataset("/proc/definitely/not/writable.csv", &[]).unwrap_err();
        assert!(format!("{err:#}").contains("/proc/definitely"));
    }
}
