//! Fixed-size repartitioning of a tabular dataset.

use anyhow::{Context, Result};
use cdp_common::CdpError;
use csv::StringRecord;
use std::path::{Path, PathBuf};
use tracing::info;

/// One emitted chunk file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFile {
    pub path: PathBuf,
    /// Data rows in the chunk, excluding the header
    pub records: usize,
}

/// Split `input` into chunk files of at most `chunk_size` rows each.
///
/// Every chunk repeats the input's header; rows keep their original order.
/// Chunks are numbered from 1 and named
/// `{input stem}_part_{n}.csv` next to the input. The final chunk holds the
/// remainder; if the row count divides evenly no trailing empty chunk is
/// written.
///
/// # Errors
///
/// A `chunk_size` of 0 is rejected before any file I/O. Read and write
/// failures carry the offending path.
pub fn partition(input: impl AsRef<Path>, chunk_size: usize) -> Result<Vec<ChunkFile>> {
    if chunk_size == 0 {
        return Err(CdpError::InvalidChunkSize(chunk_size).into());
    }

    let input = input.as_ref();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    let dir = input.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut reader = csv::Reader::from_path(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let header = reader.headers()?.clone();

    let mut chunks = Vec::new();
    let mut buffer: Vec<StringRecord> = Vec::with_capacity(chunk_size);

    for row in reader.records() {
        let row = row.with_context(|| format!("Bad row in {}", input.display()))?;
        buffer.push(row);

        if buffer.len() == chunk_size {
            let chunk = write_chunk(&dir, &stem, chunks.len() + 1, &header, &buffer)?;
            chunks.push(chunk);
            buffer.clear();
        }
    }

    if !buffer.is_empty() {
        let chunk = write_chunk(&dir, &stem, chunks.len() + 1, &header, &buffer)?;
        chunks.push(chunk);
    }

    info!(
        input = %input.display(),
        chunks = chunks.len(),
        chunk_size,
        "partition complete"
    );
    Ok(chunks)
}

fn write_chunk(
    dir: &Path,
    stem: &str,
    number: usize,
    header: &StringRecord,
    rows: &[StringRecord],
) -> Result<ChunkFile> {
    let path = dir.join(format!("{stem}_part_{number}.csv"));

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    info!(path = %path.display(), records = rows.len(), "chunk written");
    Ok(ChunkFile {
        path,
        records: rows.len(),
    })
}
