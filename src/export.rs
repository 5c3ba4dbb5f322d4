//! CSV export of processed rows.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::NumericRow;

pub const CSV_HEADER: [&str; 4] = ["lower_tick", "upper_tick", "liquidity_amount", "tick_range"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error writing {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// `pool_<id>[_height_<h>]`, shared by every file written for one query.
pub fn output_stem(pool_id: &str, block_height: Option<&str>) -> String {
    match block_height {
        Some(h) if !h.is_empty() => format!("pool_{}_height_{}", sanitize(pool_id), sanitize(h)),
        _ => format!("pool_{}", sanitize(pool_id)),
    }
}

/// `<stem>_<timestamp>.csv`, timestamp in UTC.
pub fn export_filename(pool_id: &str, block_height: Option<&str>, now: DateTime<Utc>) -> String {
    format!(
        "{}_{}.csv",
        output_stem(pool_id, block_height),
        now.format("%Y-%m-%dT%H-%M-%S")
    )
}

/// Write the header and one line per row.
///
/// Numbers use Rust's shortest round-trip formatting, so integral ticks come
/// out without a trailing `.0`.
pub fn write_rows<W: io::Write>(writer: W, rows: &[NumericRow]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for r in rows {
        wtr.write_record([
            r.lower_tick.to_string(),
            r.upper_tick.to_string(),
            r.liquidity_amount.to_string(),
            r.tick_range.to_string(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write `rows` to a timestamped CSV in `dir` and return its path.
pub fn write_csv(
    dir: &Path,
    pool_id: &str,
    block_height: Option<&str>,
    rows: &[NumericRow],
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(export_filename(pool_id, block_height, Utc::now()));
    let file = std::fs::File::create(&path).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    write_rows(file, rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "wrote CSV export");
    Ok(path)
}

/// Keep a user-supplied id safe as a filename component.
pub fn sanitize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}
