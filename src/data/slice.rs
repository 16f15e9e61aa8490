use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::loader::load_file;
use super::model::{RawTable, Table};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Row-position window
// ---------------------------------------------------------------------------

/// Closed row-position range `[start, end]`, independent of any timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowWindow {
    pub start: usize,
    pub end: usize,
}

impl RowWindow {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Rows the window selects when it fits.
    pub fn len(&self) -> usize {
        if self.start > self.end {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `0 ≤ start ≤ end < n_rows` holds.
    pub fn fits(&self, n_rows: usize) -> bool {
        self.start <= self.end && self.end < n_rows
    }

    /// Rows `start..=end` reindexed from 0, or a zero-row table with the same
    /// columns when the window does not fit.
    pub fn apply(&self, table: &Table) -> Table {
        if self.fits(table.len()) {
            table.rows(self.start, self.end)
        } else {
            table.emptied()
        }
    }
}

// ---------------------------------------------------------------------------
// load_and_slice
// ---------------------------------------------------------------------------

/// What to do when required columns are absent from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingColumns {
    /// Abort with [`Error::MissingColumns`].
    #[default]
    Fail,
    /// Log a warning and continue with the columns that exist.
    Warn,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub encoding: String,
    /// Highest row position kept before the window is applied.
    pub max_row_position: usize,
    pub missing: MissingColumns,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            encoding: "gbk".to_string(),
            max_row_position: 80_000,
            missing: MissingColumns::Fail,
        }
    }
}

/// A sliced table plus the required columns that were not found.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub table: Table,
    pub missing: Vec<String>,
    /// Rows available after the row bound, before the window.
    pub available_rows: usize,
}

/// Read `path`, keep the `columns` (in that order) for rows up to the row
/// bound, then cut out `window`. A window outside the data gives a zero-row
/// table, not an error.
pub fn load_and_slice(
    path: &Path,
    columns: &[String],
    window: RowWindow,
    options: &LoadOptions,
) -> Result<Prepared> {
    let raw = load_file(path, &options.encoding)?;
    slice_raw(&raw, columns, window, options)
}

/// Everything after the file read, split out so it runs on in-memory data.
pub fn slice_raw(
    raw: &RawTable,
    columns: &[String],
    window: RowWindow,
    options: &LoadOptions,
) -> Result<Prepared> {
    let missing = raw.missing_columns(columns);
    if missing.is_empty() {
        info!("all {} required columns present", columns.len());
    } else {
        match options.missing {
            MissingColumns::Fail => return Err(Error::MissingColumns(missing)),
            MissingColumns::Warn => {
                warn!("columns not found in input, skipping: {missing:?}")
            }
        }
    }

    let present: Vec<String> = columns
        .iter()
        .filter(|c| !missing.contains(c))
        .cloned()
        .collect();

    let filtered = raw.to_numeric(&present, options.max_row_position)?;
    info!(
        "rows 0..={} kept: {} rows × {} columns",
        options.max_row_position,
        filtered.len(),
        filtered.n_columns()
    );

    let table = window.apply(&filtered);
    if table.is_empty() {
        warn!(
            "window [{}, {}] selects nothing; available rows 0..{}",
            window.start,
            window.end,
            filtered.len()
        );
    } else {
        info!(
            "window [{}, {}]: {} rows × {} columns",
            window.start,
            window.end,
            table.len(),
            table.n_columns()
        );
    }

    Ok(Prepared {
        table,
        missing,
        available_rows: filtered.len(),
    })
}
