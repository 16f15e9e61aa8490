use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing data or rendering the grid.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Bytes that are not valid in the declared input encoding.
    #[error("{path} is not valid {encoding} text")]
    Decode { path: PathBuf, encoding: &'static str },

    #[error("unknown text encoding label '{0}'")]
    UnknownEncoding(String),

    #[error("column '{column}', row {row}: '{value}' is not a number")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },

    #[error("required columns not found: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("expected {expected} labels, got {actual}")]
    LabelMismatch { expected: usize, actual: usize },

    #[error("{count} panels requested, the grid holds at most {max}")]
    TooManyPanels { count: usize, max: usize },

    /// Rendering was asked to draw a table with no rows or no columns.
    #[error("nothing to render: table is empty")]
    NothingToRender,

    /// Building or printing the statistics table failed.
    #[error("table error: {0}")]
    Table(#[from] arrow::error::ArrowError),

    #[error("render error: {0}")]
    Render(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid config: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
