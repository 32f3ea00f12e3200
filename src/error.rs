use thiserror::Error;

/// Convenience result type for loading and dataset operations.
pub type DataResult<T> = Result<T, DataError>;

/// Error type returned by table adapters, formatters, channels and datasets.
///
/// A single enum is shared across every layer so callers can match on one type. Loads are
/// all-or-nothing: whenever a function returns one of these, no partially built
/// [`crate::data::Data`] or [`crate::dataset::DataSet`] is handed back.
#[derive(Debug, Error)]
pub enum DataError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-text reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON decoding error (sources or [`crate::ingestion::LoadConfig`] documents).
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parquet reader error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Polars error raised while reading a `DataFrame`.
    #[error("polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Invalid glob pattern passed to [`crate::ingestion::load_glob`].
    #[error("glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A column selector did not resolve to a column of the source table.
    #[error("column not found: {selector} (available={available:?})")]
    ColumnNotFound {
        selector: String,
        available: Vec<String>,
    },

    /// The source has no usable rows.
    #[error("empty data: {message}")]
    EmptyData { message: String },

    /// A value could not be parsed by the resolved formatter.
    ///
    /// `row` is the 1-based data row (header rows are not counted).
    #[error("failed to format value at row {row} column '{column}': {message} (raw='{raw}')")]
    Format {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// A channel name collides with one already present in the dataset.
    #[error("duplicate channel name '{name}'")]
    DuplicateName { name: String },

    /// Positional lookup out of range.
    #[error("index {index} out of range (len={len})")]
    Index { index: usize, len: usize },

    /// Name lookup for a channel that does not exist.
    #[error("no channel named '{name}'")]
    Key { name: String },

    /// Parallel sequences or row widths disagree.
    #[error("shape mismatch: {message}")]
    ShapeMismatch { message: String },

    /// A load option or configuration value is invalid.
    #[error("invalid option: {message}")]
    InvalidOption { message: String },
}
