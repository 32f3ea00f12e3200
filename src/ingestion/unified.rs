//! Unified load entrypoints.
//!
//! Most callers should use [`load_from_path`], which reads a file into a [`Table`] and builds a
//! [`DataSet`] from it in one all-or-nothing call.
//!
//! - If [`LoadOptions::format`] is `None`, the source format is inferred from the file extension.
//! - If a [`super::observability::LoadObserver`] is provided, success/failure/alerts are reported
//!   to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crate::dataset::DataSet;
use crate::error::{DataError, DataResult};
use crate::format::FormatRegistry;
use crate::types::{ColumnSelector, Table};

use super::channel::build_dataset;
use super::csv::{read_delimited_from_path, DelimitedOptions, Delimiter};
use super::dataframe::read_dataframe;
use super::json::read_json_from_path;
use super::observability::{LoadContext, LoadFailure, LoadObserver, LoadSeverity, LoadStats};
use super::parquet::read_parquet_from_path;

/// Source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Delimited text (CSV, TSV, whitespace-separated).
    Delimited,
    /// JSON array-of-objects or NDJSON.
    Json,
    /// Apache Parquet.
    Parquet,
    /// In-memory [`Table`].
    Table,
    /// In-memory Polars `DataFrame`.
    DataFrame,
}

impl SourceFormat {
    /// Parse a file format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "tsv" | "txt" | "dat" => Some(Self::Delimited),
            "json" | "ndjson" => Some(Self::Json),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// Options controlling a load.
///
/// Use [`Default`] for the common case: format from extension, auto-detected delimiter,
/// first column as input, second column as output, inferred formatters, all rows training.
#[derive(Clone)]
pub struct LoadOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<SourceFormat>,
    /// Delimiter for delimited text.
    pub delimiter: Delimiter,
    /// Whether delimited text starts with a header row. `None` means "yes, unless `names` is
    /// set".
    pub has_header: Option<bool>,
    /// Explicit column names, for sources without a header. For other sources the leading
    /// columns are renamed.
    pub names: Option<Vec<String>>,
    /// Input columns (default: first column).
    pub x_cols: Vec<ColumnSelector>,
    /// Output columns, one channel each (default: second column).
    pub y_cols: Vec<ColumnSelector>,
    /// Formatter overrides.
    pub formats: FormatRegistry,
    /// 0-based rows to hold out as test data in every channel.
    pub test_indices: Vec<usize>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("delimiter", &self.delimiter)
            .field("has_header", &self.has_header)
            .field("names", &self.names)
            .field("x_cols", &self.x_cols)
            .field("y_cols", &self.y_cols)
            .field("formats", &self.formats)
            .field("test_indices", &self.test_indices)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            delimiter: Delimiter::Auto,
            has_header: None,
            names: None,
            x_cols: Vec::new(),
            y_cols: Vec::new(),
            formats: FormatRegistry::default(),
            test_indices: Vec::new(),
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

impl LoadOptions {
    fn delimited(&self) -> DelimitedOptions {
        DelimitedOptions {
            delimiter: self.delimiter,
            has_header: self.has_header.unwrap_or(self.names.is_none()),
            names: self.names.clone(),
        }
    }
}

/// Load a file into a [`DataSet`].
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with the source row count and per-channel train/test counts
/// - `on_failure` on failure, with the severity and (for cell errors) the row and column
/// - `on_alert` on failure when the severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ## Whitespace-separated file without a header
///
/// ```no_run
/// use gp_channels::ingestion::{load_from_path, LoadOptions};
///
/// # fn main() -> Result<(), gp_channels::DataError> {
/// let opts = LoadOptions {
///     names: Some(vec!["time".to_string(), "passengers".to_string()]),
///     ..Default::default()
/// };
/// let ds = load_from_path("airline.dat", &opts)?;
/// assert_eq!(ds.get_names(), vec!["passengers"]);
/// # Ok(())
/// # }
/// ```
///
/// ## Several outputs over a date column, with a forced date pattern
///
/// ```no_run
/// use gp_channels::format::{DateTimeFormatter, FormatRegistry, Formatter};
/// use gp_channels::ingestion::{load_from_path, LoadOptions};
///
/// # fn main() -> Result<(), gp_channels::DataError> {
/// let opts = LoadOptions {
///     x_cols: vec!["Date".into()],
///     y_cols: vec!["CO(GT)".into(), "NO2(GT)".into()],
///     formats: FormatRegistry::new()
///         .with_column("Date", Formatter::DateTime(DateTimeFormatter::with_pattern("%d/%m/%Y"))),
///     ..Default::default()
/// };
/// let ds = load_from_path("air_quality.csv", &opts)?;
/// assert_eq!(ds.get_output_dims(), 2);
/// # Ok(())
/// # }
/// ```
///
/// ## Observability (stderr logging + alert threshold)
///
/// ```no_run
/// use std::sync::Arc;
///
/// use gp_channels::ingestion::{load_from_path, LoadOptions, LoadSeverity, StdErrObserver};
///
/// let opts = LoadOptions {
///     observer: Some(Arc::new(StdErrObserver::default())),
///     alert_at_or_above: LoadSeverity::Critical,
///     ..Default::default()
/// };
///
/// // Missing files are treated as Critical and will trigger `on_alert` at this threshold.
/// let _err = load_from_path("does_not_exist.csv", &opts).unwrap_err();
/// ```
pub fn load_from_path(path: impl AsRef<Path>, options: &LoadOptions) -> DataResult<DataSet> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };
    let ctx = LoadContext {
        source: path.display().to_string(),
        format: fmt,
    };

    let result = read_table(path, fmt, options).and_then(|table| build(&table, options));
    report(options, &ctx, &result);
    result.map(|(ds, _)| ds)
}

/// Build a [`DataSet`] from an in-memory [`Table`].
pub fn load_table(table: &Table, options: &LoadOptions) -> DataResult<DataSet> {
    let ctx = LoadContext {
        source: "<table>".to_string(),
        format: SourceFormat::Table,
    };
    let result = rename(table.clone(), options).and_then(|t| build(&t, options));
    report(options, &ctx, &result);
    result.map(|(ds, _)| ds)
}

/// Build a [`DataSet`] from a Polars `DataFrame`.
pub fn load_dataframe(df: &DataFrame, options: &LoadOptions) -> DataResult<DataSet> {
    let ctx = LoadContext {
        source: "<dataframe>".to_string(),
        format: SourceFormat::DataFrame,
    };
    let result = read_dataframe(df)
        .and_then(|t| rename(t, options))
        .and_then(|t| build(&t, options));
    report(options, &ctx, &result);
    result.map(|(ds, _)| ds)
}

fn read_table(path: &Path, fmt: SourceFormat, options: &LoadOptions) -> DataResult<Table> {
    match fmt {
        SourceFormat::Delimited => read_delimited_from_path(path, &options.delimited()),
        SourceFormat::Json => read_json_from_path(path).and_then(|t| rename(t, options)),
        SourceFormat::Parquet => read_parquet_from_path(path).and_then(|t| rename(t, options)),
        SourceFormat::Table | SourceFormat::DataFrame => Err(DataError::InvalidOption {
            message: format!("format {fmt:?} cannot be read from a path ({})", path.display()),
        }),
    }
}

fn rename(table: Table, options: &LoadOptions) -> DataResult<Table> {
    match &options.names {
        Some(names) => table.with_names(names),
        None => Ok(table),
    }
}

fn build(table: &Table, options: &LoadOptions) -> DataResult<(DataSet, usize)> {
    let ds = build_dataset(
        table,
        &options.x_cols,
        &options.y_cols,
        &options.formats,
        &options.test_indices,
    )?;
    Ok((ds, table.row_count()))
}

fn report(options: &LoadOptions, ctx: &LoadContext, result: &DataResult<(DataSet, usize)>) {
    let Some(obs) = options.observer.as_ref() else {
        return;
    };
    match result {
        Ok((ds, rows)) => obs.on_success(ctx, &LoadStats::new(*rows, ds)),
        Err(e) => {
            let failure = LoadFailure::new(e);
            obs.on_failure(ctx, &failure);
            if failure.severity >= options.alert_at_or_above {
                obs.on_alert(ctx, &failure);
            }
        }
    }
}

fn infer_format_from_path(path: &Path) -> DataResult<SourceFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| DataError::InvalidOption {
            message: format!("cannot infer format: path has no extension ({})", path.display()),
        })?;

    SourceFormat::from_extension(ext).ok_or_else(|| DataError::InvalidOption {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}
