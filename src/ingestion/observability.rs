//! Load reporting.
//!
//! Every load through [`super::load_from_path`], [`super::load_table`] or
//! [`super::load_dataframe`] ends in exactly one report to the configured [`LoadObserver`]:
//!
//! - [`LoadStats`] on success: source rows plus, per channel, input dims and train/test row counts
//! - [`LoadFailure`] on error: the error, its [`LoadSeverity`] and, when the error points at a
//!   cell or column, the 1-based data row and the column
//!
//! A failure at or above [`super::LoadOptions::alert_at_or_above`] is additionally passed to
//! [`LoadObserver::on_alert`].

use std::error::Error as StdError;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::dataset::DataSet;
use crate::error::DataError;

use super::unified::SourceFormat;

/// How bad a failed load is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadSeverity {
    /// The input was read but could not be turned into channels (bad value, missing column, ...).
    Error,
    /// The input could not be read at all (I/O).
    Critical,
}

impl LoadSeverity {
    /// Classify an error: I/O failures, including I/O wrapped by the CSV and Parquet readers, are
    /// `Critical`; everything else is `Error`.
    pub fn of(error: &DataError) -> Self {
        match error {
            DataError::Io(_) => Self::Critical,
            DataError::Csv(err) if matches!(err.kind(), ::csv::ErrorKind::Io(_)) => Self::Critical,
            DataError::Parquet(err) if caused_by_io(err) => Self::Critical,
            _ => Self::Error,
        }
    }
}

fn caused_by_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

/// Which load a report belongs to.
#[derive(Debug, Clone)]
pub struct LoadContext {
    /// File path, or `<table>` / `<dataframe>` for in-memory sources.
    pub source: String,
    pub format: SourceFormat,
}

/// Shape of one loaded channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSummary {
    pub name: String,
    pub input_dims: usize,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// What a successful load produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStats {
    /// Data rows in the source table.
    pub rows: usize,
    /// One entry per channel, in dataset order.
    pub channels: Vec<ChannelSummary>,
}

impl LoadStats {
    pub(crate) fn new(rows: usize, dataset: &DataSet) -> Self {
        let channels = dataset
            .iter()
            .map(|c| ChannelSummary {
                name: c.name().to_string(),
                input_dims: c.input_dims(),
                train_rows: c.train_len(),
                test_rows: c.test_len(),
            })
            .collect();
        Self { rows, channels }
    }
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rows={} channels=[", self.rows)?;
        for (i, c) in self.channels.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "{} dims={} train={} test={}",
                c.name, c.input_dims, c.train_rows, c.test_rows
            )?;
        }
        f.write_str("]")
    }
}

/// A failed load.
#[derive(Debug, Clone, Copy)]
pub struct LoadFailure<'a> {
    pub severity: LoadSeverity,
    pub error: &'a DataError,
    /// 1-based data row of the offending cell, for [`DataError::Format`].
    pub row: Option<usize>,
    /// Offending column name (or the unresolved selector for [`DataError::ColumnNotFound`]).
    pub column: Option<&'a str>,
}

impl<'a> LoadFailure<'a> {
    pub fn new(error: &'a DataError) -> Self {
        let (row, column) = match error {
            DataError::Format { row, column, .. } => (Some(*row), Some(column.as_str())),
            DataError::ColumnNotFound { selector, .. } => (None, Some(selector.as_str())),
            _ => (None, None),
        };
        Self {
            severity: LoadSeverity::of(error),
            error,
            row,
            column,
        }
    }
}

impl fmt::Display for LoadFailure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "severity={:?}", self.severity)?;
        if let Some(row) = self.row {
            write!(f, " row={row}")?;
        }
        if let Some(column) = self.column {
            write!(f, " column={column}")?;
        }
        write!(f, " error={}", self.error)
    }
}

/// Receives load reports.
pub trait LoadObserver: Send + Sync {
    fn on_success(&self, _ctx: &LoadContext, _stats: &LoadStats) {}

    fn on_failure(&self, _ctx: &LoadContext, _failure: &LoadFailure<'_>) {}

    /// Called after [`Self::on_failure`] when the failure meets the alert threshold.
    fn on_alert(&self, _ctx: &LoadContext, _failure: &LoadFailure<'_>) {}
}

/// Fans reports out to several observers, in order.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn LoadObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn LoadObserver>>) -> Self {
        Self { observers }
    }

    pub fn push(&mut self, observer: Arc<dyn LoadObserver>) {
        self.observers.push(observer);
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl LoadObserver for CompositeObserver {
    fn on_success(&self, ctx: &LoadContext, stats: &LoadStats) {
        self.observers.iter().for_each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &LoadContext, failure: &LoadFailure<'_>) {
        self.observers.iter().for_each(|o| o.on_failure(ctx, failure));
    }

    fn on_alert(&self, ctx: &LoadContext, failure: &LoadFailure<'_>) {
        self.observers.iter().for_each(|o| o.on_alert(ctx, failure));
    }
}

/// Prints one line per report to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl LoadObserver for StdErrObserver {
    fn on_success(&self, ctx: &LoadContext, stats: &LoadStats) {
        eprintln!("gp-channels: loaded {} ({:?}) {stats}", ctx.source, ctx.format);
    }

    fn on_failure(&self, ctx: &LoadContext, failure: &LoadFailure<'_>) {
        eprintln!("gp-channels: failed {} ({:?}) {failure}", ctx.source, ctx.format);
    }

    fn on_alert(&self, ctx: &LoadContext, failure: &LoadFailure<'_>) {
        eprintln!("gp-channels: ALERT {} ({:?}) {failure}", ctx.source, ctx.format);
    }
}

/// Appends tab-separated reports (`unix_ts  event  format  source  details`) to a file.
///
/// The file is opened on the first report and kept open. Logging is best-effort: open and write
/// failures never affect the load.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileObserver {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            file: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&self, event: &str, ctx: &LoadContext, details: &dyn fmt::Display) {
        let Ok(mut guard) = self.file.lock() else {
            return;
        };
        if guard.is_none() {
            *guard = OpenOptions::new().create(true).append(true).open(&self.path).ok();
        }
        if let Some(file) = guard.as_mut() {
            let ts = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs();
            let _ = writeln!(file, "{ts}\t{event}\t{:?}\t{}\t{details}", ctx.format, ctx.source);
        }
    }
}

impl LoadObserver for FileObserver {
    fn on_success(&self, ctx: &LoadContext, stats: &LoadStats) {
        self.write_line("loaded", ctx, stats);
    }

    fn on_failure(&self, ctx: &LoadContext, failure: &LoadFailure<'_>) {
        self.write_line("failed", ctx, failure);
    }

    fn on_alert(&self, ctx: &LoadContext, failure: &LoadFailure<'_>) {
        self.write_line("alert", ctx, failure);
    }
}
