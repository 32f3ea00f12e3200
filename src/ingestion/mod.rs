//! Loading entrypoints and source adapters.
//!
//! Most callers should use [`load_from_path`] (from [`unified`]) which:
//!
//! - auto-detects the source format by file extension (or you can force it via [`LoadOptions`])
//! - reads the source into a type-tagged [`crate::types::Table`]
//! - builds one [`crate::data::Data`] channel per output column into a [`crate::dataset::DataSet`]
//! - optionally reports success/failure/alerts to a [`LoadObserver`]
//!
//! Source adapters are also available on their own:
//! - [`csv`] (delimited text, including whitespace-separated `.dat` files)
//! - [`json`]
//! - [`parquet`]
//! - [`dataframe`] (Polars)
//!
//! [`build_channel`] and [`build_dataset`] turn an already-loaded table into channels.

pub mod channel;
pub mod config;
pub mod csv;
pub mod dataframe;
pub mod json;
pub mod observability;
pub mod parallel;
pub mod parquet;
pub mod unified;

pub use channel::{build_channel, build_dataset};
pub use config::LoadConfig;
pub use csv::{DelimitedOptions, Delimiter};
pub use observability::{
    ChannelSummary, CompositeObserver, FileObserver, LoadContext, LoadFailure, LoadObserver, LoadSeverity,
    LoadStats, StdErrObserver,
};
pub use parallel::{load_glob, load_paths_parallel};
pub use unified::{load_dataframe, load_from_path, load_table, LoadOptions, SourceFormat};
