//! `gp-channels` turns tabular files into multi-channel numeric datasets for multi-output
//! Gaussian Process modeling.
//!
//! A [`dataset::DataSet`] is an ordered collection of named channels ([`data::Data`]). Every
//! channel holds input rows `X` (one or more numeric dimensions), an output vector `Y`, and a
//! boolean train mask. Columns are converted to numbers by per-column [`format::Formatter`]s, so
//! dates become epoch seconds on the way in and can be rendered back on the way out.
//!
//! The primary entrypoint is [`ingestion::load_from_path`], which auto-detects the source format
//! from the file extension (or you can force one via [`ingestion::LoadOptions`]).
//!
//! ## What you can load
//!
//! **Sources (auto-detected by extension):**
//!
//! - **Delimited text**: `.csv`, `.tsv`, `.txt`, `.dat` (comma/tab/semicolon/whitespace)
//! - **JSON**: `.json` (array-of-objects) and `.ndjson` (newline-delimited objects)
//! - **Parquet**: `.parquet`, `.pq`
//! - **In memory**: [`types::Table`] via [`ingestion::load_table`] and Polars `DataFrame`s via
//!   [`ingestion::load_dataframe`]
//!
//! **Column formats:**
//!
//! - [`format::Formatter::Number`]: plain numbers (sentinels such as `-200` pass through)
//! - [`format::Formatter::DateTime`]: dates and timestamps as UTC epoch seconds
//! - [`format::Formatter::Custom`]: any [`format::CustomFormat`]
//!
//! When no formatter is configured for a column, one is inferred from the column's type tag.
//!
//! ## Quick example: a headerless whitespace-separated file
//!
//! ```no_run
//! use gp_channels::ingestion::{load_from_path, LoadOptions};
//!
//! # fn main() -> Result<(), gp_channels::DataError> {
//! let opts = LoadOptions {
//!     names: Some(vec!["time".to_string(), "passengers".to_string()]),
//!     ..Default::default()
//! };
//! let ds = load_from_path("airline.dat", &opts)?;
//! let passengers = ds.index_by_name("passengers")?;
//! println!("rows={} dims={}", passengers.len(), ds.get_input_dims()[0]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Building channels by hand
//!
//! ```rust
//! use gp_channels::data::Data;
//! use gp_channels::dataset::DataSet;
//!
//! let a = Data::from_series("a", vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]).unwrap();
//! let b = Data::from_series("b", vec![0.0, 1.0], vec![5.0, 4.0]).unwrap();
//! let mut ds = DataSet::from_channels(vec![a]).unwrap();
//! ds.append(b).unwrap();
//! assert_eq!(ds.get_names(), vec!["a", "b"]);
//! assert_eq!(ds.get_input_dims(), vec![1, 1]);
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: load entrypoints, source adapters, configuration and observers
//! - [`format`]: formatters and the per-column [`format::FormatRegistry`]
//! - [`data`]: a single channel
//! - [`dataset`]: ordered, uniquely named channels
//! - [`types`]: type-tagged tables produced by the source adapters
//! - [`error`]: the error type shared by the crate

pub mod data;
pub mod dataset;
pub mod error;
pub mod format;
pub mod ingestion;
pub mod types;

pub use error::{DataError, DataResult};
