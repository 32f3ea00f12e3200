//! JSON load configuration.
//!
//! A [`LoadConfig`] is the serializable subset of [`LoadOptions`] (no observer, no custom
//! formatters):
//!
//! ```json
//! {
//!   "delimiter": "whitespace",
//!   "names": ["time", "passengers"],
//!   "x_cols": ["time"],
//!   "y_cols": ["passengers"],
//!   "formats": { "time": { "kind": "number" } },
//!   "test_indices": [10, 11]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DataResult;
use crate::format::{FormatRegistry, FormatSpec, Formatter};
use crate::types::ColumnSelector;

use super::csv::Delimiter;
use super::unified::{LoadOptions, SourceFormat};

/// Serializable load configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    pub format: Option<SourceFormat>,
    /// `auto`, `whitespace`, `tab`, or a single character. Defaults to `auto`.
    pub delimiter: Option<String>,
    pub has_header: Option<bool>,
    pub names: Option<Vec<String>>,
    /// Column names (strings) or 0-based positions (integers).
    pub x_cols: Vec<ColumnSelector>,
    pub y_cols: Vec<ColumnSelector>,
    /// Formatter overrides keyed by column name.
    pub formats: BTreeMap<String, FormatSpec>,
    pub test_indices: Vec<usize>,
}

impl LoadConfig {
    pub fn from_json_str(input: &str) -> DataResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> DataResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Convert into [`LoadOptions`]. Fails with `InvalidOption` for an unsupported delimiter.
    pub fn into_options(self) -> DataResult<LoadOptions> {
        let delimiter = match self.delimiter.as_deref() {
            Some(d) => Delimiter::parse(d)?,
            None => Delimiter::Auto,
        };
        let formats = self
            .formats
            .into_iter()
            .fold(FormatRegistry::new(), |reg, (name, spec)| {
                reg.with_column(name, Formatter::from(spec))
            });
        Ok(LoadOptions {
            format: self.format,
            delimiter,
            has_header: self.has_header,
            names: self.names,
            x_cols: self.x_cols,
            y_cols: self.y_cols,
            formats,
            test_indices: self.test_indices,
            ..LoadOptions::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;

    #[test]
    fn parses_selectors_and_formats() {
        let cfg = LoadConfig::from_json_str(
            r#"{
                "format": "delimited",
                "delimiter": ";",
                "x_cols": ["Date", 1],
                "y_cols": ["CO(GT)"],
                "formats": {"Date": {"kind": "date_time", "pattern": "%d/%m/%Y"}}
            }"#,
        )
        .unwrap();
        assert_eq!(
            cfg.x_cols,
            vec![ColumnSelector::Name("Date".to_string()), ColumnSelector::Position(1)]
        );

        let opts = cfg.into_options().unwrap();
        assert_eq!(opts.format, Some(SourceFormat::Delimited));
        assert_eq!(opts.delimiter, Delimiter::Byte(b';'));
        assert!(!opts.formats.is_empty());
    }

    #[test]
    fn empty_object_gives_defaults() {
        let opts = LoadConfig::from_json_str("{}").unwrap().into_options().unwrap();
        assert_eq!(opts.delimiter, Delimiter::Auto);
        assert!(opts.x_cols.is_empty());
        assert!(opts.formats.is_empty());
    }

    #[test]
    fn rejects_unknown_fields_and_bad_delimiters() {
        let err = LoadConfig::from_json_str(r#"{"sheet": "Sheet1"}"#).unwrap_err();
        assert!(matches!(err, DataError::Json(_)));

        let cfg = LoadConfig {
            delimiter: Some("||".to_string()),
            ..Default::default()
        };
        assert!(matches!(cfg.into_options().unwrap_err(), DataError::InvalidOption { .. }));
    }
}
