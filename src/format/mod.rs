//! Value formatters: canonical `f64` form for raw cells, and back to display strings.
//!
//! A [`Formatter`] is a stateless `{parse, render}` pair:
//!
//! - [`Formatter::Number`]: identity for numeric cells (numeric text is accepted too)
//! - [`Formatter::DateTime`]: calendar values ↔ signed seconds since the Unix epoch
//! - [`Formatter::Custom`]: any [`CustomFormat`] implementation
//!
//! Which formatter a column gets is decided per load by a [`FormatRegistry`]: explicit column
//! override, then a formatter registered for the column's [`crate::types::ElementType`], then
//! [`infer`].
//!
//! ```rust
//! use gp_channels::format::{DateTimeFormatter, Formatter};
//! use gp_channels::types::CellValue;
//!
//! let f = Formatter::DateTime(DateTimeFormatter::new());
//! let ts = f.parse(&CellValue::Text("1970-01-02".to_string())).unwrap();
//! assert_eq!(ts, 86_400.0);
//! assert_eq!(f.render(ts), "1970-01-02");
//! ```

pub mod datetime;
pub mod registry;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::CellValue;

pub use datetime::{detect_pattern, looks_like_datetime, DateTimeFormatter};
pub use registry::{infer, parse_column, FormatRegistry};

/// User-supplied formatter.
///
/// `parse` returns a short message on failure; the caller attaches row/column context.
pub trait CustomFormat: Send + Sync {
    /// Short name used in `Debug` output.
    fn name(&self) -> &str;

    /// Convert a raw cell into its canonical numeric form.
    fn parse(&self, value: &CellValue) -> Result<f64, String>;

    /// Convert a canonical value back into a display string.
    fn render(&self, value: f64) -> String;
}

/// Closed set of formatter variants.
#[derive(Clone)]
pub enum Formatter {
    /// Numbers pass through unchanged.
    Number,
    /// Calendar date/time values.
    DateTime(DateTimeFormatter),
    /// User-supplied formatter.
    Custom(Arc<dyn CustomFormat>),
}

impl Default for Formatter {
    fn default() -> Self {
        Self::Number
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => f.write_str("Number"),
            Self::DateTime(d) => f.debug_tuple("DateTime").field(d).finish(),
            Self::Custom(c) => f.debug_tuple("Custom").field(&c.name()).finish(),
        }
    }
}

impl Formatter {
    /// Convenience constructor for a custom formatter.
    pub fn custom(format: impl CustomFormat + 'static) -> Self {
        Self::Custom(Arc::new(format))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Number => "number",
            Self::DateTime(_) => "date_time",
            Self::Custom(c) => c.name(),
        }
    }

    pub fn is_datetime(&self) -> bool {
        matches!(self, Self::DateTime(_))
    }

    /// Convert a raw cell into its canonical numeric form.
    ///
    /// Null cells are always an error: modeling inputs have no missing values.
    pub fn parse(&self, value: &CellValue) -> Result<f64, String> {
        match self {
            Self::Number => parse_number(value),
            Self::DateTime(d) => d.parse(value),
            Self::Custom(c) => c.parse(value),
        }
    }

    /// Convert a canonical value back into a display string.
    pub fn render(&self, value: f64) -> String {
        match self {
            Self::Number => format!("{value}"),
            Self::DateTime(d) => d.render(value),
            Self::Custom(c) => c.render(value),
        }
    }
}

fn parse_number(value: &CellValue) -> Result<f64, String> {
    match value {
        CellValue::Number(v) => Ok(*v),
        CellValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("expected number: {e}")),
        CellValue::DateTime(_) => Err("expected number, found date/time".to_string()),
        CellValue::Null => Err("missing value".to_string()),
    }
}

/// Serializable formatter choice, used by [`crate::ingestion::LoadConfig`].
///
/// JSON form: `{"kind":"number"}` or `{"kind":"date_time","pattern":"%Y-%m-%d"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormatSpec {
    Number,
    DateTime {
        #[serde(default)]
        pattern: Option<String>,
    },
}

impl From<FormatSpec> for Formatter {
    fn from(spec: FormatSpec) -> Self {
        match spec {
            FormatSpec::Number => Formatter::Number,
            FormatSpec::DateTime { pattern: None } => Formatter::DateTime(DateTimeFormatter::new()),
            FormatSpec::DateTime { pattern: Some(p) } => {
                Formatter::DateTime(DateTimeFormatter::with_pattern(p))
            }
        }
    }
}
