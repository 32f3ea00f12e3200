//! Delimited text (CSV, TSV, whitespace-separated) → [`Table`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};
use crate::types::{CellValue, Table};

/// Field separator for delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    /// Sniff from the first non-empty line: `,` then tab then `;`, else whitespace.
    #[default]
    Auto,
    /// A single byte such as `b','` or `b'\t'`.
    Byte(u8),
    /// Runs of spaces/tabs (as in `.dat` exports and fixed-width-ish text).
    Whitespace,
}

impl Delimiter {
    /// Parse a user-facing delimiter name: `auto`, `whitespace`, `tab`, or a single ASCII
    /// character.
    pub fn parse(s: &str) -> DataResult<Self> {
        match s {
            "auto" => Ok(Self::Auto),
            "whitespace" | "space" => Ok(Self::Whitespace),
            "tab" | "\t" => Ok(Self::Byte(b'\t')),
            _ if s.len() == 1 && s.is_ascii() => Ok(Self::Byte(s.as_bytes()[0])),
            _ => Err(DataError::InvalidOption {
                message: format!("unsupported delimiter '{s}'"),
            }),
        }
    }

    fn sniff(input: &str) -> Self {
        let first = input.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
        for b in [b',', b'\t', b';'] {
            if first.as_bytes().contains(&b) {
                return Self::Byte(b);
            }
        }
        Self::Whitespace
    }
}

/// Options for reading delimited text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedOptions {
    pub delimiter: Delimiter,
    /// Whether the first non-empty line is a header row.
    pub has_header: bool,
    /// Explicit column names. When `has_header` is also set, the header row is discarded.
    pub names: Option<Vec<String>>,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Auto,
            has_header: true,
            names: None,
        }
    }
}

/// Read a delimited text file into a [`Table`].
///
/// Rules:
///
/// - Empty lines are skipped; empty fields become nulls.
/// - Columns whose non-empty fields all parse as numbers are tagged
///   [`crate::types::ElementType::Number`]; others are tagged `Unknown` and left to formatter
///   inference.
/// - Without a header and without `names`, columns are named `col0`, `col1`, ...
pub fn read_delimited_from_path(path: impl AsRef<Path>, options: &DelimitedOptions) -> DataResult<Table> {
    let text = fs::read_to_string(path)?;
    read_delimited_from_str(&text, options)
}

/// Read delimited text held in memory.
pub fn read_delimited_from_str(input: &str, options: &DelimitedOptions) -> DataResult<Table> {
    let delimiter = match options.delimiter {
        Delimiter::Auto => Delimiter::sniff(input),
        d => d,
    };

    let records: Vec<Vec<String>> = match delimiter {
        Delimiter::Byte(b) => {
            let mut rdr = csv::ReaderBuilder::new()
                .delimiter(b)
                .has_headers(false)
                .flexible(true)
                .trim(csv::Trim::All)
                .from_reader(input.as_bytes());
            let mut out = Vec::new();
            for result in rdr.records() {
                let record = result?;
                out.push(record.iter().map(str::to_owned).collect());
            }
            out
        }
        // `sniff` never returns `Auto`.
        Delimiter::Whitespace | Delimiter::Auto => input
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.split_whitespace().map(str::to_owned).collect())
            .collect(),
    };

    records_to_table(records, options)
}

/// Read from an existing CSV reader; the reader's own header setting decides whether a header
/// row is consumed.
pub fn read_delimited_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    names: Option<&[String]>,
) -> DataResult<Table> {
    let header: Option<Vec<String>> = if rdr.has_headers() {
        Some(rdr.headers()?.iter().map(str::to_owned).collect())
    } else {
        None
    };

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        records.push(record.iter().map(str::to_owned).collect());
    }

    let names = names.map(<[String]>::to_vec).or(header);
    build_table(names, records)
}

fn records_to_table(mut records: Vec<Vec<String>>, options: &DelimitedOptions) -> DataResult<Table> {
    let header = if options.has_header && !records.is_empty() {
        Some(records.remove(0))
    } else {
        None
    };
    let names = options.names.clone().or(header);
    build_table(names, records)
}

fn build_table(names: Option<Vec<String>>, records: Vec<Vec<String>>) -> DataResult<Table> {
    let width = records.iter().map(Vec::len).max().unwrap_or(0);
    let names = match names {
        Some(n) if n.len() >= width => n,
        Some(n) => {
            return Err(DataError::ShapeMismatch {
                message: format!(
                    "{} column names but rows have up to {width} fields. names={n:?}",
                    n.len()
                ),
            });
        }
        None => (0..width).map(|i| format!("col{i}")).collect(),
    };

    let rows = records
        .into_iter()
        .map(|r| r.iter().map(|f| CellValue::from_field(f)).collect())
        .collect();
    Table::from_rows(names, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ElementType;

    fn no_header(names: &[&str]) -> DelimitedOptions {
        DelimitedOptions {
            has_header: false,
            names: Some(names.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn sniffs_delimiters() {
        assert_eq!(Delimiter::sniff("\n a,b\n"), Delimiter::Byte(b','));
        assert_eq!(Delimiter::sniff("a\tb"), Delimiter::Byte(b'\t'));
        assert_eq!(Delimiter::sniff("a;b"), Delimiter::Byte(b';'));
        assert_eq!(Delimiter::sniff("0.0 112.0"), Delimiter::Whitespace);
    }

    #[test]
    fn parses_delimiter_names() {
        assert_eq!(Delimiter::parse("tab").unwrap(), Delimiter::Byte(b'\t'));
        assert_eq!(Delimiter::parse(";").unwrap(), Delimiter::Byte(b';'));
        assert_eq!(Delimiter::parse("whitespace").unwrap(), Delimiter::Whitespace);
        assert!(Delimiter::parse("::").is_err());
    }

    #[test]
    fn whitespace_without_header_uses_names() {
        let t = read_delimited_from_str("0.0 112.0\n1.0   118.0\n\n", &no_header(&["time", "passengers"]))
            .unwrap();
        assert_eq!(t.column_names(), vec!["time", "passengers"]);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.columns()[1].values[1], CellValue::Number(118.0));
        assert_eq!(t.columns()[1].element_type, ElementType::Number);
    }

    #[test]
    fn csv_with_header_tags_text_columns_unknown() {
        let input = "Date,Time,CO(GT)\n10/03/2004,18.00.00,2.6\n10/03/2004,19.00.00,-200\n";
        let t = read_delimited_from_str(input, &DelimitedOptions::default()).unwrap();
        assert_eq!(t.column_names(), vec!["Date", "Time", "CO(GT)"]);
        assert_eq!(t.columns()[0].element_type, ElementType::Unknown);
        assert_eq!(t.columns()[2].element_type, ElementType::Number);
        assert_eq!(t.columns()[2].values[1], CellValue::Number(-200.0));
    }

    #[test]
    fn generated_names_without_header() {
        let opts = DelimitedOptions {
            has_header: false,
            ..Default::default()
        };
        let t = read_delimited_from_str("1,2\n3,4\n", &opts).unwrap();
        assert_eq!(t.column_names(), vec!["col0", "col1"]);
    }

    #[test]
    fn too_few_names_is_an_error() {
        let err = read_delimited_from_str("1,2,3\n", &no_header(&["a", "b"])).unwrap_err();
        assert!(matches!(err, DataError::ShapeMismatch { .. }));
    }

    #[test]
    fn from_reader_honors_reader_headers() {
        let input = "t;v\n0;1\n1;2\n";
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .from_reader(input.as_bytes());
        let t = read_delimited_from_reader(&mut rdr, None).unwrap();
        assert_eq!(t.column_names(), vec!["t", "v"]);
        assert_eq!(t.row_count(), 2);
    }
}
