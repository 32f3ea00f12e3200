//! Table → [`Data`] channels.
//!
//! Each selected column gets a formatter from the load's [`FormatRegistry`] and is converted in
//! full; any unparseable cell fails the whole build.

use crate::data::Data;
use crate::dataset::DataSet;
use crate::error::{DataError, DataResult};
use crate::format::{parse_column, FormatRegistry, Formatter};
use crate::types::{ColumnSelector, Table};

/// Canonical input columns shared by every channel built from one table.
struct Inputs {
    rows: Vec<Vec<f64>>,
    formatters: Vec<Formatter>,
    labels: Vec<String>,
}

fn build_inputs(table: &Table, x_cols: &[ColumnSelector], formats: &FormatRegistry) -> DataResult<Inputs> {
    if x_cols.is_empty() {
        return Err(DataError::InvalidOption {
            message: "at least one x column is required".to_string(),
        });
    }

    let mut columns = Vec::with_capacity(x_cols.len());
    let mut formatters = Vec::with_capacity(x_cols.len());
    let mut labels = Vec::with_capacity(x_cols.len());
    for sel in x_cols {
        let pos = table.position_of(sel)?;
        let col = &table.columns()[pos];
        let formatter = formats.resolve(pos, col);
        columns.push(parse_column(col, &formatter)?);
        formatters.push(formatter);
        labels.push(col.name.clone());
    }

    let rows = (0..table.row_count())
        .map(|r| columns.iter().map(|c| c[r]).collect())
        .collect();
    Ok(Inputs {
        rows,
        formatters,
        labels,
    })
}

fn ensure_rows(table: &Table) -> DataResult<()> {
    if table.row_count() == 0 {
        return Err(DataError::EmptyData {
            message: format!("table has no rows (columns={:?})", table.column_names()),
        });
    }
    Ok(())
}

fn build_from_inputs(
    table: &Table,
    inputs: &Inputs,
    y_col: &ColumnSelector,
    formats: &FormatRegistry,
    test_indices: &[usize],
) -> DataResult<Data> {
    let pos = table.position_of(y_col)?;
    let col = &table.columns()[pos];
    let y_formatter = formats.resolve(pos, col);
    let y = parse_column(col, &y_formatter)?;

    let mut data = Data::new(col.name.clone(), inputs.rows.clone(), y)?
        .with_x_formatters(inputs.formatters.clone())?
        .with_x_labels(inputs.labels.clone())?
        .with_y_formatter(y_formatter)
        .with_y_label(col.name.clone());
    if !test_indices.is_empty() {
        data.set_test_indices(test_indices)?;
    }
    Ok(data)
}

/// Build one channel from `table`.
///
/// - `x_cols` are the input dimensions, in order; `y_col` is the output. The channel is named
///   after the output column and its axis labels are the column names.
/// - Every row is training data except `test_indices` (0-based rows).
///
/// Errors: [`DataError::EmptyData`] for a table without rows, [`DataError::ColumnNotFound`] for
/// a selector that does not resolve, [`DataError::Format`] for the first unparseable cell and
/// [`DataError::Index`] for an out-of-range test index.
///
/// ```rust
/// use gp_channels::format::FormatRegistry;
/// use gp_channels::ingestion::build_channel;
/// use gp_channels::types::{Column, Table};
///
/// let table = Table::new(vec![
///     Column::from_numbers("time", [0.0, 1.0]),
///     Column::from_numbers("passengers", [112.0, 118.0]),
/// ])
/// .unwrap();
/// let data = build_channel(&table, &["time".into()], &"passengers".into(), &FormatRegistry::new(), &[])
///     .unwrap();
/// assert_eq!(data.name(), "passengers");
/// assert_eq!(data.x(), &[vec![0.0], vec![1.0]]);
/// ```
pub fn build_channel(
    table: &Table,
    x_cols: &[ColumnSelector],
    y_col: &ColumnSelector,
    formats: &FormatRegistry,
    test_indices: &[usize],
) -> DataResult<Data> {
    ensure_rows(table)?;
    let inputs = build_inputs(table, x_cols, formats)?;
    build_from_inputs(table, &inputs, y_col, formats, test_indices)
}

/// Build one channel per `y_cols` entry, all sharing `x_cols`.
///
/// Empty `x_cols` defaults to the first column and empty `y_cols` to the second. Channels keep
/// the order of `y_cols`; two outputs resolving to the same column name are a
/// [`DataError::DuplicateName`].
pub fn build_dataset(
    table: &Table,
    x_cols: &[ColumnSelector],
    y_cols: &[ColumnSelector],
    formats: &FormatRegistry,
    test_indices: &[usize],
) -> DataResult<DataSet> {
    ensure_rows(table)?;

    let default_x = [ColumnSelector::Position(0)];
    let default_y = [ColumnSelector::Position(1)];
    let x_cols = if x_cols.is_empty() { &default_x[..] } else { x_cols };
    let y_cols = if y_cols.is_empty() { &default_y[..] } else { y_cols };

    let inputs = build_inputs(table, x_cols, formats)?;
    let channels = y_cols
        .iter()
        .map(|y| build_from_inputs(table, &inputs, y, formats, test_indices))
        .collect::<DataResult<Vec<_>>>()?;
    DataSet::from_channels(channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::DateTimeFormatter;
    use crate::types::Column;

    fn table() -> Table {
        Table::new(vec![
            Column::from_text("date", ["2020-01-01", "2020-01-02", "2020-01-03"]),
            Column::from_numbers("a", [1.0, 2.0, 3.0]),
            Column::from_numbers("b", [-200.0, 5.0, 6.0]),
        ])
        .unwrap()
    }

    #[test]
    fn infers_date_inputs_and_keeps_labels() {
        let d = build_channel(&table(), &["date".into()], &"a".into(), &FormatRegistry::new(), &[]).unwrap();
        assert_eq!(d.x()[1], vec![1_577_923_200.0]);
        assert!(d.x_formatters()[0].is_datetime());
        assert_eq!(d.x_labels(), &["date".to_string()]);
        assert_eq!(d.y_label(), "a");
        assert_eq!(d.render_x(2).unwrap(), vec!["2020-01-03".to_string()]);
        assert!(d.mask().iter().all(|&m| m));
    }

    #[test]
    fn multi_dimensional_inputs_follow_selector_order() {
        let d = build_channel(&table(), &[1usize.into(), "date".into()], &"b".into(), &FormatRegistry::new(), &[])
            .unwrap();
        assert_eq!(d.input_dims(), 2);
        assert_eq!(d.x()[0], vec![1.0, 1_577_836_800.0]);
        assert_eq!(d.y(), &[-200.0, 5.0, 6.0]);
    }

    #[test]
    fn test_indices_initialize_mask() {
        let d = build_channel(&table(), &["date".into()], &"a".into(), &FormatRegistry::new(), &[2]).unwrap();
        assert_eq!(d.mask(), &[true, true, false]);

        let err = build_channel(&table(), &["date".into()], &"a".into(), &FormatRegistry::new(), &[3])
            .unwrap_err();
        assert!(matches!(err, DataError::Index { index: 3, len: 3 }));
    }

    #[test]
    fn unresolved_selectors_and_empty_tables_fail() {
        let err = build_channel(&table(), &["nope".into()], &"a".into(), &FormatRegistry::new(), &[]).unwrap_err();
        assert!(matches!(err, DataError::ColumnNotFound { .. }));

        let err = build_channel(&table(), &["date".into()], &7usize.into(), &FormatRegistry::new(), &[]).unwrap_err();
        assert!(matches!(err, DataError::ColumnNotFound { .. }));

        let empty = Table::new(vec![Column::from_numbers("t", Vec::new()), Column::from_numbers("v", Vec::new())]).unwrap();
        let err = build_channel(&empty, &["t".into()], &"v".into(), &FormatRegistry::new(), &[]).unwrap_err();
        assert!(matches!(err, DataError::EmptyData { .. }));

        let err = build_channel(&table(), &[], &"a".into(), &FormatRegistry::new(), &[]).unwrap_err();
        assert!(matches!(err, DataError::InvalidOption { .. }));
    }

    #[test]
    fn forced_datetime_on_bad_text_reports_row() {
        let t = Table::new(vec![
            Column::from_text("when", ["2020-01-01", "not-a-date"]),
            Column::from_numbers("v", [1.0, 2.0]),
        ])
        .unwrap();
        let formats = FormatRegistry::new().with_column("when", Formatter::DateTime(DateTimeFormatter::new()));
        let err = build_channel(&t, &["when".into()], &"v".into(), &formats, &[]).unwrap_err();
        match err {
            DataError::Format { row, ref raw, .. } => {
                assert_eq!(row, 2);
                assert_eq!(raw, "not-a-date");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn dataset_defaults_and_shared_inputs() {
        let ds = build_dataset(&table(), &[], &[], &FormatRegistry::new(), &[]).unwrap();
        assert_eq!(ds.get_names(), vec!["a"]);

        let ds = build_dataset(&table(), &["date".into()], &["a".into(), "b".into()], &FormatRegistry::new(), &[])
            .unwrap();
        assert_eq!(ds.get_output_dims(), 2);
        assert_eq!(ds.index_by_position(0).unwrap().x(), ds.index_by_position(1).unwrap().x());

        let err = build_dataset(&table(), &[], &["a".into(), 1usize.into()], &FormatRegistry::new(), &[])
            .unwrap_err();
        assert!(matches!(err, DataError::DuplicateName { .. }));
    }
}
