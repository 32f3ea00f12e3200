use polars::prelude::*;

use gp_channels::format::{FormatRegistry, Formatter};
use gp_channels::ingestion::{load_dataframe, LoadOptions};
use gp_channels::types::ElementType;
use gp_channels::DataError;

#[test]
fn dataframe_columns_become_channels() {
    let df = df!(
        "time" => [0.0, 1.0, 2.0],
        "a" => [1i64, 2, 3],
        "b" => [0.5, 0.25, 0.125]
    )
    .unwrap();

    let opts = LoadOptions {
        y_cols: vec!["a".into(), "b".into()],
        test_indices: vec![0],
        ..Default::default()
    };
    let ds = load_dataframe(&df, &opts).unwrap();
    assert_eq!(ds.get_names(), vec!["a", "b"]);
    assert_eq!(ds.index_by_name("a").unwrap().y(), &[1.0, 2.0, 3.0]);
    assert_eq!(ds.get_train_data().y[1], vec![0.25, 0.125]);
}

#[test]
fn dataframe_dates_and_string_dates() {
    let mut df = df!(
        "label" => ["2020-01-01", "2020-01-02"],
        "value" => [1.0, 2.0]
    )
    .unwrap();
    let days = Series::new("day".into(), [18262i32, 18263])
        .cast(&DataType::Date)
        .unwrap();
    df.with_column(days.into()).unwrap();

    let opts = LoadOptions {
        x_cols: vec!["day".into()],
        y_cols: vec!["value".into()],
        ..Default::default()
    };
    let ds = load_dataframe(&df, &opts).unwrap();
    let ch = ds.index_by_name("value").unwrap();
    assert_eq!(ch.x()[1], vec![1_577_923_200.0]);

    let opts = LoadOptions {
        x_cols: vec!["label".into()],
        y_cols: vec!["value".into()],
        ..Default::default()
    };
    let ds = load_dataframe(&df, &opts).unwrap();
    assert_eq!(ds.index_by_name("value").unwrap().x()[1], vec![1_577_923_200.0]);
}

#[test]
fn forcing_number_on_date_text_fails() {
    let df = df!(
        "label" => ["2020-01-01", "2020-01-02"],
        "value" => [1.0, 2.0]
    )
    .unwrap();
    let opts = LoadOptions {
        formats: FormatRegistry::new().with_type(ElementType::Unknown, Formatter::Number),
        ..Default::default()
    };
    let err = load_dataframe(&df, &opts).unwrap_err();
    assert!(matches!(err, DataError::Format { row: 1, .. }));
}
