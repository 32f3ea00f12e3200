use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use gp_channels::ingestion::{load_from_path, load_glob, load_paths_parallel, LoadConfig, LoadOptions};
use gp_channels::DataError;

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("gp-channels-{name}-{nanos}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn json_config_drives_a_load() {
    let dir = tmp_dir("config");
    let data = dir.join("air.txt");
    std::fs::write(&data, "10/03/2004 2.6 11\n11/03/2004 -200 12\n12/03/2004 2.2 13\n").unwrap();

    let cfg_path = dir.join("load.json");
    std::fs::write(
        &cfg_path,
        r#"{
            "delimiter": "whitespace",
            "names": ["date", "co", "no2"],
            "x_cols": ["date"],
            "y_cols": ["co", 2],
            "formats": {"date": {"kind": "date_time", "pattern": "%d/%m/%Y"}},
            "test_indices": [1]
        }"#,
    )
    .unwrap();

    let opts = LoadConfig::from_json_path(&cfg_path).unwrap().into_options().unwrap();
    let ds = load_from_path(&data, &opts).unwrap();
    assert_eq!(ds.get_names(), vec!["co", "no2"]);

    let co = ds.index_by_name("co").unwrap();
    assert_eq!(co.y(), &[2.6, -200.0, 2.2]);
    assert_eq!(co.mask(), &[true, false, true]);
    assert_eq!(co.render_x(2).unwrap(), vec!["12/03/2004".to_string()]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn parallel_paths_merge_in_input_order() {
    let dir = tmp_dir("parallel");
    let a = dir.join("a.csv");
    let b = dir.join("b.json");
    std::fs::write(&a, "t,first\n0,1\n1,2\n").unwrap();
    std::fs::write(&b, r#"[{"day": 0, "second": 5}, {"day": 1, "second": 6}]"#).unwrap();

    let ds = load_paths_parallel(&[&b, &a], &LoadOptions::default()).unwrap();
    assert_eq!(ds.get_names(), vec!["second", "first"]);
    assert_eq!(ds.index_by_name("second").unwrap().y(), &[5.0, 6.0]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn glob_loads_sorted_matches() {
    let dir = tmp_dir("glob");
    std::fs::write(dir.join("2.csv"), "t,beta\n0,1\n").unwrap();
    std::fs::write(dir.join("1.csv"), "t,alpha\n0,1\n").unwrap();
    std::fs::write(dir.join("notes.md"), "ignored").unwrap();

    let pattern = format!("{}/*.csv", dir.display());
    let ds = load_glob(&pattern, &LoadOptions::default()).unwrap();
    assert_eq!(ds.get_names(), vec!["alpha", "beta"]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn files_sharing_an_output_name_collide() {
    let dir = tmp_dir("collide");
    std::fs::write(dir.join("1.csv"), "t,v\n0,1\n").unwrap();
    std::fs::write(dir.join("2.csv"), "t,v\n0,2\n").unwrap();

    let pattern = format!("{}/*.csv", dir.display());
    let err = load_glob(&pattern, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, DataError::DuplicateName { .. }));

    let _ = std::fs::remove_dir_all(&dir);
}
