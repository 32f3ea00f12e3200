use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use gp_channels::dataset::Partition;
use gp_channels::format::FormatRegistry;
use gp_channels::ingestion::build_dataset;
use gp_channels::ingestion::csv::{read_delimited_from_str, DelimitedOptions};
use gp_channels::types::ColumnSelector;

fn make_csv(rows: usize) -> String {
    let mut out = String::from("date,a,b,c\n");
    for i in 0..rows {
        let day = i % 28 + 1;
        let month = i / 28 % 12 + 1;
        out.push_str(&format!("2020-{month:02}-{day:02},{i},{},{}\n", i * 2, -200));
    }
    out
}

fn bench_read_delimited(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_delimited");
    for size in [1_000usize, 10_000, 100_000] {
        let input = make_csv(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| read_delimited_from_str(black_box(input), &DelimitedOptions::default()).unwrap());
        });
    }
    group.finish();
}

fn bench_build_dataset(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_dataset");
    let x_cols = [ColumnSelector::from("date")];
    let y_cols = [
        ColumnSelector::from("a"),
        ColumnSelector::from("b"),
        ColumnSelector::from("c"),
    ];
    for size in [1_000usize, 10_000, 100_000] {
        let table = read_delimited_from_str(&make_csv(size), &DelimitedOptions::default()).unwrap();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |b, table| {
            b.iter(|| build_dataset(black_box(table), &x_cols, &y_cols, &FormatRegistry::new(), &[]).unwrap());
        });
    }
    group.finish();
}

fn bench_to_multioutput(c: &mut Criterion) {
    let table = read_delimited_from_str(&make_csv(10_000), &DelimitedOptions::default()).unwrap();
    let ds = build_dataset(
        &table,
        &["date".into()],
        &["a".into(), "b".into(), "c".into()],
        &FormatRegistry::new(),
        &[],
    )
    .unwrap();
    c.bench_function("to_multioutput_10k_x3", |b| {
        b.iter(|| black_box(&ds).to_multioutput(Partition::All).unwrap());
    });
}

criterion_group!(benches, bench_read_delimited, bench_build_dataset, bench_to_multioutput);
criterion_main!(benches);
