use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use plaza_ranker::processing::{build_columns, match_distances, ColumnConfig, SortOrder, TableView};
use plaza_ranker::types::{CellValue, CommuteRecord, OpeningRow};

const MUNICIPIOS: [&str; 6] = ["Donostia", "Bilbao", "Vitoria-Gasteiz", "Abadiño", "Eibar", "Irun"];

fn openings(n: usize) -> Vec<OpeningRow> {
    (0..n)
        .map(|i| {
            OpeningRow::new(
                i,
                vec![
                    ("Nº PLAZA".to_string(), CellValue::from(i as i64)),
                    ("CENTRO".to_string(), CellValue::from((10_000 + i % 2_000) as i64)),
                    ("MUNICIPIO".to_string(), CellValue::from(MUNICIPIOS[i % MUNICIPIOS.len()])),
                    ("ASIGNATURA".to_string(), CellValue::from(format!("A{:03}", i % 120))),
                ],
            )
        })
        .collect()
}

fn commute(n: usize) -> Vec<CommuteRecord> {
    (0..n)
        .map(|i| CommuteRecord::new((10_000 + i).to_string(), (i % 90) as f64, (i * 37 % 80_000) as f64))
        .collect()
}

fn bench_match(c: &mut Criterion) {
    let config = ColumnConfig::default();
    let records = commute(1_500);
    let mut group = c.benchmark_group("match_distances");
    for n in [1_000usize, 10_000] {
        let rows = openings(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &rows, |b, rows| {
            b.iter(|| match_distances(black_box(rows), black_box(&records), &config.facility_column))
        });
    }
    group.finish();
}

fn bench_columns_and_sort(c: &mut Criterion) {
    let config = ColumnConfig::default();
    let rows = match_distances(&openings(10_000), &commute(1_500), &config.facility_column);

    c.bench_function("build_columns/10000", |b| {
        b.iter(|| build_columns(black_box(&rows), &config))
    });

    let columns = build_columns(&rows, &config);
    let mut view = TableView::default();
    view.sort_by(config.duration_column.clone(), SortOrder::Ascending);
    view.set_filter("MUNICIPIO", vec!["don".to_string(), "ei".to_string()]);
    c.bench_function("visible/10000", |b| {
        b.iter(|| view.visible(black_box(&rows), &columns).len())
    });
}

criterion_group!(benches, bench_match, bench_columns_and_sort);
criterion_main!(benches);
