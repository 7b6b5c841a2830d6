//! FILENAME: core/comparison-engine/benches/comparison_pipeline.rs
//! Benchmarks for the aggregate -> join -> delta pipeline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use comparison_engine::{compare_tables, Aggregator, PeriodLabels};
use engine::{CategoryMap, CellValue, DatasetSchema, Dimension, Table, UNKNOWN_CATEGORY};

const STATES: [&str; 6] = ["LA", "OG", "KN", "FC", "RI", "OY"];

fn synthetic_sheet(rows: usize, seed: u64) -> Table {
    let mut table = Table::with_headers("WITH 6010", &["REGION", "BANK", "STATE", "VOLUME", "VALUE"]);
    for i in 0..rows {
        let n = i as u64 * 31 + seed;
        table.push_row(vec![
            CellValue::text(format!("Region_{:02}", n % 12)),
            CellValue::text(format!("Bank_{:03}", n % 40)),
            CellValue::text(STATES[(n % STATES.len() as u64) as usize]),
            CellValue::Number((n % 500) as f64),
            CellValue::Number((n % 9_000) as f64 * 1.25),
        ]);
    }
    table
}

fn bench_levels(c: &mut Criterion) {
    let schema = DatasetSchema::default();
    let states = CategoryMap::states();
    let aggregator = Aggregator::new(&schema, UNKNOWN_CATEGORY).with_state_names(&states);
    let labels = PeriodLabels::new("WEEK_4", "WEEK_5");

    let mut group = c.benchmark_group("compare_tables");
    for rows in [1_000usize, 10_000, 100_000] {
        let previous = synthetic_sheet(rows, 7);
        let current = synthetic_sheet(rows, 11);

        let levels: [(&str, Vec<Dimension>); 3] = [
            ("weekly_totals", Vec::new()),
            ("region_bank", vec![Dimension::Region, Dimension::Bank]),
            ("state", vec![Dimension::State]),
        ];
        for (name, dimensions) in &levels {
            group.bench_with_input(BenchmarkId::new(*name, rows), &rows, |b, _| {
                b.iter(|| {
                    compare_tables(
                        &aggregator,
                        black_box(&previous),
                        black_box(&current),
                        dimensions,
                        &labels,
                    )
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_levels);
criterion_main!(benches);
