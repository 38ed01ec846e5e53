//! Run these benches with `cargo bench --bench align -- --verbose`

use chrono::{Duration, NaiveDate, NaiveDateTime};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

criterion_main!(align_benches);

criterion_group!(align_benches, nearest_index_bench, nearest_range_bench);

/// A month of 5-minute observations
fn month_of_observations() -> Vec<NaiveDateTime> {
    let start = NaiveDate::from_ymd_opt(2010, 10, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..31 * 24 * 12)
        .map(|i| start + Duration::minutes(5 * i))
        .collect()
}

fn nearest_index_bench(c: &mut Criterion) {
    let times = month_of_observations();
    let target = times[times.len() / 2] + Duration::minutes(2);

    c.bench_function("nearest_index", |b| {
        b.iter(|| stratus::nearest_index(black_box(&times), black_box(target)).expect("oops"));
    });
}

fn nearest_range_bench(c: &mut Criterion) {
    let times = month_of_observations();
    let start = times[1000] + Duration::minutes(1);
    let end = times[5000] - Duration::minutes(1);

    c.bench_function("nearest_range", |b| {
        b.iter(|| stratus::nearest_range(black_box(&times), start, end).expect("oops"));
    });
}
