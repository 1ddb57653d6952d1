//! Benchmarks for moving-average calculations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trading_core::traits::Indicator;
use trading_indicators::Sma;

fn generate_test_data(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0)
        .collect()
}

fn benchmark_sma(c: &mut Criterion) {
    let mut group = c.benchmark_group("SMA");

    // 126 is roughly six months of trading days.
    for size in [126, 1000, 10000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("calculate", size), &data, |b, data| {
            let sma = Sma::new(50);
            b.iter(|| sma.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("rolling", size), &data, |b, data| {
            let sma = Sma::new(50);
            b.iter(|| sma.rolling(black_box(data)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_sma);
criterion_main!(benches);
