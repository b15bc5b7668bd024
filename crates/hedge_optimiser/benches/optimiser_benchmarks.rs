//! Benchmarks for hedge_optimiser.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hedge_models::instruments::{LegType, Level, StrategyLeg};
use hedge_optimiser::calibration::VolatilityCalibrator;

fn benchmark_newton(c: &mut Criterion) {
    let calibrator = VolatilityCalibrator::default();
    let leg = StrategyLeg::new(LegType::CALL, Level::percent(105.0), 20.0, 100.0)
        .resolve(100.0)
        .unwrap();

    c.bench_function("implied_vol_newton", |b| {
        b.iter(|| {
            calibrator
                .implied_volatility(&leg, 100.0, 105.0, 0.02, 1.0, black_box(6.5))
                .unwrap()
        })
    });
}

fn benchmark_grid(c: &mut Criterion) {
    let calibrator = VolatilityCalibrator::default();
    let leg = StrategyLeg::new(
        "call-reverse-knockout".parse::<LegType>().unwrap(),
        Level::percent(100.0),
        20.0,
        100.0,
    )
    .with_barriers(Level::percent(90.0), None)
    .resolve(100.0)
    .unwrap();

    c.bench_function("implied_vol_grid_closed_form", |b| {
        b.iter(|| {
            calibrator
                .implied_volatility(&leg, 100.0, 100.0, 0.02, 1.0, black_box(7.3))
                .unwrap()
        })
    });
}

criterion_group!(benches, benchmark_newton, benchmark_grid);
criterion_main!(benches);
