use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use marketsim::prelude::*;

fn engine_benchmark(c: &mut Criterion) {
    let engine = MonteCarloEngine::new();
    let mut group = c.benchmark_group("demand_simulation");

    for trials in [10_000usize, 1_000_000] {
        let params = SimulationParameters::for_strategy(Strategy::Premium, 5.0, 2.0, 0.2, 10_000.0)
            .with_trial_count(trials);

        group.bench_with_input(BenchmarkId::new("run", trials), &params, |b, params| {
            b.iter(|| {
                let mut rng = seeded_rng(42);
                black_box(engine.run(params, &mut rng).unwrap())
            })
        });

        group.bench_with_input(BenchmarkId::new("par_run", trials), &params, |b, params| {
            b.iter(|| black_box(engine.par_run(params, 42).unwrap()))
        });
    }
    group.finish();

    let params = SimulationParameters::new(5.0, 2.0, 0.2, 10_000.0);
    c.bench_function("strategy_report", |b| {
        b.iter(|| black_box(StrategyReport::build(&params, 42, ReportOptions::default()).unwrap()))
    });
}

criterion_group!(benches, engine_benchmark);
criterion_main!(benches);
