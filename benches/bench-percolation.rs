#[macro_use]
extern crate criterion;

use criterion::Criterion;
use rand::{Rng, SeedableRng};

use percmc::mc::stats::ThresholdStats;
use percmc::mc::trial::run_trial;
use percmc::percolation::PercolationGrid;
use percmc::rng::MyRng;
use percmc::union_find::DisjointSet;

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = MyRng::seed_from_u64(0);
    c.bench_function("MyRng.gen_range", move |b| b.iter(|| rng.gen_range(0, 40_000usize)));

    c.bench_function_over_inputs(
        "union_connected",
        move |b, &&n| {
            let mut rng = MyRng::seed_from_u64(1);
            let mut sets = DisjointSet::new(n).unwrap();
            b.iter(|| {
                let p = rng.gen_range(0, n);
                let q = rng.gen_range(0, n);
                sets.union(p, q).unwrap();
                sets.connected(p, q).unwrap()
            })
        },
        &[1_000, 100_000, 1_000_000],
    );

    c.bench_function_over_inputs(
        "open_every_site",
        move |b, &&n| {
            b.iter(|| {
                let mut grid = PercolationGrid::new(n).unwrap();
                for row in 1..=n {
                    for col in 1..=n {
                        grid.open(row, col).unwrap();
                    }
                }
                grid.percolates().unwrap()
            })
        },
        &[50, 100, 200],
    );

    c.bench_function_over_inputs(
        "run_trial",
        move |b, &&n| {
            let mut rng = MyRng::seed_from_u64(2);
            b.iter(|| run_trial(n, &mut rng).unwrap())
        },
        &[50, 100, 200],
    );

    c.bench_function("threshold_stats_parallel_50x50_32", move |b| {
        let mut rng = MyRng::seed_from_u64(3);
        b.iter(|| ThresholdStats::run_parallel(50, 32, &mut rng).unwrap().mean())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
