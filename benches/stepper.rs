//! Benchmarks for the fork-join generation stepper.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use gol_threads::{
    compute::{GenerationStepper, Partition},
    schema::{Pattern, Seed},
};

fn soup(board_size: usize) -> gol_threads::Grid {
    let seed = Seed {
        pattern: Pattern::Random {
            density: 0.3,
            seed: 7,
        },
    };
    seed.generate(board_size).expect("valid seed")
}

fn bench_board_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_board_size");

    for size in [64, 128, 256, 512, 1024] {
        let stepper = GenerationStepper::new(Partition::new(size, 4).unwrap()).unwrap();
        let mut grid = soup(size);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| {
                    stepper.step(black_box(&mut grid)).unwrap();
                    grid.swap();
                });
            },
        );
    }

    group.finish();
}

fn bench_partitions(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_partitions");

    for factor in [1, 2, 4, 8] {
        let stepper = GenerationStepper::new(Partition::new(512, factor).unwrap()).unwrap();
        let mut grid = soup(512);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_workers", factor * factor)),
            &factor,
            |b, _| {
                b.iter(|| {
                    stepper.step(black_box(&mut grid)).unwrap();
                    grid.swap();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_board_size, bench_partitions);
criterion_main!(benches);
