//! Benchmarks for point-to-raster interpolation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pointgrid_algorithms::interpolation::{
    build_lattice, idw, nearest_neighbor, GridParams, IdwParams, NearestParams,
};
use pointgrid_core::{PointSet, SamplePoint, CRS};
use pointgrid_parallel::ProcessingMode;

fn create_survey(n: usize) -> PointSet {
    // Deterministic scatter over a 1000 x 1000 area
    let points = (0..n)
        .map(|i| {
            let x = ((i * 7919) % 1000) as f64 + ((i * 13) % 10) as f64 / 10.0;
            let y = ((i * 104_729) % 1000) as f64 + ((i * 17) % 10) as f64 / 10.0;
            let value = (x / 50.0).sin() * 20.0 + y / 25.0 + 30.0;
            SamplePoint::new(x, y, value)
        })
        .collect();
    PointSet::new(points, "value", Some(CRS::utm(33, true))).unwrap()
}

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest_neighbor");
    let grid = GridParams::new(5.0, 0.0);

    for n in [100, 1_000, 10_000].iter() {
        let survey = create_survey(*n);
        let lattice = build_lattice(&survey, &grid).unwrap();
        let params = NearestParams {
            grid,
            ..Default::default()
        };

        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, _| {
            b.iter(|| nearest_neighbor(black_box(survey.points()), &lattice, &params).unwrap())
        });
    }

    group.finish();
}

fn bench_idw(c: &mut Criterion) {
    let mut group = c.benchmark_group("idw");
    group.sample_size(10);
    let grid = GridParams::new(10.0, 0.0);

    for n in [100, 1_000].iter() {
        let survey = create_survey(*n);
        let lattice = build_lattice(&survey, &grid).unwrap();

        for (label, params) in [
            ("global", IdwParams { grid, ..Default::default() }),
            (
                "global_parallel",
                IdwParams {
                    grid,
                    mode: ProcessingMode::Parallel,
                    ..Default::default()
                },
            ),
            (
                "k12",
                IdwParams {
                    grid,
                    max_points: Some(12),
                    ..Default::default()
                },
            ),
        ] {
            group.bench_with_input(BenchmarkId::new(label, n), n, |b, _| {
                b.iter(|| idw(black_box(survey.points()), &lattice, &params).unwrap())
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_nearest, bench_idw);
criterion_main!(benches);
