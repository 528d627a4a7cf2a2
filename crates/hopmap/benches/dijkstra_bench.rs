//! Criterion microbenches for graph construction, periodic Dijkstra and
//! pathway extraction on random Li arrangements.
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hopmap::api::{
    build_graph, periodic_dijkstra, CutoffNeighbors, FixedOps, Lattice, SearchCfg, Site, Structure,
};
use hopmap::{FullPathMapper, MapperCfg};
use nalgebra::Vector3;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_structure(n: usize, seed: u64) -> Structure {
    let mut rng = StdRng::seed_from_u64(seed);
    let sites = (0..n)
        .map(|_| Site::new("Li", Vector3::new(rng.gen(), rng.gen(), rng.gen())))
        .collect();
    Structure::new(Lattice::orthorhombic(6.0, 6.5, 7.0), sites)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");
    for n in [4usize, 8, 16] {
        let s = random_structure(n, 42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &s, |b, s| {
            b.iter(|| build_graph(s, 4.0, &CutoffNeighbors))
        });
    }
    group.finish();
}

fn bench_dijkstra(c: &mut Criterion) {
    let mut group = c.benchmark_group("periodic_dijkstra");
    for n in [4usize, 8, 16] {
        let g = build_graph(&random_structure(n, 7), 4.0, &CutoffNeighbors);
        for max_image in [1, 2] {
            group.bench_with_input(
                BenchmarkId::new(format!("n{n}"), max_image),
                &max_image,
                |b, &max_image| b.iter(|| periodic_dijkstra(&g, &[0], SearchCfg { max_image })),
            );
        }
    }
    group.finish();
}

fn bench_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("intercollating_paths");
    let cfg = MapperCfg {
        max_path_length: 4.0,
        ..MapperCfg::default()
    };
    for n in [4usize, 8] {
        let m = FullPathMapper::new(random_structure(n, 11), "Li", cfg, &FixedOps::default())
            .expect("mapper");
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter(|| m.get_intercollating_path(100.0).count())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_dijkstra, bench_paths);
criterion_main!(benches);
