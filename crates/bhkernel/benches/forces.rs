//! Criterion benchmarks comparing direct summation and the Barnes-Hut tree.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use bhkernel::Kernel;
use bhkernel::bodies::PointMasses;
use bhkernel::quadtree::QuadTree;

struct Cloud {
    x: Vec<f64>,
    y: Vec<f64>,
    mass: Vec<f64>,
}

fn make_cloud(n: usize) -> Cloud {
    let mut rng = ChaChaRng::seed_from_u64(0xB4);
    Cloud {
        x: (0..n).map(|_| rng.random_range(-100.0..100.0)).collect(),
        y: (0..n).map(|_| rng.random_range(-100.0..100.0)).collect(),
        mass: (0..n).map(|_| rng.random_range(0.5..2.0)).collect(),
    }
}

fn bench_force_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("force_scaling");
    group.sample_size(20);

    for n in [100, 1_000, 5_000] {
        let cloud = make_cloud(n);
        let mut kernel = Kernel::default();
        let (mut ax, mut ay) = (vec![0.0; n], vec![0.0; n]);

        group.bench_with_input(BenchmarkId::new("direct", n), &n, |b, _| {
            b.iter(|| {
                kernel
                    .compute_forces_direct(&cloud.x, &cloud.y, &cloud.mass, &mut ax, &mut ay)
                    .unwrap();
                std::hint::black_box(&ax);
            })
        });

        group.bench_with_input(BenchmarkId::new("barnes_hut", n), &n, |b, _| {
            b.iter(|| {
                kernel
                    .compute_forces_bh(&cloud.x, &cloud.y, &cloud.mass, &mut ax, &mut ay)
                    .unwrap();
                std::hint::black_box(&ax);
            })
        });
    }

    group.finish();
}

fn bench_tree_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_build");

    for n in [1_000, 10_000, 50_000] {
        let cloud = make_cloud(n);
        let points = PointMasses::new(&cloud.x, &cloud.y, &cloud.mass).unwrap();
        let mut tree = QuadTree::new(4_000_000);

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| std::hint::black_box(tree.build(&points)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_force_scaling, bench_tree_build);
criterion_main!(benches);
