//! Integration tests driving the kernel the way a host does: plain buffers
//! in, one call per step.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use bhkernel::bodies::{Body, BodySet};
use bhkernel::forces::Route;
use bhkernel::{Kernel, KernelConfig, Simulation};

/// Light bodies on circular orbits around a heavy central mass.
fn central_disk(n: usize, seed: u64) -> BodySet {
    let central_mass = 1_000.0;
    let mut rng = ChaChaRng::seed_from_u64(seed);

    let mut bodies = BodySet::with_capacity(n + 1);
    bodies.push(Body::new([0.0, 0.0], [0.0, 0.0], central_mass));
    for _ in 0..n {
        let r: f64 = rng.random_range(1.0..5.0);
        let phi: f64 = rng.random_range(0.0..std::f64::consts::TAU);
        let v = (central_mass / r).sqrt();
        bodies.push(Body::new(
            [r * phi.cos(), r * phi.sin()],
            [-v * phi.sin(), v * phi.cos()],
            1e-3,
        ));
    }
    bodies
}

#[test]
fn tree_routed_disk_conserves_energy() {
    let mut sim = Simulation::with_bodies(KernelConfig::default(), central_disk(300, 7)).unwrap();
    let e0 = sim.energy().unwrap();
    assert!(e0.potential.is_some(), "301 bodies is under the pair cutoff");

    for _ in 0..50 {
        sim.step(1e-4, 1).unwrap();
    }
    assert_eq!(sim.kernel().last_route(), Some(Route::Tree));

    let e1 = sim.energy().unwrap();
    let drift = ((e1.total() - e0.total()) / e0.total()).abs();
    println!("energy drift after 50 tree steps: {drift:.3e}");
    assert!(drift < 1e-2);
}

#[test]
fn buffer_api_matches_session_api() {
    let bodies = central_disk(50, 8);
    let n = bodies.len();

    let mut x: Vec<f64> = bodies.iter().map(|b| b.position.x).collect();
    let mut y: Vec<f64> = bodies.iter().map(|b| b.position.y).collect();
    let mut vx: Vec<f64> = bodies.iter().map(|b| b.velocity.x).collect();
    let mut vy: Vec<f64> = bodies.iter().map(|b| b.velocity.y).collect();
    let mass: Vec<f64> = bodies.iter().map(|b| b.mass).collect();
    let (mut ax, mut ay) = (vec![0.0; n], vec![0.0; n]);

    let mut kernel = Kernel::default();
    kernel.compute_forces(&x, &y, &mass, &mut ax, &mut ay).unwrap();
    for _ in 0..10 {
        kernel
            .leapfrog_step(1e-4, &mut x, &mut y, &mut vx, &mut vy, &mut ax, &mut ay, &mass)
            .unwrap();
    }

    let mut sim = Simulation::with_bodies(KernelConfig::default(), bodies).unwrap();
    let frame = sim.step(1e-4, 10).unwrap();

    let packed: Vec<f64> = x.iter().zip(&y).flat_map(|(&x, &y)| [x, y]).collect();
    assert_eq!(frame.positions, packed);
}

#[test]
fn large_system_reports_kinetic_only() {
    let mut sim = Simulation::with_bodies(KernelConfig::default(), central_disk(600, 9)).unwrap();

    let frame = sim.step(1e-5, 1).unwrap();

    assert_eq!(frame.body_count, 601);
    assert!(frame.energy.is_kinetic_only());
    assert!(sim.kernel().tree_stats().nodes > 601);
}

#[test]
fn coincident_cluster_survives_stepping() {
    let mut sim = Simulation::new(KernelConfig {
        direct_threshold: 0,
        ..KernelConfig::default()
    })
    .unwrap();
    sim.init((0..20).map(|_| Body::new([1.0, 1.0], [0.0, 0.0], 1.0)))
        .unwrap();

    let frame = sim.step(0.01, 5).unwrap();

    assert!(sim.kernel().tree_stats().depth_capped);
    assert!(frame.positions.iter().all(|p| p.is_finite()));
    assert!(frame.energy.total().is_finite());
}
