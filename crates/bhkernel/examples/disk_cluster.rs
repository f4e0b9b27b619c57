//! Rotating disk example
//!
//! Builds a few thousand light bodies around a heavy center, runs them
//! through a `Simulation` (so the tree path is used) and prints per-frame
//! diagnostics.
//!
//! Run with: cargo run --package bhkernel --example disk_cluster

use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use bhkernel::bodies::Body;
use bhkernel::{KernelConfig, Simulation};

fn main() -> bhkernel::Result<()> {
    let n = 5_000;
    let central_mass = 1_000.0;
    let mut rng = ChaChaRng::seed_from_u64(42);

    let bodies = std::iter::once(Body::new([0.0, 0.0], [0.0, 0.0], central_mass)).chain(
        (0..n).map(|_| {
            let r: f64 = rng.random_range(2.0..20.0);
            let phi: f64 = rng.random_range(0.0..std::f64::consts::TAU);
            let v = (central_mass / r).sqrt();
            Body::new([r * phi.cos(), r * phi.sin()], [-v * phi.sin(), v * phi.cos()], 0.01)
        }),
    );

    let mut sim = Simulation::new(KernelConfig::default())?;
    let frame = sim.init(bodies)?;
    println!(
        "Disk: {} bodies, E0 = {:.6e} (kinetic only: {})",
        frame.body_count,
        frame.energy.total(),
        frame.energy.is_kinetic_only()
    );

    for _ in 0..10 {
        let frame = sim.step(1e-3, 4)?;
        let stats = sim.kernel().tree_stats();
        println!(
            "t={:.3}: KE={:.6e}, nodes={}, depth={}, degraded={}",
            frame.sim_time,
            frame.energy.kinetic,
            stats.nodes,
            stats.max_depth,
            stats.is_degraded()
        );
    }

    Ok(())
}
