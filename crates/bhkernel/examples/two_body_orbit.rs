//! Circular binary example
//!
//! Drives the kernel through its buffer API for ten orbits of an equal-mass
//! binary and reports energy and angular momentum conservation.
//!
//! Run with: cargo run --package bhkernel --example two_body_orbit

use bhkernel::{Kernel, KernelConfig};

fn angular_momentum(x: &[f64], y: &[f64], vx: &[f64], vy: &[f64], mass: &[f64]) -> f64 {
    (0..mass.len())
        .map(|i| mass[i] * (x[i] * vy[i] - y[i] * vx[i]))
        .sum()
}

fn main() -> bhkernel::Result<()> {
    println!("Barnes-Hut kernel: equal-mass binary\n");
    println!("{}", "=".repeat(60));

    let mut kernel = Kernel::new(KernelConfig::default())?;

    // Unit separation, total mass 1: v = 0.5 each, period 2π
    let (mut x, mut y) = (vec![-0.5, 0.5], vec![0.0, 0.0]);
    let (mut vx, mut vy) = (vec![0.0, 0.0], vec![-0.5, 0.5]);
    let (mut ax, mut ay) = (vec![0.0; 2], vec![0.0; 2]);
    let mass = vec![0.5, 0.5];

    kernel.compute_forces(&x, &y, &mass, &mut ax, &mut ay)?;

    let initial_energy = kernel.compute_energy(&x, &y, &vx, &vy, &mass)?;
    let initial_l = angular_momentum(&x, &y, &vx, &vy, &mass);

    println!("\nInitial conditions:");
    println!("  Masses: {:?}", mass);
    println!("  Energy: {:.6e}", initial_energy);
    println!("  Angular momentum: {:.6e}", initial_l);

    let orbital_period = 2.0 * std::f64::consts::PI;
    let steps_per_orbit = 1000;
    let dt = orbital_period / steps_per_orbit as f64;
    let n_orbits = 10;

    println!("\nIntegrating {} orbits at {} steps/orbit...", n_orbits, steps_per_orbit);

    for orbit in 1..=n_orbits {
        for _ in 0..steps_per_orbit {
            kernel.leapfrog_step(dt, &mut x, &mut y, &mut vx, &mut vy, &mut ax, &mut ay, &mass)?;
        }

        let energy = kernel.compute_energy(&x, &y, &vx, &vy, &mass)?;
        let l = angular_momentum(&x, &y, &vx, &vy, &mass);
        let separation = (x[1] - x[0]).hypot(y[1] - y[0]);

        println!(
            "Orbit {}: d={:.6}, ΔE={:.2e}, ΔL={:.2e}",
            orbit,
            separation,
            ((energy - initial_energy) / initial_energy).abs(),
            ((l - initial_l) / initial_l).abs()
        );
    }

    let final_energy = kernel.compute_energy(&x, &y, &vx, &vy, &mass)?;
    let energy_error = ((final_energy - initial_energy) / initial_energy).abs();

    println!("\n{}", "=".repeat(60));
    if energy_error < 1e-4 {
        println!("✓ Energy conserved to within 0.01%");
    } else {
        println!("✗ Energy error too large: {:.2e}", energy_error);
    }

    Ok(())
}
