use std::f64::consts::PI;

use approx::assert_relative_eq;

use crate::bodies::{Body, BodySet};
use crate::energy::energy;
use crate::forces::{DirectGravity, ForceModel};
use crate::integrator::{Integrator, Leapfrog};
use crate::test_support::{circular_binary, random_bodies};
use crate::KernelError;

const SOFTENING: f64 = 1e-4;

fn seed(bodies: &mut BodySet, force: &mut dyn ForceModel) {
    let mut buffers = bodies.buffers();
    let (points, ax, ay) = buffers.split_for_forces();
    force.accelerations(&points, ax, ay).unwrap();
}

fn total_energy(bodies: &BodySet) -> f64 {
    let (vx, vy) = bodies.velocities();
    energy(&bodies.points(), vx, vy, SOFTENING, usize::MAX)
        .unwrap()
        .total()
}

#[test]
fn test_leapfrog_changes_position() {
    let mut bodies = circular_binary();
    let mut force = DirectGravity::default();
    seed(&mut bodies, &mut force);
    let initial = bodies.body(1).position;

    Leapfrog.step(&mut bodies.buffers(), 0.01, &mut force).unwrap();

    assert!((bodies.body(1).position - initial).magnitude() > 0.0);
}

#[test]
fn test_free_body_drifts_in_a_line() {
    let mut bodies: BodySet = [Body::new([1.0, 2.0], [0.5, -0.25], 3.0)]
        .into_iter()
        .collect();
    let mut force = DirectGravity::default();

    Leapfrog
        .integrate(&mut bodies.buffers(), 0.1, 10, &mut force)
        .unwrap();

    let body = bodies.body(0);
    assert_relative_eq!(body.position.x, 1.5, max_relative = 1e-12);
    assert_relative_eq!(body.position.y, 1.75, max_relative = 1e-12);
    assert_eq!(body.velocity.x, 0.5);
}

#[test]
fn test_unseeded_acceleration_counts_as_zero() {
    let mut bodies = circular_binary();
    let mut force = DirectGravity::default();

    // First half kick sees a = 0, so the drift uses the initial velocity
    Leapfrog.step(&mut bodies.buffers(), 0.1, &mut force).unwrap();

    assert_relative_eq!(bodies.body(1).position.y, 0.05, max_relative = 1e-12);
    assert_relative_eq!(bodies.body(1).position.x, 0.5, max_relative = 1e-12);
}

#[test]
fn test_circular_orbit_conserves_energy() {
    let mut bodies = circular_binary();
    let mut force = DirectGravity::default();
    seed(&mut bodies, &mut force);
    let e0 = total_energy(&bodies);

    Leapfrog
        .integrate(&mut bodies.buffers(), 0.001, 1000, &mut force)
        .unwrap();

    let drift = ((total_energy(&bodies) - e0) / e0).abs();
    assert!(drift < 0.01, "energy drift {drift}");
}

#[test]
fn test_full_orbit_returns_near_start() {
    let mut bodies = circular_binary();
    let mut force = DirectGravity::default();
    seed(&mut bodies, &mut force);
    let r0 = (bodies.body(1).position - bodies.body(0).position).magnitude();

    // Period is 2π; softening shifts it very slightly
    let steps = 2000;
    Leapfrog
        .integrate(&mut bodies.buffers(), 2.0 * PI / steps as f64, steps, &mut force)
        .unwrap();

    let r1 = (bodies.body(1).position - bodies.body(0).position).magnitude();
    assert!((r1 - r0).abs() < 1e-3, "separation changed by {}", r1 - r0);
    assert!((bodies.body(1).position.x - 0.5).abs() < 1e-2);
    assert!(bodies.body(1).position.y.abs() < 1e-2);
}

#[test]
fn test_conserves_momentum_and_angular_momentum() {
    let mut bodies = circular_binary();
    let mut force = DirectGravity::default();
    seed(&mut bodies, &mut force);
    let l0 = bodies.total_angular_momentum();

    Leapfrog
        .integrate(&mut bodies.buffers(), 0.01, 500, &mut force)
        .unwrap();

    assert!(bodies.total_momentum().magnitude() < 1e-12);
    assert_relative_eq!(bodies.total_angular_momentum(), l0, max_relative = 1e-10);
}

#[test]
fn test_time_reversible() {
    let r = random_bodies(20, 5.0, 17);
    let mut bodies = BodySet::from_buffers(&r.x, &r.y, &r.vx, &r.vy, &r.mass).unwrap();
    let mut force = DirectGravity::new(0.1);
    seed(&mut bodies, &mut force);
    let start = bodies.clone();

    Leapfrog
        .integrate(&mut bodies.buffers(), 0.001, 100, &mut force)
        .unwrap();
    {
        let mut buffers = bodies.buffers();
        buffers.vx.iter_mut().for_each(|v| *v = -*v);
        buffers.vy.iter_mut().for_each(|v| *v = -*v);
    }
    Leapfrog
        .integrate(&mut bodies.buffers(), 0.001, 100, &mut force)
        .unwrap();

    for (a, b) in bodies.iter().zip(start.iter()) {
        assert!((a.position - b.position).magnitude() < 1e-9);
        assert!((a.velocity + b.velocity).magnitude() < 1e-9);
    }
}

#[test]
fn test_non_finite_step_is_rejected() {
    let mut bodies = circular_binary();
    let before = bodies.clone();
    let mut force = DirectGravity::default();

    let err = Leapfrog
        .step(&mut bodies.buffers(), f64::NAN, &mut force)
        .unwrap_err();

    assert!(matches!(err, KernelError::InvalidTimeStep(dt) if dt.is_nan()));
    assert_eq!(bodies, before);
}
