//! Time integration for N-body systems
//!
//! The kernel integrates with the symplectic leapfrog method in its
//! kick-drift-kick (velocity-Verlet) form, which keeps the energy error
//! bounded over long runs as long as `dt` is small compared to the shortest
//! orbital timescale in the system. There is no timestep control: the caller
//! picks `dt` for every step.

use crate::bodies::BodyBuffers;
use crate::error::{KernelError, Result};
use crate::forces::ForceModel;

/// A time integrator for N-body systems
///
/// Integrators advance body buffers in place using a force model to refresh
/// the acceleration buffers.
pub trait Integrator: Send + Sync {
    /// Advance the system by one timestep
    ///
    /// # Arguments
    ///
    /// * `bodies` - Body buffers, modified in place
    /// * `dt` - Timestep in code units
    /// * `force` - Force model used to recompute accelerations
    fn step(&self, bodies: &mut BodyBuffers, dt: f64, force: &mut dyn ForceModel) -> Result<()>;

    /// Advance the system by `n_steps` timesteps of `dt`
    fn integrate(
        &self,
        bodies: &mut BodyBuffers,
        dt: f64,
        n_steps: usize,
        force: &mut dyn ForceModel,
    ) -> Result<()> {
        for _ in 0..n_steps {
            self.step(bodies, dt, force)?;
        }
        Ok(())
    }
}

/// Symplectic leapfrog integrator (2nd order, kick-drift-kick)
///
/// 1. Kick: v(t + dt/2) = v(t) + a(t) · dt/2
/// 2. Drift: x(t + dt) = x(t) + v(t + dt/2) · dt
/// 3. Recompute a(t + dt) at the new positions
/// 4. Kick: v(t + dt) = v(t + dt/2) + a(t + dt) · dt/2
///
/// The first kick uses whatever is already in the acceleration buffers, so
/// the caller must seed them with one force evaluation before the first
/// step; unseeded buffers are taken to mean zero acceleration.
///
/// # Examples
///
/// ```
/// use bhkernel::bodies::{Body, BodySet};
/// use bhkernel::forces::{DirectGravity, ForceModel};
/// use bhkernel::integrator::{Integrator, Leapfrog};
///
/// let mut bodies: BodySet = [
///     Body::new([-0.5, 0.0], [0.0, -0.5], 0.5),
///     Body::new([0.5, 0.0], [0.0, 0.5], 0.5),
/// ]
/// .into_iter()
/// .collect();
///
/// let mut force = DirectGravity::default();
/// let mut buffers = bodies.buffers();
///
/// // Seed accelerations, then step
/// let (points, ax, ay) = buffers.split_for_forces();
/// force.accelerations(&points, ax, ay).unwrap();
/// Leapfrog.step(&mut buffers, 0.01, &mut force).unwrap();
///
/// assert!(buffers.y[1] > 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Leapfrog;

impl Leapfrog {
    /// Velocity update by `a · dt_half`
    fn kick(bodies: &mut BodyBuffers, dt_half: f64) {
        bodies
            .vx
            .iter_mut()
            .zip(bodies.ax.iter())
            .for_each(|(v, a)| *v += dt_half * a);
        bodies
            .vy
            .iter_mut()
            .zip(bodies.ay.iter())
            .for_each(|(v, a)| *v += dt_half * a);
    }

    /// Position update by `v · dt`
    fn drift(bodies: &mut BodyBuffers, dt: f64) {
        bodies
            .x
            .iter_mut()
            .zip(bodies.vx.iter())
            .for_each(|(x, v)| *x += dt * v);
        bodies
            .y
            .iter_mut()
            .zip(bodies.vy.iter())
            .for_each(|(y, v)| *y += dt * v);
    }
}

impl Integrator for Leapfrog {
    fn step(&self, bodies: &mut BodyBuffers, dt: f64, force: &mut dyn ForceModel) -> Result<()> {
        if !dt.is_finite() {
            return Err(KernelError::InvalidTimeStep(dt));
        }
        let dt_half = 0.5 * dt;

        Self::kick(bodies, dt_half);
        Self::drift(bodies, dt);

        let (points, ax, ay) = bodies.split_for_forces();
        force.accelerations(&points, ax, ay)?;

        Self::kick(bodies, dt_half);
        Ok(())
    }
}
