//! Gravitational force evaluation
//!
//! This module provides the `ForceModel` trait and its implementations:
//! exact pairwise summation ([`DirectGravity`]), the Barnes-Hut tree
//! approximation ([`TreeGravity`]) and a router that picks one of the two by
//! body count ([`RoutedGravity`]).
//!
//! Every model works in code units with G = 1 and a softened force law
//!
//! ```text
//! a += m · Δ / (|Δ|² + ε)^(3/2)
//! ```
//!
//! where Δ points from the evaluation point to the source and ε is the
//! softening added to the squared separation.

use nalgebra::Vector2;

use crate::bodies::PointMasses;
use crate::error::{Result, check_len};

pub mod gravity;
pub mod routed;
pub mod tree_gravity;

#[cfg(test)]
mod tree_gravity_test;

pub use gravity::DirectGravity;
pub use routed::{Route, RoutedGravity};
pub use tree_gravity::TreeGravity;

/// Gravitational constant in code units
pub const G: f64 = 1.0;

/// A way of filling acceleration buffers from positions and masses
///
/// # Examples
///
/// ```
/// use bhkernel::bodies::PointMasses;
/// use bhkernel::forces::{DirectGravity, ForceModel};
///
/// let x = [0.0, 1.0];
/// let y = [0.0, 0.0];
/// let mass = [1.0, 1.0];
/// let points = PointMasses::new(&x, &y, &mass).unwrap();
///
/// let mut ax = [0.0; 2];
/// let mut ay = [0.0; 2];
/// DirectGravity::default().accelerations(&points, &mut ax, &mut ay).unwrap();
///
/// // The bodies pull on each other
/// assert!(ax[0] > 0.0 && ax[1] < 0.0);
/// ```
pub trait ForceModel: Send {
    /// Overwrites `ax`/`ay` with the acceleration of every body
    ///
    /// Both outputs must have one slot per body.
    fn accelerations(
        &mut self,
        points: &PointMasses,
        ax: &mut [f64],
        ay: &mut [f64],
    ) -> Result<()>;
}

/// Softened acceleration toward a point mass `delta` away.
#[inline]
pub fn softened_accel(delta: Vector2<f64>, mass: f64, softening: f64) -> Vector2<f64> {
    let dist_sq = delta.magnitude_squared() + softening;
    let dist = dist_sq.sqrt();

    // a = G * M * r / (r² + ε)^(3/2)
    delta * (G * mass / (dist_sq * dist))
}

/// Checks that both acceleration outputs have one slot per body.
pub(crate) fn check_outputs(points: &PointMasses, ax: &[f64], ay: &[f64]) -> Result<()> {
    check_len("ax", points.len(), ax.len())?;
    check_len("ay", points.len(), ay.len())
}
