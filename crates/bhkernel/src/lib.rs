//! 2-D gravitational N-body kernel.
//!
//! Advances point masses stored in parallel `f64` buffers with a leapfrog
//! integrator, taking accelerations either from exact pairwise summation or
//! from a Barnes-Hut quadtree rebuilt every step in a reusable node arena.
//!
//! - [`arena`]: flat node storage with a fixed capacity
//! - [`quadtree`]: tree construction and the Barnes-Hut traversal
//! - [`forces`]: direct, tree and routed force models
//! - [`integrator`]: kick-drift-kick leapfrog
//! - [`energy`]: kinetic/potential energy diagnostic
//! - [`kernel`]: slice-based entry points for a host
//! - [`simulation`]: a session that owns its bodies and clock

pub mod arena;
pub mod bodies;
pub mod config;
pub mod energy;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod kernel;
pub mod quadtree;
pub mod simulation;

pub use config::KernelConfig;
pub use error::{KernelError, Result};
pub use kernel::Kernel;
pub use simulation::{Frame, Simulation};

#[cfg(test)]
mod integrator_test;
#[cfg(test)]
mod test_support;
