//! Buffer-level entry points.
//!
//! [`Kernel`] is the call surface a host drives: it takes plain `f64` slices,
//! checks once that they all have the same length, and forwards to the force
//! models, the integrator and the energy diagnostic. It owns the quadtree
//! arena, so two independent simulations need two kernels.
//!
//! # Example
//!
//! ```rust
//! use bhkernel::Kernel;
//!
//! let mut kernel = Kernel::default();
//!
//! let (mut x, mut y) = (vec![-0.5, 0.5], vec![0.0, 0.0]);
//! let (mut vx, mut vy) = (vec![0.0, 0.0], vec![-0.5, 0.5]);
//! let (mut ax, mut ay) = (vec![0.0; 2], vec![0.0; 2]);
//! let mass = vec![0.5, 0.5];
//!
//! // Seed accelerations once, then step
//! kernel.compute_forces(&x, &y, &mass, &mut ax, &mut ay).unwrap();
//! let e0 = kernel.compute_energy(&x, &y, &vx, &vy, &mass).unwrap();
//!
//! for _ in 0..100 {
//!     kernel
//!         .leapfrog_step(0.001, &mut x, &mut y, &mut vx, &mut vy, &mut ax, &mut ay, &mass)
//!         .unwrap();
//! }
//!
//! let e1 = kernel.compute_energy(&x, &y, &vx, &vy, &mass).unwrap();
//! assert!(((e1 - e0) / e0).abs() < 1e-3);
//! ```

use crate::arena::NodeId;
use crate::bodies::{BodyBuffers, PointMasses};
use crate::config::KernelConfig;
use crate::energy::{self, EnergyReport};
use crate::error::Result;
use crate::forces::{ForceModel, Route, RoutedGravity};
use crate::integrator::{Integrator, Leapfrog};
use crate::quadtree::{QuadTree, TreeStats};

/// N-body kernel: force models, integrator and node arena for one simulation
#[derive(Debug, Clone)]
pub struct Kernel {
    config: KernelConfig,
    gravity: RoutedGravity,
    integrator: Leapfrog,
}

impl Kernel {
    /// Creates a kernel after validating `config`
    pub fn new(config: KernelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: KernelConfig) -> Self {
        Self {
            gravity: RoutedGravity::from_config(&config),
            integrator: Leapfrog,
            config,
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Builds the quadtree over the given bodies and returns its root.
    ///
    /// The tree stays readable through [`Kernel::tree`] until the next build.
    pub fn build_tree(&mut self, x: &[f64], y: &[f64], mass: &[f64]) -> Result<NodeId> {
        let points = PointMasses::new(x, y, mass)?;
        Ok(self.gravity.tree.build(&points))
    }

    /// The tree from the most recent build
    pub fn tree(&self) -> &QuadTree {
        self.gravity.tree.tree()
    }

    pub fn tree_stats(&self) -> TreeStats {
        self.gravity.tree.stats()
    }

    /// Barnes-Hut accelerations, whatever the body count
    pub fn compute_forces_bh(
        &mut self,
        x: &[f64],
        y: &[f64],
        mass: &[f64],
        ax: &mut [f64],
        ay: &mut [f64],
    ) -> Result<()> {
        let points = PointMasses::new(x, y, mass)?;
        self.gravity.tree.accelerations(&points, ax, ay)
    }

    /// Exact pairwise accelerations, whatever the body count
    pub fn compute_forces_direct(
        &mut self,
        x: &[f64],
        y: &[f64],
        mass: &[f64],
        ax: &mut [f64],
        ay: &mut [f64],
    ) -> Result<()> {
        let points = PointMasses::new(x, y, mass)?;
        self.gravity.direct.accelerations(&points, ax, ay)
    }

    /// Accelerations from whichever evaluator the body count calls for
    pub fn compute_forces(
        &mut self,
        x: &[f64],
        y: &[f64],
        mass: &[f64],
        ax: &mut [f64],
        ay: &mut [f64],
    ) -> Result<()> {
        let points = PointMasses::new(x, y, mass)?;
        self.gravity.accelerations(&points, ax, ay)
    }

    /// Advances every buffer by one leapfrog step of `dt`.
    ///
    /// `ax`/`ay` must hold the accelerations of the current positions on
    /// entry and hold those of the new positions on return.
    #[allow(clippy::too_many_arguments)]
    pub fn leapfrog_step(
        &mut self,
        dt: f64,
        x: &mut [f64],
        y: &mut [f64],
        vx: &mut [f64],
        vy: &mut [f64],
        ax: &mut [f64],
        ay: &mut [f64],
        mass: &[f64],
    ) -> Result<()> {
        let mut bodies = BodyBuffers::new(x, y, vx, vy, ax, ay, mass)?;
        self.step(&mut bodies, dt)
    }

    /// Total energy, or kinetic energy alone above the pair cutoff
    pub fn compute_energy(
        &self,
        x: &[f64],
        y: &[f64],
        vx: &[f64],
        vy: &[f64],
        mass: &[f64],
    ) -> Result<f64> {
        let points = PointMasses::new(x, y, mass)?;
        Ok(self.energy(&points, vx, vy)?.total())
    }

    /// Leapfrog step over already-validated buffers
    pub fn step(&mut self, bodies: &mut BodyBuffers, dt: f64) -> Result<()> {
        self.integrator.step(bodies, dt, &mut self.gravity)
    }

    /// Fills the acceleration buffers for the current positions
    pub fn seed_forces(&mut self, bodies: &mut BodyBuffers) -> Result<()> {
        let (points, ax, ay) = bodies.split_for_forces();
        self.gravity.accelerations(&points, ax, ay)
    }

    /// Energy report that distinguishes the kinetic-only case
    pub fn energy(&self, points: &PointMasses, vx: &[f64], vy: &[f64]) -> Result<EnergyReport> {
        energy::energy(
            points,
            vx,
            vy,
            self.config.softening,
            self.config.energy_pair_cutoff,
        )
    }

    /// Evaluator used by the most recent routed force computation
    pub fn last_route(&self) -> Option<Route> {
        self.gravity.last_route()
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::from_valid(KernelConfig::default())
    }
}
