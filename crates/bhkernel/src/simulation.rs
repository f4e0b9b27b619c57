//! A simulation session that owns its bodies.
//!
//! [`Simulation`] wraps a [`Kernel`] together with a growable [`BodySet`] and
//! the elapsed simulated time. It takes care of the bookkeeping a host would
//! otherwise repeat: seeding accelerations whenever the body set changes,
//! running several substeps per frame, and packing positions for a renderer.

use serde::Serialize;

use crate::bodies::{Body, BodySet};
use crate::config::KernelConfig;
use crate::energy::EnergyReport;
use crate::error::Result;
use crate::kernel::Kernel;

/// What a host needs to draw and monitor one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Positions packed as `[x0, y0, x1, y1, ...]`
    pub positions: Vec<f64>,
    pub body_count: usize,
    pub energy: EnergyReport,
    pub sim_time: f64,
}

/// Bodies, kernel and simulated time of one running system
///
/// # Examples
///
/// ```
/// use bhkernel::bodies::Body;
/// use bhkernel::config::KernelConfig;
/// use bhkernel::simulation::Simulation;
///
/// let mut sim = Simulation::new(KernelConfig::default()).unwrap();
/// sim.init([
///     Body::new([-0.5, 0.0], [0.0, -0.5], 0.5),
///     Body::new([0.5, 0.0], [0.0, 0.5], 0.5),
/// ])
/// .unwrap();
///
/// let frame = sim.step(0.001, 10).unwrap();
/// assert_eq!(frame.body_count, 2);
/// assert!((frame.sim_time - 0.01).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    kernel: Kernel,
    bodies: BodySet,
    time: f64,
}

impl Simulation {
    /// Creates an empty simulation
    pub fn new(config: KernelConfig) -> Result<Self> {
        Ok(Self {
            kernel: Kernel::new(config)?,
            bodies: BodySet::new(),
            time: 0.0,
        })
    }

    /// Creates a simulation already seeded with `bodies`
    pub fn with_bodies(config: KernelConfig, bodies: BodySet) -> Result<Self> {
        let mut sim = Self::new(config)?;
        sim.bodies = bodies;
        sim.kernel.seed_forces(&mut sim.bodies.buffers())?;
        Ok(sim)
    }

    /// Replaces every body, resets the clock and seeds accelerations.
    pub fn init(&mut self, bodies: impl IntoIterator<Item = Body>) -> Result<Frame> {
        self.bodies = bodies.into_iter().collect();
        self.time = 0.0;
        self.kernel.seed_forces(&mut self.bodies.buffers())?;
        self.frame()
    }

    /// Runs `substeps` leapfrog steps of `dt` (at least one) and reports the
    /// resulting frame.
    pub fn step(&mut self, dt: f64, substeps: usize) -> Result<Frame> {
        let mut buffers = self.bodies.buffers();
        for _ in 0..substeps.max(1) {
            self.kernel.step(&mut buffers, dt)?;
            self.time += dt;
        }
        self.frame()
    }

    /// Appends a body and recomputes accelerations for the whole set.
    ///
    /// Returns the new body count and the energy after the addition.
    pub fn add_body(&mut self, body: Body) -> Result<(usize, EnergyReport)> {
        self.bodies.push(body);
        self.kernel.seed_forces(&mut self.bodies.buffers())?;
        Ok((self.bodies.len(), self.energy()?))
    }

    /// Removes every body and resets the clock
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.time = 0.0;
    }

    pub fn energy(&self) -> Result<EnergyReport> {
        let (vx, vy) = self.bodies.velocities();
        self.kernel.energy(&self.bodies.points(), vx, vy)
    }

    pub fn frame(&self) -> Result<Frame> {
        Ok(Frame {
            positions: self.positions_interleaved(),
            body_count: self.bodies.len(),
            energy: self.energy()?,
            sim_time: self.time,
        })
    }

    pub fn positions_interleaved(&self) -> Vec<f64> {
        self.bodies.positions_interleaved()
    }

    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
