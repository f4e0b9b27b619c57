//! Tree-based gravity using Barnes-Hut algorithm (O(N log N))

use crate::arena::NodeId;
use crate::bodies::PointMasses;
use crate::config::{DEFAULT_MAX_NODES, DEFAULT_SOFTENING, DEFAULT_THETA, KernelConfig};
use crate::error::Result;
use crate::forces::{ForceModel, check_outputs};
use crate::quadtree::{QuadTree, TreeStats};

/// Barnes-Hut tree-based gravitational force computation
///
/// Rebuilds a quadtree over the bodies on every evaluation and walks it once
/// per body. The tree and the traversal stack are kept between calls so a
/// steady-state step does not allocate.
///
/// # Opening Angle (θ)
///
/// Controls the accuracy/speed tradeoff:
/// - θ = 0.0: every leaf is visited (same as direct summation)
/// - θ = 0.7: default
/// - θ ≥ 1.0: coarse, for very large systems
///
/// # Examples
///
/// ```
/// use bhkernel::bodies::PointMasses;
/// use bhkernel::forces::{ForceModel, TreeGravity};
///
/// let x = [0.0, 1.0, 2.0];
/// let y = [0.0, 0.5, 0.0];
/// let mass = [1.0, 1.0, 1.0];
/// let points = PointMasses::new(&x, &y, &mass).unwrap();
///
/// let mut gravity = TreeGravity::default();
/// let (mut ax, mut ay) = ([0.0; 3], [0.0; 3]);
/// gravity.accelerations(&points, &mut ax, &mut ay).unwrap();
///
/// assert!(ax[0] > 0.0);
/// assert!(ax[2] < 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct TreeGravity {
    /// Opening angle
    pub theta: f64,
    /// Softening added to the squared separation
    pub softening: f64,
    /// Wider opening angle used above `large_n_threshold` bodies
    pub large_n_theta: Option<f64>,
    pub large_n_threshold: usize,
    tree: QuadTree,
    stack: Vec<NodeId>,
}

impl TreeGravity {
    /// Creates a tree gravity force with an arena of `max_nodes` nodes
    pub fn new(theta: f64, softening: f64, max_nodes: usize) -> Self {
        Self {
            theta,
            softening,
            large_n_theta: None,
            large_n_threshold: usize::MAX,
            tree: QuadTree::new(max_nodes),
            stack: Vec::new(),
        }
    }

    pub fn from_config(config: &KernelConfig) -> Self {
        Self {
            large_n_theta: config.large_n_theta,
            large_n_threshold: config.large_n_threshold,
            ..Self::new(config.theta, config.softening, config.max_nodes)
        }
    }

    /// Opening angle used for a system of `n` bodies
    pub fn theta_for(&self, n: usize) -> f64 {
        match self.large_n_theta {
            Some(theta) if n > self.large_n_threshold => theta,
            _ => self.theta,
        }
    }

    /// Rebuilds the tree without evaluating forces
    pub fn build(&mut self, points: &PointMasses) -> NodeId {
        self.tree.build(points)
    }

    /// The tree from the most recent build
    pub fn tree(&self) -> &QuadTree {
        &self.tree
    }

    pub fn stats(&self) -> TreeStats {
        self.tree.stats()
    }
}

impl Default for TreeGravity {
    fn default() -> Self {
        Self::new(DEFAULT_THETA, DEFAULT_SOFTENING, DEFAULT_MAX_NODES)
    }
}

impl ForceModel for TreeGravity {
    fn accelerations(
        &mut self,
        points: &PointMasses,
        ax: &mut [f64],
        ay: &mut [f64],
    ) -> Result<()> {
        check_outputs(points, ax, ay)?;

        self.tree.build(points);
        let theta = self.theta_for(points.len());

        for i in 0..points.len() {
            let accel = self.tree.acceleration_with(
                points.position(i),
                theta,
                self.softening,
                &mut self.stack,
            );
            ax[i] = accel.x;
            ay[i] = accel.y;
        }

        Ok(())
    }
}
