//! Direct N-body gravity (O(N²) implementation)

use crate::bodies::PointMasses;
use crate::config::DEFAULT_SOFTENING;
use crate::error::Result;
use crate::forces::{ForceModel, G, check_outputs};

/// Exact pairwise gravitational summation
///
/// Each unordered pair is visited once and Newton's third law supplies the
/// reaction, so the total momentum change is zero up to rounding.
///
/// Best for:
/// - Small systems (the kernel routes N ≤ 200 here by default)
/// - Reference values when validating the tree
///
/// # Examples
///
/// ```
/// use bhkernel::bodies::PointMasses;
/// use bhkernel::forces::{DirectGravity, ForceModel};
///
/// let x = [-1.0, 1.0];
/// let y = [0.0, 0.0];
/// let mass = [2.0, 3.0];
/// let points = PointMasses::new(&x, &y, &mass).unwrap();
///
/// let (mut ax, mut ay) = ([0.0; 2], [0.0; 2]);
/// DirectGravity::default().accelerations(&points, &mut ax, &mut ay).unwrap();
///
/// // Momentum balance: m0·a0 = -m1·a1
/// assert!((2.0 * ax[0] + 3.0 * ax[1]).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectGravity {
    /// Softening added to the squared separation
    pub softening: f64,
}

impl DirectGravity {
    pub fn new(softening: f64) -> Self {
        Self { softening }
    }
}

impl Default for DirectGravity {
    fn default() -> Self {
        Self::new(DEFAULT_SOFTENING)
    }
}

impl ForceModel for DirectGravity {
    fn accelerations(
        &mut self,
        points: &PointMasses,
        ax: &mut [f64],
        ay: &mut [f64],
    ) -> Result<()> {
        check_outputs(points, ax, ay)?;

        let (x, y, mass) = (points.x(), points.y(), points.masses());
        let n = points.len();

        ax.fill(0.0);
        ay.fill(0.0);

        for i in 0..n {
            let (mut axi, mut ayi) = (0.0, 0.0);
            for j in (i + 1)..n {
                let dx = x[j] - x[i];
                let dy = y[j] - y[i];
                let dist_sq = dx * dx + dy * dy + self.softening;
                let inv_r3 = G / (dist_sq * dist_sq.sqrt());
                let (fx, fy) = (dx * inv_r3, dy * inv_r3);

                axi += mass[j] * fx;
                ayi += mass[j] * fy;
                ax[j] -= mass[i] * fx;
                ay[j] -= mass[i] * fy;
            }
            ax[i] += axi;
            ay[i] += ayi;
        }

        Ok(())
    }
}
