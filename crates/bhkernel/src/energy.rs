//! Energy diagnostic.
//!
//! Kinetic energy is always computed. The pairwise potential term costs
//! O(N²), so it is only added up to a body-count cutoff; past that the report
//! carries `potential: None` and [`EnergyReport::total`] is kinetic only.
//! Callers monitoring conservation must not compare totals across the cutoff.

use serde::Serialize;

use crate::bodies::PointMasses;
use crate::error::{Result, check_len};
use crate::forces::G;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyReport {
    pub kinetic: f64,
    /// `None` when the body count exceeded the pair cutoff
    pub potential: Option<f64>,
}

impl EnergyReport {
    /// Kinetic plus potential energy, or kinetic alone for a degraded report
    pub fn total(&self) -> f64 {
        self.kinetic + self.potential.unwrap_or(0.0)
    }

    /// Whether the potential term was skipped
    pub fn is_kinetic_only(&self) -> bool {
        self.potential.is_none()
    }
}

/// Σ ½·m·|v|²
pub fn kinetic_energy(mass: &[f64], vx: &[f64], vy: &[f64]) -> f64 {
    mass.iter()
        .zip(vx.iter().zip(vy))
        .map(|(m, (vx, vy))| 0.5 * m * (vx * vx + vy * vy))
        .sum()
}

/// −Σ_{i<j} m_i·m_j / √(r² + ε)
pub fn potential_energy(points: &PointMasses, softening: f64) -> f64 {
    let (x, y, mass) = (points.x(), points.y(), points.masses());
    let n = points.len();

    (0..n)
        .map(|i| {
            ((i + 1)..n)
                .map(|j| {
                    let dx = x[j] - x[i];
                    let dy = y[j] - y[i];
                    let r = (dx * dx + dy * dy + softening).sqrt();
                    -G * mass[i] * mass[j] / r
                })
                .sum::<f64>()
        })
        .sum()
}

/// Energy of the system, skipping the potential term above `pair_cutoff` bodies.
///
/// # Examples
///
/// ```
/// use bhkernel::bodies::PointMasses;
/// use bhkernel::energy::energy;
///
/// let x = [0.0, 1.0];
/// let y = [0.0, 0.0];
/// let mass = [1.0, 1.0];
/// let points = PointMasses::new(&x, &y, &mass).unwrap();
///
/// let report = energy(&points, &[0.0, 0.0], &[1.0, -1.0], 1e-4, 500).unwrap();
/// assert_eq!(report.kinetic, 1.0);
/// assert!(report.potential.unwrap() < 0.0);
///
/// let degraded = energy(&points, &[0.0, 0.0], &[1.0, -1.0], 1e-4, 1).unwrap();
/// assert!(degraded.is_kinetic_only());
/// ```
pub fn energy(
    points: &PointMasses,
    vx: &[f64],
    vy: &[f64],
    softening: f64,
    pair_cutoff: usize,
) -> Result<EnergyReport> {
    check_len("vx", points.len(), vx.len())?;
    check_len("vy", points.len(), vy.len())?;

    let kinetic = kinetic_energy(points.masses(), vx, vy);
    let potential =
        (points.len() <= pair_cutoff).then(|| potential_energy(points, softening));

    Ok(EnergyReport { kinetic, potential })
}
