//! Tunable kernel parameters.
//!
//! Everything the kernel treats as policy rather than physics lives here: the
//! opening angle, the softening term, the direct/tree routing threshold, the
//! potential-energy cutoff and the node arena capacity. The struct derives
//! serde so hosts can hand it over as a plain object.
//!
//! # Examples
//!
//! ```
//! use bhkernel::config::KernelConfig;
//!
//! let config = KernelConfig {
//!     theta: 0.5,
//!     large_n_theta: Some(1.2),
//!     ..KernelConfig::default()
//! };
//! assert!(config.validate().is_ok());
//! assert_eq!(config.theta_for(1_000), 0.5);
//! assert_eq!(config.theta_for(20_000), 1.2);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};

/// Default Barnes-Hut opening angle
pub const DEFAULT_THETA: f64 = 0.7;

/// Default softening, added to the squared separation
pub const DEFAULT_SOFTENING: f64 = 1e-4;

/// Body counts at or below this use direct summation
pub const DEFAULT_DIRECT_THRESHOLD: usize = 200;

/// Body counts at or below this include the O(N²) potential term
pub const DEFAULT_ENERGY_PAIR_CUTOFF: usize = 500;

/// Arena capacity, enough for ~100k tightly clustered bodies
pub const DEFAULT_MAX_NODES: usize = 4_000_000;

/// Body count above which `large_n_theta` takes over
pub const DEFAULT_LARGE_N_THRESHOLD: usize = 10_000;

/// Kernel configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KernelConfig {
    /// Opening angle θ; smaller is more accurate and slower
    pub theta: f64,
    /// Softening ε added to r² in every force and potential term
    pub softening: f64,
    /// N at or below which forces are summed directly
    pub direct_threshold: usize,
    /// N at or below which the energy diagnostic includes potential energy
    pub energy_pair_cutoff: usize,
    /// Maximum number of quadtree nodes per build
    pub max_nodes: usize,
    /// Wider opening angle for very large systems (disabled when `None`)
    pub large_n_theta: Option<f64>,
    /// N above which `large_n_theta` applies
    pub large_n_threshold: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            theta: DEFAULT_THETA,
            softening: DEFAULT_SOFTENING,
            direct_threshold: DEFAULT_DIRECT_THRESHOLD,
            energy_pair_cutoff: DEFAULT_ENERGY_PAIR_CUTOFF,
            max_nodes: DEFAULT_MAX_NODES,
            large_n_theta: None,
            large_n_threshold: DEFAULT_LARGE_N_THRESHOLD,
        }
    }
}

impl KernelConfig {
    /// Rejects parameters the kernel cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.theta.is_finite() && self.theta > 0.0) {
            return Err(KernelError::InvalidConfig(format!(
                "theta must be positive and finite, got {}",
                self.theta
            )));
        }
        if let Some(theta) = self.large_n_theta {
            if !(theta.is_finite() && theta > 0.0) {
                return Err(KernelError::InvalidConfig(format!(
                    "largeNTheta must be positive and finite, got {theta}"
                )));
            }
        }
        if !(self.softening.is_finite() && self.softening > 0.0) {
            return Err(KernelError::InvalidConfig(format!(
                "softening must be positive and finite, got {}",
                self.softening
            )));
        }
        if self.max_nodes == 0 {
            return Err(KernelError::InvalidConfig(
                "maxNodes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective opening angle for a system of `n` bodies
    pub fn theta_for(&self, n: usize) -> f64 {
        match self.large_n_theta {
            Some(theta) if n > self.large_n_threshold => theta,
            _ => self.theta,
        }
    }
}
