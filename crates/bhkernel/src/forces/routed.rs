//! Body-count based choice between direct and tree gravity

use crate::bodies::PointMasses;
use crate::config::{DEFAULT_DIRECT_THRESHOLD, KernelConfig};
use crate::error::Result;
use crate::forces::{DirectGravity, ForceModel, TreeGravity};

/// Which evaluator handled a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Direct,
    Tree,
}

/// Sends small systems to [`DirectGravity`] and large ones to [`TreeGravity`].
///
/// Below a few hundred bodies building the tree costs more than it saves; the
/// cut-off is a tuning knob, not physics.
///
/// # Examples
///
/// ```
/// use bhkernel::config::KernelConfig;
/// use bhkernel::forces::{Route, RoutedGravity};
///
/// let gravity = RoutedGravity::from_config(&KernelConfig::default());
/// assert_eq!(gravity.route_for(200), Route::Direct);
/// assert_eq!(gravity.route_for(201), Route::Tree);
/// ```
#[derive(Debug, Clone)]
pub struct RoutedGravity {
    pub direct: DirectGravity,
    pub tree: TreeGravity,
    /// Largest N summed directly
    pub direct_threshold: usize,
    last_route: Option<Route>,
}

impl RoutedGravity {
    pub fn new(direct: DirectGravity, tree: TreeGravity, direct_threshold: usize) -> Self {
        Self {
            direct,
            tree,
            direct_threshold,
            last_route: None,
        }
    }

    pub fn from_config(config: &KernelConfig) -> Self {
        Self::new(
            DirectGravity::new(config.softening),
            TreeGravity::from_config(config),
            config.direct_threshold,
        )
    }

    pub fn route_for(&self, n: usize) -> Route {
        if n <= self.direct_threshold {
            Route::Direct
        } else {
            Route::Tree
        }
    }

    /// Route taken by the most recent evaluation
    pub fn last_route(&self) -> Option<Route> {
        self.last_route
    }
}

impl Default for RoutedGravity {
    fn default() -> Self {
        Self::new(
            DirectGravity::default(),
            TreeGravity::default(),
            DEFAULT_DIRECT_THRESHOLD,
        )
    }
}

impl ForceModel for RoutedGravity {
    fn accelerations(
        &mut self,
        points: &PointMasses,
        ax: &mut [f64],
        ay: &mut [f64],
    ) -> Result<()> {
        let route = self.route_for(points.len());
        log::trace!("{} bodies routed to {:?} gravity", points.len(), route);
        self.last_route = Some(route);

        match route {
            Route::Direct => self.direct.accelerations(points, ax, ay),
            Route::Tree => self.tree.accelerations(points, ax, ay),
        }
    }
}
