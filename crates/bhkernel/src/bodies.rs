//! Body storage in struct-of-arrays form.
//!
//! The kernel works on parallel `f64` buffers (x, y, vx, vy, ax, ay, mass)
//! owned by the caller. [`PointMasses`] and [`BodyBuffers`] are borrowed views
//! over such buffers whose lengths have been checked once at construction;
//! [`BodySet`] owns a set of buffers for callers that want the kernel to keep
//! them.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::{Result, check_len};

/// A single body, used to build or inspect a [`BodySet`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Point2<f64>,
    pub velocity: Vector2<f64>,
    pub mass: f64,
}

impl Body {
    pub fn new(position: [f64; 2], velocity: [f64; 2], mass: f64) -> Self {
        Self {
            position: Point2::new(position[0], position[1]),
            velocity: Vector2::new(velocity[0], velocity[1]),
            mass,
        }
    }

    pub fn momentum(&self) -> Vector2<f64> {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.magnitude_squared()
    }

    /// z-component of r × v (not multiplied by mass)
    pub fn specific_angular_momentum(&self) -> f64 {
        self.position.x * self.velocity.y - self.position.y * self.velocity.x
    }
}

/// Read-only positions and masses of N bodies.
#[derive(Clone, Copy, Debug)]
pub struct PointMasses<'a> {
    x: &'a [f64],
    y: &'a [f64],
    mass: &'a [f64],
}

impl<'a> PointMasses<'a> {
    /// Wraps the three buffers, failing if their lengths differ.
    ///
    /// ```
    /// use bhkernel::bodies::PointMasses;
    ///
    /// let points = PointMasses::new(&[0.0, 1.0], &[0.0, 0.0], &[1.0, 2.0]).unwrap();
    /// assert_eq!(points.len(), 2);
    /// assert!(PointMasses::new(&[0.0], &[0.0, 1.0], &[1.0]).is_err());
    /// ```
    pub fn new(x: &'a [f64], y: &'a [f64], mass: &'a [f64]) -> Result<Self> {
        let n = x.len();
        check_len("y", n, y.len())?;
        check_len("mass", n, mass.len())?;
        Ok(Self { x, y, mass })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    #[inline]
    pub fn position(&self, i: usize) -> Point2<f64> {
        Point2::new(self.x[i], self.y[i])
    }

    #[inline]
    pub fn mass(&self, i: usize) -> f64 {
        self.mass[i]
    }

    pub fn x(&self) -> &'a [f64] {
        self.x
    }

    pub fn y(&self) -> &'a [f64] {
        self.y
    }

    pub fn masses(&self) -> &'a [f64] {
        self.mass
    }
}

/// Mutable view over the full per-body state of one integration step.
#[derive(Debug)]
pub struct BodyBuffers<'a> {
    pub x: &'a mut [f64],
    pub y: &'a mut [f64],
    pub vx: &'a mut [f64],
    pub vy: &'a mut [f64],
    pub ax: &'a mut [f64],
    pub ay: &'a mut [f64],
    pub mass: &'a [f64],
}

impl<'a> BodyBuffers<'a> {
    /// Wraps caller-owned buffers; every buffer must have the length of `x`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x: &'a mut [f64],
        y: &'a mut [f64],
        vx: &'a mut [f64],
        vy: &'a mut [f64],
        ax: &'a mut [f64],
        ay: &'a mut [f64],
        mass: &'a [f64],
    ) -> Result<Self> {
        let n = x.len();
        check_len("y", n, y.len())?;
        check_len("vx", n, vx.len())?;
        check_len("vy", n, vy.len())?;
        check_len("ax", n, ax.len())?;
        check_len("ay", n, ay.len())?;
        check_len("mass", n, mass.len())?;
        Ok(Self {
            x,
            y,
            vx,
            vy,
            ax,
            ay,
            mass,
        })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Positions and masses as a read-only view
    pub fn points(&self) -> PointMasses<'_> {
        PointMasses {
            x: &*self.x,
            y: &*self.y,
            mass: self.mass,
        }
    }

    /// Positions and masses alongside the acceleration outputs
    pub fn split_for_forces(&mut self) -> (PointMasses<'_>, &mut [f64], &mut [f64]) {
        (
            PointMasses {
                x: &*self.x,
                y: &*self.y,
                mass: self.mass,
            },
            &mut *self.ax,
            &mut *self.ay,
        )
    }

    /// Velocities as read-only slices
    pub fn velocities(&self) -> (&[f64], &[f64]) {
        (&*self.vx, &*self.vy)
    }
}

/// Owned struct-of-arrays body storage.
///
/// # Examples
///
/// ```
/// use bhkernel::bodies::{Body, BodySet};
///
/// let mut set = BodySet::new();
/// set.push(Body::new([1.0, 0.0], [0.0, 1.0], 2.0));
/// set.push(Body::new([0.0, 3.0], [0.5, 0.0], 1.0));
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.positions_interleaved(), vec![1.0, 0.0, 0.0, 3.0]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodySet {
    x: Vec<f64>,
    y: Vec<f64>,
    vx: Vec<f64>,
    vy: Vec<f64>,
    ax: Vec<f64>,
    ay: Vec<f64>,
    mass: Vec<f64>,
}

impl BodySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            vx: Vec::with_capacity(capacity),
            vy: Vec::with_capacity(capacity),
            ax: Vec::with_capacity(capacity),
            ay: Vec::with_capacity(capacity),
            mass: Vec::with_capacity(capacity),
        }
    }

    /// Copies bodies out of parallel buffers; accelerations start at zero.
    pub fn from_buffers(
        x: &[f64],
        y: &[f64],
        vx: &[f64],
        vy: &[f64],
        mass: &[f64],
    ) -> Result<Self> {
        let n = x.len();
        check_len("y", n, y.len())?;
        check_len("vx", n, vx.len())?;
        check_len("vy", n, vy.len())?;
        check_len("mass", n, mass.len())?;
        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            vx: vx.to_vec(),
            vy: vy.to_vec(),
            ax: vec![0.0; n],
            ay: vec![0.0; n],
            mass: mass.to_vec(),
        })
    }

    /// Appends a body with zero acceleration and returns its index
    pub fn push(&mut self, body: Body) -> usize {
        self.x.push(body.position.x);
        self.y.push(body.position.y);
        self.vx.push(body.velocity.x);
        self.vy.push(body.velocity.y);
        self.ax.push(0.0);
        self.ay.push(0.0);
        self.mass.push(body.mass);
        self.mass.len() - 1
    }

    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.vx.clear();
        self.vy.clear();
        self.ax.clear();
        self.ay.clear();
        self.mass.clear();
    }

    pub fn len(&self) -> usize {
        self.mass.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mass.is_empty()
    }

    pub fn body(&self, i: usize) -> Body {
        Body {
            position: Point2::new(self.x[i], self.y[i]),
            velocity: Vector2::new(self.vx[i], self.vy[i]),
            mass: self.mass[i],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Body> + '_ {
        (0..self.len()).map(|i| self.body(i))
    }

    pub fn acceleration(&self, i: usize) -> Vector2<f64> {
        Vector2::new(self.ax[i], self.ay[i])
    }

    pub fn points(&self) -> PointMasses<'_> {
        PointMasses {
            x: &self.x,
            y: &self.y,
            mass: &self.mass,
        }
    }

    /// Mutable view for the integrator; lengths are equal by construction.
    pub fn buffers(&mut self) -> BodyBuffers<'_> {
        BodyBuffers {
            x: &mut self.x,
            y: &mut self.y,
            vx: &mut self.vx,
            vy: &mut self.vy,
            ax: &mut self.ax,
            ay: &mut self.ay,
            mass: &self.mass,
        }
    }

    pub fn velocities(&self) -> (&[f64], &[f64]) {
        (&self.vx, &self.vy)
    }

    /// Positions packed as `[x0, y0, x1, y1, ...]`
    pub fn positions_interleaved(&self) -> Vec<f64> {
        self.x
            .iter()
            .zip(&self.y)
            .flat_map(|(&x, &y)| [x, y])
            .collect()
    }

    pub fn total_mass(&self) -> f64 {
        self.mass.iter().sum()
    }

    pub fn total_momentum(&self) -> Vector2<f64> {
        self.iter()
            .map(|b| b.momentum())
            .fold(Vector2::zeros(), |acc, p| acc + p)
    }

    pub fn total_angular_momentum(&self) -> f64 {
        self.iter()
            .map(|b| b.specific_angular_momentum() * b.mass)
            .sum()
    }
}

impl FromIterator<Body> for BodySet {
    fn from_iter<I: IntoIterator<Item = Body>>(iter: I) -> Self {
        let mut set = BodySet::new();
        for body in iter {
            set.push(body);
        }
        set
    }
}
