use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use crate::bodies::{Body, BodySet, PointMasses};

/// Parallel buffers for a random body set
pub struct RandomBodies {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub vx: Vec<f64>,
    pub vy: Vec<f64>,
    pub mass: Vec<f64>,
}

impl RandomBodies {
    pub fn points(&self) -> PointMasses<'_> {
        PointMasses::new(&self.x, &self.y, &self.mass).unwrap()
    }

    pub fn len(&self) -> usize {
        self.mass.len()
    }
}

/// Bodies scattered uniformly over [-extent, extent]² with masses in [0.5, 2)
pub fn random_bodies(n: usize, extent: f64, seed: u64) -> RandomBodies {
    let mut rng = ChaChaRng::seed_from_u64(seed);
    let mut bodies = RandomBodies {
        x: Vec::with_capacity(n),
        y: Vec::with_capacity(n),
        vx: Vec::with_capacity(n),
        vy: Vec::with_capacity(n),
        mass: Vec::with_capacity(n),
    };
    for _ in 0..n {
        bodies.x.push(rng.random_range(-extent..extent));
        bodies.y.push(rng.random_range(-extent..extent));
        bodies.vx.push(rng.random_range(-1.0..1.0));
        bodies.vy.push(rng.random_range(-1.0..1.0));
        bodies.mass.push(rng.random_range(0.5..2.0));
    }
    bodies
}

/// Equal-mass binary on a circular orbit of unit separation.
///
/// With G = 1 and m = 0.5 each body moves at v = √(m / 2d) = 0.5 and the
/// period is 2π.
pub fn circular_binary() -> BodySet {
    [
        Body::new([-0.5, 0.0], [0.0, -0.5], 0.5),
        Body::new([0.5, 0.0], [0.0, 0.5], 0.5),
    ]
    .into_iter()
    .collect()
}

/// Acceleration error of `approx` against `exact`, as ‖Δa‖ / ‖a‖ over all bodies
pub fn relative_error(approx: (&[f64], &[f64]), exact: (&[f64], &[f64])) -> f64 {
    let mut diff_sq = 0.0;
    let mut norm_sq = 0.0;
    for i in 0..exact.0.len() {
        let dx = approx.0[i] - exact.0[i];
        let dy = approx.1[i] - exact.1[i];
        diff_sq += dx * dx + dy * dy;
        norm_sq += exact.0[i] * exact.0[i] + exact.1[i] * exact.1[i];
    }
    (diff_sq / norm_sq).sqrt()
}
