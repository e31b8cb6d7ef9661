//! Random number provider used by spawning, mutation and tie-breaking.
//!
//! The simulation only relies on the statistical contract of [`Random`]; any
//! [`rand::Rng`] satisfies it through the blanket implementation below.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{StandardNormal, UnitCircle, UnitDisc};

use super::geometric_utils::Vec2;

/// Default engine owned by a [`World`](super::world::World).
pub type SimRng = StdRng;

/// Source of the samples the simulation needs.
pub trait Random {
    /// Uniform sample in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Standard normal sample (mean 0, variance 1).
    fn normal(&mut self) -> f64;

    /// Uniformly distributed unit vector.
    fn unit_circle(&mut self) -> Vec2;

    /// Uniformly distributed point inside the unit disk.
    fn unit_disk(&mut self) -> Vec2;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;
}

impl<R: Rng + ?Sized> Random for R {
    fn uniform(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn normal(&mut self) -> f64 {
        self.sample::<f64, _>(StandardNormal)
    }

    fn unit_circle(&mut self) -> Vec2 {
        let [x, y]: [f64; 2] = self.sample(UnitCircle);
        Vec2::new(x, y)
    }

    fn unit_disk(&mut self) -> Vec2 {
        let [x, y]: [f64; 2] = self.sample(UnitDisc);
        Vec2::new(x, y)
    }

    fn index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Creates the simulation engine, seeded when `seed` is given and from OS entropy otherwise.
pub fn seeded(seed: Option<u64>) -> SimRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
