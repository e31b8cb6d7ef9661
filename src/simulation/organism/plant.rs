//! Plants: stationary food that grows towards a per-plant ceiling.

use super::super::params::PlantParams;
use super::super::rng::Random;

/// Plant payload.
#[derive(Debug, Clone)]
pub struct Plant {
    /// Current energy.
    pub energy: f64,
    /// Energy ceiling drawn uniformly from `[lower_energy, upper_energy]` at creation.
    pub ceiling: f64,
}

impl Plant {
    /// Creates a plant with a random ceiling.
    pub fn new<R: Random + ?Sized>(energy: f64, params: &PlantParams, rng: &mut R) -> Self {
        let ceiling =
            params.lower_energy + (params.upper_energy - params.lower_energy) * rng.uniform();
        Self { energy, ceiling }
    }

    /// Checks for death, then grows. Returns whether the plant is still alive.
    ///
    /// Well-fed plants age faster: the lifespan shrinks by `score_fine` ticks
    /// for every unit of energy above `lower_energy`.
    pub(super) fn process(&mut self, age: u64, params: &PlantParams) -> bool {
        let effective_age = age as f64 + params.score_fine * (self.energy - params.lower_energy);
        if self.energy <= 0.0 || effective_age > params.max_age {
            return false;
        }

        if self.energy < self.ceiling {
            self.energy = (self.energy + params.grow_speed + params.grow_exp * self.energy)
                .min(self.ceiling);
        }
        true
    }
}
