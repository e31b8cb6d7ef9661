//! Spawn emitters: stationary factories that keep an area populated.

use super::super::geometric_utils::Vec2;
use super::super::mind::Mind;
use super::super::params::Params;
use super::super::rng::Random;
use super::super::selector::GenePools;
use super::{Kind, Organism, Species};

/// Periods shorter than this make an emitter instant.
const INSTANT_PERIOD: f64 = 1e-8;

/// Emitter payload.
#[derive(Debug, Clone)]
pub struct Spawn {
    /// Species materialized by this emitter.
    pub species: Species,
    /// Emission and occupancy radius.
    pub radius: f64,
    /// Ticks accumulated towards the next emission.
    pub timer: f64,
    /// Ticks between emissions.
    pub period: f64,
    /// Instant emitters refill up to capacity every tick.
    pub instant: bool,
    /// Owned organisms found inside the radius during the current tick.
    pub count: usize,
    /// Maximum standing population inside the radius; 0 means unbounded.
    pub capacity: usize,
}

impl Spawn {
    /// Creates an emitter. Negative periods are treated as 0.
    pub fn new(species: Species, radius: f64, period: f64, capacity: usize) -> Self {
        let period = period.max(0.0);
        Self {
            species,
            radius,
            timer: 0.0,
            period,
            instant: period < INSTANT_PERIOD,
            count: 0,
            capacity,
        }
    }

    /// Whether `other` is a living organism of this emitter's species.
    pub fn owns(&self, other: &Organism) -> bool {
        other.alive && other.kind() == Kind::Living(self.species)
    }

    pub(super) fn tick(&mut self) {
        self.timer += 1.0;
    }

    /// Number of organisms to emit this tick. Consumes timer and resets the occupancy count.
    pub(super) fn emissions(&mut self) -> usize {
        let mut emitted = 0;
        loop {
            let below_capacity = self.capacity == 0 || self.count < self.capacity;
            let timer_ready = self.instant || self.timer >= self.period;
            if !(below_capacity && timer_ready) {
                break;
            }
            if !self.instant {
                self.timer -= self.period;
            }
            self.count += 1;
            emitted += 1;
            // an instant emitter without capacity would never stop
            if self.instant && self.capacity == 0 {
                break;
            }
        }
        self.count = 0;
        emitted
    }

    /// Materializes one organism at `pos`.
    ///
    /// Animals take a varied copy of a champion from their species' gene pool
    /// when the pool offers one, and a random mind otherwise.
    pub(super) fn instance<R: Random + ?Sized>(
        &self,
        pos: Vec2,
        params: &Params,
        pools: &GenePools,
        rng: &mut R,
    ) -> Organism {
        let Some(traits) = params.animal(self.species) else {
            return Organism::plant(pos, params.plant.init_energy, params, rng);
        };

        let mind = match pools.get(self.species).and_then(|pool| pool.sample(rng)) {
            Some(champion) => {
                let mut mind = champion.clone();
                mind.vary(rng, traits.mind_delta);
                mind
            }
            None => Mind::random(traits.mind_shape(), rng),
        };

        let mut animal = Organism::animal(self.species, pos, traits.init_energy, mind, params);
        if let Some(body) = animal.as_animal_mut() {
            body.dir = rng.unit_circle();
        }
        animal
    }
}
