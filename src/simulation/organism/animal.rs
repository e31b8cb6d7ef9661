//! Herbivores and carnivores.

use super::super::geometric_utils::{self, Vec2};
use super::super::mind::Mind;
use super::super::params::AnimalParams;
use super::super::potential::Potential;
use super::super::rng::Random;
use super::{Kind, Organism, Species};

/// Mind-driven organism.
///
/// The species constants are copied in at construction, so behavior never
/// needs to look the species up again.
#[derive(Debug, Clone)]
pub struct Animal {
    /// [`Species::Herbivore`] or [`Species::Carnivore`].
    pub species: Species,
    /// Species constants.
    pub traits: AnimalParams,
    /// Unit heading.
    pub dir: Vec2,
    /// Turn rate, radians per unit time.
    pub spin: f64,
    /// Current energy; the animal dies once it drops below zero.
    pub energy: f64,
    /// Fitness used by the gene pools: energy eaten plus breeding bonuses.
    pub score: f64,
    /// Neural controller.
    pub mind: Mind,
}

impl Animal {
    /// Creates an animal facing the positive x axis.
    ///
    /// # Panics
    ///
    /// Panics if `species` is not an animal species or if `mind` has the wrong shape.
    pub fn new(species: Species, traits: AnimalParams, energy: f64, mind: Mind) -> Self {
        assert!(species.is_animal(), "{species:?} is not an animal species");
        assert_eq!(
            mind.shape(),
            traits.mind_shape(),
            "mind shape does not match the species"
        );

        Self {
            species,
            traits,
            dir: Vec2::new(1.0, 0.0),
            spin: 0.0,
            energy,
            score: 0.0,
            mind,
        }
    }

    /// Whether this animal may eat `other`.
    pub fn edible(&self, other: &Organism) -> bool {
        match (self.species, other.kind()) {
            (Species::Herbivore, Kind::Living(Species::Plant)) => true,
            (Species::Carnivore, Kind::Living(Species::Herbivore)) => {
                self.traits.prey_energy_ratio * other.energy() <= self.energy
            }
            _ => false,
        }
    }

    pub(super) fn eat(&mut self, prey: &mut Organism) {
        let gain = prey.energy() * self.traits.eat_factor;
        self.energy += gain;
        self.score += gain;
        prey.set_energy(0.0);
    }

    /// Writes the fields into the mind inputs, rotated into the animal's frame.
    ///
    /// Each category fills three inputs: gradient x, gradient y, potential.
    pub fn sense(&mut self, fields: &[Potential]) {
        for (i, field) in fields.iter().enumerate() {
            let grad = geometric_utils::to_local_frame(field.grad, self.dir);
            self.mind.input[3 * i] = grad.x() as f32;
            self.mind.input[3 * i + 1] = grad.y() as f32;
            self.mind.input[3 * i + 2] = field.pot as f32;
        }
    }

    /// Pays the per-tick energy cost and reports whether the animal survives it.
    pub(super) fn metabolize(&mut self, age: u64) -> bool {
        self.energy -= self.traits.time_fine + self.traits.spin_fine * self.spin.abs();
        self.energy >= 0.0 && age <= self.traits.max_age
    }

    /// Runs the mind and decodes its outputs into spin and the new velocity.
    pub(super) fn think(&mut self) -> Vec2 {
        self.mind.forward();
        let throttle = f64::from(self.mind.output[0]).tanh().abs();
        let steer = f64::from(self.mind.output[1]).tanh();
        self.spin = self.traits.max_spin * steer;
        self.dir * (self.traits.max_speed * throttle)
    }

    pub(super) fn ready_to_breed(&self) -> bool {
        self.energy > self.traits.breed_energy
    }

    /// Splits all energy among `child_count` children with mutated minds.
    pub(super) fn breed<R: Random + ?Sized>(&mut self, age: u64, rng: &mut R) -> Vec<Animal> {
        let count = self.traits.child_count;
        let child_energy = self.energy / count as f64;

        let children = (0..count)
            .map(|_| {
                let mut mind = self.mind.clone();
                mind.vary(rng, self.traits.mind_delta);
                let mut child = Animal::new(self.species, self.traits, child_energy, mind);
                child.dir = rng.unit_circle();
                child
            })
            .collect();

        let remaining = self.traits.max_age.saturating_sub(age);
        self.score += self.traits.breed_factor * remaining as f64;
        self.energy = 0.0;
        children
    }

    /// Rotates the heading by `spin * dt`.
    pub(super) fn turn(&mut self, dt: f64) {
        let turned = geometric_utils::rotate(self.dir, self.spin * dt);
        let len = geometric_utils::length(turned);
        if len > 0.0 {
            self.dir = turned / len;
        }
    }
}
