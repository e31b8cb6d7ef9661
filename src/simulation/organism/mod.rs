//! Organisms: plants, animals and spawn emitters.
//!
//! Every entity of the world is an [`Organism`]: a shared kinematic and
//! lifecycle record plus a [`Body`] variant that carries the species data.
//! Behavior dispatch is a plain `match` on the body; edibility and sensing
//! compare [`Kind`] tags, never runtime types.

mod animal;
mod plant;
mod spawn;

pub use animal::Animal;
pub use plant::Plant;
pub use spawn::Spawn;

use serde::{Deserialize, Serialize};

use super::geometric_utils::{self, Vec2};
use super::mind::Mind;
use super::params::{Params, WorldParams};
use super::potential::Potential;
use super::rng::Random;
use super::selector::GenePools;

/// Identifier of an entity inside a world. Identifiers are never reused.
pub type EntityId = u64;

/// Living species of the ecosystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    /// Stationary, grows energy over time.
    Plant,
    /// Eats plants.
    Herbivore,
    /// Eats herbivores.
    Carnivore,
}

impl Species {
    /// Every species, in sensing order.
    pub const ALL: [Species; 3] = [Species::Plant, Species::Herbivore, Species::Carnivore];

    /// True for species that carry a mind.
    pub fn is_animal(self) -> bool {
        matches!(self, Species::Herbivore | Species::Carnivore)
    }
}

/// Runtime tag of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// A plant or an animal of the given species.
    Living(Species),
    /// An emitter materializing organisms of the given species.
    Spawn(Species),
}

/// Species payload of an organism.
#[derive(Debug, Clone)]
pub enum Body {
    /// Plant data.
    Plant(Plant),
    /// Herbivore or carnivore data.
    Animal(Animal),
    /// Spawn emitter data.
    Spawn(Spawn),
}

/// A simulated entity.
#[derive(Debug, Clone)]
pub struct Organism {
    /// Position in world coordinates.
    pub pos: Vec2,
    /// Velocity applied by the move phase.
    pub vel: Vec2,
    /// Cleared when the organism dies; dead organisms are reaped at the end of the tick.
    pub alive: bool,
    /// Active organisms scan their neighbours during the interaction phase.
    pub active: bool,
    /// Ticks since birth.
    pub age: u64,
    /// Ticks since the birth of the lineage's founder, carried across reproduction.
    pub total_age: u64,
    /// Number of generations since the lineage's founder.
    pub ancestors: u32,
    /// Species payload.
    pub body: Body,
}

impl Organism {
    fn with_body(pos: Vec2, active: bool, body: Body) -> Self {
        Self {
            pos,
            vel: geometric_utils::zero(),
            alive: true,
            active,
            age: 0,
            total_age: 0,
            ancestors: 0,
            body,
        }
    }

    /// Creates a plant with the given energy and a random energy ceiling.
    pub fn plant<R: Random + ?Sized>(pos: Vec2, energy: f64, params: &Params, rng: &mut R) -> Self {
        Self::with_body(pos, false, Body::Plant(Plant::new(energy, &params.plant, rng)))
    }

    /// Creates an animal of `species` with the species' constants from `params`.
    ///
    /// # Panics
    ///
    /// Panics if `species` is [`Species::Plant`] or if `mind` does not have the species' shape.
    pub fn animal(species: Species, pos: Vec2, energy: f64, mind: Mind, params: &Params) -> Self {
        let traits = *params
            .animal(species)
            .expect("animals must be herbivores or carnivores");
        Self::with_body(pos, true, Body::Animal(Animal::new(species, traits, energy, mind)))
    }

    /// Creates an animal with a mind randomized from the standard normal distribution.
    pub fn random_animal<R: Random + ?Sized>(
        species: Species,
        pos: Vec2,
        params: &Params,
        rng: &mut R,
    ) -> Self {
        let traits = params
            .animal(species)
            .expect("animals must be herbivores or carnivores");
        let mind = Mind::random(traits.mind_shape(), rng);
        Self::animal(species, pos, traits.init_energy, mind, params)
    }

    /// Creates a spawn emitter. A `period` below `1e-8` makes the emitter instant;
    /// a `capacity` of 0 means unbounded.
    pub fn spawn(species: Species, pos: Vec2, radius: f64, period: f64, capacity: usize) -> Self {
        Self::with_body(
            pos,
            true,
            Body::Spawn(Spawn::new(species, radius, period, capacity)),
        )
    }

    /// Runtime tag.
    pub fn kind(&self) -> Kind {
        match &self.body {
            Body::Plant(_) => Kind::Living(Species::Plant),
            Body::Animal(animal) => Kind::Living(animal.species),
            Body::Spawn(spawn) => Kind::Spawn(spawn.species),
        }
    }

    /// Species of a living organism, `None` for emitters.
    pub fn species(&self) -> Option<Species> {
        match self.kind() {
            Kind::Living(species) => Some(species),
            Kind::Spawn(_) => None,
        }
    }

    /// Energy of a living organism; emitters report 0.
    pub fn energy(&self) -> f64 {
        match &self.body {
            Body::Plant(plant) => plant.energy,
            Body::Animal(animal) => animal.energy,
            Body::Spawn(_) => 0.0,
        }
    }

    /// Sets the energy of a living organism. Emitters ignore it.
    pub fn set_energy(&mut self, energy: f64) {
        match &mut self.body {
            Body::Plant(plant) => plant.energy = energy,
            Body::Animal(animal) => animal.energy = energy,
            Body::Spawn(_) => {}
        }
    }

    /// Body radius: `0.5 * sqrt(energy)` for living organisms, the emitter radius for spawns.
    pub fn size(&self) -> f64 {
        match &self.body {
            Body::Spawn(spawn) => spawn.radius,
            _ => energy_size(self.energy()),
        }
    }

    /// Unit heading; non-animals face the positive x axis.
    pub fn heading(&self) -> Vec2 {
        match &self.body {
            Body::Animal(animal) => animal.dir,
            _ => Vec2::new(1.0, 0.0),
        }
    }

    /// Animal payload, if any.
    pub fn as_animal(&self) -> Option<&Animal> {
        match &self.body {
            Body::Animal(animal) => Some(animal),
            _ => None,
        }
    }

    /// Mutable animal payload, if any.
    pub fn as_animal_mut(&mut self) -> Option<&mut Animal> {
        match &mut self.body {
            Body::Animal(animal) => Some(animal),
            _ => None,
        }
    }

    /// Spawn payload, if any.
    pub fn as_spawn(&self) -> Option<&Spawn> {
        match &self.body {
            Body::Spawn(spawn) => Some(spawn),
            _ => None,
        }
    }

    /// Plant payload, if any.
    pub fn as_plant(&self) -> Option<&Plant> {
        match &self.body {
            Body::Plant(plant) => Some(plant),
            _ => None,
        }
    }

    /// Reacts to `other`, which the world found within the summed sizes of both.
    ///
    /// Animals eat edible prey: the prey's energy is zeroed and the death is
    /// picked up by the prey's next `process`. Emitters count owned occupants.
    pub fn interact(&mut self, other: &mut Organism, params: &WorldParams) {
        let distance = geometric_utils::distance(self.pos, other.pos);
        let own_size = self.size();
        match &mut self.body {
            Body::Animal(animal) => {
                let reach = params.eat_distance_factor * (own_size + other.size());
                if other.alive && distance < reach && animal.edible(other) {
                    animal.eat(other);
                }
            }
            Body::Spawn(spawn) => {
                if spawn.owns(other) && distance < spawn.radius {
                    spawn.count += 1;
                }
            }
            Body::Plant(_) => {}
        }
    }

    /// Writes potential fields into the mind inputs of an animal. Others ignore it.
    pub fn sense(&mut self, fields: &[Potential]) {
        if let Body::Animal(animal) = &mut self.body {
            animal.sense(fields);
        }
    }

    /// Ages the organism, applies its metabolism and checks for death.
    ///
    /// Living animals also run their mind and update velocity and spin.
    pub fn process(&mut self, params: &Params) {
        self.age += 1;
        self.total_age += 1;

        let alive = match &mut self.body {
            Body::Plant(plant) => plant.process(self.age, &params.plant),
            Body::Animal(animal) => {
                let alive = animal.metabolize(self.age);
                if alive {
                    self.vel = animal.think();
                }
                alive
            }
            Body::Spawn(spawn) => {
                spawn.tick();
                true
            }
        };

        if !alive {
            self.alive = false;
        }
    }

    /// Offspring created this tick.
    ///
    /// Animals above their breeding energy split all of their energy among
    /// their children and die. Emitters materialize organisms while their
    /// occupancy is below capacity and their timer allows it.
    pub fn produce<R: Random + ?Sized>(
        &mut self,
        params: &Params,
        pools: &GenePools,
        rng: &mut R,
    ) -> Vec<Organism> {
        if !self.alive {
            return Vec::new();
        }

        match &mut self.body {
            Body::Plant(_) => Vec::new(),
            Body::Animal(animal) => {
                if !animal.ready_to_breed() {
                    return Vec::new();
                }
                let size = energy_size(animal.energy);
                let children = animal.breed(self.age, rng);
                self.alive = false;

                children
                    .into_iter()
                    .map(|child| {
                        let pos = self.pos + rng.unit_disk() * (0.5 * size);
                        let mut offspring = Organism::with_body(pos, true, Body::Animal(child));
                        offspring.total_age = self.total_age;
                        offspring.ancestors = self.ancestors + 1;
                        offspring
                    })
                    .collect()
            }
            Body::Spawn(spawn) => {
                let count = spawn.emissions();
                (0..count)
                    .map(|_| {
                        let pos = self.pos + rng.unit_disk() * spawn.radius;
                        spawn.instance(pos, params, pools, rng)
                    })
                    .collect()
            }
        }
    }

    /// Integrates position over `dt`; animals also turn by `spin * dt`. Emitters never move.
    pub fn move_by(&mut self, dt: f64) {
        match &mut self.body {
            Body::Spawn(_) => {}
            Body::Animal(animal) => {
                self.pos += self.vel * dt;
                animal.turn(dt);
            }
            Body::Plant(_) => {
                self.pos += self.vel * dt;
            }
        }
    }
}

/// Body radius of a living organism with the given energy.
pub fn energy_size(energy: f64) -> f64 {
    0.5 * energy.max(0.0).sqrt()
}
