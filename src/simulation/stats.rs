//! Population counters and run statistics.

use serde::{Deserialize, Serialize};

use super::organism::{Kind, Organism, Species};

/// Live entity counts by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Population {
    /// Living plants.
    pub plants: usize,
    /// Living herbivores.
    pub herbivores: usize,
    /// Living carnivores.
    pub carnivores: usize,
    /// Spawn emitters.
    pub spawns: usize,
}

impl Population {
    /// Counts `organism` in.
    pub fn add(&mut self, organism: &Organism) {
        *self.slot(organism) += 1;
    }

    /// Counts `organism` out.
    pub fn remove(&mut self, organism: &Organism) {
        let slot = self.slot(organism);
        *slot = slot.saturating_sub(1);
    }

    /// Counter of one species.
    pub fn of(&self, species: Species) -> usize {
        match species {
            Species::Plant => self.plants,
            Species::Herbivore => self.herbivores,
            Species::Carnivore => self.carnivores,
        }
    }

    /// Living organisms of every species.
    pub fn living(&self) -> usize {
        self.plants + self.herbivores + self.carnivores
    }

    /// Every entity, emitters included.
    pub fn total(&self) -> usize {
        self.living() + self.spawns
    }

    fn slot(&mut self, organism: &Organism) -> &mut usize {
        match organism.kind() {
            Kind::Living(Species::Plant) => &mut self.plants,
            Kind::Living(Species::Herbivore) => &mut self.herbivores,
            Kind::Living(Species::Carnivore) => &mut self.carnivores,
            Kind::Spawn(_) => &mut self.spawns,
        }
    }
}

/// Running statistics of a world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Completed ticks.
    pub steps_elapsed: u64,
    /// Wall-clock duration of the last tick, in milliseconds.
    pub step_duration_ms: f64,
    /// Largest lineage age among the animals alive after the last tick.
    pub max_age: u64,
    /// Largest ancestor count among the animals alive after the last tick.
    pub max_ancestors: u32,
}

impl Statistics {
    /// Folds one organism into the maxima. Only animals count.
    pub fn observe(&mut self, organism: &Organism) {
        if organism.species().is_some_and(Species::is_animal) {
            self.max_age = self.max_age.max(organism.total_age);
            self.max_ancestors = self.max_ancestors.max(organism.ancestors);
        }
    }
}
