//! The world: entity arena, identifiers and the per-tick pipeline.
//!
//! A tick runs these phases strictly in order:
//!
//! 1. [`World::interact`]: active entities react to their neighbours (eating, occupancy counts)
//! 2. [`World::sense`]: potential fields are computed and written into every mind
//! 3. [`World::process`]: aging, metabolism, death checks and neural inference
//! 4. [`World::reproduce`]: offspring and emissions join the arena with fresh identifiers
//! 5. [`World::remove_dead`]: dead entities leave the arena; dead animals feed the gene pools
//! 6. [`World::move_all`]: integration and clamping to the arena
//! 7. [`World::update_statistics`]: counters and timing
//!
//! Within a phase every entity present at the start of the phase is visited
//! exactly once, in identifier order where the order is observable.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};
use rayon::prelude::*;

use super::geometric_utils::{self, Vec2};
use super::organism::{EntityId, Organism, Species};
use super::params::Params;
use super::potential::{self, Source};
use super::rng::{self, Random, SimRng};
use super::selector::GenePools;
use super::snapshot::{EntitySnapshot, WorldSnapshot};
use super::spatial::SpatialIndex;
use super::stats::{Population, Statistics};

/// The simulated ecosystem.
///
/// Owns every [`Organism`], keyed by an identifier that is never reused.
pub struct World {
    entities: BTreeMap<EntityId, Organism>,
    next_id: EntityId,
    params: Params,
    rng: SimRng,
    pools: GenePools,
    population: Population,
    stats: Statistics,
}

impl World {
    /// Creates an empty arena.
    pub fn new(params: Params) -> Self {
        let rng = rng::seeded(params.world.seed);
        let pools = GenePools::new(&params.selector);
        let [hx, hy] = params.world.half_extent;
        info!(
            "world created: half extent {hx}x{hy}, dt {}, seed {:?}",
            params.world.dt, params.world.seed
        );

        Self {
            entities: BTreeMap::new(),
            next_id: 0,
            params,
            rng,
            pools,
            population: Population::default(),
            stats: Statistics::default(),
        }
    }

    /// Creates the reference ecosystem: a herbivore emitter with a plant patch
    /// near the top of the arena, the mirrored carnivore emitter and patch near
    /// the bottom, and a large plant emitter in the center.
    ///
    /// Emitter positions scale with the arena height.
    pub fn with_default_layout(params: Params) -> Self {
        let mut world = Self::new(params);
        let hy = world.params.world.half_extent[1];

        world.add_spawn(Species::Herbivore, Vec2::new(0.0, 0.9375 * hy), 100.0, 10.0, 0);
        world.add_spawn(Species::Plant, Vec2::new(0.0, 0.8125 * hy), 300.0, 0.0, 100);
        world.add_spawn(Species::Plant, Vec2::new(0.0, 0.0), 1000.0, 0.0, 200);
        world.add_spawn(Species::Carnivore, Vec2::new(0.0, -0.9375 * hy), 100.0, 10.0, 0);
        world.add_spawn(Species::Plant, Vec2::new(0.0, -0.8125 * hy), 300.0, 0.0, 100);

        world
    }

    /// Inserts an organism into the arena.
    ///
    /// # Arguments
    ///
    /// * `organism` - The organism to insert, counted into the population at once
    ///
    /// # Returns
    ///
    /// The identifier assigned to the organism. Identifiers are never reused,
    /// even after the organism is removed.
    pub fn add(&mut self, organism: Organism) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.population.add(&organism);
        self.entities.insert(id, organism);
        id
    }

    /// Inserts a spawn emitter. See [`Organism::spawn`].
    pub fn add_spawn(
        &mut self,
        species: Species,
        pos: Vec2,
        radius: f64,
        period: f64,
        capacity: usize,
    ) -> EntityId {
        self.add(Organism::spawn(species, pos, radius, period, capacity))
    }

    /// Organism with identifier `id`, if it is still in the arena.
    pub fn get(&self, id: EntityId) -> Option<&Organism> {
        self.entities.get(&id)
    }

    /// Mutable organism with identifier `id`.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Organism> {
        self.entities.get_mut(&id)
    }

    /// Every entity in identifier order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Organism)> {
        self.entities.iter().map(|(&id, organism)| (id, organism))
    }

    /// Number of entities, emitters included.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when the arena holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Identifier the next inserted entity will receive.
    pub fn next_id(&self) -> EntityId {
        self.next_id
    }

    /// Parameters the world was built with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Arena half extent.
    pub fn half_extent(&self) -> Vec2 {
        self.params.world.half_extent()
    }

    /// The world's random engine, for seeding entities consistently with the run.
    pub fn rng_mut(&mut self) -> &mut SimRng {
        &mut self.rng
    }

    /// Per-species gene pools.
    pub fn pools(&self) -> &GenePools {
        &self.pools
    }

    /// Population counters maintained by the pipeline.
    pub fn population(&self) -> Population {
        self.population
    }

    /// Run statistics.
    pub fn statistics(&self) -> Statistics {
        self.stats
    }

    /// Recounts the population by scanning the arena.
    pub fn census(&self) -> Population {
        let mut population = Population::default();
        for organism in self.entities.values() {
            population.add(organism);
        }
        population
    }

    /// Uniform position inside the arena shrunk by `inset` on every side.
    pub fn random_position(&mut self, inset: f64) -> Vec2 {
        let half = self.half_extent();
        let mx = (half.x() - inset).max(0.0);
        let my = (half.y() - inset).max(0.0);
        Vec2::new(
            mx * (2.0 * self.rng.uniform() - 1.0),
            my * (2.0 * self.rng.uniform() - 1.0),
        )
    }

    /// Runs one full tick.
    pub fn step(&mut self) {
        let start = Instant::now();

        self.interact();
        self.sense();
        self.process();
        self.reproduce();
        self.remove_dead();
        self.move_all();

        self.update_statistics(start.elapsed());
    }

    /// Interaction phase.
    ///
    /// Each alive active entity is taken out of the arena, meets every other
    /// entity that could be within reach in identifier order, and is put back.
    /// Candidates come from a kd-tree when enabled; a failed index build or
    /// query falls back to scanning the whole arena.
    ///
    /// An actor that grows while eating widens its query and continues with
    /// the candidates after the one it just met, so the outcome is the same as
    /// a full scan.
    pub fn interact(&mut self) {
        // upper bound on the size of anything an actor can react to
        let mut max_size = self
            .entities
            .values()
            .filter(|organism| organism.species().is_some())
            .map(Organism::size)
            .fold(0.0, f64::max);

        let index = if self.params.world.spatial_index {
            match SpatialIndex::build(self.entities.iter()) {
                Ok(index) => Some(index),
                Err(err) => {
                    warn!("spatial index unavailable, scanning all pairs: {err:?}");
                    None
                }
            }
        } else {
            None
        };

        let actors: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, organism)| organism.active && organism.alive)
            .map(|(&id, _)| id)
            .collect();

        for id in actors {
            let Some(mut actor) = self.entities.remove(&id) else {
                continue;
            };

            let mut reach = actor.size() + max_size;
            let mut candidates = self.candidates(index.as_ref(), id, actor.pos, reach);
            let mut next = 0;
            while let Some(&other_id) = candidates.get(next) {
                next += 1;
                let Some(other) = self.entities.get_mut(&other_id) else {
                    continue;
                };
                actor.interact(other, &self.params.world);

                let grown = actor.size() + max_size;
                if index.is_some() && grown > reach {
                    reach = grown;
                    candidates = self
                        .candidates(index.as_ref(), id, actor.pos, reach)
                        .into_iter()
                        .filter(|&candidate| candidate > other_id)
                        .collect();
                    next = 0;
                }
            }

            if actor.species().is_some() {
                max_size = max_size.max(actor.size());
            }
            self.entities.insert(id, actor);
        }
    }

    /// Identifiers of the entities within `radius` of `pos`, ascending.
    ///
    /// Without an index, or when the query fails, every identifier in the arena.
    fn candidates(
        &self,
        index: Option<&SpatialIndex>,
        id: EntityId,
        pos: Vec2,
        radius: f64,
    ) -> Vec<EntityId> {
        if let Some(index) = index {
            match index.query(pos, radius) {
                Ok(ids) => return ids,
                Err(err) => {
                    warn!("neighbour query failed for {id}, scanning all pairs: {err:?}");
                }
            }
        }
        self.entities.keys().copied().collect()
    }

    /// Sensing phase: every animal receives the fields of all living organisms.
    pub fn sense(&mut self) {
        let epsilon = self.params.world.gradient_epsilon;
        let sources: Vec<Source> = self
            .entities
            .iter()
            .filter_map(|(&id, organism)| Source::of(id, organism))
            .collect();

        self.entities
            .par_iter_mut()
            .filter(|(_, organism)| organism.as_animal().is_some())
            .for_each(|(&id, organism)| {
                let fields = potential::fields(id, organism.pos, organism.size(), &sources, epsilon);
                organism.sense(&fields);
            });
    }

    /// Processing phase.
    pub fn process(&mut self) {
        let params = &self.params;
        self.entities
            .par_iter_mut()
            .filter(|(_, organism)| organism.alive)
            .for_each(|(_, organism)| organism.process(params));
    }

    /// Reproduction phase. Returns the number of entities added.
    pub fn reproduce(&mut self) -> usize {
        let mut offspring = Vec::new();
        for organism in self.entities.values_mut() {
            offspring.extend(organism.produce(&self.params, &self.pools, &mut self.rng));
        }

        let births = offspring.len();
        for child in offspring {
            self.add(child);
        }
        if births > 0 {
            debug!("tick {}: {births} born", self.stats.steps_elapsed);
        }
        births
    }

    /// Removal phase. Returns the number of entities removed.
    ///
    /// Dead animals are offered to their species' gene pool, then every pool
    /// runs one maintenance pass.
    pub fn remove_dead(&mut self) -> usize {
        let dead: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, organism)| !organism.alive)
            .map(|(&id, _)| id)
            .collect();

        for id in &dead {
            let Some(organism) = self.entities.remove(id) else {
                continue;
            };
            self.population.remove(&organism);
            if let Some(animal) = organism.as_animal() {
                self.pools.record(animal.species, animal.score, &animal.mind);
            }
        }
        self.pools.select();

        if !dead.is_empty() {
            debug!("tick {}: {} died", self.stats.steps_elapsed, dead.len());
        }
        dead.len()
    }

    /// Movement phase: integrate over `dt` and clamp to the arena. Emitters stay put.
    pub fn move_all(&mut self) {
        let dt = self.params.world.dt;
        let half = self.half_extent();
        self.entities
            .par_iter_mut()
            .filter(|(_, organism)| organism.as_spawn().is_none())
            .for_each(|(_, organism)| {
                organism.move_by(dt);
                let size = organism.size();
                geometric_utils::clamp_to_extent(&mut organism.pos, half, size);
            });
    }

    /// Statistics phase.
    ///
    /// The age and generation maxima are recomputed over the animals alive now.
    pub fn update_statistics(&mut self, elapsed: Duration) {
        self.stats.steps_elapsed += 1;
        self.stats.step_duration_ms = elapsed.as_secs_f64() * 1e3;
        self.stats.max_age = 0;
        self.stats.max_ancestors = 0;
        for organism in self.entities.values() {
            self.stats.observe(organism);
        }
        trace!(
            "tick {} took {:.3} ms, population {:?}",
            self.stats.steps_elapsed, self.stats.step_duration_ms, self.population
        );
    }

    /// Copies out everything an observer needs to draw the world.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            entities: self
                .entities
                .iter()
                .map(|(&id, organism)| EntitySnapshot::of(id, organism))
                .collect(),
            population: self.population,
            stats: self.stats,
            half_extent: self.params.world.half_extent,
        }
    }
}
