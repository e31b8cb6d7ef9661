//! Copy-out views of a world for observers.
//!
//! A snapshot is taken under the world lock and owns all of its data, so
//! rendering and logging never hold the lock.

use serde::{Deserialize, Serialize};

use super::organism::{EntityId, Kind, Organism};
use super::stats::{Population, Statistics};

/// Drawable state of one entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Identifier inside the world.
    pub id: EntityId,
    /// Runtime tag.
    pub kind: Kind,
    /// Position.
    pub pos: [f64; 2],
    /// Unit heading.
    pub heading: [f64; 2],
    /// Body or emitter radius.
    pub size: f64,
    /// Energy; 0 for emitters.
    pub energy: f64,
    /// Whether the entity is alive.
    pub alive: bool,
}

impl EntitySnapshot {
    /// Copies the drawable state of `organism`.
    pub fn of(id: EntityId, organism: &Organism) -> Self {
        let heading = organism.heading();
        Self {
            id,
            kind: organism.kind(),
            pos: [organism.pos.x(), organism.pos.y()],
            heading: [heading.x(), heading.y()],
            size: organism.size(),
            energy: organism.energy(),
            alive: organism.alive,
        }
    }
}

/// Consistent view of a whole world at the end of a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Every entity, in identifier order.
    pub entities: Vec<EntitySnapshot>,
    /// Population counters.
    pub population: Population,
    /// Run statistics.
    pub stats: Statistics,
    /// Arena half extent.
    pub half_extent: [f64; 2],
}
