//! Spatial indexing for the interaction phase.
//!
//! Wraps a kd-tree over entity positions so each actor only visits
//! neighbours that can possibly be within reach.

use kdtree::distance::squared_euclidean;
use kdtree::{ErrorKind as KdTreeError, KdTree};

use super::geometric_utils::Vec2;
use super::organism::{EntityId, Organism};

/// 2D kd-tree mapping positions to entity identifiers.
pub type Tree2D = KdTree<f64, EntityId, [f64; 2]>;

/// Spatial index over every entity of a world.
pub struct SpatialIndex {
    tree: Tree2D,
}

impl SpatialIndex {
    /// Builds the index from the entities of a world.
    ///
    /// # Arguments
    ///
    /// * `entities` - `(id, organism)` pairs, emitters included
    ///
    /// # Returns
    ///
    /// A spatial index or an error if a position is not finite.
    pub fn build<'a>(
        entities: impl ExactSizeIterator<Item = (&'a EntityId, &'a Organism)>,
    ) -> Result<Self, KdTreeError> {
        let mut tree = KdTree::with_capacity(2, entities.len().max(1));
        for (&id, organism) in entities {
            tree.add(point(organism.pos), id)?;
        }
        Ok(Self { tree })
    }

    /// Query entities within a radius.
    ///
    /// # Arguments
    ///
    /// * `pos` - Center position for the query
    /// * `radius` - Search radius (will be squared internally)
    ///
    /// # Returns
    ///
    /// Identifiers of the entities within `radius`, in ascending order.
    pub fn query(&self, pos: Vec2, radius: f64) -> Result<Vec<EntityId>, KdTreeError> {
        let mut ids: Vec<EntityId> = self
            .tree
            .within(&point(pos), radius * radius, &squared_euclidean)?
            .into_iter()
            .map(|(_, &id)| id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    /// Number of indexed entities.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// True when nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn point(pos: Vec2) -> [f64; 2] {
    [pos.x(), pos.y()]
}
