//! Potential fields: the sensory substrate of every animal.
//!
//! Each sensed category contributes a smooth field summed over its whole
//! population. For an observer of size `s` and a source `p`:
//!
//! ```text
//! m    = size(p) / s
//! d    = p.pos - observer.pos
//! l    = |d| + size(p)
//! pot += m / l
//! grad += m * d / l^3
//! ```
//!
//! The accumulated gradient is finally normalized to a unit vector, or to
//! zero when it is shorter than the configured epsilon.

use super::geometric_utils::{self, Vec2};
use super::organism::{EntityId, Organism, Species};

/// Number of sensed categories: plants, herbivores, carnivores.
pub const CATEGORY_COUNT: usize = 3;

/// Field value of one category at one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Potential {
    /// Scalar potential, `>= 0`.
    pub pot: f64,
    /// Unit gradient direction, or the zero vector.
    pub grad: Vec2,
}

impl Default for Potential {
    fn default() -> Self {
        Self {
            pot: 0.0,
            grad: geometric_utils::zero(),
        }
    }
}

/// Field contribution of one living organism, copied out of the world before
/// the fields are computed.
#[derive(Debug, Clone, Copy)]
pub struct Source {
    /// Identifier of the contributing organism; the observer never senses itself.
    pub id: EntityId,
    /// Position.
    pub pos: Vec2,
    /// Body radius.
    pub size: f64,
    /// Category.
    pub species: Species,
}

impl Source {
    /// Source record of a living organism, `None` for emitters and dead organisms.
    pub fn of(id: EntityId, organism: &Organism) -> Option<Self> {
        if !organism.alive {
            return None;
        }
        let species = organism.species()?;
        Some(Self {
            id,
            pos: organism.pos,
            size: organism.size(),
            species,
        })
    }
}

/// Category slot of a species.
pub fn category(species: Species) -> usize {
    match species {
        Species::Plant => 0,
        Species::Herbivore => 1,
        Species::Carnivore => 2,
    }
}

/// Fields sensed by one observer.
///
/// Sources with a non-positive size carry no mass and are skipped. An observer
/// with a non-positive size senses nothing.
///
/// # Arguments
///
/// * `id` - Identifier of the observer, excluded from its own fields
/// * `pos` - Position of the observer
/// * `size` - Body radius of the observer
/// * `sources` - Every living organism of the world
/// * `epsilon` - Gradients shorter than this become the zero vector
///
/// # Returns
///
/// One [`Potential`] per category, indexed by [`category`].
pub fn fields(
    id: EntityId,
    pos: Vec2,
    size: f64,
    sources: &[Source],
    epsilon: f64,
) -> [Potential; CATEGORY_COUNT] {
    let mut out = [Potential::default(); CATEGORY_COUNT];
    if size <= 0.0 {
        return out;
    }

    for source in sources {
        if source.id == id || source.size <= 0.0 {
            continue;
        }
        let field = &mut out[category(source.species)];
        let m = source.size / size;
        let d = source.pos - pos;
        let l = geometric_utils::length(d) + source.size;
        field.pot += m / l;
        field.grad = field.grad + d * (m / (l * l * l));
    }

    for field in &mut out {
        field.grad = geometric_utils::normalize_or_zero(field.grad, epsilon);
    }
    out
}
