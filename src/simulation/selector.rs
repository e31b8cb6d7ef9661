//! Gene pools: per-species archives of the best minds seen so far.

use log::debug;

use super::mind::Mind;
use super::organism::Species;
use super::params::SelectorParams;
use super::rng::Random;

/// An archived mind with its (decaying) score.
#[derive(Debug, Clone)]
pub struct Champion {
    /// Score at admission, decayed by every maintenance pass since.
    pub score: f64,
    /// Archived genome.
    pub mind: Mind,
}

/// Elite archive of high-scoring minds, kept sorted by ascending score.
///
/// [`Selector::record`] may push the archive above capacity; the next
/// [`Selector::select`] evicts the lowest scorers and decays the rest.
#[derive(Debug, Clone)]
pub struct Selector {
    champions: Vec<Champion>,
    min_score: f64,
    max_score: f64,
    capacity: usize,
    decay: f64,
}

impl Selector {
    /// Creates an empty archive.
    pub fn new(params: &SelectorParams) -> Self {
        Self {
            champions: Vec::with_capacity(params.capacity + 1),
            min_score: 0.0,
            max_score: 0.0,
            capacity: params.capacity,
            decay: params.decay,
        }
    }

    /// Offers a mind to the archive. Returns whether it was admitted.
    ///
    /// Only scores strictly above the current minimum are admitted. Equal
    /// scores are inserted before the existing ones, so they are evicted first.
    pub fn record(&mut self, score: f64, mind: &Mind) -> bool {
        if score <= self.min_score {
            return false;
        }
        let at = self.champions.partition_point(|c| c.score < score);
        self.champions.insert(
            at,
            Champion {
                score,
                mind: mind.clone(),
            },
        );
        true
    }

    /// Maintenance pass: evicts the lowest scorers down to capacity, decays
    /// every remaining score and recomputes the score bounds.
    pub fn select(&mut self) {
        if self.champions.len() > self.capacity {
            let excess = self.champions.len() - self.capacity;
            self.champions.drain(..excess);
        }

        let factor = 1.0 - self.decay;
        for champion in &mut self.champions {
            champion.score *= factor;
        }

        if let (Some(first), Some(last)) = (self.champions.first(), self.champions.last()) {
            self.min_score = first.score;
            self.max_score = last.score;
        }
    }

    /// With even odds, a uniformly chosen champion's mind or `None`.
    ///
    /// `None` tells the caller to generate a fresh random genome. An empty
    /// archive always yields `None`.
    pub fn sample<R: Random + ?Sized>(&self, rng: &mut R) -> Option<&Mind> {
        if self.champions.is_empty() || rng.uniform() <= 0.5 {
            return None;
        }
        let i = rng.index(self.champions.len());
        Some(&self.champions[i].mind)
    }

    /// Archived champions, lowest score first.
    pub fn champions(&self) -> &[Champion] {
        &self.champions
    }

    /// Number of archived champions.
    pub fn len(&self) -> usize {
        self.champions.len()
    }

    /// True when nothing has been archived yet.
    pub fn is_empty(&self) -> bool {
        self.champions.is_empty()
    }

    /// Admission threshold as of the last maintenance pass.
    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    /// Best score as of the last maintenance pass.
    pub fn max_score(&self) -> f64 {
        self.max_score
    }
}

/// One [`Selector`] per animal species.
#[derive(Debug, Clone)]
pub struct GenePools {
    /// Herbivore archive.
    pub herbivore: Selector,
    /// Carnivore archive.
    pub carnivore: Selector,
}

impl GenePools {
    /// Creates empty archives for both animal species.
    pub fn new(params: &SelectorParams) -> Self {
        Self {
            herbivore: Selector::new(params),
            carnivore: Selector::new(params),
        }
    }

    /// Archive of `species`, `None` for plants.
    pub fn get(&self, species: Species) -> Option<&Selector> {
        match species {
            Species::Plant => None,
            Species::Herbivore => Some(&self.herbivore),
            Species::Carnivore => Some(&self.carnivore),
        }
    }

    /// Mutable archive of `species`, `None` for plants.
    pub fn get_mut(&mut self, species: Species) -> Option<&mut Selector> {
        match species {
            Species::Plant => None,
            Species::Herbivore => Some(&mut self.herbivore),
            Species::Carnivore => Some(&mut self.carnivore),
        }
    }

    /// Offers a dead animal's mind to its species' archive.
    pub fn record(&mut self, species: Species, score: f64, mind: &Mind) {
        if let Some(selector) = self.get_mut(species) {
            if selector.record(score, mind) {
                debug!("{species:?} champion admitted with score {score:.1}");
            }
        }
    }

    /// Runs one maintenance pass on every archive.
    pub fn select(&mut self) {
        self.herbivore.select();
        self.carnivore.select();
    }
}
