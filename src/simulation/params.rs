//! Simulation parameters.
//!
//! Every tunable constant of the ecosystem lives here. Defaults reproduce the
//! reference ecosystem; any subset can be overridden from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometric_utils::Vec2;
use super::mind::MindShape;
use super::organism::Species;
use super::potential::CATEGORY_COUNT;

/// Values sensed per potential-field category: gradient x, gradient y, potential.
pub const INPUTS_PER_CATEGORY: usize = 3;
/// Motor outputs of every mind: speed and spin.
pub const MIND_OUTPUTS: usize = 2;

/// Errors raised while loading or validating parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The parameter file could not be read or written.
    #[error("config i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// The parameter file is not valid JSON for [`Params`].
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// A value is outside its allowed range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// World-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    /// Arena half extent; positions live in `[-hx, hx] x [-hy, hy]`.
    pub half_extent: [f64; 2],
    /// Integration step used by the move phase.
    pub dt: f64,
    /// Sleep between ticks, in microseconds.
    pub tick_delay_us: u64,
    /// Minimum wall-clock interval between two snapshot notifications.
    pub publish_interval_ms: u64,
    /// Gradients shorter than this are reported as the zero vector.
    pub gradient_epsilon: f64,
    /// An animal eats when closer than this fraction of the summed sizes.
    pub eat_distance_factor: f64,
    /// Use a kd-tree to find interaction candidates instead of scanning every pair.
    pub spatial_index: bool,
    /// Seed for the world RNG; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            half_extent: [1000.0, 1600.0],
            dt: 0.1,
            tick_delay_us: 40_000,
            publish_interval_ms: 20,
            gradient_epsilon: 1e-8,
            eat_distance_factor: 0.8,
            spatial_index: true,
            seed: None,
        }
    }
}

impl WorldParams {
    /// Half extent as a vector.
    pub fn half_extent(&self) -> Vec2 {
        Vec2::new(self.half_extent[0], self.half_extent[1])
    }
}

/// Plant growth and lifespan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantParams {
    /// Energy of a freshly spawned plant.
    pub init_energy: f64,
    /// Lower bound of the per-plant energy ceiling.
    pub lower_energy: f64,
    /// Upper bound of the per-plant energy ceiling.
    pub upper_energy: f64,
    /// Age penalty per unit of energy above `lower_energy`.
    pub score_fine: f64,
    /// Linear energy growth per tick.
    pub grow_speed: f64,
    /// Proportional energy growth per tick.
    pub grow_exp: f64,
    /// Base lifespan in ticks.
    pub max_age: f64,
}

impl Default for PlantParams {
    fn default() -> Self {
        Self {
            init_energy: 0.1,
            lower_energy: 300.0,
            upper_energy: 700.0,
            score_fine: 1.0,
            grow_speed: 2.0,
            grow_exp: 0.0,
            max_age: 2000.0,
        }
    }
}

/// Per-species animal constants.
///
/// A species table given in a parameter file must be complete; there is no
/// field-level default because the two species differ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimalParams {
    /// Hidden units of the species' mind.
    pub hidden_size: usize,
    /// Energy of an animal created by a spawn emitter.
    pub init_energy: f64,
    /// Speed at full throttle.
    pub max_speed: f64,
    /// Turn rate at full deflection, radians per unit time.
    pub max_spin: f64,
    /// Fraction of the prey's energy gained when eating.
    pub eat_factor: f64,
    /// Energy lost every tick.
    pub time_fine: f64,
    /// Energy lost every tick per unit of `|spin|`.
    pub spin_fine: f64,
    /// Reproduction happens once energy exceeds this value.
    pub breed_energy: f64,
    /// Lifespan in ticks.
    pub max_age: u64,
    /// Score bonus per tick of remaining lifespan when reproducing.
    pub breed_factor: f64,
    /// Mutation sigma applied to offspring minds.
    pub mind_delta: f64,
    /// Offspring per reproduction.
    pub child_count: usize,
    /// A herbivore is only edible to a carnivore when `prey_energy_ratio * prey.energy <= carnivore.energy`.
    pub prey_energy_ratio: f64,
}

impl AnimalParams {
    /// Herbivore defaults.
    pub fn herbivore() -> Self {
        Self {
            max_age: 500,
            time_fine: 1.0,
            breed_energy: 800.0,
            ..Self::base()
        }
    }

    /// Carnivore defaults.
    pub fn carnivore() -> Self {
        Self {
            max_age: 1000,
            time_fine: 0.5,
            breed_energy: 1000.0,
            ..Self::base()
        }
    }

    fn base() -> Self {
        Self {
            hidden_size: 16,
            init_energy: 100.0,
            max_speed: 100.0,
            max_spin: 10.0,
            eat_factor: 0.2,
            time_fine: 1.0,
            spin_fine: 0.1,
            breed_energy: 800.0,
            max_age: 500,
            breed_factor: 2.0,
            mind_delta: 0.01,
            child_count: 2,
            prey_energy_ratio: 0.2,
        }
    }

    /// Shape of the minds carried by this species.
    pub fn mind_shape(&self) -> MindShape {
        MindShape::new(
            INPUTS_PER_CATEGORY * CATEGORY_COUNT,
            MIND_OUTPUTS,
            self.hidden_size,
        )
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if self.hidden_size == 0 {
            return Err(invalid(format!("{name}.hidden_size must be non-zero")));
        }
        if self.child_count == 0 {
            return Err(invalid(format!("{name}.child_count must be non-zero")));
        }
        let non_negative = [
            ("init_energy", self.init_energy),
            ("max_speed", self.max_speed),
            ("max_spin", self.max_spin),
            ("eat_factor", self.eat_factor),
            ("time_fine", self.time_fine),
            ("spin_fine", self.spin_fine),
            ("breed_factor", self.breed_factor),
            ("mind_delta", self.mind_delta),
            ("prey_energy_ratio", self.prey_energy_ratio),
        ];
        for (field, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(invalid(format!("{name}.{field} must be >= 0, got {value}")));
            }
        }
        Ok(())
    }
}

/// Gene-pool settings shared by every species.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorParams {
    /// Champions retained after each maintenance pass.
    pub capacity: usize,
    /// Relative score decay per maintenance pass.
    pub decay: f64,
}

impl Default for SelectorParams {
    fn default() -> Self {
        Self {
            capacity: 16,
            decay: 1e-4,
        }
    }
}

/// Complete parameter set of a world.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Arena, timing and interaction settings.
    pub world: WorldParams,
    /// Plant constants.
    pub plant: PlantParams,
    /// Herbivore constants.
    pub herbivore: AnimalParams,
    /// Carnivore constants.
    pub carnivore: AnimalParams,
    /// Gene-pool settings.
    pub selector: SelectorParams,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            world: WorldParams::default(),
            plant: PlantParams::default(),
            herbivore: AnimalParams::herbivore(),
            carnivore: AnimalParams::carnivore(),
            selector: SelectorParams::default(),
        }
    }
}

impl Params {
    /// Constants of an animal species, `None` for plants.
    pub fn animal(&self, species: Species) -> Option<&AnimalParams> {
        match species {
            Species::Plant => None,
            Species::Herbivore => Some(&self.herbivore),
            Species::Carnivore => Some(&self.carnivore),
        }
    }

    /// Checks every value for range errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [hx, hy] = self.world.half_extent;
        if hx.is_nan() || hy.is_nan() || hx <= 0.0 || hy <= 0.0 {
            return Err(invalid(format!(
                "world.half_extent must be positive, got [{hx}, {hy}]"
            )));
        }
        if self.world.dt.is_nan() || self.world.dt <= 0.0 {
            return Err(invalid(format!("world.dt must be positive, got {}", self.world.dt)));
        }
        if self.world.gradient_epsilon.is_nan() || self.world.gradient_epsilon < 0.0 {
            return Err(invalid("world.gradient_epsilon must be >= 0".to_string()));
        }
        if self.world.eat_distance_factor.is_nan() || self.world.eat_distance_factor <= 0.0 {
            return Err(invalid("world.eat_distance_factor must be positive".to_string()));
        }
        if self.plant.lower_energy > self.plant.upper_energy {
            return Err(invalid(
                "plant.lower_energy must not exceed plant.upper_energy".to_string(),
            ));
        }
        if self.plant.grow_speed < 0.0 || self.plant.init_energy < 0.0 {
            return Err(invalid("plant growth and initial energy must be >= 0".to_string()));
        }
        self.herbivore.validate("herbivore")?;
        self.carnivore.validate("carnivore")?;
        if self.selector.capacity == 0 {
            return Err(invalid("selector.capacity must be non-zero".to_string()));
        }
        if !(0.0..1.0).contains(&self.selector.decay) {
            return Err(invalid(format!(
                "selector.decay must be in [0, 1), got {}",
                self.selector.decay
            )));
        }
        Ok(())
    }

    /// Saves the parameters to a pretty-printed JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads and validates parameters from a JSON file. Missing fields take their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}
