//! # Nevo - Neuro-Evolution Ecosystem
//!
//! A closed ecosystem of plants, herbivores and carnivores. Animals steer
//! with small recurrent neural networks that sense smooth potential fields
//! of the surrounding population. Successful minds are archived per species
//! and reseed the population through spawn emitters.
//!
//! ## Features
//!
//! - Recurrent tanh network over one contiguous weight buffer
//! - Pairwise potential-field sensing, parallelized with rayon
//! - Eating, growth, aging and semelparous reproduction with mutation
//! - Spawn emitters fed by per-species champion archives
//! - Simulation thread with pause/resume, tick delay and snapshots
//! - JSON parameter files
//!
//! ## Core Modules
//!
//! - [`simulation::world`] - Entity arena and the per-tick pipeline
//! - [`simulation::organism`] - Plants, animals and spawn emitters
//! - [`simulation::mind`] - Recurrent neural controller
//! - [`simulation::potential`] - Potential-field sensing
//! - [`simulation::selector`] - Champion archives
//! - [`simulation::sim_thread`] - Simulation thread and control surface

/// Core simulation logic and data structures.
pub mod simulation {
    /// Geometric utility functions for vectors, headings and arena bounds.
    pub mod geometric_utils;
    /// Recurrent neural network carried by every animal.
    pub mod mind;
    /// Organism behavior, state, and lifecycle.
    pub mod organism;
    /// Simulation parameters.
    pub mod params;
    /// Potential fields used for sensing.
    pub mod potential;
    /// Random number provider contract.
    pub mod rng;
    /// Gene pools of champion minds.
    pub mod selector;
    /// Simulation thread, shared lock and control surface.
    pub mod sim_thread;
    /// Copy-out world views for observers.
    pub mod snapshot;
    /// Spatial indexing for neighbor queries.
    pub mod spatial;
    /// Population counters and run statistics.
    pub mod stats;
    /// The world and its per-tick pipeline.
    pub mod world;
}
