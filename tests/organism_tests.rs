#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use nevo::simulation::geometric_utils::{self, Vec2};
use nevo::simulation::mind::Mind;
use nevo::simulation::organism::{Kind, Organism, Species};
use nevo::simulation::params::Params;
use nevo::simulation::selector::GenePools;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn create_test_params() -> Params {
    let mut params = Params::default();
    params.world.seed = Some(42);
    params
}

fn animal(species: Species, pos: Vec2, energy: f64, params: &Params) -> Organism {
    let shape = params.animal(species).expect("animal species").mind_shape();
    Organism::animal(species, pos, energy, Mind::new(shape), params)
}

#[test]
fn test_size_follows_energy() {
    let params = create_test_params();
    let herbivore = animal(Species::Herbivore, Vec2::new(0.0, 0.0), 100.0, &params);
    assert_eq!(herbivore.size(), 5.0);

    let starved = animal(Species::Herbivore, Vec2::new(0.0, 0.0), -4.0, &params);
    assert_eq!(starved.size(), 0.0);

    let spawn = Organism::spawn(Species::Plant, Vec2::new(0.0, 0.0), 300.0, 0.0, 100);
    assert_eq!(spawn.size(), 300.0);
    assert_eq!(spawn.kind(), Kind::Spawn(Species::Plant));
}

#[test]
fn test_herbivore_eats_plant_in_reach() {
    let params = create_test_params();
    let mut rng = StdRng::seed_from_u64(1);
    let mut herbivore = animal(Species::Herbivore, Vec2::new(0.0, 0.0), 100.0, &params);
    let mut plant = Organism::plant(Vec2::new(7.0, 0.0), 100.0, &params, &mut rng);

    herbivore.interact(&mut plant, &params.world);

    assert_eq!(herbivore.energy(), 120.0);
    assert_eq!(herbivore.as_animal().map(|a| a.score), Some(20.0));
    assert_eq!(plant.energy(), 0.0);
}

#[test]
fn test_no_eating_out_of_reach() {
    let params = create_test_params();
    let mut rng = StdRng::seed_from_u64(1);
    let mut herbivore = animal(Species::Herbivore, Vec2::new(0.0, 0.0), 100.0, &params);
    // reach is 0.8 * (5 + 5) = 8
    let mut plant = Organism::plant(Vec2::new(8.5, 0.0), 100.0, &params, &mut rng);

    herbivore.interact(&mut plant, &params.world);

    assert_eq!(herbivore.energy(), 100.0);
    assert_eq!(plant.energy(), 100.0);
}

#[test]
fn test_edibility_by_species() {
    let params = create_test_params();
    let mut rng = StdRng::seed_from_u64(1);
    let here = Vec2::new(0.0, 0.0);

    let herbivore = animal(Species::Herbivore, here, 100.0, &params);
    let carnivore = animal(Species::Carnivore, here, 100.0, &params);
    let plant = Organism::plant(here, 100.0, &params, &mut rng);
    let spawn = Organism::spawn(Species::Herbivore, here, 100.0, 10.0, 0);

    let h = herbivore.as_animal().expect("herbivore");
    assert!(h.edible(&plant));
    assert!(!h.edible(&carnivore));
    assert!(!h.edible(&herbivore));
    assert!(!h.edible(&spawn));

    let c = carnivore.as_animal().expect("carnivore");
    assert!(c.edible(&herbivore));
    assert!(!c.edible(&plant));
    assert!(!c.edible(&carnivore));

    // 0.2 * 600 > 100
    let big = animal(Species::Herbivore, here, 600.0, &params);
    assert!(!c.edible(&big));
    let small = animal(Species::Herbivore, here, 400.0, &params);
    assert!(c.edible(&small));
}

#[test]
fn test_animal_metabolism() {
    let params = create_test_params();
    let mut herbivore = animal(Species::Herbivore, Vec2::new(0.0, 0.0), 100.0, &params);
    herbivore.process(&params);
    assert_eq!(herbivore.energy(), 99.0);
    assert_eq!(herbivore.age, 1);
    assert_eq!(herbivore.total_age, 1);
    assert!(herbivore.alive);

    let mut carnivore = animal(Species::Carnivore, Vec2::new(0.0, 0.0), 100.0, &params);
    if let Some(body) = carnivore.as_animal_mut() {
        body.spin = -2.0;
    }
    carnivore.process(&params);
    assert!((carnivore.energy() - (100.0 - 0.5 - 0.2)).abs() < 1e-12);
}

#[test]
fn test_animal_starves() {
    let params = create_test_params();
    let mut herbivore = animal(Species::Herbivore, Vec2::new(0.0, 0.0), 0.5, &params);
    herbivore.process(&params);
    assert!(!herbivore.alive);
}

#[test]
fn test_animal_dies_of_age() {
    let params = create_test_params();
    let mut herbivore = animal(Species::Herbivore, Vec2::new(0.0, 0.0), 100.0, &params);
    herbivore.age = 499;
    herbivore.process(&params);
    assert!(herbivore.alive);
    herbivore.process(&params);
    assert!(!herbivore.alive);
}

#[test]
fn test_mind_output_drives_velocity_and_spin() {
    let params = create_test_params();
    let mut herbivore = animal(Species::Herbivore, Vec2::new(0.0, 0.0), 100.0, &params);
    if let Some(body) = herbivore.as_animal_mut() {
        body.dir = Vec2::new(0.0, 1.0);
        let bias = body.mind.block_mut(nevo::simulation::mind::Block::OutputBias);
        bias[0] = -1.0;
        bias[1] = 0.5;
    }
    herbivore.process(&params);

    let speed = 100.0 * 1.0_f64.tanh();
    assert!(herbivore.vel.x().abs() < 1e-9);
    assert!((herbivore.vel.y() - speed).abs() < 1e-5);
    let spin = herbivore.as_animal().map(|a| a.spin).unwrap_or_default();
    assert!((spin - 10.0 * 0.5_f64.tanh()).abs() < 1e-5);
}

#[test]
fn test_move_integrates_and_turns() {
    let params = create_test_params();
    let mut herbivore = animal(Species::Herbivore, Vec2::new(0.0, 0.0), 100.0, &params);
    herbivore.vel = Vec2::new(10.0, 0.0);
    if let Some(body) = herbivore.as_animal_mut() {
        body.spin = std::f64::consts::FRAC_PI_2;
    }
    herbivore.move_by(1.0);

    assert_eq!(herbivore.pos, Vec2::new(10.0, 0.0));
    let dir = herbivore.heading();
    assert!(dir.x().abs() < 1e-12);
    assert!((dir.y() - 1.0).abs() < 1e-12);
    assert!((geometric_utils::length(dir) - 1.0).abs() < 1e-12);
}

#[test]
fn test_plant_grows_to_ceiling() {
    let mut params = create_test_params();
    params.plant.grow_speed = 50.0;
    let mut rng = StdRng::seed_from_u64(5);
    let mut plant = Organism::plant(Vec2::new(0.0, 0.0), 0.1, &params, &mut rng);
    let ceiling = plant.as_plant().map(|p| p.ceiling).unwrap_or_default();
    assert!((300.0..=700.0).contains(&ceiling));

    plant.process(&params);
    assert!((plant.energy() - 50.1).abs() < 1e-9);

    for _ in 0..20 {
        plant.process(&params);
    }
    assert_eq!(plant.energy(), ceiling);
    assert!(plant.alive);
}

#[test]
fn test_plant_lifespan_shrinks_with_energy() {
    let mut params = create_test_params();
    params.plant.grow_speed = 0.0;
    let mut rng = StdRng::seed_from_u64(5);

    let mut lean = Organism::plant(Vec2::new(0.0, 0.0), 300.0, &params, &mut rng);
    lean.age = 1999;
    lean.process(&params);
    assert!(lean.alive);

    let mut rich = Organism::plant(Vec2::new(0.0, 0.0), 600.0, &params, &mut rng);
    rich.age = 1700;
    rich.process(&params);
    assert!(!rich.alive);

    let mut eaten = Organism::plant(Vec2::new(0.0, 0.0), 0.0, &params, &mut rng);
    eaten.process(&params);
    assert!(!eaten.alive);
}

#[test]
fn test_semelparous_reproduction() {
    let params = create_test_params();
    let pools = GenePools::new(&params.selector);
    let mut rng = StdRng::seed_from_u64(9);
    let mut parent = animal(Species::Herbivore, Vec2::new(10.0, -20.0), 900.0, &params);
    parent.total_age = 1234;
    parent.ancestors = 3;

    let children = parent.produce(&params, &pools, &mut rng);

    assert!(!parent.alive);
    assert_eq!(parent.energy(), 0.0);
    assert_eq!(parent.as_animal().map(|a| a.score), Some(1000.0));
    assert_eq!(children.len(), 2);

    let parent_size = 0.5 * 900.0_f64.sqrt();
    let parent_mind = parent.as_animal().map(|a| a.mind.weights().to_vec());
    for child in &children {
        assert!(child.alive);
        assert_eq!(child.kind(), Kind::Living(Species::Herbivore));
        assert_eq!(child.energy(), 450.0);
        assert_eq!(child.age, 0);
        assert_eq!(child.total_age, 1234);
        assert_eq!(child.ancestors, 4);
        assert!(geometric_utils::distance(child.pos, parent.pos) <= 0.5 * parent_size);
        let child_mind = child.as_animal().map(|a| a.mind.weights().to_vec());
        assert_ne!(child_mind, parent_mind);
    }
}

#[test]
fn test_no_reproduction_below_threshold() {
    let params = create_test_params();
    let pools = GenePools::new(&params.selector);
    let mut rng = StdRng::seed_from_u64(9);
    let mut herbivore = animal(Species::Herbivore, Vec2::new(0.0, 0.0), 800.0, &params);

    assert!(herbivore.produce(&params, &pools, &mut rng).is_empty());
    assert!(herbivore.alive);
}

#[test]
fn test_periodic_spawn() {
    let params = create_test_params();
    let pools = GenePools::new(&params.selector);
    let mut rng = StdRng::seed_from_u64(11);
    let mut spawn = Organism::spawn(Species::Herbivore, Vec2::new(0.0, 500.0), 100.0, 10.0, 0);

    for _ in 0..9 {
        spawn.process(&params);
        assert!(spawn.produce(&params, &pools, &mut rng).is_empty());
    }
    spawn.process(&params);
    let emitted = spawn.produce(&params, &pools, &mut rng);

    assert_eq!(emitted.len(), 1);
    let child = &emitted[0];
    assert_eq!(child.kind(), Kind::Living(Species::Herbivore));
    assert_eq!(child.energy(), 100.0);
    assert!(geometric_utils::distance(child.pos, spawn.pos) <= 100.0);
    let shape = child.as_animal().map(|a| a.mind.shape());
    assert_eq!(shape, Some(params.herbivore.mind_shape()));
}

#[test]
fn test_instant_spawn_fills_to_capacity() {
    let params = create_test_params();
    let pools = GenePools::new(&params.selector);
    let mut rng = StdRng::seed_from_u64(12);
    let mut spawn = Organism::spawn(Species::Plant, Vec2::new(0.0, 0.0), 50.0, 0.0, 3);

    let mut occupant = Organism::plant(Vec2::new(10.0, 0.0), 1.0, &params, &mut rng);
    let mut outsider = Organism::plant(Vec2::new(60.0, 0.0), 1.0, &params, &mut rng);
    spawn.interact(&mut occupant, &params.world);
    spawn.interact(&mut outsider, &params.world);

    spawn.process(&params);
    let emitted = spawn.produce(&params, &pools, &mut rng);
    assert_eq!(emitted.len(), 2);
    for plant in &emitted {
        assert_eq!(plant.kind(), Kind::Living(Species::Plant));
        assert_eq!(plant.energy(), params.plant.init_energy);
    }

    // occupancy is recounted every tick
    spawn.process(&params);
    assert_eq!(spawn.produce(&params, &pools, &mut rng).len(), 3);
}

#[test]
fn test_instant_unbounded_spawn_emits_one_per_tick() {
    let params = create_test_params();
    let pools = GenePools::new(&params.selector);
    let mut rng = StdRng::seed_from_u64(13);
    let mut spawn = Organism::spawn(Species::Plant, Vec2::new(0.0, 0.0), 50.0, 0.0, 0);

    spawn.process(&params);
    assert_eq!(spawn.produce(&params, &pools, &mut rng).len(), 1);
}

#[test]
fn test_spawn_never_moves() {
    let mut spawn = Organism::spawn(Species::Plant, Vec2::new(3.0, 4.0), 50.0, 0.0, 0);
    spawn.vel = Vec2::new(100.0, 100.0);
    spawn.move_by(1.0);
    assert_eq!(spawn.pos, Vec2::new(3.0, 4.0));
}
