#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use nevo::simulation::params::{AnimalParams, ConfigError, Params};

fn create_test_params() -> Params {
    let mut params = Params::default();
    params.world.seed = Some(17);
    params.world.dt = 0.05;
    params.herbivore.max_speed = 80.0;
    params.selector.capacity = 8;
    params
}

#[test]
fn test_defaults_are_valid() {
    let params = Params::default();
    assert!(params.validate().is_ok());
    assert_eq!(params.herbivore, AnimalParams::herbivore());
    assert_eq!(params.carnivore, AnimalParams::carnivore());
    assert_eq!(params.carnivore.breed_energy, 1000.0);
    assert_eq!(params.herbivore.mind_shape().inputs, 9);
    assert_eq!(params.herbivore.mind_shape().outputs, 2);
    assert_eq!(params.herbivore.mind_shape().hidden, 16);
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("params.json");
    let params = create_test_params();

    params.save_to_file(&path).expect("save params");
    let loaded = Params::load_from_file(&path).expect("load params");

    assert_eq!(loaded.world.seed, Some(17));
    assert_eq!(loaded.world.dt, 0.05);
    assert_eq!(loaded.herbivore, params.herbivore);
    assert_eq!(loaded.carnivore, params.carnivore);
    assert_eq!(loaded.selector.capacity, 8);
}

#[test]
fn test_partial_file_takes_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("partial.json");
    std::fs::write(&path, r#"{ "world": { "dt": 0.5 }, "plant": { "grow_speed": 3.0 } }"#)
        .expect("write file");

    let loaded = Params::load_from_file(&path).expect("load params");

    assert_eq!(loaded.world.dt, 0.5);
    assert_eq!(loaded.world.half_extent, [1000.0, 1600.0]);
    assert_eq!(loaded.plant.grow_speed, 3.0);
    assert_eq!(loaded.plant.upper_energy, 700.0);
    assert_eq!(loaded.carnivore, AnimalParams::carnivore());
}

#[test]
fn test_incomplete_species_table_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("species.json");
    std::fs::write(&path, r#"{ "carnivore": { "max_speed": 120.0 } }"#).expect("write file");

    assert!(matches!(
        Params::load_from_file(&path),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn test_invalid_values_are_rejected() {
    let mut params = Params::default();
    params.world.dt = -0.1;
    assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));

    let mut params = Params::default();
    params.herbivore.hidden_size = 0;
    assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));

    let mut params = Params::default();
    params.selector.decay = 1.0;
    assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));

    let mut params = Params::default();
    params.plant.lower_energy = 800.0;
    assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));

    let mut params = Params::default();
    params.carnivore.eat_factor = f64::NAN;
    assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_invalid_file_values_are_rejected_on_load() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{ "world": { "half_extent": [0.0, 10.0] } }"#).expect("write file");

    let err = Params::load_from_file(&path).expect_err("zero extent is invalid");
    assert!(err.to_string().contains("half_extent"));
}

#[test]
fn test_malformed_and_missing_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").expect("write file");

    assert!(matches!(
        Params::load_from_file(&path),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        Params::load_from_file(dir.path().join("missing.json")),
        Err(ConfigError::Io(_))
    ));
}
