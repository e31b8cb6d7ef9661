#![allow(missing_docs)]

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use nevo::simulation::geometric_utils::Vec2;
use nevo::simulation::organism::Species;
use nevo::simulation::params::Params;
use nevo::simulation::sim_thread::SimulationHandle;
use nevo::simulation::world::World;

fn create_test_params() -> Params {
    let mut params = Params::default();
    params.world.seed = Some(3);
    params.world.tick_delay_us = 0;
    params.world.publish_interval_ms = 0;
    params
}

fn create_test_world() -> World {
    let mut world = World::new(create_test_params());
    world.add_spawn(Species::Herbivore, Vec2::new(0.0, 0.0), 100.0, 5.0, 0);
    world.add_spawn(Species::Plant, Vec2::new(0.0, 0.0), 300.0, 0.0, 50);
    world
}

fn steps(handle: &SimulationHandle) -> u64 {
    handle.snapshot().stats.steps_elapsed
}

fn wait_for(condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn test_thread_ticks_and_publishes() {
    let (tx, rx) = mpsc::channel();
    let mut handle = SimulationHandle::spawn(create_test_world(), move |publish| {
        let _ = tx.send(publish);
    });

    let first = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("a notification arrives");
    assert!(first.steps_elapsed >= 1);
    assert!(first.step_duration_ms >= 0.0);

    handle.shutdown();
    assert!(!handle.is_running());
    assert!(steps(&handle) >= first.steps_elapsed);
}

#[test]
fn test_pause_and_resume() {
    let mut handle = SimulationHandle::spawn(create_test_world(), |_| {});
    assert!(wait_for(|| steps(&handle) > 0));

    handle.pause();
    assert!(handle.is_paused());
    // let an in-flight tick finish
    thread::sleep(Duration::from_millis(100));
    let paused_at = steps(&handle);
    thread::sleep(Duration::from_millis(150));
    assert_eq!(steps(&handle), paused_at);

    handle.resume();
    assert!(!handle.is_paused());
    assert!(wait_for(|| steps(&handle) > paused_at));

    handle.shutdown();
}

#[test]
fn test_tick_delay_control() {
    let mut params = create_test_params();
    params.world.tick_delay_us = 40_000;
    let handle = SimulationHandle::spawn(World::new(params), |_| {});
    assert_eq!(handle.tick_delay(), Duration::from_micros(40_000));

    handle.set_tick_delay(Duration::from_millis(2));
    assert_eq!(handle.tick_delay(), Duration::from_millis(2));
}

#[test]
fn test_with_world_runs_between_ticks() {
    let handle = SimulationHandle::spawn(create_test_world(), |_| {});
    let id = handle.with_world(|world| {
        world.add_spawn(Species::Carnivore, Vec2::new(0.0, -500.0), 100.0, 5.0, 0)
    });

    let snapshot = handle.snapshot();
    assert!(snapshot.entities.iter().any(|e| e.id == id));
    handle.with_world(|world| assert_eq!(world.population(), world.census()));
}

#[test]
fn test_shutdown_is_idempotent() {
    let mut handle = SimulationHandle::spawn(create_test_world(), |_| {});
    handle.shutdown();
    let after = steps(&handle);
    handle.shutdown();
    thread::sleep(Duration::from_millis(50));
    assert_eq!(steps(&handle), after);
    drop(handle);
}
