//! Simulation thread and its control surface.
//!
//! The world lives behind one mutex. The simulation thread holds it for a
//! whole tick, so observers always see a world between ticks; observers take
//! it only long enough to copy a [`WorldSnapshot`] out.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{info, warn};

use super::snapshot::WorldSnapshot;
use super::world::World;

/// Sleep between checks of the control flags while paused.
const PAUSED_SLEEP: Duration = Duration::from_millis(40);

/// Notification sent to the observer after a tick, at most once per publish interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Publish {
    /// Completed ticks.
    pub steps_elapsed: u64,
    /// Wall-clock duration of the last tick, in milliseconds.
    pub step_duration_ms: f64,
}

#[derive(Debug)]
struct Control {
    paused: AtomicBool,
    done: AtomicBool,
    delay_us: AtomicU64,
}

/// Handle owning the simulation thread.
///
/// Dropping the handle stops the thread and waits for it.
pub struct SimulationHandle {
    thread: Option<JoinHandle<()>>,
    world: Arc<Mutex<World>>,
    control: Arc<Control>,
}

impl SimulationHandle {
    /// Moves `world` onto a new simulation thread and starts ticking.
    ///
    /// `on_publish` runs on the simulation thread without the world lock
    /// held. It should only hand the notification off (post a message,
    /// bump a counter), never draw.
    pub fn spawn<F>(world: World, on_publish: F) -> Self
    where
        F: FnMut(Publish) + Send + 'static,
    {
        let control = Arc::new(Control {
            paused: AtomicBool::new(false),
            done: AtomicBool::new(false),
            delay_us: AtomicU64::new(world.params().world.tick_delay_us),
        });
        let publish_interval = Duration::from_millis(world.params().world.publish_interval_ms);
        let world = Arc::new(Mutex::new(world));

        let thread = {
            let world = Arc::clone(&world);
            let control = Arc::clone(&control);
            thread::spawn(move || run(&world, &control, publish_interval, on_publish))
        };
        info!("simulation thread started");

        Self {
            thread: Some(thread),
            world,
            control,
        }
    }

    /// Stops ticking after the current tick.
    pub fn pause(&self) {
        self.control.paused.store(true, Ordering::Release);
    }

    /// Resumes ticking.
    pub fn resume(&self) {
        self.control.paused.store(false, Ordering::Release);
    }

    /// Whether the simulation is paused.
    pub fn is_paused(&self) -> bool {
        self.control.paused.load(Ordering::Acquire)
    }

    /// Sets the sleep between ticks. Takes effect after the current tick.
    pub fn set_tick_delay(&self, delay: Duration) {
        let micros = u64::try_from(delay.as_micros()).unwrap_or(u64::MAX);
        self.control.delay_us.store(micros, Ordering::Relaxed);
    }

    /// Current sleep between ticks.
    pub fn tick_delay(&self) -> Duration {
        Duration::from_micros(self.control.delay_us.load(Ordering::Relaxed))
    }

    /// Copies a consistent view of the world out under the lock.
    pub fn snapshot(&self) -> WorldSnapshot {
        lock(&self.world).snapshot()
    }

    /// Runs `f` on the world between two ticks.
    pub fn with_world<R>(&self, f: impl FnOnce(&mut World) -> R) -> R {
        f(&mut lock(&self.world))
    }

    /// Whether the simulation thread is still running.
    pub fn is_running(&self) -> bool {
        self.thread
            .as_ref()
            .is_some_and(|thread| !thread.is_finished())
    }

    /// Signals termination and waits for the thread to exit. Idempotent.
    pub fn shutdown(&mut self) {
        self.control.done.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("simulation thread panicked");
            }
            info!("simulation thread stopped");
        }
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn lock(world: &Mutex<World>) -> MutexGuard<'_, World> {
    world.lock().unwrap_or_else(PoisonError::into_inner)
}

fn run<F>(world: &Mutex<World>, control: &Control, publish_interval: Duration, mut on_publish: F)
where
    F: FnMut(Publish),
{
    let mut last_publish = Instant::now();

    while !control.done.load(Ordering::Acquire) {
        if control.paused.load(Ordering::Acquire) {
            thread::sleep(PAUSED_SLEEP);
            continue;
        }

        let stats = {
            let mut world = lock(world);
            world.step();
            world.statistics()
        };

        if last_publish.elapsed() >= publish_interval {
            last_publish = Instant::now();
            on_publish(Publish {
                steps_elapsed: stats.steps_elapsed,
                step_duration_ms: stats.step_duration_ms,
            });
        }

        let delay = control.delay_us.load(Ordering::Relaxed);
        if delay > 0 {
            thread::sleep(Duration::from_micros(delay));
        }
    }
}
