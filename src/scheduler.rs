use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::logger::Logger;

/// Default pause between drain ticks.
pub const DEFAULT_DRAIN_INTERVAL: Duration = Duration::from_millis(100);

/// Periodic consumer driving [`Logger::drain_once`] for a set of loggers.
///
/// The scheduler holds loggers weakly: registering a logger does not keep it
/// alive, and entries whose last strong owner is gone are pruned after each
/// tick. One scheduler instance is created at process start, handed to the
/// code that creates loggers, and explicitly stopped (or dropped) at
/// shutdown. There is no hidden global.
///
/// State machine: `Idle → Running` on [`start`], `Running → Idle` on
/// [`stop`]; calling `start` while running is a no-op.
///
/// Stopping is cooperative, checked once per tick. Records still queued on
/// threads that exited and deregistered between the last tick and `stop`
/// are lost. The window is bounded and documented, not a crash condition.
///
/// [`start`]: DrainScheduler::start
/// [`stop`]: DrainScheduler::stop
pub struct DrainScheduler {
    shared: Arc<SchedulerShared>,
    interval: Duration,
    worker: Mutex<Option<JoinHandle<()>>>,
}

struct SchedulerShared {
    loggers: Mutex<Vec<Weak<Logger>>>,
    running: AtomicBool,
}

impl SchedulerShared {
    fn tick(&self) {
        let mut loggers = self.loggers.lock();
        for entry in loggers.iter() {
            if let Some(logger) = entry.upgrade() {
                if let Err(err) = logger.drain_once() {
                    // The failed lines were already reported; keep the loop
                    // alive for the other loggers.
                    eprintln!("flashlog: drain tick failed: {}", err);
                }
            }
        }
        loggers.retain(|entry| entry.strong_count() > 0);
    }

    fn run(&self, interval: Duration) {
        while self.running.load(Ordering::Acquire) {
            self.tick();
            thread::sleep(interval);
        }
    }
}

impl Default for DrainScheduler {
    /// A scheduler with the default 100 ms interval.
    fn default() -> Self {
        Self::new(DEFAULT_DRAIN_INTERVAL)
    }
}

impl DrainScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            shared: Arc::new(SchedulerShared {
                loggers: Mutex::new(Vec::new()),
                running: AtomicBool::new(false),
            }),
            interval,
            worker: Mutex::new(None),
        }
    }

    /// Adds `logger` to the drain set, held weakly.
    pub fn register(&self, logger: &Arc<Logger>) {
        self.shared.loggers.lock().push(Arc::downgrade(logger));
    }

    /// Begins draining. No-op if already running.
    ///
    /// With `synchronous = false` the loop runs on a dedicated background
    /// thread. With `synchronous = true` it runs on the calling thread
    /// until another thread calls [`stop`]; used for deterministic
    /// testing and shutdown flushing.
    ///
    /// [`stop`]: DrainScheduler::stop
    pub fn start(&self, synchronous: bool) {
        if self.shared.running.swap(true, Ordering::AcqRel) {
            return;
        }

        if synchronous {
            self.shared.run(self.interval);
        } else {
            let shared = Arc::clone(&self.shared);
            let interval = self.interval;
            let handle = thread::Builder::new()
                .name("flashlog-drain".to_string())
                .spawn(move || shared.run(interval))
                .expect("failed to spawn drain thread");
            *self.worker.lock() = Some(handle);
        }
    }

    /// Signals the loop to exit and joins the background worker.
    ///
    /// When the scheduler was started asynchronously, no drain is in flight
    /// once `stop` returns and no further sink writes will occur. A
    /// synchronous loop has no worker to join; `stop` only raises the flag
    /// and the loop exits at its next tick boundary, on its own thread.
    pub fn stop(&self) {
        self.shared.running.store(false, Ordering::Release);
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }
}

impl Drop for DrainScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
