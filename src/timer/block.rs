//! Runtime owner of one timer block.
//!
//! A [`TimerBlock`] wraps a [`TimerEngine`] together with the two background
//! tasks that drive it:
//!
//! - the tick task, re-evaluating the countdown every [`TICK_INTERVAL`];
//!   it exists only while the countdown runs
//! - the configuration watcher, applying duration changes as soon as the
//!   store reports them
//!
//! Both tasks hold only a weak reference to the block. Dropping the block
//! (or calling [`TimerBlock::close`]) aborts them, so no callback can touch
//! the engine after teardown.

use std::sync::{Arc, Weak};

use tokio::sync::{watch, Mutex};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::debug;

use crate::types::{Configuration, DisplaySnapshot};

use super::engine::TimerEngine;
use super::machine::ModeSwitch;
use super::schedule::ScheduledTask;

/// How often a running countdown is re-evaluated.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

struct Shared {
    engine: TimerEngine,
    ticker: Option<(u64, ScheduledTask)>,
    generation: u64,
}

impl Shared {
    fn arm_ticker(&mut self, this: Weak<Mutex<Shared>>) {
        self.generation += 1;
        let generation = self.generation;
        let task = ScheduledTask::spawn(run_ticker(this, generation));
        self.ticker = Some((generation, task));
        debug!(generation, "Tick task armed");
    }

    fn disarm_ticker(&mut self) {
        if let Some((generation, task)) = self.ticker.take() {
            task.cancel();
            debug!(generation, "Tick task cancelled");
        }
    }

    /// Disarms only if `generation` is still the armed ticker.
    fn disarm_if_current(&mut self, generation: u64) {
        if matches!(self.ticker, Some((armed, _)) if armed == generation) {
            self.disarm_ticker();
        }
    }
}

/// A timer engine plus the scheduling that drives it.
pub struct TimerBlock {
    shared: Arc<Mutex<Shared>>,
    _watcher: ScheduledTask,
}

impl TimerBlock {
    /// Wraps `engine` and starts watching its configuration store.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn new(engine: TimerEngine) -> Self {
        let config_rx = engine.store().subscribe();
        let shared = Arc::new(Mutex::new(Shared {
            engine,
            ticker: None,
            generation: 0,
        }));
        let watcher = ScheduledTask::spawn(watch_config(Arc::downgrade(&shared), config_rx));
        Self {
            shared,
            _watcher: watcher,
        }
    }

    /// Starts the countdown and its tick task.
    ///
    /// Returns false if it was already running.
    pub async fn start(&self) -> bool {
        let mut shared = self.shared.lock().await;
        if !shared.engine.start() {
            return false;
        }
        shared.arm_ticker(Arc::downgrade(&self.shared));
        true
    }

    /// Stops the countdown and cancels its tick task.
    ///
    /// Returns false if it was not running.
    pub async fn stop(&self) -> bool {
        let mut shared = self.shared.lock().await;
        shared.disarm_ticker();
        shared.engine.stop()
    }

    /// Starts a paused countdown or stops a running one.
    ///
    /// Returns true if the countdown is running afterwards.
    pub async fn toggle(&self) -> bool {
        let mut shared = self.shared.lock().await;
        if shared.engine.is_running() {
            shared.disarm_ticker();
            shared.engine.stop();
            false
        } else {
            shared.engine.start();
            shared.arm_ticker(Arc::downgrade(&self.shared));
            true
        }
    }

    /// Skips to the next mode, cancelling the tick task.
    pub async fn skip(&self) -> ModeSwitch {
        let mut shared = self.shared.lock().await;
        shared.disarm_ticker();
        shared.engine.skip()
    }

    /// Returns the current display snapshot.
    pub async fn snapshot(&self) -> DisplaySnapshot {
        self.shared.lock().await.engine.snapshot()
    }

    /// Returns true while a tick task is armed.
    pub async fn is_ticking(&self) -> bool {
        self.shared.lock().await.ticker.is_some()
    }

    /// Tears the block down, cancelling every background task.
    pub fn close(self) {
        drop(self);
    }
}

impl std::fmt::Debug for TimerBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerBlock").finish_non_exhaustive()
    }
}

async fn run_ticker(weak: Weak<Mutex<Shared>>, generation: u64) {
    let mut ticker = interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let Some(shared) = weak.upgrade() else {
            break;
        };
        let mut guard = shared.lock().await;
        guard.engine.tick();
        if !guard.engine.is_running() {
            guard.disarm_if_current(generation);
            break;
        }
    }
}

async fn watch_config(weak: Weak<Mutex<Shared>>, mut config_rx: watch::Receiver<Configuration>) {
    while config_rx.changed().await.is_ok() {
        let Some(shared) = weak.upgrade() else {
            break;
        };
        let mut guard = shared.lock().await;
        if guard.engine.sync_config() {
            guard.disarm_ticker();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
