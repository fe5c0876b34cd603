//! Wall-clock driver: three timer threads over a shared [`Simulation`].
//!
//! # Architecture
//!
//! ```text
//! rover-wiggle (500 ms)   rover-explore (30 ms)   rover-reverse (30 ms)     Observer
//!       |                        |                        |                    |
//!       | lock                   | lock (unless paused)   | lock               |
//!       | wiggle_tick()          | explore_tick()         | reverse_tick()     |
//!       | drain_events()         | drain_events()         | drain_events()     |
//!       | unlock                 | unlock                 | unlock             |
//!       |--try_send------------->|------------------------|---> events() ---->|
//!       | park(budget - elapsed) | park(...)              | park(...)          |
//! ```
//!
//! Each thread holds the lock for exactly one tick transition, so the
//! three tick kinds interleave but never overlap. Events travel over a
//! bounded channel; when the observer falls behind they are dropped and
//! counted rather than blocking the tick threads.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::{info, trace, warn};

use crate::config::ConfigError;
use crate::error::SimError;
use crate::event::SimEvent;
use crate::simulation::Simulation;

// ── ShutdownReport ───────────────────────────────────────────────

/// Ticks executed by each timer thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickCounts {
    /// Wiggle ticks.
    pub wiggle: u64,
    /// Explore ticks. Paused iterations are not counted.
    pub explore: u64,
    /// Reverse ticks.
    pub reverse: u64,
}

/// Report from [`RealtimeSimulation::shutdown`].
#[derive(Debug)]
pub struct ShutdownReport {
    /// Total time spent stopping and joining the threads.
    pub total_ms: u64,
    /// Number of timer threads joined successfully.
    pub threads_joined: usize,
    /// Ticks each thread executed before stopping.
    pub ticks: TickCounts,
    /// Events dropped because the channel was full or disconnected.
    pub events_dropped: u64,
}

// ── TickKind ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TickKind {
    Wiggle,
    Explore,
    Reverse,
}

impl TickKind {
    fn thread_name(self) -> &'static str {
        match self {
            TickKind::Wiggle => "rover-wiggle",
            TickKind::Explore => "rover-explore",
            TickKind::Reverse => "rover-reverse",
        }
    }

    fn run(self, sim: &mut Simulation) {
        match self {
            TickKind::Wiggle => {
                sim.wiggle_tick();
            }
            TickKind::Explore => sim.explore_tick(),
            TickKind::Reverse => {
                sim.reverse_tick();
            }
        }
    }
}

/// Everything a timer thread shares with the handle.
#[derive(Clone)]
struct Shared {
    sim: Arc<Mutex<Simulation>>,
    shutdown: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    dropped: Arc<AtomicU64>,
    events: Sender<SimEvent>,
}

struct TimerThread {
    kind: TickKind,
    period: Duration,
    shared: Shared,
}

impl TimerThread {
    /// Tick until shutdown. Returns the number of ticks executed.
    fn run(self) -> u64 {
        let mut ticks = 0;
        loop {
            if self.shared.shutdown.load(Ordering::Acquire) {
                break;
            }
            let start = Instant::now();

            let gated = self.kind == TickKind::Explore && self.shared.paused.load(Ordering::Acquire);
            if !gated {
                let events = match self.shared.sim.lock() {
                    Ok(mut sim) => {
                        self.kind.run(&mut sim);
                        sim.drain_events()
                    }
                    // Another tick thread panicked mid-transition.
                    Err(_) => {
                        warn!("{}: simulation lock poisoned, stopping", self.kind.thread_name());
                        break;
                    }
                };
                ticks += 1;
                self.publish(events);
            }

            // Park for the remaining budget; shutdown unparks us early.
            let deadline = start + self.period;
            loop {
                if self.shared.shutdown.load(Ordering::Acquire) {
                    break;
                }
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                thread::park_timeout(deadline - now);
            }
        }
        trace!("{} stopped after {ticks} ticks", self.kind.thread_name());
        ticks
    }

    fn publish(&self, events: Vec<SimEvent>) {
        for event in events {
            match self.shared.events.try_send(event) {
                Ok(()) => {}
                Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => {
                    if self.shared.dropped.fetch_add(1, Ordering::Relaxed) == 0 {
                        warn!("event channel full; dropping events");
                    }
                }
            }
        }
    }
}

// ── RealtimeSimulation ───────────────────────────────────────────

/// A [`Simulation`] advanced by wall-clock timer threads.
///
/// Created from a ready simulation via [`new()`](Self::new). The timer
/// periods and the event channel capacity come from the simulation's
/// [`TimingConfig`](crate::TimingConfig). Dropping the handle stops and
/// joins every thread.
pub struct RealtimeSimulation {
    sim: Arc<Mutex<Simulation>>,
    shutdown_flag: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    dropped: Arc<AtomicU64>,
    events: Receiver<SimEvent>,
    threads: Vec<(TickKind, JoinHandle<u64>)>,
    stopped: bool,
}

impl RealtimeSimulation {
    /// Move `sim` behind a mutex and start the wiggle, explore and
    /// reverse threads.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ThreadSpawnFailed`] if a thread cannot be spawned.
    /// Threads already started are stopped and joined first.
    pub fn new(sim: Simulation) -> Result<Self, ConfigError> {
        let timing = sim.config().timing.clone();
        let (tx, rx) = crossbeam_channel::bounded(timing.event_capacity);

        let mut world = Self {
            sim: Arc::new(Mutex::new(sim)),
            shutdown_flag: Arc::new(AtomicBool::new(false)),
            paused: Arc::new(AtomicBool::new(false)),
            dropped: Arc::new(AtomicU64::new(0)),
            events: rx,
            threads: Vec::with_capacity(3),
            stopped: false,
        };
        let shared = Shared {
            sim: Arc::clone(&world.sim),
            shutdown: Arc::clone(&world.shutdown_flag),
            paused: Arc::clone(&world.paused),
            dropped: Arc::clone(&world.dropped),
            events: tx,
        };

        for (kind, period) in [
            (TickKind::Wiggle, timing.wiggle_period),
            (TickKind::Explore, timing.explore_period),
            (TickKind::Reverse, timing.reverse_period),
        ] {
            let timer = TimerThread {
                kind,
                period,
                shared: shared.clone(),
            };
            let spawned = thread::Builder::new()
                .name(kind.thread_name().into())
                .spawn(move || timer.run());
            match spawned {
                Ok(handle) => world.threads.push((kind, handle)),
                Err(e) => {
                    world.shutdown();
                    return Err(ConfigError::ThreadSpawnFailed {
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "realtime simulation started (wiggle {:?}, explore {:?}, reverse {:?})",
            timing.wiggle_period, timing.explore_period, timing.reverse_period
        );
        Ok(world)
    }

    /// Stop forward exploration. Wiggle and reverse ticks keep running,
    /// so a robot mid-reversal finishes its episode.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Restart forward exploration.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
    }

    /// Whether forward exploration is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Receiver for tick events.
    pub fn events(&self) -> &Receiver<SimEvent> {
        &self.events
    }

    /// Events dropped so far because the channel was full.
    pub fn events_dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Run `f` with exclusive access to the simulation, between ticks.
    ///
    /// # Errors
    ///
    /// [`SimError::Poisoned`] if a tick thread panicked while holding the
    /// lock.
    pub fn with<T>(&self, f: impl FnOnce(&mut Simulation) -> T) -> Result<T, SimError> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Simulation>, SimError> {
        self.sim.lock().map_err(|_| SimError::Poisoned)
    }

    /// Stop and join every timer thread.
    ///
    /// Idempotent: later calls return an empty report.
    pub fn shutdown(&mut self) -> ShutdownReport {
        if self.stopped {
            return ShutdownReport {
                total_ms: 0,
                threads_joined: 0,
                ticks: TickCounts::default(),
                events_dropped: self.events_dropped(),
            };
        }
        self.stopped = true;
        let start = Instant::now();

        self.shutdown_flag.store(true, Ordering::Release);
        for (_, handle) in &self.threads {
            handle.thread().unpark();
        }

        let mut ticks = TickCounts::default();
        let mut threads_joined = 0;
        for (kind, handle) in self.threads.drain(..) {
            match handle.join() {
                Ok(n) => {
                    threads_joined += 1;
                    match kind {
                        TickKind::Wiggle => ticks.wiggle = n,
                        TickKind::Explore => ticks.explore = n,
                        TickKind::Reverse => ticks.reverse = n,
                    }
                }
                Err(_) => warn!("{} panicked", kind.thread_name()),
            }
        }

        let report = ShutdownReport {
            total_ms: start.elapsed().as_millis() as u64,
            threads_joined,
            ticks,
            events_dropped: self.events_dropped(),
        };
        info!(
            "realtime simulation stopped in {} ms ({} threads, {:?})",
            report.total_ms, report.threads_joined, report.ticks
        );
        report
    }
}

impl Drop for RealtimeSimulation {
    fn drop(&mut self) {
        if !self.stopped {
            self.shutdown();
        }
    }
}
