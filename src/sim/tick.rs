//! Fixed-period health decay
//!
//! The scheduler never reads the clock itself. It arms a [`Timer`] while the
//! run is active and applies decay when told a tick fired, so tests drive it
//! by hand with [`ManualTimer`].

use std::time::Duration;

use super::state::RunState;
use crate::tuning::Tuning;

/// Time source that fires periodic ticks
pub trait Timer {
    /// Begin firing every `period`, tagging ticks with `generation`.
    /// Replaces any previous registration.
    fn start(&mut self, period: Duration, generation: u64);
    /// Stop firing. No tick from the current registration fires afterwards.
    fn stop(&mut self);
}

/// Timer for tests and headless use: records registrations, never fires
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualTimer {
    /// Active registration, if any
    pub armed: Option<(Duration, u64)>,
    pub starts: u32,
    pub stops: u32,
}

impl Timer for ManualTimer {
    fn start(&mut self, period: Duration, generation: u64) {
        self.armed = Some((period, generation));
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.armed = None;
        self.stops += 1;
    }
}

/// What a delivered tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale generation or scheduler disarmed
    Ignored,
    Decayed { health: u32 },
    /// Health hit zero, the scheduler has disarmed itself
    RunEnded,
}

#[derive(Debug)]
pub struct TickScheduler<T: Timer> {
    timer: T,
    period: Duration,
    decay: u32,
    generation: u64,
    active: bool,
}

impl<T: Timer> TickScheduler<T> {
    pub fn new(timer: T, tuning: &Tuning) -> Self {
        Self {
            timer,
            period: tuning.tick_period(),
            decay: tuning.tick_health_decay,
            generation: 0,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Generation of the current (or most recent) registration
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Arm the timer. No-op while already armed.
    pub fn start(&mut self) {
        if self.active {
            return;
        }
        self.generation += 1;
        self.timer.start(self.period, self.generation);
        self.active = true;
        log::debug!("Tick scheduler armed (generation {})", self.generation);
    }

    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.timer.stop();
        self.active = false;
        log::debug!("Tick scheduler disarmed (generation {})", self.generation);
    }

    /// Arm while the run is active, disarm once it has stopped
    pub fn sync(&mut self, run: &RunState) {
        if run.is_running() {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Apply one tick from registration `generation`
    pub fn tick(&mut self, run: &mut RunState, generation: u64) -> TickOutcome {
        if !self.active || generation != self.generation || !run.is_running() {
            log::trace!("Ignoring tick from generation {generation}");
            return TickOutcome::Ignored;
        }

        if run.decrease_health(self.decay) {
            self.stop();
            return TickOutcome::RunEnded;
        }
        TickOutcome::Decayed {
            health: run.health(),
        }
    }
}
