//! Run state: health, score and the running flag
//!
//! Two phases, Running and Stopped. Health reaching zero stops the run and
//! only an explicit reset starts it again.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::STARTING_HEALTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Running,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RunFields")]
pub struct RunState {
    health: u32,
    score: u64,
    running: bool,
    /// Health restored by `reset`
    starting_health: u32,
}

#[derive(Deserialize)]
struct RunFields {
    health: u32,
    score: u64,
    running: bool,
    starting_health: u32,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("a run with zero health cannot be running")]
pub struct RunningWithoutHealth;

impl TryFrom<RunFields> for RunState {
    type Error = RunningWithoutHealth;

    fn try_from(fields: RunFields) -> Result<Self, Self::Error> {
        if fields.running && fields.health == 0 {
            return Err(RunningWithoutHealth);
        }
        Ok(Self {
            health: fields.health,
            score: fields.score,
            running: fields.running,
            starting_health: fields.starting_health,
        })
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new(STARTING_HEALTH)
    }
}

impl RunState {
    pub fn new(starting_health: u32) -> Self {
        Self {
            health: starting_health,
            score: 0,
            running: starting_health > 0,
            starting_health,
        }
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> RunPhase {
        if self.running {
            RunPhase::Running
        } else {
            RunPhase::Stopped
        }
    }

    /// Lower health, flooring at zero. Returns true if this call stopped the run.
    pub fn decrease_health(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            let was_running = self.running;
            self.running = false;
            if was_running {
                log::info!("Health depleted, run stopped with score {}", self.score);
            }
            return was_running;
        }
        false
    }

    pub fn increase_health(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount);
    }

    pub fn increase_score(&mut self, amount: u64) {
        self.score = self.score.saturating_add(amount);
    }

    /// Direct override of the running flag.
    ///
    /// Starting a run with no health left is refused, a stopped run at zero
    /// health needs `reset`.
    pub fn set_running(&mut self, running: bool) {
        if running && self.health == 0 {
            log::warn!("Refusing to resume a run with zero health");
            return;
        }
        self.running = running;
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.starting_health);
    }
}
