//! Data-driven game balance
//!
//! Every reward and decay amount lives here instead of as a literal in the
//! simulation, so a tuning file can change them without touching code.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Error, Debug)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("starting health must be positive")]
    ZeroStartingHealth,
    #[error("tick period must be positive")]
    ZeroTickPeriod,
    #[error("operand range {min}..={max} is empty or not positive")]
    InvalidOperandRange { min: u32, max: u32 },
    #[error("operand maximum {0} is too large")]
    OperandTooLarge(u32),
}

/// Largest operand accepted from a tuning file, keeps `lhs + rhs` far from overflow
pub const OPERAND_LIMIT: u32 = 9999;

/// Balance parameters for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub starting_health: u32,
    pub tick_period_ms: u64,
    pub tick_health_decay: u32,
    pub move_health_reward: u32,
    pub move_score_reward: u64,
    pub operand_min: u32,
    pub operand_max: u32,
    pub max_generation_attempts: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_health: STARTING_HEALTH,
            tick_period_ms: TICK_PERIOD_MS,
            tick_health_decay: TICK_HEALTH_DECAY,
            move_health_reward: MOVE_HEALTH_REWARD,
            move_score_reward: MOVE_SCORE_REWARD,
            operand_min: OPERAND_MIN,
            operand_max: OPERAND_MAX,
            max_generation_attempts: MAX_GENERATION_ATTEMPTS,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check ranges the simulation relies on
    pub fn validate(self) -> Result<Self, TuningError> {
        if self.starting_health == 0 {
            return Err(TuningError::ZeroStartingHealth);
        }
        if self.tick_period_ms == 0 {
            return Err(TuningError::ZeroTickPeriod);
        }
        if self.operand_min == 0 || self.operand_min > self.operand_max {
            return Err(TuningError::InvalidOperandRange {
                min: self.operand_min,
                max: self.operand_max,
            });
        }
        if self.operand_max > OPERAND_LIMIT {
            return Err(TuningError::OperandTooLarge(self.operand_max));
        }
        Ok(self)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let tuning = Tuning::default();
        assert_eq!(tuning.starting_health, 100);
        assert_eq!(tuning.tick_period(), Duration::from_secs(1));
        assert_eq!(tuning.move_score_reward, 1);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "move_health_reward": 5 }"#).unwrap();
        assert_eq!(tuning.move_health_reward, 5);
        assert_eq!(tuning.tick_health_decay, TICK_HEALTH_DECAY);
        assert_eq!(tuning.operand_max, OPERAND_MAX);
    }

    #[test]
    fn test_rejects_bad_ranges() {
        assert!(matches!(
            Tuning::from_json(r#"{ "starting_health": 0 }"#),
            Err(TuningError::ZeroStartingHealth)
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "tick_period_ms": 0 }"#),
            Err(TuningError::ZeroTickPeriod)
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "operand_min": 5, "operand_max": 2 }"#),
            Err(TuningError::InvalidOperandRange { min: 5, max: 2 })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "operand_min": 0 }"#),
            Err(TuningError::InvalidOperandRange { .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "operand_max": 100000 }"#),
            Err(TuningError::OperandTooLarge(100000))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Tuning::load("/nonexistent/tilestep-tuning.json"),
            Err(TuningError::Io(_))
        ));
    }
}
