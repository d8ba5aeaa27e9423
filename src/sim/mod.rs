//! Deterministic game-state engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Ticks are delivered from outside, never read from a clock
//! - Stable neighbor search order (up, down, left, right)
//! - No rendering or platform dependencies

pub mod board;
pub mod engine;
pub mod grid;
pub mod problem;
pub mod state;
pub mod tick;

pub use board::{Board, BoardError, Cell};
pub use engine::{BoardEngine, MoveOutcome, Rejection, parse_answer};
pub use grid::{Direction, GridPos};
pub use problem::{NonPositiveAnswer, Operator, Problem, generate_problem};
pub use state::{RunPhase, RunState, RunningWithoutHealth};
pub use tick::{ManualTimer, TickOutcome, TickScheduler, Timer};
