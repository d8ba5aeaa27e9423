//! Tilestep - A 3x3 arithmetic tile-hopping puzzle
//!
//! Core modules:
//! - `sim`: Deterministic game-state engine (board, problems, run state, ticks)
//! - `session`: Serialized command loop that owns the engine and publishes events
//! - `settings`: Player preferences (sound/haptics toggles)
//! - `feedback`: Sound/haptic trigger interface for the presentation layer
//! - `platform`: Native time source and terminal input
//! - `tuning`: Data-driven game balance

pub mod feedback;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::{Command, GameEvent, GameSession};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Grid side length (the board is `GRID_SIZE` x `GRID_SIZE`)
    pub const GRID_SIZE: u8 = 3;
    /// Total number of cells on the board
    pub const CELL_COUNT: usize = (GRID_SIZE as usize) * (GRID_SIZE as usize);

    /// Health at the start of every run
    pub const STARTING_HEALTH: u32 = 100;
    /// Time between health-decay ticks
    pub const TICK_PERIOD_MS: u64 = 1000;
    /// Health lost per tick
    pub const TICK_HEALTH_DECAY: u32 = 1;

    /// Health gained per accepted move
    pub const MOVE_HEALTH_REWARD: u32 = 1;
    /// Score gained per accepted move
    pub const MOVE_SCORE_REWARD: u64 = 1;

    /// Problem operands are drawn from `OPERAND_MIN..=OPERAND_MAX`
    pub const OPERAND_MIN: u32 = 1;
    pub const OPERAND_MAX: u32 = 9;
    /// Random draws before falling back to a synthesized `n + 0` problem
    pub const MAX_GENERATION_ATTEMPTS: u32 = 100;

    /// Buzz length for a rejected answer
    pub const REJECT_BUZZ_MS: u32 = 20;
}
