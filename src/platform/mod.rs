//! Platform abstraction layer
//!
//! Native implementations of what the engine consumes from outside:
//! - Time/ticks (`timer`)
//! - Input events (`input`)

pub mod input;
pub mod timer;

pub use input::{HELP, Input, parse_line};
pub use timer::ThreadTimer;
