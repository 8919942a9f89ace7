//! The CHIP-8 virtual machine and the pieces a frontend needs to drive it.

pub mod config;
pub mod display;
pub mod emulator;
pub mod error;
pub mod input;
pub mod instruction;
pub mod keypad;
pub mod memory;
pub mod output;
pub mod registers;
pub mod runner;

pub use self::config::{Config, TimerMode};
pub use self::emulator::Emulator;
pub use self::error::Error;
pub use self::runner::Runner;
