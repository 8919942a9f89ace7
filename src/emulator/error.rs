use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong when loading or running a program.
///
/// None of these are handled inside the emulator,
/// it is up to the caller to halt, reset or carry on.
#[derive(Debug, Error)]
pub enum Error {
    /// The ROM file could not be read.
    #[error("could not read ROM {path:?}: {source}")]
    RomLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The ROM does not fit between 0x200 and the end of memory.
    #[error("ROM is {size} bytes, but at most {max} bytes fit in memory")]
    RomTooLarge { size: usize, max: usize },

    #[error("unknown opcode {opcode:#06X} at {pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    /// A call was made with all 16 stack slots in use.
    #[error("stack overflow when calling from {pc:#05X}")]
    StackOverflow { pc: u16 },

    /// A return was made with an empty stack.
    #[error("stack underflow when returning from {pc:#05X}")]
    StackUnderflow { pc: u16 },
}
