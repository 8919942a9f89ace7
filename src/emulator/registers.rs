use std::fmt;
use std::ops::{Index, IndexMut};

use crate::emulator::instruction::Reg;
use crate::emulator::memory::PROGRAM_START;

pub const NUM_REGISTERS: usize = 16;
pub const STACK_SIZE: usize = 16;
/// VF doubles as the carry, borrow and collision flag.
pub const FLAG: Reg = Reg(0xF);

/// The register file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    /// V0 through VF.
    pub v: [u8; NUM_REGISTERS],
    /// The address register.
    pub i: u16,
    pub pc: u16,
    /// Index of the next free stack slot.
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl Registers {
    pub fn new() -> Registers {
        Registers {
            v: [0; NUM_REGISTERS],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
        }
    }

    /// Count both timers down by one, stopping at zero.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<Reg> for Registers {
    type Output = u8;

    fn index(&self, Reg(x): Reg) -> &u8 {
        &self.v[x as usize & 0xF]
    }
}

impl IndexMut<Reg> for Registers {
    fn index_mut(&mut self, Reg(x): Reg) -> &mut u8 {
        &mut self.v[x as usize & 0xF]
    }
}

/// Return addresses for subroutine calls.
/// The stack pointer lives in `Registers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack([u16; STACK_SIZE]);

impl Stack {
    pub fn new() -> Stack {
        Stack([0; STACK_SIZE])
    }

    /// Store `addr` in slot `sp`, or give back `None` if the slot doesn't exist.
    pub fn set(&mut self, sp: u8, addr: u16) -> Option<()> {
        let slot = self.0.get_mut(sp as usize)?;
        *slot = addr;
        Some(())
    }

    pub fn get(&self, sp: u8) -> Option<u16> {
        self.0.get(sp as usize).copied()
    }

    pub fn clear(&mut self) {
        self.0 = [0; STACK_SIZE];
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

/// A copy of the interesting parts of the machine, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// The opcode at the program counter.
    pub opcode: u16,
    pub pc: u16,
    pub sp: u8,
    pub i: u16,
    pub v: [u8; NUM_REGISTERS],
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "opcode={:04X} pc={:03X} sp={} i={:03X}",
            self.opcode, self.pc, self.sp, self.i
        )?;
        for (n, value) in self.v.iter().enumerate() {
            write!(f, " v{:X}={:02X}", n, value)?;
        }
        Ok(())
    }
}
