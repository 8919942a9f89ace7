use crate::emulator::error::Error;

pub const MEM_SIZE: usize = 4096;
/// Where programs are loaded, and where execution starts.
pub const PROGRAM_START: u16 = 0x200;
/// The largest program that fits between `PROGRAM_START` and the end of memory.
pub const MAX_ROM_SIZE: usize = MEM_SIZE - PROGRAM_START as usize;
/// Each glyph in the built-in font is five rows tall.
pub const FONT_GLYPH_SIZE: u16 = 5;
const ADDR_MASK: u16 = 0x0FFF;

pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// The 4 KB address space.
///
/// Addresses are 12 bits wide. Anything above 0xFFF wraps around,
/// so reads and writes can never land outside the buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: [u8; MEM_SIZE],
}

impl Memory {
    /// Zeroed memory with the font already in place.
    pub fn new() -> Memory {
        let mut memory = Memory { bytes: [0; MEM_SIZE] };
        memory.load_font_set();
        memory
    }

    /// Write the hexadecimal digit glyphs to the start of memory.
    pub fn load_font_set(&mut self) {
        self.bytes[..FONT.len()].copy_from_slice(&FONT);
    }

    /// Copy a program into memory at 0x200.
    /// Nothing is written if the program is too large.
    pub fn load_rom(&mut self, program: &[u8]) -> Result<(), Error> {
        if program.len() > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge {
                size: program.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.bytes[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    /// Zero everything, including the font.
    pub fn clear(&mut self) {
        self.bytes = [0; MEM_SIZE];
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[(addr & ADDR_MASK) as usize]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.bytes[(addr & ADDR_MASK) as usize] = value;
    }

    /// Read the big-endian instruction word at `addr`.
    pub fn read_u16(&self, addr: u16) -> u16 {
        (self.read(addr) as u16) << 8 | self.read(addr.wrapping_add(1)) as u16
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.bytes.iter().filter(|b| **b != 0).count();
        write!(f, "Memory {{ {} of {} bytes non-zero }}", used, MEM_SIZE)
    }
}
