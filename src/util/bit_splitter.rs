/// A structure for splitting a raw opcode into the fields
/// the CHIP-8 instruction set is described in terms of.
///
/// ```text
///  F    X    Y    N
/// |----|----|----|----|
///           |---NN----|
///      |-----NNN------|
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSplitter(u8, u8);

impl BitSplitter {
    /// Build from the two bytes of an instruction, high byte first.
    pub fn new(high: u8, low: u8) -> BitSplitter {
        BitSplitter(high, low)
    }

    pub fn from_u16(value: u16) -> BitSplitter {
        BitSplitter((value >> 8) as u8, (value & 0x00FF) as u8)
    }

    /// Left-shift the high byte 8 bits,
    /// then take bitwise or with the low byte.
    pub fn as_u16(&self) -> u16 {
        ((self.0 as u16) << 8) | self.1 as u16
    }

    /// All four nibbles, most significant first.
    pub fn as_four_u8(&self) -> (u8, u8, u8, u8) {
        (self.0 >> 4, self.0 & 0x0F, self.1 >> 4, self.1 & 0x0F)
    }

    /// Bits 8-11, usually a register index.
    pub fn x(&self) -> u8 {
        self.0 & 0x0F
    }

    /// Bits 4-7, usually a register index.
    pub fn y(&self) -> u8 {
        self.1 >> 4
    }

    /// The lowest nibble.
    pub fn n(&self) -> u8 {
        self.1 & 0x0F
    }

    /// The low byte.
    pub fn nn(&self) -> u8 {
        self.1
    }

    /// The low 12 bits, an address.
    pub fn nnn(&self) -> u16 {
        self.as_u16() & 0x0FFF
    }
}
