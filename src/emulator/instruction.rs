use crate::emulator::error::Error;
use crate::util::bit_splitter::BitSplitter;

/// A wrapper for addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr(pub u16);

/// A wrapper for register indices, 0x0 through 0xF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(pub u8);

/// A wrapper for constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Const(pub u8);

/// A single instruction from the CHIP-8 instruction set.
/// Two bytes written in hexadecimal, with the following special characters:
/// - NNN: address
/// - NN: 8-bit constant
/// - N: 4-bit constant
/// - X and Y: 4-bit register identifier
/// - PC: Program counter
/// - I: 16 bit register for memory address
/// - VN: One of the 16 available variables (register identifiers)
///
/// Instructions that touch VF say so; VF is overwritten as a carry,
/// borrow, shifted-out bit or collision flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Sys(Addr), // 0NNN, ignored
    ClearScreen, // 00E0
    Return, // 00EE
    Goto(Addr), // 1NNN
    Call(Addr), // 2NNN
    IfRegEqConst(Reg, Const), // 3XNN
    IfRegNeqConst(Reg, Const), // 4XNN
    IfRegEqReg(Reg, Reg), // 5XY0
    SetRegToConst(Reg, Const), // 6XNN
    IncRegByConst(Reg, Const), // 7XNN, VF untouched
    SetRegToReg(Reg, Reg), // 8XY0
    BitwiseOr(Reg, Reg), // 8XY1
    BitwiseAnd(Reg, Reg), // 8XY2
    BitwiseXor(Reg, Reg), // 8XY3
    IncRegByReg(Reg, Reg), // 8XY4, VF = carry
    DecRegByReg(Reg, Reg), // 8XY5, VF = no borrow
    BitshiftRight(Reg), // 8XY6, VF = bit shifted out
    SetVxVyMinusVx(Reg, Reg), // 8XY7, VF = no borrow
    BitshiftLeft(Reg), // 8XYE, VF = bit shifted out
    IfRegNeqReg(Reg, Reg), // 9XY0
    SetI(Addr), // ANNN
    SetPcToV0PlusAddr(Addr), // BNNN
    SetVxRand(Reg, Const), // CXNN
    Draw(Reg, Reg, Const), // DXYN, VF = collision
    IfKeyPressed(Reg), // EX9E
    IfKeyNotPressed(Reg), // EXA1
    SetRegToDelayTimer(Reg), // FX07
    WaitForKey(Reg), // FX0A
    SetDelayTimerToReg(Reg), // FX15
    SetSoundTimerToReg(Reg), // FX18
    AddRegToI(Reg), // FX1E
    SetIToSpriteAddrVx(Reg), // FX29
    SetIToBcdOfReg(Reg), // FX33
    RegDump(Reg), // FX55
    RegLoad(Reg), // FX65
}

impl Instruction {
    /// Decode a raw opcode.
    ///
    /// Bit patterns outside the instruction set are reported as
    /// `Error::UnknownOpcode` with `pc` set to zero; callers that know
    /// where the opcode came from should use `decode_at`.
    pub fn decode(opcode: u16) -> Result<Instruction, Error> {
        Instruction::decode_at(opcode, 0)
    }

    /// Decode a raw opcode fetched from `pc`.
    pub fn decode_at(opcode: u16, pc: u16) -> Result<Instruction, Error> {
        let bits = BitSplitter::from_u16(opcode);
        let (x, y) = (Reg(bits.x()), Reg(bits.y()));
        let nn = Const(bits.nn());
        let nnn = Addr(bits.nnn());

        let instruction = match bits.as_four_u8() {
            (0, 0, 0xE, 0) => Instruction::ClearScreen,
            (0, 0, 0xE, 0xE) => Instruction::Return,
            (0, _, _, _) => Instruction::Sys(nnn),
            (1, _, _, _) => Instruction::Goto(nnn),
            (2, _, _, _) => Instruction::Call(nnn),
            (3, _, _, _) => Instruction::IfRegEqConst(x, nn),
            (4, _, _, _) => Instruction::IfRegNeqConst(x, nn),
            (5, _, _, 0) => Instruction::IfRegEqReg(x, y),
            (6, _, _, _) => Instruction::SetRegToConst(x, nn),
            (7, _, _, _) => Instruction::IncRegByConst(x, nn),
            (8, _, _, 0) => Instruction::SetRegToReg(x, y),
            (8, _, _, 1) => Instruction::BitwiseOr(x, y),
            (8, _, _, 2) => Instruction::BitwiseAnd(x, y),
            (8, _, _, 3) => Instruction::BitwiseXor(x, y),
            (8, _, _, 4) => Instruction::IncRegByReg(x, y),
            (8, _, _, 5) => Instruction::DecRegByReg(x, y),
            (8, _, _, 6) => Instruction::BitshiftRight(x),
            (8, _, _, 7) => Instruction::SetVxVyMinusVx(x, y),
            (8, _, _, 0xE) => Instruction::BitshiftLeft(x),
            (9, _, _, 0) => Instruction::IfRegNeqReg(x, y),
            (0xA, _, _, _) => Instruction::SetI(nnn),
            (0xB, _, _, _) => Instruction::SetPcToV0PlusAddr(nnn),
            (0xC, _, _, _) => Instruction::SetVxRand(x, nn),
            (0xD, _, _, n) => Instruction::Draw(x, y, Const(n)),
            (0xE, _, 9, 0xE) => Instruction::IfKeyPressed(x),
            (0xE, _, 0xA, 1) => Instruction::IfKeyNotPressed(x),
            (0xF, _, 0, 7) => Instruction::SetRegToDelayTimer(x),
            (0xF, _, 0, 0xA) => Instruction::WaitForKey(x),
            (0xF, _, 1, 5) => Instruction::SetDelayTimerToReg(x),
            (0xF, _, 1, 8) => Instruction::SetSoundTimerToReg(x),
            (0xF, _, 1, 0xE) => Instruction::AddRegToI(x),
            (0xF, _, 2, 9) => Instruction::SetIToSpriteAddrVx(x),
            (0xF, _, 3, 3) => Instruction::SetIToBcdOfReg(x),
            (0xF, _, 5, 5) => Instruction::RegDump(x),
            (0xF, _, 6, 5) => Instruction::RegLoad(x),
            _ => return Err(Error::UnknownOpcode { opcode, pc }),
        };

        Ok(instruction)
    }
}
