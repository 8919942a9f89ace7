//! The CHIP-8 virtual machine as described at
//! https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::emulator::display::Display;
use crate::emulator::error::Error;
use crate::emulator::instruction::*;
use crate::emulator::keypad::Keypad;
use crate::emulator::memory::{Memory, FONT_GLYPH_SIZE};
use crate::emulator::registers::{Registers, Snapshot, Stack, FLAG};

/// What an instruction does with the program counter once it is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Go on to the following instruction.
    Next,
    /// Skip over the following instruction.
    Skip,
    /// Run the same instruction again on the next cycle.
    Stay,
    Jump(u16),
}

impl Flow {
    fn skip_if(condition: bool) -> Flow {
        if condition {
            Flow::Skip
        } else {
            Flow::Next
        }
    }
}

pub struct Emulator {
    memory: Memory,
    registers: Registers,
    stack: Stack,
    display: Display,
    keypad: Keypad,

    // Set whenever the display changes, cleared by the frontend
    need_draw: bool,
    // Set while FX0A has not seen a key yet
    waiting_for_key: bool,

    rng: StdRng,
}

impl Emulator {
    /// Create a new emulator, with the font loaded and PC at 0x200.
    pub fn new() -> Emulator {
        Emulator::with_rng(StdRng::from_entropy())
    }

    /// Create a new emulator whose `CXNN` results are reproducible.
    pub fn with_seed(seed: u64) -> Emulator {
        Emulator::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Emulator {
        Emulator {
            memory: Memory::new(),
            registers: Registers::new(),
            stack: Stack::new(),
            display: Display::new(),
            keypad: Keypad::new(),
            need_draw: false,
            waiting_for_key: false,
            rng,
        }
    }

    /// Put the machine back in its power-on state, without the program.
    pub fn reset(&mut self) {
        log::info!("Resetting");
        self.registers = Registers::new();
        self.memory.clear();
        self.memory.load_font_set();
        self.stack.clear();
        self.keypad.clear();
        self.display.clear();
        self.need_draw = false;
        self.waiting_for_key = false;
    }

    /// Copy a program into memory at 0x200.
    /// Memory is left alone if the program doesn't fit.
    pub fn load(&mut self, program: &[u8]) -> Result<(), Error> {
        self.memory.load_rom(program)?;
        log::info!("Loaded {} byte program", program.len());
        Ok(())
    }

    /// Read a ROM file and copy it into memory at 0x200.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let program = std::fs::read(path).map_err(|source| Error::RomLoad {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Read {:?}", path);
        self.load(&program)
    }

    /// Perform a single step, which will update timers,
    /// then load an instruction and execute it.
    ///
    /// If the instruction fails, nothing changes, timers included.
    pub fn step(&mut self) -> Result<(), Error> {
        let instruction = self.fetch()?;
        let timers = (self.registers.delay_timer, self.registers.sound_timer);
        self.registers.tick_timers();
        if let Err(err) = self.execute(instruction) {
            self.registers.delay_timer = timers.0;
            self.registers.sound_timer = timers.1;
            return Err(err);
        }
        Ok(())
    }

    /// Load an instruction and execute it, leaving the timers alone.
    /// Use together with `tick_timers` to run the timers at their own rate.
    pub fn cycle(&mut self) -> Result<(), Error> {
        let instruction = self.fetch()?;
        self.execute(instruction)
    }

    /// Count the delay and sound timers down by one.
    pub fn tick_timers(&mut self) {
        self.registers.tick_timers();
    }

    /// The opcode at the program counter.
    pub fn opcode(&self) -> u16 {
        self.memory.read_u16(self.registers.pc)
    }

    fn fetch(&self) -> Result<Instruction, Error> {
        let instruction = Instruction::decode_at(self.opcode(), self.registers.pc)?;
        log::trace!("{:03X}: {:?}", self.registers.pc, instruction);
        Ok(instruction)
    }

    /// Execute a single instruction as if it was found at the program counter.
    /// On error the machine is left as it was.
    pub fn execute(&mut self, instruction: Instruction) -> Result<(), Error> {
        let flow = self.apply(instruction)?;
        let pc = self.registers.pc;
        self.registers.pc = match flow {
            Flow::Next => pc.wrapping_add(2),
            Flow::Skip => pc.wrapping_add(4),
            Flow::Stay => pc,
            Flow::Jump(addr) => addr,
        };
        Ok(())
    }

    /// Execute many instructions in sequence, stopping at the first error.
    pub fn execute_many(&mut self, instructions: &[Instruction]) -> Result<(), Error> {
        for instruction in instructions {
            self.execute(*instruction)?;
        }
        Ok(())
    }

    fn apply(&mut self, instruction: Instruction) -> Result<Flow, Error> {
        let r = &mut self.registers;

        let flow = match instruction {
            // Machine code routines don't exist here
            Instruction::Sys(Addr(addr)) => {
                log::warn!("Ignoring call to machine code routine at {:03X}", addr);
                Flow::Next
            }

            Instruction::ClearScreen => {
                self.display.clear();
                self.need_draw = true;
                Flow::Next
            }

            // Pop the call site, and continue after it
            Instruction::Return => {
                let sp = r.sp.checked_sub(1).ok_or(Error::StackUnderflow { pc: r.pc })?;
                let call_site = self.stack.get(sp).ok_or(Error::StackUnderflow { pc: r.pc })?;
                r.sp = sp;
                Flow::Jump(call_site.wrapping_add(2))
            }

            Instruction::Goto(Addr(addr)) => Flow::Jump(addr),

            // Push the call site itself, `Return` steps past it
            Instruction::Call(Addr(addr)) => {
                self.stack
                    .set(r.sp, r.pc)
                    .ok_or(Error::StackOverflow { pc: r.pc })?;
                r.sp += 1;
                Flow::Jump(addr)
            }

            Instruction::IfRegEqConst(x, Const(n)) => Flow::skip_if(r[x] == n),

            Instruction::IfRegNeqConst(x, Const(n)) => Flow::skip_if(r[x] != n),

            Instruction::IfRegEqReg(x, y) => Flow::skip_if(r[x] == r[y]),

            Instruction::SetRegToConst(x, Const(n)) => {
                r[x] = n;
                Flow::Next
            }

            Instruction::IncRegByConst(x, Const(n)) => {
                r[x] = r[x].wrapping_add(n);
                Flow::Next
            }

            Instruction::SetRegToReg(x, y) => {
                r[x] = r[y];
                Flow::Next
            }

            Instruction::BitwiseOr(x, y) => {
                r[x] |= r[y];
                Flow::Next
            }

            Instruction::BitwiseAnd(x, y) => {
                r[x] &= r[y];
                Flow::Next
            }

            Instruction::BitwiseXor(x, y) => {
                r[x] ^= r[y];
                Flow::Next
            }

            // VF is 1 on carry. Written last, so VF as an operand loses its value.
            Instruction::IncRegByReg(x, y) => {
                let (sum, carry) = r[x].overflowing_add(r[y]);
                r[x] = sum;
                r[FLAG] = carry as u8;
                Flow::Next
            }

            // VF is 0 on borrow, 1 otherwise
            Instruction::DecRegByReg(x, y) => {
                let (difference, borrow) = r[x].overflowing_sub(r[y]);
                r[x] = difference;
                r[FLAG] = !borrow as u8;
                Flow::Next
            }

            Instruction::BitshiftRight(x) => {
                let shifted_out = r[x] & 1;
                r[x] >>= 1;
                r[FLAG] = shifted_out;
                Flow::Next
            }

            Instruction::SetVxVyMinusVx(x, y) => {
                let (difference, borrow) = r[y].overflowing_sub(r[x]);
                r[x] = difference;
                r[FLAG] = !borrow as u8;
                Flow::Next
            }

            Instruction::BitshiftLeft(x) => {
                let shifted_out = r[x] >> 7;
                r[x] <<= 1;
                r[FLAG] = shifted_out;
                Flow::Next
            }

            Instruction::IfRegNeqReg(x, y) => Flow::skip_if(r[x] != r[y]),

            Instruction::SetI(Addr(addr)) => {
                r.i = addr;
                Flow::Next
            }

            Instruction::SetPcToV0PlusAddr(Addr(addr)) => {
                Flow::Jump(addr.wrapping_add(r.v[0] as u16))
            }

            Instruction::SetVxRand(x, Const(n)) => {
                r[x] = self.rng.gen::<u8>() & n;
                Flow::Next
            }

            Instruction::Draw(x, y, Const(height)) => {
                let mut sprite = [0u8; 15];
                for (row, byte) in sprite.iter_mut().enumerate().take(height as usize) {
                    *byte = self.memory.read(r.i.wrapping_add(row as u16));
                }
                let collision = self.display.draw_sprite(
                    r[x] as usize,
                    r[y] as usize,
                    &sprite[..height as usize],
                );
                r[FLAG] = collision as u8;
                self.need_draw = true;
                Flow::Next
            }

            Instruction::IfKeyPressed(x) => Flow::skip_if(self.keypad.is_pressed(r[x])),

            Instruction::IfKeyNotPressed(x) => Flow::skip_if(!self.keypad.is_pressed(r[x])),

            Instruction::SetRegToDelayTimer(x) => {
                r[x] = r.delay_timer;
                Flow::Next
            }

            // Not truly blocking: stay on this instruction until a key shows up
            Instruction::WaitForKey(x) => match self.keypad.first_pressed() {
                Some(key) => {
                    r[x] = key;
                    self.waiting_for_key = false;
                    Flow::Next
                }
                None => {
                    self.waiting_for_key = true;
                    Flow::Stay
                }
            },

            Instruction::SetDelayTimerToReg(x) => {
                r.delay_timer = r[x];
                Flow::Next
            }

            Instruction::SetSoundTimerToReg(x) => {
                r.sound_timer = r[x];
                Flow::Next
            }

            Instruction::AddRegToI(x) => {
                r.i = r.i.wrapping_add(r[x] as u16);
                Flow::Next
            }

            // Set i to character address. Each font element is 5 bytes wide.
            Instruction::SetIToSpriteAddrVx(x) => {
                r.i = FONT_GLYPH_SIZE * r[x] as u16;
                Flow::Next
            }

            Instruction::SetIToBcdOfReg(x) => {
                let value = r[x];
                self.memory.write(r.i, value / 100);
                self.memory.write(r.i.wrapping_add(1), value / 10 % 10);
                self.memory.write(r.i.wrapping_add(2), value % 10);
                Flow::Next
            }

            // Dump register values up to Vx
            Instruction::RegDump(Reg(x)) => {
                for reg_no in 0..=(x & 0xF) {
                    self.memory.write(r.i.wrapping_add(reg_no as u16), r.v[reg_no as usize]);
                }
                Flow::Next
            }

            // Load register values up to Vx
            Instruction::RegLoad(Reg(x)) => {
                for reg_no in 0..=(x & 0xF) {
                    r.v[reg_no as usize] = self.memory.read(r.i.wrapping_add(reg_no as u16));
                }
                Flow::Next
            }
        };

        Ok(flow)
    }

    /// Opcode, PC, SP, I and the V registers, for diagnostics.
    pub fn debug(&self) -> Snapshot {
        Snapshot {
            opcode: self.opcode(),
            pc: self.registers.pc,
            sp: self.registers.sp,
            i: self.registers.i,
            v: self.registers.v,
        }
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    /// Whether the display changed since the frontend last called `mark_drawn`.
    pub fn need_draw(&self) -> bool {
        self.need_draw
    }

    /// Tell the emulator the current display has been presented.
    pub fn mark_drawn(&mut self) {
        self.need_draw = false;
    }

    /// True while an `FX0A` is waiting for a key press.
    pub fn waiting_for_key(&self) -> bool {
        self.waiting_for_key
    }

    pub fn delay_timer(&self) -> u8 {
        self.registers.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.registers.sound_timer
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// The frontend's handle for reporting key presses.
    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Direct register access, mostly useful for tests and debuggers.
    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    const V0: Reg = Reg(0);

    fn with_program(program: &[u8]) -> Emulator {
        let mut emulator = Emulator::with_seed(8);
        emulator.load(program).unwrap();
        emulator
    }

    /// Run a single instruction with V0..Vn preset.
    fn run_with(v: &[u8], instruction: Instruction) -> Emulator {
        let mut emulator = Emulator::with_seed(8);
        emulator.registers.v[..v.len()].copy_from_slice(v);
        emulator.execute(instruction).unwrap();
        emulator
    }

    #[test]
    fn goto_goes_to() {
        let mut emulator = Emulator::new();
        emulator.execute(Instruction::Goto(Addr(0x250))).unwrap();
        assert_eq!(emulator.registers.pc, 0x250);
    }

    #[test]
    fn set_then_jump_to_self() {
        let mut emulator = with_program(&[0x6A, 0x18, 0x12, 0x00]);
        emulator.step().unwrap();
        assert_eq!(0x18, emulator.registers.v[0xA]);
        assert_eq!(0x202, emulator.registers.pc);
        emulator.step().unwrap();
        assert_eq!(0x200, emulator.registers.pc);
    }

    #[test]
    fn return_after_call_continues_after_call_site() {
        // Create emulator
        let mut emulator = Emulator::new();
        assert_eq!(emulator.registers.pc, 0x200);

        // Write program with call and return
        let program = [
            0x22, 0x06, // 0x00, call 0x206
            0x00, 0x00, // 0x02
            0x00, 0x00, // 0x04
            0x00, 0xEE, // 0x06, return
        ];
        emulator.load(&program).unwrap();

        // Run the program
        emulator.step().unwrap(); // Call 0x206
        assert_eq!(emulator.registers.pc, 0x206);
        assert_eq!(emulator.registers.sp, 1);
        assert_eq!(emulator.stack.get(0), Some(0x200));
        emulator.step().unwrap(); // Return to 202
        assert_eq!(emulator.registers.pc, 0x202);
        assert_eq!(emulator.registers.sp, 0);
    }

    #[test]
    fn seventeenth_nested_call_overflows() {
        let mut emulator = Emulator::new();
        for _ in 0..16 {
            emulator.execute(Instruction::Call(Addr(0x300))).unwrap();
        }
        let before = emulator.registers.clone();
        match emulator.execute(Instruction::Call(Addr(0x300))) {
            Err(Error::StackOverflow { pc }) => assert_eq!(0x300, pc),
            other => panic!("expected StackOverflow, got {:?}", other),
        }
        assert_eq!(before, emulator.registers);
    }

    #[test]
    fn overflowing_step_keeps_timers() {
        // Call 0x200 forever
        let mut emulator = with_program(&[0x22, 0x00]);
        for _ in 0..16 {
            emulator.step().unwrap();
        }
        emulator.registers_mut().delay_timer = 5;
        emulator.registers_mut().sound_timer = 5;
        let before = emulator.registers().clone();
        match emulator.step() {
            Err(Error::StackOverflow { pc }) => assert_eq!(0x200, pc),
            other => panic!("expected StackOverflow, got {:?}", other),
        }
        assert_eq!(&before, emulator.registers());
    }

    #[test]
    fn return_with_empty_stack_underflows() {
        let mut emulator = with_program(&[0x00, 0xEE]);
        emulator.registers_mut().delay_timer = 5;
        emulator.registers_mut().sound_timer = 5;
        match emulator.step() {
            Err(Error::StackUnderflow { pc }) => assert_eq!(0x200, pc),
            other => panic!("expected StackUnderflow, got {:?}", other),
        }
        assert_eq!(0x200, emulator.registers.pc);
        assert_eq!(0, emulator.registers.sp);
        assert_eq!((5, 5), (emulator.delay_timer(), emulator.sound_timer()));
    }

    #[test]
    fn unknown_opcode_changes_nothing() {
        let mut emulator = with_program(&[0x5A, 0xB1]);
        emulator.registers.delay_timer = 5;
        match emulator.step() {
            Err(Error::UnknownOpcode { opcode, pc }) => {
                assert_eq!(0x5AB1, opcode);
                assert_eq!(0x200, pc);
            }
            other => panic!("expected UnknownOpcode, got {:?}", other),
        }
        assert_eq!(0x200, emulator.registers.pc);
        assert_eq!(5, emulator.registers.delay_timer);
    }

    #[test]
    fn sys_is_ignored() {
        let mut emulator = with_program(&[0x01, 0x23]);
        emulator.step().unwrap();
        assert_eq!(0x202, emulator.registers.pc);
    }

    #[test]
    fn clear_screen_clears_screen() {
        let mut emulator = Emulator::new();
        emulator.display.draw_sprite(0, 0, &[0xFF, 0xFF]);
        emulator.display.draw_sprite(40, 20, &[0x81]);
        emulator.execute(Instruction::ClearScreen).unwrap();
        assert_eq!(&Display::new(), emulator.display());
        assert!(emulator.need_draw());
        assert_eq!(0x202, emulator.registers.pc);
    }

    #[test_case(Instruction::IfRegEqConst(Reg(0xA), Const(0x18)), 0x204 ; "eq const taken")]
    #[test_case(Instruction::IfRegEqConst(Reg(0xA), Const(0x19)), 0x202 ; "eq const not taken")]
    #[test_case(Instruction::IfRegNeqConst(Reg(0xA), Const(0x19)), 0x204 ; "neq const taken")]
    #[test_case(Instruction::IfRegNeqConst(Reg(0xA), Const(0x18)), 0x202 ; "neq const not taken")]
    #[test_case(Instruction::IfRegEqReg(Reg(0xA), Reg(0xB)), 0x204 ; "eq reg taken")]
    #[test_case(Instruction::IfRegEqReg(Reg(0xA), Reg(0xC)), 0x202 ; "eq reg not taken")]
    #[test_case(Instruction::IfRegNeqReg(Reg(0xA), Reg(0xC)), 0x204 ; "neq reg taken")]
    #[test_case(Instruction::IfRegNeqReg(Reg(0xA), Reg(0xB)), 0x202 ; "neq reg not taken")]
    fn skips(instruction: Instruction, pc: u16) {
        let mut emulator = Emulator::new();
        emulator.registers.v[0xA] = 0x18;
        emulator.registers.v[0xB] = 0x18;
        emulator.registers.v[0xC] = 0x19;
        emulator.execute(instruction).unwrap();
        pretty_assertions::assert_eq!(pc, emulator.registers.pc);
    }

    #[test]
    fn add_const_wraps_without_touching_flag() {
        let mut emulator = Emulator::new();
        emulator.registers.v[0xF] = 7;
        emulator.registers.v[0xA] = 0xFF;
        emulator.execute(Instruction::IncRegByConst(Reg(0xA), Const(2))).unwrap();
        assert_eq!(1, emulator.registers.v[0xA]);
        assert_eq!(7, emulator.registers.v[0xF]);
    }

    #[test_case(Instruction::SetRegToReg(Reg(0), Reg(1)), 0b0101 ; "copy register")]
    #[test_case(Instruction::BitwiseOr(Reg(0), Reg(1)), 0b1111 ; "bitwise or")]
    #[test_case(Instruction::BitwiseAnd(Reg(0), Reg(1)), 0b0000 ; "bitwise and")]
    #[test_case(Instruction::BitwiseXor(Reg(0), Reg(1)), 0b1111 ; "bitwise xor")]
    fn logic(instruction: Instruction, expected: u8) {
        let emulator = run_with(&[0b1010, 0b0101], instruction);
        pretty_assertions::assert_eq!(expected, emulator.registers.v[0]);
    }

    #[test_case(0b1000_0001, Instruction::BitshiftRight(V0), 0b0100_0000, 1 ; "right with carry")]
    #[test_case(0b1000_0000, Instruction::BitshiftRight(V0), 0b0100_0000, 0 ; "right no carry")]
    #[test_case(0b1000_0001, Instruction::BitshiftLeft(V0), 0b0000_0010, 1 ; "left with carry")]
    #[test_case(0b0100_0001, Instruction::BitshiftLeft(V0), 0b1000_0010, 0 ; "left no carry")]
    fn shifts(value: u8, instruction: Instruction, expected: u8, flag: u8) {
        let emulator = run_with(&[value], instruction);
        pretty_assertions::assert_eq!(expected, emulator.registers.v[0]);
        pretty_assertions::assert_eq!(flag, emulator.registers.v[0xF]);
    }

    #[test]
    fn reverse_subtract() {
        let emulator = run_with(&[3, 10], Instruction::SetVxVyMinusVx(Reg(0), Reg(1)));
        assert_eq!((7, 1), (emulator.registers.v[0], emulator.registers.v[0xF]));
        let emulator = run_with(&[10, 3], Instruction::SetVxVyMinusVx(Reg(0), Reg(1)));
        assert_eq!((249, 0), (emulator.registers.v[0], emulator.registers.v[0xF]));
        let emulator = run_with(&[3, 3], Instruction::SetVxVyMinusVx(Reg(0), Reg(1)));
        assert_eq!((0, 1), (emulator.registers.v[0], emulator.registers.v[0xF]));
    }

    proptest! {
        #[test]
        fn add_sets_carry_on_overflow(a in any::<u8>(), b in any::<u8>()) {
            let emulator = run_with(&[a, b], Instruction::IncRegByReg(Reg(0), Reg(1)));
            prop_assert_eq!(a.wrapping_add(b), emulator.registers.v[0]);
            prop_assert_eq!((a as u16 + b as u16 > 255) as u8, emulator.registers.v[0xF]);
        }

        #[test]
        fn sub_clears_flag_on_borrow(a in any::<u8>(), b in any::<u8>()) {
            let emulator = run_with(&[a, b], Instruction::DecRegByReg(Reg(0), Reg(1)));
            prop_assert_eq!(a.wrapping_sub(b), emulator.registers.v[0]);
            prop_assert_eq!((b <= a) as u8, emulator.registers.v[0xF]);
        }

        #[test]
        fn dump_then_load_round_trips(
            v in prop::array::uniform16(any::<u8>()),
            i in 0u16..0x1000,
            x in 0u8..16,
        ) {
            let mut emulator = Emulator::new();
            emulator.registers.v = v;
            emulator.registers.i = i;
            emulator.execute(Instruction::RegDump(Reg(x))).unwrap();
            emulator.registers.v = [0; 16];
            emulator.execute(Instruction::RegLoad(Reg(x))).unwrap();
            prop_assert_eq!(&v[..=x as usize], &emulator.registers.v[..=x as usize]);
            prop_assert_eq!(i, emulator.registers.i);
        }
    }

    #[test]
    fn jump_with_offset() {
        let emulator = run_with(&[0x10], Instruction::SetPcToV0PlusAddr(Addr(0x300)));
        assert_eq!(0x310, emulator.registers.pc);
    }

    #[test]
    fn random_is_masked() {
        let emulator = run_with(&[0xFF], Instruction::SetVxRand(Reg(0), Const(0)));
        assert_eq!(0, emulator.registers.v[0]);
        let mut emulator = Emulator::with_seed(1);
        for _ in 0..32 {
            emulator.execute(Instruction::SetVxRand(Reg(3), Const(0x0F))).unwrap();
            assert!(emulator.registers.v[3] <= 0x0F);
        }
    }

    #[test]
    fn draw_wraps_and_reports_collision() {
        let mut emulator = Emulator::new();
        emulator.registers.v[0] = 60;
        emulator.registers.v[1] = 0;
        emulator.registers.i = 0x300;
        emulator.memory.write(0x300, 0xFF);
        emulator.execute(Instruction::Draw(Reg(0), Reg(1), Const(1))).unwrap();
        for x in [60, 61, 62, 63, 0, 1, 2, 3].iter() {
            assert_eq!(1, emulator.display().get(*x, 0));
        }
        assert_eq!(0, emulator.display().get(4, 0));
        assert_eq!(0, emulator.registers.v[0xF]);
        assert!(emulator.need_draw());

        emulator.mark_drawn();
        emulator.registers.pc = 0x200;
        emulator.execute(Instruction::Draw(Reg(0), Reg(1), Const(1))).unwrap();
        assert_eq!(1, emulator.registers.v[0xF]);
        assert_eq!(&Display::new(), emulator.display());
        assert!(emulator.need_draw());
    }

    #[test]
    fn draw_font_glyph() {
        let mut emulator = Emulator::new();
        emulator.registers.v[0] = 0xA;
        emulator.execute_many(&[
            Instruction::SetIToSpriteAddrVx(Reg(0)),
            Instruction::SetRegToConst(Reg(0), Const(0)),
            Instruction::Draw(Reg(0), Reg(0), Const(5)),
        ]).unwrap();
        assert_eq!(50, emulator.registers.i);
        // The first row of "A" is 0xF0
        let row: Vec<u8> = (0..8).map(|x| emulator.display().get(x, 0)).collect();
        assert_eq!(vec![1, 1, 1, 1, 0, 0, 0, 0], row);
    }

    #[test]
    fn key_skips() {
        let mut emulator = Emulator::new();
        emulator.registers.v[2] = 0x7;
        emulator.keypad_mut().press(0x7);
        emulator.execute(Instruction::IfKeyPressed(Reg(2))).unwrap();
        assert_eq!(0x204, emulator.registers.pc);
        emulator.execute(Instruction::IfKeyNotPressed(Reg(2))).unwrap();
        assert_eq!(0x206, emulator.registers.pc);
        emulator.keypad_mut().release(0x7);
        emulator.execute(Instruction::IfKeyNotPressed(Reg(2))).unwrap();
        assert_eq!(0x20A, emulator.registers.pc);
    }

    #[test]
    fn wait_for_key_retries_until_pressed() {
        let mut emulator = with_program(&[0xF3, 0x0A]);
        for _ in 0..3 {
            emulator.step().unwrap();
            assert_eq!(0x200, emulator.registers.pc);
            assert!(emulator.waiting_for_key());
        }
        emulator.keypad_mut().press(0xD);
        emulator.step().unwrap();
        assert_eq!(0xD, emulator.registers.v[3]);
        assert_eq!(0x202, emulator.registers.pc);
        assert!(!emulator.waiting_for_key());
    }

    #[test]
    fn timers_tick_before_the_instruction() {
        let mut emulator = with_program(&[0xF0, 0x07]);
        emulator.registers.delay_timer = 18;
        emulator.registers.sound_timer = 10;
        emulator.step().unwrap();
        assert_eq!(17, emulator.registers.v[0]);
        assert_eq!(9, emulator.sound_timer());
    }

    #[test]
    fn cycle_leaves_timers_alone() {
        let mut emulator = with_program(&[0x60, 0x01]);
        emulator.registers.delay_timer = 18;
        emulator.cycle().unwrap();
        assert_eq!(18, emulator.delay_timer());
        emulator.tick_timers();
        assert_eq!(17, emulator.delay_timer());
    }

    #[test]
    fn timer_registers() {
        let mut emulator = Emulator::new();
        emulator.registers.v[4] = 42;
        emulator.execute_many(&[
            Instruction::SetDelayTimerToReg(Reg(4)),
            Instruction::SetSoundTimerToReg(Reg(4)),
        ]).unwrap();
        assert_eq!((42, 42), (emulator.delay_timer(), emulator.sound_timer()));
    }

    #[test]
    fn add_to_i() {
        let mut emulator = Emulator::new();
        emulator.registers.i = 0x100;
        emulator.registers.v[1] = 0x20;
        emulator.registers.v[0xF] = 9;
        emulator.execute(Instruction::AddRegToI(Reg(1))).unwrap();
        assert_eq!(0x120, emulator.registers.i);
        assert_eq!(9, emulator.registers.v[0xF]);
    }

    #[test_case(128, [1, 2, 8] ; "three digits")]
    #[test_case(255, [2, 5, 5] ; "max")]
    #[test_case(7, [0, 0, 7] ; "one digit")]
    fn bcd(value: u8, digits: [u8; 3]) {
        let mut emulator = Emulator::new();
        emulator.registers.v[5] = value;
        emulator.registers.i = 0x000A;
        emulator.execute(Instruction::SetIToBcdOfReg(Reg(5))).unwrap();
        let written = [
            emulator.memory.read(0x0A),
            emulator.memory.read(0x0B),
            emulator.memory.read(0x0C),
        ];
        pretty_assertions::assert_eq!(digits, written);
        pretty_assertions::assert_eq!(0x000A, emulator.registers.i);
    }

    #[test]
    fn reset_restores_power_on_state() {
        let mut emulator = with_program(&[0x00, 0xE0, 0x22, 0x00]);
        emulator.step().unwrap();
        emulator.step().unwrap();
        emulator.registers.v[0xA] = 0x10;
        emulator.memory.write(0, 0x12);
        emulator.display.draw_sprite(18, 10, &[0x80]);
        emulator.keypad_mut().press(1);
        emulator.waiting_for_key = true;
        emulator.reset();

        let fresh = Emulator::new();
        assert_eq!(fresh.registers, emulator.registers);
        assert_eq!(fresh.memory, emulator.memory);
        assert_eq!(fresh.stack, emulator.stack);
        assert_eq!(fresh.display, emulator.display);
        assert_eq!(fresh.keypad, emulator.keypad);
        assert!(!emulator.need_draw());
        assert!(!emulator.waiting_for_key());
    }

    #[test]
    fn load_missing_file_fails() {
        let mut emulator = Emulator::new();
        match emulator.load_file("/definitely/not/a/rom.ch8") {
            Err(Error::RomLoad { path, .. }) => {
                assert_eq!(Path::new("/definitely/not/a/rom.ch8"), path.as_path())
            }
            other => panic!("expected RomLoad, got {:?}", other),
        }
        assert_eq!(&Memory::new(), emulator.memory());
    }

    #[test]
    fn load_file_reads_rom() {
        let path = std::env::temp_dir().join(format!("chip8_vm_test_{}.ch8", std::process::id()));
        std::fs::write(&path, &[0x6Au8, 0x18]).unwrap();
        let mut emulator = Emulator::new();
        emulator.load_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(0x6A18, emulator.opcode());
    }

    #[test]
    fn debug_snapshot() {
        let mut emulator = with_program(&[0x6A, 0x18, 0xA1, 0x23]);
        emulator.step().unwrap();
        let snapshot = emulator.debug();
        assert_eq!(0xA123, snapshot.opcode);
        assert_eq!(0x202, snapshot.pc);
        assert_eq!(0, snapshot.sp);
        assert_eq!(0x18, snapshot.v[0xA]);
    }
}
