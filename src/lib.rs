/*!

A CHIP-8 virtual machine as specified at https://en.wikipedia.org/wiki/CHIP-8.

Only the canonical instruction set is supported, no Super-CHIP or XO-CHIP extensions.

# Crossterm Frontend

If you want to try the emulator on some programs, there is a ready-to-use implementation
you can run by using `cargo run --release --bin crossterm_frontend -- <program>`.
The keypad is mapped onto the left side of the keyboard:

```text
1 2 3 C        1 2 3 4
4 5 6 D   <=   Q W E R
7 8 9 E        A S D F
A 0 B F        Z X C V
```

Escape quits, P pauses, N steps a single instruction while paused and I restarts the program.

# Library

The main way of running a program is to load it as bytes and step through it.
Every step counts the timers down, then executes exactly one instruction.

```rust
use chip8_vm::emulator::Emulator;

let mut emulator = Emulator::new();

// Load a program at address 0x200.
let program = [
    0x6A, 0x18, // Set VA to 0x18
    0x12, 0x00, // Jump back to 0x200
];
emulator.load(&program)?;

emulator.step()?;
assert_eq!(emulator.registers().v[0xA], 0x18);
assert_eq!(emulator.registers().pc, 0x202);

emulator.step()?;
assert_eq!(emulator.registers().pc, 0x200);
# Ok::<(), chip8_vm::emulator::Error>(())
```

Alternatively, you can experiment by executing instructions manually.

```rust
use chip8_vm::emulator::Emulator;
use chip8_vm::emulator::instruction::{Instruction, Reg, Const, Addr};

let mut emulator = Emulator::new();

// Execute instructions manually
emulator.execute(Instruction::ClearScreen)?;

// Or many sequentially
emulator.execute_many(&[
    Instruction::Goto(Addr(0x250)),
    Instruction::SetRegToConst(Reg(0xA), Const(35)),
    Instruction::SetRegToReg(Reg(0xB), Reg(0xA))
])?;
assert_eq!(emulator.registers().v[0xB], 35);
# Ok::<(), chip8_vm::emulator::Error>(())
```

Nothing is ever recovered inside the emulator. Unknown opcodes, stack overflows and
unreadable ROMs come back as an `Error`, and the caller decides whether to halt, reset or carry on.

## Custom input and output

A `Runner` owns an emulator and drives it at a fixed frame rate, running the
instruction clock and the 60 Hz timers independently of each other.
To use it with your own frontend, implement `EmulatorInput` and `EmulatorOutput`,
which represent somewhere to get the keypad state from and a screen with a beeper
respectively. Take a look at `src/emulator/input.rs` and `src/emulator/output.rs` to see
how to implement this, then do the following.

```ignore
use chip8_vm::emulator::{Config, Emulator, Runner};

let mut runner = Runner::new(Emulator::new(), MyInput::new(), MyOutput::new(), Config::default());
runner.load_file("PONG")?;
loop {
    runner.run_frame()?;
    std::thread::sleep(std::time::Duration::from_millis(1_000 / 60));
}
```
*/

pub mod emulator;
pub mod util;
