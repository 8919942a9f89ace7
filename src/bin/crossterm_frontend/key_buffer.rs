use chip8_vm::emulator::keypad::NUM_KEYS;
use std::{
    collections::VecDeque,
    sync::Mutex,
    time::{Duration, Instant},
};

/// Things the user can ask the frontend to do, besides pressing keypad keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    TogglePause,
    Step,
    Reset,
}

/// A thread-safe record of recent keypresses.
///
/// Terminals only report presses, never releases, so a key counts as
/// held down for `timeout` after its last press.
/// Wrap it in an `std::sync::Arc` and you are good to go.
pub struct KeyBuffer {
    timeout: Duration,
    last_pressed: Mutex<[Option<Instant>; NUM_KEYS]>,
    commands: Mutex<VecDeque<Command>>,
}

impl KeyBuffer {
    /// Create a new `KeyBuffer`, forgetting keypresses that are older than `timeout`.
    pub fn new(timeout: Duration) -> KeyBuffer {
        KeyBuffer {
            timeout,
            last_pressed: Mutex::new([None; NUM_KEYS]),
            commands: Mutex::new(VecDeque::new()),
        }
    }

    /// Record a press of keypad key `key`.
    pub fn press(&self, key: u8) {
        if let Some(slot) = self.last_pressed.lock().unwrap().get_mut(key as usize) {
            *slot = Some(Instant::now());
        }
    }

    /// The keys that were pressed recently enough to count as held.
    pub fn held(&self) -> [bool; NUM_KEYS] {
        let last_pressed = self.last_pressed.lock().unwrap();
        let mut held = [false; NUM_KEYS];
        for (held, pressed) in held.iter_mut().zip(last_pressed.iter()) {
            *held = pressed.map_or(false, |at| at.elapsed() < self.timeout);
        }
        held
    }

    pub fn push_command(&self, command: Command) {
        self.commands.lock().unwrap().push_back(command);
    }

    pub fn pop_command(&self) -> Option<Command> {
        self.commands.lock().unwrap().pop_front()
    }
}
