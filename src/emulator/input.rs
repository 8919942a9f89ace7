use crate::emulator::keypad::Keypad;

/// Represents an input device that is capable of providing keys in the range 0..0xF.
pub trait EmulatorInput {
    /// Overwrite `keypad` with the keys currently held down.
    fn poll_keys(&mut self, keypad: &mut Keypad);
}

/// An input device that never provides any input
pub struct DummyInput;

impl EmulatorInput for DummyInput {
    fn poll_keys(&mut self, keypad: &mut Keypad) {
        keypad.clear();
    }
}

/// Replays a fixed list of key states, one per frame, then releases everything.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: std::collections::VecDeque<Vec<u8>>,
}

impl ScriptedInput {
    pub fn new<I: IntoIterator<Item = Vec<u8>>>(frames: I) -> ScriptedInput {
        ScriptedInput {
            frames: frames.into_iter().collect(),
        }
    }

    /// Whether every scripted frame has been played.
    pub fn is_finished(&self) -> bool {
        self.frames.is_empty()
    }
}

impl EmulatorInput for ScriptedInput {
    fn poll_keys(&mut self, keypad: &mut Keypad) {
        keypad.clear();
        if let Some(keys) = self.frames.pop_front() {
            for key in keys {
                keypad.press(key);
            }
        }
    }
}
