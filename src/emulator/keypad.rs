pub const NUM_KEYS: usize = 16;

/// Which of the 16 keys are currently held down.
///
/// ```text
/// 1 2 3 C
/// 4 5 6 D
/// 7 8 9 E
/// A 0 B F
/// ```
///
/// The frontend writes this once per frame, the emulator only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [u8; NUM_KEYS],
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad::default()
    }

    /// Set the state of `key`, ignoring anything outside 0x0..=0xF.
    pub fn set(&mut self, key: u8, pressed: bool) {
        if let Some(slot) = self.keys.get_mut(key as usize) {
            *slot = pressed as u8;
        }
    }

    pub fn press(&mut self, key: u8) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: u8) {
        self.set(key, false);
    }

    /// Keys outside the keypad are never pressed.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(key as usize).map_or(false, |k| *k != 0)
    }

    /// The lowest numbered key that is held down.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|k| *k != 0).map(|k| k as u8)
    }

    pub fn clear(&mut self) {
        self.keys = [0; NUM_KEYS];
    }
}
