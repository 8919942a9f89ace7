use crate::emulator::display::Display;

/// Represents an output device that frames and sound can be sent to.
pub trait EmulatorOutput {
    /// Show a new frame. Only called when the display changed.
    fn present(&mut self, display: &Display);
    /// Start or stop the beep.
    fn set_sound(&mut self, on: bool);
}

/// A simple output device that keeps the last frame it was given.
#[derive(Debug, Default)]
pub struct DummyOutput {
    last_frame: Option<Display>,
    frames_presented: usize,
    sound: bool,
}

impl DummyOutput {
    pub fn new() -> DummyOutput {
        DummyOutput::default()
    }

    pub fn last_frame(&self) -> Option<&Display> {
        self.last_frame.as_ref()
    }

    pub fn frames_presented(&self) -> usize {
        self.frames_presented
    }

    pub fn sound(&self) -> bool {
        self.sound
    }
}

impl EmulatorOutput for DummyOutput {
    fn present(&mut self, display: &Display) {
        self.last_frame = Some(display.clone());
        self.frames_presented += 1;
    }

    fn set_sound(&mut self, on: bool) {
        self.sound = on;
    }
}
