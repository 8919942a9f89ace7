/// How the delay and sound timers are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// One timer tick per instruction, as `Emulator::step` does.
    /// Timers then run at the clock speed rather than at 60 Hz.
    Coupled,
    /// One timer tick per frame, independent of the clock speed.
    Decoupled,
}

/// Settings for a `Runner`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Instructions per second.
    pub clock_speed: u32,
    /// Frames per second. Timers tick at this rate in `TimerMode::Decoupled`.
    pub tick_rate: u32,
    pub timer_mode: TimerMode,
    /// Never turn the sound on.
    pub mute: bool,
    /// Log a register snapshot before every instruction.
    pub debug: bool,
}

impl Config {
    /// How many instructions make up one frame, possibly fractional.
    pub fn instructions_per_frame(&self) -> f64 {
        self.clock_speed as f64 / self.tick_rate.max(1) as f64
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            clock_speed: 400,
            tick_rate: 60,
            timer_mode: TimerMode::Decoupled,
            mute: false,
            debug: false,
        }
    }
}
