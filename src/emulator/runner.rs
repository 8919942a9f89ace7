//! Drives an `Emulator` at a fixed frame rate on behalf of a frontend.

use std::path::Path;

use crate::emulator::config::{Config, TimerMode};
use crate::emulator::emulator::Emulator;
use crate::emulator::error::Error;
use crate::emulator::input::EmulatorInput;
use crate::emulator::output::EmulatorOutput;

pub struct Runner<I: EmulatorInput, O: EmulatorOutput> {
    emulator: Emulator,
    input: I,
    output: O,
    config: Config,

    // Kept around so `reset` can reload it
    program: Vec<u8>,
    // Instructions owed to the current frame, carried over when fractional
    budget: f64,
    paused: bool,
    sound_on: bool,
}

impl<I: EmulatorInput, O: EmulatorOutput> Runner<I, O> {
    pub fn new(emulator: Emulator, input: I, output: O, config: Config) -> Runner<I, O> {
        Runner {
            emulator,
            input,
            output,
            config,
            program: Vec::new(),
            budget: 0.0,
            paused: false,
            sound_on: false,
        }
    }

    /// Load a program, and remember it for `reset`.
    pub fn load(&mut self, program: Vec<u8>) -> Result<(), Error> {
        self.emulator.load(&program)?;
        self.program = program;
        Ok(())
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let program = std::fs::read(path).map_err(|source| Error::RomLoad {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Executing {:?}", path);
        self.load(program)
    }

    /// Run one frame: read the keys, execute this frame's share of instructions,
    /// tick the timers and hand the display and sound state to the output.
    ///
    /// Nothing is executed while paused.
    pub fn run_frame(&mut self) -> Result<(), Error> {
        self.input.poll_keys(self.emulator.keypad_mut());

        if !self.paused {
            self.budget += self.config.instructions_per_frame();
            while self.budget >= 1.0 {
                self.budget -= 1.0;
                self.execute_one()?;
            }
            if self.config.timer_mode == TimerMode::Decoupled {
                self.emulator.tick_timers();
            }
        }

        self.update_output();
        Ok(())
    }

    /// Run `frames` frames, stopping at the first error.
    pub fn run(&mut self, frames: usize) -> Result<(), Error> {
        for _ in 0..frames {
            self.run_frame()?;
        }
        Ok(())
    }

    /// Execute a single instruction, typically while paused.
    /// Timers tick along with it regardless of the timer mode.
    pub fn single_step(&mut self) -> Result<(), Error> {
        self.input.poll_keys(self.emulator.keypad_mut());
        self.debug_log();
        self.emulator.step()?;
        self.update_output();
        Ok(())
    }

    fn execute_one(&mut self) -> Result<(), Error> {
        self.debug_log();
        match self.config.timer_mode {
            TimerMode::Coupled => self.emulator.step(),
            TimerMode::Decoupled => self.emulator.cycle(),
        }
    }

    fn debug_log(&self) {
        if self.config.debug {
            log::debug!("{}", self.emulator.debug());
        }
    }

    fn update_output(&mut self) {
        let sound_on = !self.config.mute && self.emulator.sound_timer() > 0;
        if sound_on != self.sound_on {
            self.sound_on = sound_on;
            self.output.set_sound(sound_on);
        }

        if self.emulator.need_draw() {
            self.output.present(self.emulator.display());
            self.emulator.mark_drawn();
        }
    }

    /// Reset the machine and reload the current program.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.emulator.reset();
        self.emulator.load(&self.program)?;
        self.budget = 0.0;
        self.paused = false;
        Ok(())
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn emulator(&self) -> &Emulator {
        &self.emulator
    }

    pub fn emulator_mut(&mut self) -> &mut Emulator {
        &mut self.emulator
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}
