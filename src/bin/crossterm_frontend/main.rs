use std::error::Error;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use structopt::StructOpt;

use chip8_vm::emulator::{Config, Emulator, Runner, TimerMode};

mod crossterm_io;
mod key_buffer;
mod key_manager;
use crossterm::style::Color;
use crossterm_io::{pixel_color, CrosstermInput, CrosstermOutput};
use key_buffer::Command;
use key_manager::KeyManager;

/// The program options.
#[derive(StructOpt)]
struct Opt {
    /// Instructions per second
    #[structopt(short, long, default_value = "400")]
    clock: u32,

    /// Tick the timers once per instruction instead of at 60 Hz
    #[structopt(long)]
    coupled_timers: bool,

    /// Don't ring the terminal bell
    #[structopt(short, long)]
    mute: bool,

    /// Pixel colour: white, red, green, blue, yellow, pink or cyan
    #[structopt(long, default_value = "white", parse(from_str = pixel_color))]
    color: Color,

    /// Log the registers before every instruction
    #[structopt(short, long)]
    debug: bool,

    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // Get configuration
    let opt = Opt::from_args();
    let config = Config {
        clock_speed: opt.clock,
        timer_mode: if opt.coupled_timers { TimerMode::Coupled } else { TimerMode::Decoupled },
        mute: opt.mute,
        debug: opt.debug,
        ..Config::default()
    };
    let frame = Duration::from_secs(1) / config.tick_rate;

    let key_manager = KeyManager::new();
    let title = opt
        .input
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());

    // Load instructions into emulator memory
    let mut runner = Runner::new(
        Emulator::new(),
        CrosstermInput::new(&key_manager),
        CrosstermOutput::new(&title, opt.mute, opt.color)?,
        config,
    );
    runner.load_file(&opt.input)?;

    // Start execution
    let result = loop {
        let started = Instant::now();

        let command_result = match key_manager.next_command() {
            Some(Command::Quit) => break Ok(()),
            Some(Command::TogglePause) => {
                runner.toggle_pause();
                Ok(())
            }
            Some(Command::Step) if runner.is_paused() => runner.single_step(),
            Some(Command::Reset) => runner.reset(),
            _ => Ok(()),
        };

        if let Err(err) = command_result.and_then(|_| runner.run_frame()) {
            log::error!("Halted: {}\n{}", err, runner.emulator().debug());
            break Err(err);
        }

        if let Some(remaining) = frame.checked_sub(started.elapsed()) {
            std::thread::sleep(remaining);
        }
    };

    // Leave the alternate screen before reporting anything
    drop(runner);
    result?;
    Ok(())
}
