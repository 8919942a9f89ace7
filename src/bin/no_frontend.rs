use std::error::Error;
use std::path::PathBuf;

use log::LevelFilter;
use structopt::StructOpt;

use chip8_vm::emulator::input::DummyInput;
use chip8_vm::emulator::output::DummyOutput;
use chip8_vm::emulator::{Config, Emulator, Runner, TimerMode};

/// Run a program without any input or output,
/// then print the final screen and registers.
#[derive(StructOpt)]
struct Opt {
    /// Number of 60 Hz frames to run
    #[structopt(short, long, default_value = "600")]
    frames: usize,

    /// Instructions per second
    #[structopt(short, long, default_value = "400")]
    clock: u32,

    /// Tick the timers once per instruction instead of at 60 Hz
    #[structopt(long)]
    coupled_timers: bool,

    /// Log the registers before every instruction (needs -vv)
    #[structopt(short, long)]
    debug: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    pretty_env_logger::formatted_builder().filter_level(level).init();

    let config = Config {
        clock_speed: opt.clock,
        timer_mode: if opt.coupled_timers { TimerMode::Coupled } else { TimerMode::Decoupled },
        mute: true,
        debug: opt.debug,
        ..Config::default()
    };

    let mut runner = Runner::new(Emulator::new(), DummyInput, DummyOutput::new(), config);
    runner.load_file(&opt.input)?;

    let result = runner.run(opt.frames);
    if let Err(ref err) = result {
        log::error!("Halted: {}", err);
    }

    print!("{}", runner.emulator().display());
    println!("{}", runner.emulator().debug());

    result?;
    Ok(())
}
