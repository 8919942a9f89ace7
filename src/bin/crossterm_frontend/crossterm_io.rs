use chip8_vm::emulator::display::{Display, SCREEN_HEIGHT, SCREEN_WIDTH};
use chip8_vm::emulator::input::EmulatorInput;
use chip8_vm::emulator::keypad::Keypad;
use chip8_vm::emulator::output::EmulatorOutput;

use super::key_manager::KeyManager;

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use std::io::{stdout, Stdout, Write};

pub struct CrosstermInput<'a> {
    key_manager: &'a KeyManager,
}

impl CrosstermInput<'_> {
    pub fn new(key_manager: &KeyManager) -> CrosstermInput {
        CrosstermInput { key_manager }
    }
}

impl EmulatorInput for CrosstermInput<'_> {
    fn poll_keys(&mut self, keypad: &mut Keypad) {
        for (key, held) in self.key_manager.held().iter().enumerate() {
            keypad.set(key as u8, *held);
        }
    }
}

pub struct CrosstermOutput {
    stdout: Stdout,
    // What is currently on the terminal
    cells: [[u8; SCREEN_WIDTH]; SCREEN_HEIGHT],
    mute: bool,
}

/// Parse a pixel colour name. Unknown names fall back to white.
pub fn pixel_color(name: &str) -> Color {
    match name.to_lowercase().as_str() {
        "red" => Color::Red,
        "green" => Color::Green,
        "blue" => Color::Blue,
        "yellow" => Color::Yellow,
        "pink" => Color::Magenta,
        "cyan" => Color::Cyan,
        _ => Color::White,
    }
}

impl CrosstermOutput {
    pub fn new(title: &str, mute: bool, color: Color) -> crossterm::Result<CrosstermOutput> {
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        terminal::enable_raw_mode()?;
        draw_border(&mut stdout, title)?;
        // Only pixels are drawn from here on
        queue!(stdout, SetForegroundColor(color))?;
        stdout.flush()?;
        Ok(CrosstermOutput {
            stdout,
            cells: [[0; SCREEN_WIDTH]; SCREEN_HEIGHT],
            mute,
        })
    }

    fn draw(&mut self, display: &Display) -> crossterm::Result<()> {
        for (y, row) in display.rows().enumerate() {
            for (x, state) in row.iter().enumerate() {
                let old_state = &mut self.cells[y][x];
                if *old_state != *state {
                    *old_state = *state;
                    queue!(
                        self.stdout,
                        cursor::MoveTo(2 * x as u16 + 1, y as u16 + 1),
                        Print(if *state == 1 { "██" } else { "  " })
                    )?;
                }
            }
        }
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for CrosstermOutput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(self.stdout, ResetColor, LeaveAlternateScreen, cursor::Show);
    }
}

impl EmulatorOutput for CrosstermOutput {
    fn present(&mut self, display: &Display) {
        if let Err(err) = self.draw(display) {
            log::warn!("Could not draw frame: {}", err);
        }
    }

    fn set_sound(&mut self, on: bool) {
        // The terminal bell is the only sound there is
        if on && !self.mute {
            let _ = write!(self.stdout, "\x07").and_then(|_| self.stdout.flush());
        }
    }
}

fn draw_border(stdout: &mut Stdout, title: &str) -> crossterm::Result<()> {
    let bottom = SCREEN_HEIGHT as u16 + 1;
    let right = 2 * SCREEN_WIDTH as u16 + 1;
    for y in 0..=bottom {
        for x in 0..=right {
            let c = match (x, y) {
                (0, 0) => '┏',
                (x, 0) if x == right => '┓',
                (0, y) if y == bottom => '┗',
                (x, y) if x == right && y == bottom => '┛',
                (_, y) if y == 0 || y == bottom => '━',
                (x, _) if x == 0 || x == right => '┃',
                _ => continue,
            };
            queue!(stdout, cursor::MoveTo(x, y), Print(c))?;
        }
    }
    queue!(stdout, cursor::MoveTo(2, 0), Print(format!(" {} ", title)))?;
    Ok(())
}
