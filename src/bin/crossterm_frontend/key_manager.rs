use super::key_buffer::{Command, KeyBuffer};
use crossterm::event::{poll, read, Event, KeyCode};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long a key counts as held after the terminal reported it.
/// Must outlast the terminal's auto-repeat delay, or a held key
/// reads as released before the first repeat arrives.
const HOLD_TIMEOUT: Duration = Duration::from_millis(300);

pub struct KeyManager {
    stop: Arc<AtomicBool>,
    key_buffer: Arc<KeyBuffer>,
    event_listener: Option<JoinHandle<()>>,
}

/// A struct for managing keypresses that will automatically
/// start a thread that grabs keypresses.
impl KeyManager {
    // Start event listener thread
    pub fn new() -> KeyManager {
        let stop = Arc::new(AtomicBool::new(false));
        let key_buffer = Arc::new(KeyBuffer::new(HOLD_TIMEOUT));
        let event_listener = event_listener(stop.clone(), key_buffer.clone());
        KeyManager {
            stop,
            key_buffer,
            event_listener: Some(event_listener),
        }
    }

    /// The keypad keys that are currently held.
    pub fn held(&self) -> [bool; 16] {
        self.key_buffer.held()
    }

    pub fn next_command(&self) -> Option<Command> {
        self.key_buffer.pop_command()
    }
}

impl Drop for KeyManager {
    fn drop(&mut self) {
        // Tell the event listener to stop, it checks between polls
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.event_listener.take() {
            let _ = handle.join();
        }
    }
}

/// Map the left side of a QWERTY keyboard onto the CHIP-8 keypad.
pub fn keypad_index(c: char) -> Option<u8> {
    let key = match c.to_ascii_lowercase() {
        '1' => 0x1,
        '2' => 0x2,
        '3' => 0x3,
        '4' => 0xC,
        'q' => 0x4,
        'w' => 0x5,
        'e' => 0x6,
        'r' => 0xD,
        'a' => 0x7,
        's' => 0x8,
        'd' => 0x9,
        'f' => 0xE,
        'z' => 0xA,
        'x' => 0x0,
        'c' => 0xB,
        'v' => 0xF,
        _ => return None,
    };
    Some(key)
}

fn command(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('p') => Some(Command::TogglePause),
        KeyCode::Char('n') => Some(Command::Step),
        KeyCode::Char('i') => Some(Command::Reset),
        _ => None,
    }
}

/// Starts a thread that listens for key events and pushes them to the key buffer.
fn event_listener(stop: Arc<AtomicBool>, key_buffer: Arc<KeyBuffer>) -> JoinHandle<()> {
    thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            match poll(Duration::from_millis(50)) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(err) => {
                    log::error!("Could not poll for events: {}", err);
                    break;
                }
            }

            let event = match read() {
                Ok(event) => event,
                Err(err) => {
                    log::error!("Could not read event: {}", err);
                    break;
                }
            };
            log::trace!("Got event {:?}", event);

            // Investigate the event
            if let Event::Key(key_event) = event {
                if let Some(command) = command(key_event.code) {
                    key_buffer.push_command(command);
                } else if let KeyCode::Char(c) = key_event.code {
                    if let Some(key) = keypad_index(c) {
                        key_buffer.press(key);
                    }
                }
            }
        }
    })
}
