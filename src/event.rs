use std::collections::HashMap;
use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind};

use crate::sim::InputSnapshot;

/// Frames a key stays held after its last press/repeat when the terminal
/// does not report releases.
pub const HOLD_FRAMES: u32 = 8;

pub enum Event {
    Key(KeyEvent),
    Tick,
}

pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(frame_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let frame = Duration::from_millis(frame_ms.max(1));

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = frame.saturating_sub(last_tick.elapsed());
                if event::poll(timeout).unwrap_or(false) {
                    if let Ok(crossterm::event::Event::Key(key)) = event::read() {
                        if tx.send(Event::Key(key)).is_err() {
                            return;
                        }
                    }
                }
                // Ticks keep coming while a key auto-repeats
                if last_tick.elapsed() >= frame {
                    if tx.send(Event::Tick).is_err() {
                        return;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

/// Turns raw key events into the pressed/held sets of an `InputSnapshot`.
///
/// With keyboard enhancement the terminal reports releases and a key is held
/// until it goes up. Without it a key is held for `HOLD_FRAMES` frames after
/// its last press or auto-repeat.
#[derive(Debug, Default)]
pub struct KeyTracker {
    pressed: Vec<KeyCode>,
    /// Remaining frames, `None` while waiting for a release event
    held: HashMap<KeyCode, Option<u32>>,
    enhanced: bool,
}

impl KeyTracker {
    pub fn new(enhanced: bool) -> Self {
        Self { enhanced, ..Self::default() }
    }

    pub fn record(&mut self, key: KeyEvent) {
        let code = normalize(key.code);
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                // Auto-repeat keeps a key held but is not a fresh press
                if key.kind == KeyEventKind::Press {
                    self.pressed.push(code);
                }
                if let Some(other) = opposite(code) {
                    self.held.remove(&other);
                }
                let hold = if self.enhanced { None } else { Some(HOLD_FRAMES) };
                self.held.insert(code, hold);
            }
            KeyEventKind::Release => {
                self.held.remove(&code);
            }
        }
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            pressed: self.pressed.clone(),
            held: self.held.keys().copied().collect(),
        }
    }

    /// Drops the discrete presses once a tick has consumed them.
    pub fn take_presses(&mut self) {
        self.pressed.clear();
    }

    /// Ages the timed holds by one frame.
    pub fn end_frame(&mut self) {
        self.held.retain(|_, left| match left {
            Some(n) => {
                *n = n.saturating_sub(1);
                *n > 0
            }
            None => true,
        });
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
        self.held.clear();
    }
}

fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

fn opposite(code: KeyCode) -> Option<KeyCode> {
    match code {
        KeyCode::Left => Some(KeyCode::Right),
        KeyCode::Right => Some(KeyCode::Left),
        KeyCode::Up => Some(KeyCode::Down),
        KeyCode::Down => Some(KeyCode::Up),
        KeyCode::Char('w') => Some(KeyCode::Char('s')),
        KeyCode::Char('s') => Some(KeyCode::Char('w')),
        KeyCode::Char('a') => Some(KeyCode::Char('d')),
        KeyCode::Char('d') => Some(KeyCode::Char('a')),
        _ => None,
    }
}
