//! Event vocabulary shared by the input task, the runtime loop and the
//! dispatcher.
//!
//! The loop consumes a bounded mpsc channel sized by `EVENT_CHANNEL_CAP`.
//! Producers (the input task and the signal forwarder) wait on `send`, so a
//! slow consumer applies backpressure instead of dropping keys.

use std::fmt;
use std::sync::atomic::AtomicU64;
use tokio::sync::mpsc::{self, Receiver, Sender};

pub const EVENT_CHANNEL_CAP: usize = 1024;

// Input task lifecycle counters (relaxed; inspected by tests and shutdown logs).
pub static CHANNEL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STARTS: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_SIGNAL: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_CHANNEL: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_STREAM: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_ERROR: AtomicU64 = AtomicU64::new(0);

/// Top-level event consumed by the runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// New terminal size in columns and rows.
    Resize(u16, u16),
    /// The process was continued after a stop (`SIGCONT`).
    Resume,
    /// Termination requested from outside (`SIGTERM`, `SIGHUP`).
    Shutdown,
}

/// Bounded channel carrying `Event`s to the runtime loop.
pub fn channel() -> (Sender<Event>, Receiver<Event>) {
    mpsc::channel(EVENT_CHANNEL_CAP)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Unmodified key.
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    pub fn is_ctrl(&self, c: char) -> bool {
        self.mods.contains(KeyModifiers::CTRL) && self.code == KeyCode::Char(c)
    }
}

impl From<char> for KeyEvent {
    fn from(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::plain(code)
    }
}

/// Normalized logical keys consumed by higher layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT = 0b0000_0010;
        const SHIFT = 0b0000_0100;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}
