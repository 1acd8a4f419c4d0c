//! Event handling for coinpulse.
//!
//! Terminal input is read from crossterm's async event stream and mapped
//! to store [`Action`](crate::state::Action)s through a configurable
//! [`Keymap`].

mod handler;
mod input;

pub use handler::EventHandler;
pub use input::{KeyBinding, Keymap};

use crossterm::event::{Event as CrosstermEvent, KeyEvent, MouseEvent};

/// Terminal event types.
#[derive(Debug, Clone)]
pub enum Event {
    /// Key event.
    Key(KeyEvent),
    /// Mouse event.
    Mouse(MouseEvent),
    /// Terminal resize event.
    Resize(u16, u16),
    /// Focus and paste events, which the dashboard ignores.
    Other,
}

impl From<CrosstermEvent> for Event {
    fn from(event: CrosstermEvent) -> Self {
        match event {
            CrosstermEvent::Key(key) => Event::Key(key),
            CrosstermEvent::Mouse(mouse) => Event::Mouse(mouse),
            CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
            _ => Event::Other,
        }
    }
}
