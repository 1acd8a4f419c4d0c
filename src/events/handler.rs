//! Event handler for processing input events.

use super::{Event, Keymap};
use crate::error::Result;
use crate::state::Action;
use crossterm::event::{EventStream, KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use futures::StreamExt;

/// Reads terminal events and maps them to actions.
pub struct EventHandler {
    keymap: Keymap,
    /// Opened on first read so mapping works without a terminal.
    stream: Option<EventStream>,
}

impl EventHandler {
    /// Create a new event handler with the given key map.
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            stream: None,
        }
    }

    /// The active key bindings.
    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Wait for the next terminal event. `None` once input is closed.
    pub async fn next(&mut self) -> Result<Option<Event>> {
        let stream = self.stream.get_or_insert_with(EventStream::new);
        match stream.next().await {
            Some(Ok(event)) => Ok(Some(Event::from(event))),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// Map an event to an action, if it has one.
    pub fn handle(&self, event: &Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            // The next draw picks up the new size.
            Event::Resize(_, _) | Event::Other => None,
        }
    }

    /// Handle a key event and return an optional action.
    pub fn handle_key(&self, key: &KeyEvent) -> Option<Action> {
        // Only process key press events
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let keymap = &self.keymap;

        if keymap.quit.matches(key) || key.code == KeyCode::Esc {
            return Some(Action::Quit);
        }
        if keymap.help.matches(key) {
            return Some(Action::ToggleHelp);
        }
        if keymap.refresh.matches(key) {
            return Some(Action::RefreshAll);
        }
        if keymap.focus.matches(key) || key.code == KeyCode::BackTab {
            return Some(Action::FocusNext);
        }

        // Filters
        if let Some((_, sentiment)) = keymap.filters.iter().find(|(b, _)| b.matches(key)) {
            return Some(Action::SetFilter(*sentiment));
        }
        if keymap.next_filter.matches(key) || key.code == KeyCode::Right {
            return Some(Action::NextFilter);
        }
        if keymap.prev_filter.matches(key) || key.code == KeyCode::Left {
            return Some(Action::PrevFilter);
        }

        // Navigation
        if keymap.up.matches(key) || key.code == KeyCode::Up {
            return Some(Action::ScrollUp);
        }
        if keymap.down.matches(key) || key.code == KeyCode::Down {
            return Some(Action::ScrollDown);
        }
        match key.code {
            KeyCode::Home | KeyCode::Char('g') => Some(Action::GoToTop),
            KeyCode::End | KeyCode::Char('G') => Some(Action::GoToBottom),
            _ => None,
        }
    }

    fn handle_mouse(&self, mouse: &MouseEvent) -> Option<Action> {
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            _ => None,
        }
    }
}
