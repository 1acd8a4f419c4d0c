//! Key binding parsing and matching.

use crate::config::KeyBindings;
use crate::error::{Error, Result};
use crate::market::Sentiment;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;
use std::str::FromStr;

/// A single key binding such as `q`, `Tab` or `Ctrl+r`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    code: KeyCode,
    ctrl: bool,
    alt: bool,
}

impl KeyBinding {
    /// Binding for a plain character.
    pub const fn char(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            ctrl: false,
            alt: false,
        }
    }

    /// Check whether a key event triggers this binding.
    ///
    /// Shift is ignored: it is already folded into the character
    /// (`?` arrives as Shift+`?` on most terminals).
    pub fn matches(&self, key: &KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) != self.ctrl
            || key.modifiers.contains(KeyModifiers::ALT) != self.alt
        {
            return false;
        }
        self.code == key.code
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::F(n) => write!(f, "F{}", n),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Esc => f.write_str("Esc"),
            KeyCode::Tab => f.write_str("Tab"),
            KeyCode::BackTab => f.write_str("BackTab"),
            KeyCode::Up => f.write_str("↑"),
            KeyCode::Down => f.write_str("↓"),
            KeyCode::Left => f.write_str("←"),
            KeyCode::Right => f.write_str("→"),
            KeyCode::Home => f.write_str("Home"),
            KeyCode::End => f.write_str("End"),
            KeyCode::PageUp => f.write_str("PageUp"),
            KeyCode::PageDown => f.write_str("PageDown"),
            other => write!(f, "{:?}", other),
        }
    }
}

impl FromStr for KeyBinding {
    type Err = Error;

    fn from_str(binding: &str) -> Result<Self> {
        let mut ctrl = false;
        let mut alt = false;
        let mut key = None;

        for part in binding.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "alt" => alt = true,
                _ if key.is_some() => {
                    return Err(Error::config(format!("key binding '{}' names two keys", binding)));
                }
                _ => key = Some(part),
            }
        }

        let key = key.ok_or_else(|| Error::config(format!("key binding '{}' has no key", binding)))?;
        let code = match key.to_ascii_lowercase().as_str() {
            "enter" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "space" => KeyCode::Char(' '),
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            lower if lower.len() > 1 && lower.starts_with('f') => lower[1..]
                .parse::<u8>()
                .map(KeyCode::F)
                .map_err(|_| Error::config(format!("unknown key '{}'", key)))?,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return Err(Error::config(format!("unknown key '{}'", key))),
                }
            }
        };

        Ok(Self { code, ctrl, alt })
    }
}

/// Parsed key bindings for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Keymap {
    pub quit: KeyBinding,
    pub help: KeyBinding,
    pub up: KeyBinding,
    pub down: KeyBinding,
    pub focus: KeyBinding,
    pub refresh: KeyBinding,
    pub filters: [(KeyBinding, Sentiment); 3],
    pub next_filter: KeyBinding,
    pub prev_filter: KeyBinding,
}

impl Keymap {
    /// The binding that selects `sentiment` directly.
    pub fn filter_key(&self, sentiment: Sentiment) -> Option<KeyBinding> {
        self.filters
            .iter()
            .find(|(_, s)| *s == sentiment)
            .map(|(binding, _)| *binding)
    }
}

impl TryFrom<&KeyBindings> for Keymap {
    type Error = Error;

    fn try_from(bindings: &KeyBindings) -> Result<Self> {
        Ok(Self {
            quit: bindings.quit.parse()?,
            help: bindings.help.parse()?,
            up: bindings.up.parse()?,
            down: bindings.down.parse()?,
            focus: bindings.focus.parse()?,
            refresh: bindings.refresh.parse()?,
            filters: [
                (bindings.filter_hot.parse()?, Sentiment::Hot),
                (bindings.filter_medium.parse()?, Sentiment::Medium),
                (bindings.filter_cold.parse()?, Sentiment::Cold),
            ],
            next_filter: bindings.next_filter.parse()?,
            prev_filter: bindings.prev_filter.parse()?,
        })
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            quit: KeyBinding::char('q'),
            help: KeyBinding::char('?'),
            up: KeyBinding::char('k'),
            down: KeyBinding::char('j'),
            focus: KeyBinding {
                code: KeyCode::Tab,
                ctrl: false,
                alt: false,
            },
            refresh: KeyBinding::char('r'),
            filters: [
                (KeyBinding::char('1'), Sentiment::Hot),
                (KeyBinding::char('2'), Sentiment::Medium),
                (KeyBinding::char('3'), Sentiment::Cold),
            ],
            next_filter: KeyBinding::char('l'),
            prev_filter: KeyBinding::char('h'),
        }
    }
}
