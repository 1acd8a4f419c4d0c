//! Application-level state.

/// The pane that receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Prices,
    Updates,
}

impl Pane {
    /// The other pane.
    pub fn toggle(self) -> Self {
        match self {
            Self::Prices => Self::Updates,
            Self::Updates => Self::Prices,
        }
    }
}

/// Global application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Focused pane.
    pub focus: Pane,
    /// Whether to show help overlay.
    pub show_help: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
}
