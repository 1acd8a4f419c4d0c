//! State management for coinpulse.
//!
//! This module provides centralized state management with a unidirectional
//! data flow pattern inspired by Redux/Elm architecture. Pollers and input
//! handling only ever produce [`Action`]s; [`Store::reduce`] is the single
//! place where observable state changes, so each snapshot is swapped in one
//! step.

mod app_state;
mod price_state;
mod update_state;

pub use app_state::{AppState, Pane};
pub use price_state::{PriceCard, PriceState};
pub use update_state::{MarketUpdate, NewsSnapshot, UpdateState};

use crate::error::Result;
use crate::market::Sentiment;
use tokio::sync::mpsc;
use tracing::debug;

/// Actions that can be dispatched to modify state.
#[derive(Debug, Clone)]
pub enum Action {
    // Price feed
    PricesLoaded(Vec<PriceCard>),
    PricesFailed(String),

    // Update feed
    UpdatesLoaded(NewsSnapshot),
    UpdatesFailed {
        generation: u64,
        filter: Sentiment,
        reason: String,
    },
    SetFilter(Sentiment),
    NextFilter,
    PrevFilter,

    // UI actions
    ScrollUp,
    ScrollDown,
    GoToTop,
    GoToBottom,
    FocusNext,
    ToggleHelp,

    // Data refresh
    RefreshAll,

    // Quit
    Quit,
}

/// The global state store.
#[derive(Debug)]
pub struct Store {
    /// Application state.
    pub app: AppState,
    /// Price card state.
    pub prices: PriceState,
    /// Market update state.
    pub updates: UpdateState,
    /// Action sender for dispatching actions.
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Store {
    /// Create a new store with the given action sender and initial filter.
    pub fn new(action_tx: mpsc::UnboundedSender<Action>, filter: Sentiment) -> Self {
        Self {
            app: AppState::default(),
            prices: PriceState::default(),
            updates: UpdateState::new(filter),
            action_tx,
        }
    }

    /// Dispatch an action to the store.
    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.action_tx
            .send(action)
            .map_err(|e| crate::Error::channel(e.to_string()))
    }

    /// Whether the price pane is still waiting for its first snapshot.
    pub fn loading(&self) -> bool {
        self.prices.loading
    }

    /// Apply an action to update state.
    pub fn reduce(&mut self, action: Action) {
        match action {
            // Price feed
            Action::PricesLoaded(cards) => self.prices.replace(cards),
            Action::PricesFailed(_) => self.prices.record_failure(),

            // Update feed
            Action::UpdatesLoaded(snapshot) => {
                let generation = snapshot.generation;
                if !self.updates.apply(snapshot) {
                    debug!(generation, "discarded stale market update snapshot");
                }
            }
            Action::UpdatesFailed {
                generation, filter, ..
            } => {
                if !self.updates.fail(generation, filter) {
                    debug!(generation, "discarded stale market update failure");
                }
            }
            Action::SetFilter(filter) => self.updates.set_filter(filter),
            Action::NextFilter => self.updates.set_filter(self.updates.filter.next()),
            Action::PrevFilter => self.updates.set_filter(self.updates.filter.prev()),

            // UI actions
            Action::ScrollUp => self.scroll(-1),
            Action::ScrollDown => self.scroll(1),
            Action::GoToTop => self.go_to_top(),
            Action::GoToBottom => self.go_to_bottom(),
            Action::FocusNext => self.app.focus = self.app.focus.toggle(),
            Action::ToggleHelp => self.app.show_help = !self.app.show_help,

            // Pollers are triggered by the app; nothing to record here.
            Action::RefreshAll => {}

            // Quit
            Action::Quit => {
                self.app.should_quit = true;
            }
        }
    }

    fn focused_selection(&mut self) -> (&mut Option<usize>, usize) {
        match self.app.focus {
            Pane::Prices => (&mut self.prices.selected_index, self.prices.cards.len()),
            Pane::Updates => (&mut self.updates.selected_index, self.updates.items.len()),
        }
    }

    fn scroll(&mut self, delta: i32) {
        let (selected, len) = self.focused_selection();
        if len == 0 {
            *selected = None;
            return;
        }
        let current = selected.unwrap_or(0) as i32;
        let new_index = (current + delta).max(0) as usize;
        *selected = Some(new_index.min(len - 1));
    }

    fn go_to_top(&mut self) {
        let (selected, len) = self.focused_selection();
        *selected = (len > 0).then_some(0);
    }

    fn go_to_bottom(&mut self) {
        let (selected, len) = self.focused_selection();
        *selected = len.checked_sub(1);
    }
}
