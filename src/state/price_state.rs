//! Price card state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Live price summary for one coin, replaced wholesale every price cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceCard {
    /// Coin identifier (e.g. "bitcoin").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Icon URL.
    pub icon_url: Option<String>,
    /// Current price in the quote currency.
    pub current_price: f64,
    /// 24h high.
    pub high_24h: f64,
    /// 24h low.
    pub low_24h: f64,
    /// 24h trading volume.
    pub volume_24h: f64,
    /// Market capitalization.
    pub market_cap: f64,
    /// Signed 24h change in percent.
    pub change_percent_24h: Option<f64>,
    /// Trailing 7 day price samples, oldest first.
    pub sparkline: Vec<f64>,
}

/// State for the price card pane.
#[derive(Debug)]
pub struct PriceState {
    /// Cards from the most recent successful cycle, in rank order.
    pub cards: Vec<PriceCard>,
    /// True until the first successful price fetch.
    pub loading: bool,
    /// Time of the last successful fetch.
    pub last_updated: Option<DateTime<Utc>>,
    /// Failed cycles since the last success.
    pub failed_cycles: u32,
    /// Currently selected card index.
    pub selected_index: Option<usize>,
}

impl Default for PriceState {
    fn default() -> Self {
        Self {
            cards: Vec::new(),
            loading: true,
            last_updated: None,
            failed_cycles: 0,
            selected_index: None,
        }
    }
}

impl PriceState {
    /// Replace the card set with a new snapshot.
    pub fn replace(&mut self, cards: Vec<PriceCard>) {
        self.cards = cards;
        self.loading = false;
        self.failed_cycles = 0;
        self.last_updated = Some(Utc::now());
        self.selected_index = match self.selected_index {
            Some(_) if self.cards.is_empty() => None,
            Some(i) => Some(i.min(self.cards.len() - 1)),
            None => None,
        };
    }

    /// Record a failed cycle; the current cards stay on screen.
    pub fn record_failure(&mut self) {
        self.failed_cycles = self.failed_cycles.saturating_add(1);
    }

    /// Whether the displayed cards are from an earlier cycle than the latest attempt.
    pub fn is_stale(&self) -> bool {
        self.failed_cycles > 0 && self.last_updated.is_some()
    }
}
