//! Market update state.

use crate::market::Sentiment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A synthetic "market update" derived from one coin's 24h movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketUpdate {
    /// Coin identifier the update was derived from.
    pub id: String,
    /// Generated headline.
    pub title: String,
    /// Sentiment tag, fixed at derivation.
    pub sentiment: Sentiment,
    /// Coin image URL.
    pub image_url: Option<String>,
    /// Attribution.
    pub source_name: String,
    /// Price, market cap and volume summary.
    pub description: String,
    /// Link to the coin's detail page.
    pub detail_url: String,
    /// When the update was derived (not when the market moved).
    pub observed_at: DateTime<Utc>,
}

/// The result of one successful news cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsSnapshot {
    /// Cycle number within the news poller; increases monotonically.
    pub generation: u64,
    /// Filter the snapshot was selected with.
    pub filter: Sentiment,
    /// Updates matching `filter`, in rank order.
    pub updates: Vec<MarketUpdate>,
}

/// State for the market update pane.
#[derive(Debug, Default)]
pub struct UpdateState {
    /// Updates for the current filter.
    pub items: Vec<MarketUpdate>,
    /// Current sentiment filter.
    pub filter: Sentiment,
    /// Generation of the last applied cycle.
    pub generation: u64,
    /// Whether a snapshot for the current filter is still awaited.
    pub loading: bool,
    /// Time of the last applied cycle.
    pub last_updated: Option<DateTime<Utc>>,
    /// Currently selected update index.
    pub selected_index: Option<usize>,
}

impl UpdateState {
    /// Create update state with an initial filter.
    pub fn new(filter: Sentiment) -> Self {
        Self {
            filter,
            loading: true,
            ..Default::default()
        }
    }

    /// Whether a cycle result may replace the current items.
    ///
    /// Results for another filter, or older than the last applied cycle,
    /// are discarded.
    pub fn accepts(&self, generation: u64, filter: Sentiment) -> bool {
        filter == self.filter && generation >= self.generation
    }

    /// Switch filter; items are cleared until a matching snapshot arrives.
    pub fn set_filter(&mut self, filter: Sentiment) {
        if filter == self.filter {
            return;
        }
        self.filter = filter;
        self.items.clear();
        self.selected_index = None;
        self.loading = true;
    }

    /// Apply a snapshot. Returns false if it was discarded.
    pub fn apply(&mut self, snapshot: NewsSnapshot) -> bool {
        if !self.accepts(snapshot.generation, snapshot.filter) {
            return false;
        }
        self.generation = snapshot.generation;
        self.items = snapshot.updates;
        self.loading = false;
        self.last_updated = Some(Utc::now());
        self.clamp_selection();
        true
    }

    /// Apply a failed cycle: the list becomes empty. Returns false if discarded.
    pub fn fail(&mut self, generation: u64, filter: Sentiment) -> bool {
        if !self.accepts(generation, filter) {
            return false;
        }
        self.generation = generation;
        self.items.clear();
        self.loading = false;
        self.selected_index = None;
        true
    }

    fn clamp_selection(&mut self) {
        self.selected_index = match self.selected_index {
            Some(_) if self.items.is_empty() => None,
            Some(i) => Some(i.min(self.items.len() - 1)),
            None => None,
        };
    }
}
