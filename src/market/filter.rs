//! Sentiment selection over a market update snapshot.

use super::Sentiment;
use crate::state::MarketUpdate;

/// Keep the updates tagged with `sentiment`, in their original (rank) order.
///
/// An empty result is a normal outcome.
pub fn by_sentiment(updates: Vec<MarketUpdate>, sentiment: Sentiment) -> Vec<MarketUpdate> {
    updates
        .into_iter()
        .filter(|update| update.sentiment == sentiment)
        .collect()
}

/// Count updates per sentiment, in filter bar order.
pub fn counts(updates: &[MarketUpdate]) -> [(Sentiment, usize); 3] {
    Sentiment::ALL.map(|s| (s, updates.iter().filter(|u| u.sentiment == s).count()))
}
