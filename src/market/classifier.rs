//! Sentiment classification from 24h price change.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Changes strictly above this percentage are hot.
pub const HOT_THRESHOLD: f64 = 5.0;
/// Changes strictly below this percentage are cold.
pub const COLD_THRESHOLD: f64 = -5.0;

/// Mood tag attached to a market update. Also the user's filter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    #[default]
    Hot,
    Medium,
    Cold,
}

impl Sentiment {
    /// All sentiments in filter bar order.
    pub const ALL: [Sentiment; 3] = [Sentiment::Hot, Sentiment::Medium, Sentiment::Cold];

    /// Capitalized name for buttons and headings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Hot => "Hot",
            Self::Medium => "Medium",
            Self::Cold => "Cold",
        }
    }

    /// The next sentiment in filter bar order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Hot => Self::Medium,
            Self::Medium => Self::Cold,
            Self::Cold => Self::Hot,
        }
    }

    /// The previous sentiment in filter bar order, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            Self::Hot => Self::Cold,
            Self::Medium => Self::Hot,
            Self::Cold => Self::Medium,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hot => write!(f, "hot"),
            Self::Medium => write!(f, "medium"),
            Self::Cold => write!(f, "cold"),
        }
    }
}

/// Classify a 24h percentage change.
///
/// Both thresholds are strict, so exactly `5.0` and `-5.0` are medium. A
/// missing or NaN change is medium as well.
pub fn classify(change_percent_24h: Option<f64>) -> Sentiment {
    match change_percent_24h {
        Some(change) if change > HOT_THRESHOLD => Sentiment::Hot,
        Some(change) if change < COLD_THRESHOLD => Sentiment::Cold,
        _ => Sentiment::Medium,
    }
}

/// Sentiment plus the generated headline for one coin.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub sentiment: Sentiment,
    pub title: String,
}

/// Classify a coin and write its headline.
///
/// Emits a diagnostic when the change percent is undefined.
pub fn assess(name: &str, change_percent_24h: Option<f64>, price: Option<f64>) -> Assessment {
    if !change_percent_24h.is_some_and(|c| !c.is_nan()) {
        warn!(coin = name, "24h change percent undefined, classifying as medium");
    }

    let sentiment = classify(change_percent_24h);
    Assessment {
        sentiment,
        title: crate::format::headline(sentiment, name, change_percent_24h, price),
    }
}
