//! Market movement rules.
//!
//! Pure functions shared by the pollers and the presentation layer:
//!
//! - **classifier**: sentiment from 24h price change
//! - **filter**: sentiment selection over a snapshot
//! - **chart**: sparkline samples to chart points

pub mod chart;
mod classifier;
pub mod filter;

pub use classifier::{Assessment, COLD_THRESHOLD, HOT_THRESHOLD, Sentiment, assess, classify};
