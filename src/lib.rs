//! # coinpulse - live crypto market dashboard
//!
//! A terminal dashboard that polls a public market data API for the top
//! coins, shows live price cards with 7 day sparklines, and turns each
//! coin's 24h movement into a classified "market update" (hot, medium or
//! cold) that the user can filter. Built with ratatui and tokio.
//!
//! ## Architecture
//!
//! The application follows a clean architecture pattern:
//!
//! - **App**: Terminal lifecycle and the main event loop
//! - **API**: Market data source seam and the CoinGecko client
//! - **Market**: Sentiment classification, filtering and chart math
//! - **Poller**: Periodic price and news polling tasks
//! - **State**: Centralized state management
//! - **Events**: Input handling and key bindings
//! - **UI**: Layout and rendering logic
//! - **Config**: Configuration management

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod market;
pub mod poller;
pub mod state;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
pub use market::{Sentiment, assess, classify};
pub use poller::{NewsPoller, NewsPollerHandle, PollerHandle, PricePoller};
