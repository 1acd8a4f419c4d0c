//! Market data source integration.
//!
//! This module provides the [`MarketDataSource`] seam the pollers fetch
//! through, the CoinGecko implementation of it, and conversion of raw
//! records into view-ready state types.

mod client;
mod converter;
mod wire;

pub use client::{CoinGeckoClient, CoinGeckoClientBuilder};
pub use converter::{DataConverter, SOURCE_NAME};
pub use wire::{RawCoinRecord, Sparkline};

use crate::config::{ApiConfig, PollingConfig};
use crate::error::Result;
use async_trait::async_trait;

/// A read-only source of ranked coin market snapshots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch one page of coins ranked by market capitalization.
    async fn fetch_markets(&self, query: &MarketQuery) -> Result<Vec<RawCoinRecord>>;
}

/// Parameters for a ranked markets request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketQuery {
    /// Quote currency.
    pub vs_currency: String,
    /// Number of coins per page.
    pub per_page: u32,
    /// 1-based page number.
    pub page: u32,
    /// Whether to embed 7 day sparkline samples.
    pub sparkline: bool,
    /// Extra price change windows to include (e.g. "24h").
    pub price_change_percentage: Option<String>,
}

impl MarketQuery {
    /// Query for the price cards: top coins with 7 day sparklines.
    pub fn prices(api: &ApiConfig, polling: &PollingConfig) -> Self {
        Self {
            vs_currency: api.vs_currency.clone(),
            per_page: polling.price_limit,
            page: 1,
            sparkline: true,
            price_change_percentage: None,
        }
    }

    /// Query for market updates: a larger page with 24h change, no sparklines.
    pub fn news(api: &ApiConfig, polling: &PollingConfig) -> Self {
        Self {
            vs_currency: api.vs_currency.clone(),
            per_page: polling.news_limit,
            page: 1,
            sparkline: false,
            price_change_percentage: Some("24h".to_string()),
        }
    }

    /// Query string parameters, in request order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("vs_currency", self.vs_currency.clone()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
            ("sparkline", self.sparkline.to_string()),
        ];
        if let Some(windows) = &self.price_change_percentage {
            params.push(("price_change_percentage", windows.clone()));
        }
        params
    }
}
