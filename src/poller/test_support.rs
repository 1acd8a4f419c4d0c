//! Sources with controlled latency for poller tests.

use crate::api::{MarketDataSource, MarketQuery, RawCoinRecord};
use crate::config::{ApiConfig, PollingConfig};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub(crate) fn coin(id: &str, name: &str, change: f64, price: f64) -> RawCoinRecord {
    RawCoinRecord {
        current_price: Some(price),
        price_change_percentage_24h: Some(change),
        ..RawCoinRecord::new(id, name)
    }
}

pub(crate) fn price_query() -> MarketQuery {
    MarketQuery::prices(&ApiConfig::default(), &PollingConfig::default())
}

pub(crate) fn news_query() -> MarketQuery {
    MarketQuery::news(&ApiConfig::default(), &PollingConfig::default())
}

/// Never answers.
pub(crate) struct StalledSource;

#[async_trait]
impl MarketDataSource for StalledSource {
    async fn fetch_markets(&self, _query: &MarketQuery) -> Result<Vec<RawCoinRecord>> {
        std::future::pending().await
    }
}

/// Answers after a fixed delay and counts requests.
pub(crate) struct SlowSource {
    delay: Duration,
    records: Vec<RawCoinRecord>,
    calls: AtomicUsize,
}

impl SlowSource {
    pub(crate) fn new(delay: Duration, records: Vec<RawCoinRecord>) -> Self {
        Self {
            delay,
            records,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataSource for SlowSource {
    async fn fetch_markets(&self, _query: &MarketQuery) -> Result<Vec<RawCoinRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(self.records.clone())
    }
}
