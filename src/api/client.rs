//! CoinGecko REST client.

use super::wire::{RawCoinRecord, decode_markets};
use super::{MarketDataSource, MarketQuery};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};

/// Builder for creating a CoinGecko client.
pub struct CoinGeckoClientBuilder {
    config: ApiConfig,
    timeout: Option<Duration>,
}

impl CoinGeckoClientBuilder {
    /// Create a new builder with default config.
    pub fn new() -> Self {
        Self {
            config: ApiConfig::default(),
            timeout: None,
        }
    }

    /// Set the API configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Set a transport-level timeout for every request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<CoinGeckoClient> {
        let mut builder = Client::builder()
            .user_agent(self.config.user_agent.clone())
            .pool_max_idle_per_host(2);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(CoinGeckoClient {
            base_url: self.config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

impl Default for CoinGeckoClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the public CoinGecko markets endpoint.
#[derive(Clone)]
pub struct CoinGeckoClient {
    base_url: String,
    http: Client,
}

impl CoinGeckoClient {
    /// Start building a client.
    pub fn builder() -> CoinGeckoClientBuilder {
        CoinGeckoClientBuilder::new()
    }

    fn markets_url(&self) -> String {
        format!("{}/coins/markets", self.base_url)
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    #[instrument(skip(self), fields(per_page = query.per_page, sparkline = query.sparkline))]
    async fn fetch_markets(&self, query: &MarketQuery) -> Result<Vec<RawCoinRecord>> {
        let response = self
            .http
            .get(self.markets_url())
            .header("Accept", "application/json")
            .query(&query.params())
            .send()
            .await?;

        check_status(response.status())?;

        let body = response.bytes().await?;
        let records = decode_markets(&body)?;

        debug!(count = records.len(), "fetched markets");
        Ok(records)
    }
}

/// Map a response status to the fetch failure taxonomy.
fn check_status(status: StatusCode) -> Result<()> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::RateLimited);
    }
    if !status.is_success() {
        return Err(Error::HttpStatus(status.as_u16()));
    }
    Ok(())
}
