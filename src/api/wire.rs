//! Wire types for the `/coins/markets` endpoint.

use serde::Deserialize;

/// One coin as returned by the markets endpoint.
///
/// Only `id` and `name` are required; any numeric field may be `null` or
/// absent. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCoinRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub high_24h: Option<f64>,
    #[serde(default)]
    pub low_24h: Option<f64>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub sparkline_in_7d: Option<Sparkline>,
}

/// Embedded 7 day price samples.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sparkline {
    #[serde(default)]
    pub price: Vec<Option<f64>>,
}

impl RawCoinRecord {
    /// A record with only identity fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: None,
            current_price: None,
            high_24h: None,
            low_24h: None,
            total_volume: None,
            market_cap: None,
            price_change_percentage_24h: None,
            sparkline_in_7d: None,
        }
    }

    /// Sparkline samples with gaps dropped; empty when absent.
    pub fn sparkline_samples(&self) -> Vec<f64> {
        self.sparkline_in_7d
            .as_ref()
            .map(|s| s.price.iter().flatten().copied().collect())
            .unwrap_or_default()
    }
}

/// Decode a markets response body.
pub(crate) fn decode_markets(body: &[u8]) -> crate::Result<Vec<RawCoinRecord>> {
    serde_json::from_slice(body).map_err(|e| crate::Error::malformed(e.to_string()))
}
