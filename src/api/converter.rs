//! Conversion of raw market records into view-ready state types.

use super::RawCoinRecord;
use crate::format;
use crate::market::assess;
use crate::state::{MarketUpdate, PriceCard};
use chrono::{DateTime, Utc};

/// Attribution attached to every market update.
pub const SOURCE_NAME: &str = "CoinGecko";

/// Converts raw API records to internal state types.
///
/// Conversion never fails: absent numbers become `0.0` on price cards
/// (`N/A` in generated text) and an absent sparkline becomes empty.
pub struct DataConverter;

impl DataConverter {
    /// Convert a raw record into a price card.
    pub fn price_card(record: RawCoinRecord) -> PriceCard {
        let sparkline = record.sparkline_samples();

        PriceCard {
            id: record.id,
            name: record.name,
            icon_url: record.image,
            current_price: or_zero(record.current_price),
            high_24h: or_zero(record.high_24h),
            low_24h: or_zero(record.low_24h),
            volume_24h: or_zero(record.total_volume),
            market_cap: or_zero(record.market_cap),
            change_percent_24h: record.price_change_percentage_24h.filter(|c| c.is_finite()),
            sparkline,
        }
    }

    /// Convert a batch of raw records into price cards, keeping rank order.
    ///
    /// Later duplicates of a coin id are dropped so each coin has one card.
    pub fn price_cards(records: Vec<RawCoinRecord>) -> Vec<PriceCard> {
        let mut seen = std::collections::HashSet::new();
        records
            .into_iter()
            .filter(|r| seen.insert(r.id.clone()))
            .map(Self::price_card)
            .collect()
    }

    /// Convert a raw record into a classified market update.
    pub fn market_update(
        record: RawCoinRecord,
        observed_at: DateTime<Utc>,
        detail_base_url: &str,
    ) -> MarketUpdate {
        let change = record.price_change_percentage_24h;
        let assessment = assess(&record.name, change, record.current_price);

        MarketUpdate {
            title: assessment.title,
            sentiment: assessment.sentiment,
            image_url: record.image,
            source_name: SOURCE_NAME.to_string(),
            description: format::description(
                record.current_price,
                record.market_cap,
                record.total_volume,
            ),
            detail_url: detail_url(detail_base_url, &record.id),
            observed_at,
            id: record.id,
        }
    }

    /// Convert a batch of raw records into market updates, keeping rank order.
    pub fn market_updates(
        records: Vec<RawCoinRecord>,
        observed_at: DateTime<Utc>,
        detail_base_url: &str,
    ) -> Vec<MarketUpdate> {
        records
            .into_iter()
            .map(|record| Self::market_update(record, observed_at, detail_base_url))
            .collect()
    }
}

fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or_default()
}

fn detail_url(base: &str, id: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), id)
}
