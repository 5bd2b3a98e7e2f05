//! Market price records

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PRICE_SOURCE: &str = "Manual Entry";

/// Price observed for a crop at a market on a given day (MWK per kg)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketPrice {
    pub id: Uuid,
    pub crop_id: Uuid,
    pub region_id: Uuid,
    pub date: NaiveDate,
    pub price_per_kg: Decimal,
    pub market_name: String,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMarketPrice {
    pub crop_id: Uuid,
    pub region_id: Uuid,
    pub date: NaiveDate,
    pub price_per_kg: Decimal,
    pub market_name: String,
    pub source: String,
}

/// Row of the public price history feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceHistoryPoint {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub market: String,
    /// District name
    pub location: String,
}
