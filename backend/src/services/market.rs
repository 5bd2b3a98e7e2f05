//! Market price recording and history

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::{DynStore, PriceFilter};
use shared::{DateRange, MarketPrice, NewMarketPrice, PriceHistoryPoint, DEFAULT_PRICE_SOURCE};

/// Window of the public price feed
pub const HISTORY_DAYS: i64 = 30;

#[derive(Clone)]
pub struct MarketService {
    store: DynStore,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordPriceInput {
    pub crop_id: Uuid,
    pub region_id: Uuid,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub price_per_kg: Decimal,
    #[validate(length(min = 1, max = 100))]
    pub market_name: String,
    #[validate(length(max = 50))]
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PriceHistory {
    pub price_data: Vec<PriceHistoryPoint>,
}

impl MarketService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn record_price(
        &self,
        input: RecordPriceInput,
        today: NaiveDate,
    ) -> AppResult<MarketPrice> {
        input.validate()?;

        if input.price_per_kg <= Decimal::ZERO {
            return Err(AppError::Validation {
                field: "price_per_kg".to_string(),
                message: "Price must be greater than zero".to_string(),
                message_ny: "Mtengo uyenera kupitirira ziro".to_string(),
            });
        }
        if self.store.get_crop(input.crop_id).await?.is_none() {
            return Err(AppError::NotFound("Crop".to_string()));
        }
        if self.store.get_region(input.region_id).await?.is_none() {
            return Err(AppError::NotFound("Region".to_string()));
        }

        let source = input
            .source
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PRICE_SOURCE.to_string());

        let price = self
            .store
            .insert_price(NewMarketPrice {
                crop_id: input.crop_id,
                region_id: input.region_id,
                date: input.date.unwrap_or(today),
                price_per_kg: input.price_per_kg.round_dp(2),
                market_name: input.market_name.trim().to_string(),
                source,
            })
            .await?;

        tracing::info!(
            crop_id = %price.crop_id,
            region_id = %price.region_id,
            price = %price.price_per_kg,
            "Recorded market price"
        );
        Ok(price)
    }

    /// Last 30 days of prices for a crop, newest first
    pub async fn history(&self, crop_id: Uuid, today: NaiveDate) -> AppResult<PriceHistory> {
        if self.store.get_crop(crop_id).await?.is_none() {
            return Err(AppError::NotFound("Crop".to_string()));
        }

        let prices = self
            .store
            .list_prices(&PriceFilter {
                crop_id: Some(crop_id),
                range: DateRange::trailing(today, HISTORY_DAYS),
                limit: None,
            })
            .await?;

        let regions: HashMap<Uuid, String> = self
            .store
            .list_regions()
            .await?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();

        let price_data = prices
            .into_iter()
            .map(|p| PriceHistoryPoint {
                date: p.date,
                price: p.price_per_kg,
                location: regions.get(&p.region_id).cloned().unwrap_or_default(),
                market: p.market_name,
            })
            .collect();

        Ok(PriceHistory { price_data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::seed::SeedService;
    use crate::store::MemoryStore;
    use std::str::FromStr;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    async fn setup() -> (MarketService, Uuid, Uuid) {
        let store: DynStore = Arc::new(MemoryStore::new());
        SeedService::new(store.clone(), 0).run(today()).await.unwrap();
        let maize = store.find_crop_by_name("Maize").await.unwrap().unwrap();
        let zomba = store.find_region_by_name("Zomba").await.unwrap().unwrap();
        (MarketService::new(store), maize.id, zomba.id)
    }

    fn input(crop_id: Uuid, region_id: Uuid, date: NaiveDate, price: &str) -> RecordPriceInput {
        RecordPriceInput {
            crop_id,
            region_id,
            date: Some(date),
            price_per_kg: Decimal::from_str(price).unwrap(),
            market_name: "Zomba Central Market".to_string(),
            source: None,
        }
    }

    #[tokio::test]
    async fn test_record_defaults_source() {
        let (service, maize, zomba) = setup().await;
        let price = service
            .record_price(input(maize, zomba, today(), "350.456"), today())
            .await
            .unwrap();
        assert_eq!(price.source, DEFAULT_PRICE_SOURCE);
        assert_eq!(price.price_per_kg, Decimal::from_str("350.46").unwrap());
    }

    #[tokio::test]
    async fn test_rejects_non_positive_price() {
        let (service, maize, zomba) = setup().await;
        let err = service
            .record_price(input(maize, zomba, today(), "0"), today())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_history_window_and_location() {
        let (service, maize, zomba) = setup().await;
        for (days_ago, price) in [(0, "360"), (5, "340"), (45, "300")] {
            let date = today() - chrono::Duration::days(days_ago);
            service
                .record_price(input(maize, zomba, date, price), today())
                .await
                .unwrap();
        }

        let history = service.history(maize, today()).await.unwrap();
        assert_eq!(history.price_data.len(), 2);
        assert_eq!(history.price_data[0].date, today());
        assert_eq!(history.price_data[0].location, "Zomba");

        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json["price_data"][0]["price"], serde_json::json!(360.0));
        assert_eq!(json["price_data"][1]["market"], "Zomba Central Market");
    }
}
