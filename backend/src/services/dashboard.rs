//! Farmer dashboard aggregation

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::advisory::{AdviceView, AdvisoryService};
use crate::services::calendar::{CalendarActivity, CalendarService};
use crate::services::farmer::{FarmerService, FarmerView};
use crate::services::weather::WeatherService;
use crate::store::{DynStore, PriceFilter};
use shared::{DateRange, MarketPrice, WeatherSnapshot};

const RECENT_ADVICE_DAYS: i64 = 30;
const RECENT_ADVICE_LIMIT: usize = 5;
const PRICE_DAYS: i64 = 7;
const PRICE_LIMIT: usize = 10;

#[derive(Clone)]
pub struct DashboardService {
    store: DynStore,
    advisory: AdvisoryService,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub farmer: FarmerView,
    pub recent_advice: Vec<AdviceView>,
    pub current_weather: Option<WeatherSnapshot>,
    pub farming_activities: Vec<CalendarActivity>,
    pub market_prices: Vec<MarketPrice>,
}

impl DashboardService {
    pub fn new(store: DynStore, advisory: AdvisoryService) -> Self {
        Self { store, advisory }
    }

    /// Everything the farmer sees on login; reads only, never creates weather
    pub async fn dashboard(&self, user_id: Uuid, today: NaiveDate) -> AppResult<Dashboard> {
        let farmer = FarmerService::new(self.store.clone())
            .get_profile(user_id)
            .await?;

        let since = (today - Duration::days(RECENT_ADVICE_DAYS))
            .and_time(NaiveTime::MIN)
            .and_utc();
        let recent_advice = self
            .advisory
            .recent(user_id, Some(since), Some(RECENT_ADVICE_LIMIT))
            .await?;

        let (current_weather, farming_activities, market_prices) = match farmer.farmer.location {
            Some(region_id) => {
                let weather = WeatherService::new(self.store.clone())
                    .find_snapshot(region_id, today)
                    .await?;
                let activities = CalendarService::new(self.store.clone())
                    .activities_for(&farmer.farmer.primary_crops, region_id, today.month())
                    .await?;
                let mut prices = self
                    .store
                    .list_prices(&PriceFilter {
                        crop_id: None,
                        range: DateRange::trailing(today, PRICE_DAYS),
                        limit: None,
                    })
                    .await?;
                prices.retain(|p| p.region_id == region_id && farmer.farmer.grows(p.crop_id));
                prices.truncate(PRICE_LIMIT);
                (weather, activities, prices)
            }
            None => (None, Vec::new(), Vec::new()),
        };

        Ok(Dashboard {
            farmer,
            recent_advice,
            current_weather,
            farming_activities,
            market_prices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::services::farmer::ProfileInput;
    use crate::services::market::{MarketService, RecordPriceInput};
    use crate::services::seed::SeedService;
    use crate::store::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal::Decimal;
    use shared::Language;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 15).unwrap()
    }

    #[tokio::test]
    async fn test_dashboard_is_scoped_to_farmer() {
        let store: DynStore = Arc::new(MemoryStore::new());
        SeedService::new(store.clone(), 0).run(today()).await.unwrap();
        let maize = store.find_crop_by_name("Maize").await.unwrap().unwrap();
        let rice = store.find_crop_by_name("Rice").await.unwrap().unwrap();
        let kasungu = store.find_region_by_name("Kasungu").await.unwrap().unwrap();

        let user_id = Uuid::new_v4();
        FarmerService::new(store.clone())
            .save_profile(
                user_id,
                ProfileInput {
                    phone_number: "0881234567".to_string(),
                    location: Some(kasungu.id),
                    farm_size_acres: 4.0,
                    preferred_language: Language::En,
                    primary_crops: BTreeSet::from([maize.id]),
                },
            )
            .await
            .unwrap();

        let market = MarketService::new(store.clone());
        for crop_id in [maize.id, rice.id] {
            market
                .record_price(
                    RecordPriceInput {
                        crop_id,
                        region_id: kasungu.id,
                        date: Some(today()),
                        price_per_kg: Decimal::new(42000, 2),
                        market_name: "Kasungu Boma".to_string(),
                        source: None,
                    },
                    today(),
                )
                .await
                .unwrap();
        }

        let advisory = AdvisoryService::new(store.clone(), &Config::in_memory())
            .with_weather(WeatherService::with_rng(store.clone(), StdRng::seed_from_u64(9)));
        let service = DashboardService::new(store.clone(), advisory.clone());

        let before = service.dashboard(user_id, today()).await.unwrap();
        assert!(before.current_weather.is_none());
        assert!(before.recent_advice.is_empty());
        assert_eq!(before.market_prices.len(), 1);
        assert_eq!(before.market_prices[0].crop_id, maize.id);
        assert_eq!(before.farming_activities.len(), 1);
        assert_eq!(before.farming_activities[0].activity.en, "Planting");

        advisory
            .generate_advice(user_id, maize.id, "weather", today())
            .await
            .unwrap();
        let after = service.dashboard(user_id, today()).await.unwrap();
        assert_eq!(after.recent_advice.len(), 1);
        assert!(after.current_weather.is_some());
    }

    #[tokio::test]
    async fn test_recent_advice_window_counts_back_from_today() {
        use shared::{AdviceContent, AdviceType, NewAdviceRecord};

        let store: DynStore = Arc::new(MemoryStore::new());
        SeedService::new(store.clone(), 0).run(today()).await.unwrap();
        let maize = store.find_crop_by_name("Maize").await.unwrap().unwrap();

        let user_id = Uuid::new_v4();
        FarmerService::new(store.clone())
            .save_profile(
                user_id,
                ProfileInput {
                    phone_number: "0881234567".to_string(),
                    location: None,
                    farm_size_acres: 2.0,
                    preferred_language: Language::En,
                    primary_crops: BTreeSet::from([maize.id]),
                },
            )
            .await
            .unwrap();
        let farmer = store.get_farmer_by_user(user_id).await.unwrap().unwrap();

        for (days_ago, title) in [(40, "Old"), (10, "Fresh")] {
            let created_at = (today() - Duration::days(days_ago))
                .and_hms_opt(12, 0, 0)
                .unwrap()
                .and_utc();
            store
                .insert_advice(
                    NewAdviceRecord {
                        farmer_id: farmer.id,
                        crop_id: maize.id,
                        advice_type: AdviceType::General,
                        content: AdviceContent {
                            title_en: title.to_string(),
                            title_ny: title.to_string(),
                            content_en: String::new(),
                            content_ny: String::new(),
                            is_urgent: false,
                        },
                        weather_snapshot_id: None,
                        validity_days: 7,
                    },
                    created_at,
                )
                .await
                .unwrap();
        }

        let advisory = AdvisoryService::new(store.clone(), &Config::in_memory());
        let dashboard = DashboardService::new(store.clone(), advisory)
            .dashboard(user_id, today())
            .await
            .unwrap();

        assert_eq!(dashboard.recent_advice.len(), 1);
        assert_eq!(dashboard.recent_advice[0].title, "Fresh");
    }
}
