//! Advisory service: turns a farmer's request into a stored advice record

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::farmer::FarmerService;
use crate::services::weather::WeatherService;
use crate::store::DynStore;
use shared::advice::{generate_advice, AdviceRequest, FarmerContext};
use shared::{AdviceRecord, AdviceType, Bilingual, Crop, CropFilter, Language, NewAdviceRecord};

#[derive(Clone)]
pub struct AdvisoryService {
    store: DynStore,
    weather: WeatherService,
    validity_days: i32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateAdviceInput {
    pub crop_id: Uuid,
    /// Unrecognised values produce general advice
    #[serde(default)]
    pub advice_type: Option<String>,
}

/// Stored advice plus the text in the farmer's language
#[derive(Debug, Serialize)]
pub struct AdviceView {
    #[serde(flatten)]
    pub record: AdviceRecord,
    pub crop_name: Bilingual,
    pub language: Language,
    pub title: String,
    pub content: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AdviceTypeOption {
    pub value: AdviceType,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AdviceOptions {
    pub crops: Vec<Crop>,
    pub advice_types: Vec<AdviceTypeOption>,
}

impl AdvisoryService {
    pub fn new(store: DynStore, config: &Config) -> Self {
        Self {
            weather: WeatherService::new(store.clone()),
            store,
            validity_days: config.advisory.validity_days,
        }
    }

    /// Use `weather` for snapshots instead of an entropy-seeded service
    pub fn with_weather(mut self, weather: WeatherService) -> Self {
        self.weather = weather;
        self
    }

    /// Generate, store and return advice for one of the farmer's crops
    pub async fn generate_advice(
        &self,
        user_id: Uuid,
        crop_id: Uuid,
        advice_type: &str,
        today: NaiveDate,
    ) -> AppResult<AdviceView> {
        let farmer = FarmerService::new(self.store.clone())
            .require_farmer(user_id)
            .await?;
        let crop = self
            .store
            .get_crop(crop_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Crop".to_string()))?;
        let advice_type = AdviceType::parse_lenient(advice_type);

        let region = match farmer.location {
            Some(id) => self.store.get_region(id).await?,
            None => None,
        };

        let (weather, calendar_entry) = match &region {
            Some(region) => {
                let weather = match self.weather.get_or_create_snapshot(region.id, today).await {
                    Ok(snapshot) => Some(snapshot),
                    Err(e) => {
                        tracing::warn!(
                            region_id = %region.id,
                            error = %e,
                            "Weather unavailable, continuing without it"
                        );
                        None
                    }
                };
                let entry = self
                    .store
                    .get_calendar_entry(crop.id, region.id, today.month())
                    .await?;
                (weather, entry)
            }
            None => (None, None),
        };

        let request = AdviceRequest::new(advice_type, &crop)
            .with_farmer(FarmerContext {
                region_name: region.as_ref().map(|r| r.name.clone()),
            })
            .with_calendar(calendar_entry.as_ref())
            .with_weather(weather.as_ref());
        let content = generate_advice(&request);

        let record = self
            .store
            .insert_advice(
                NewAdviceRecord {
                    farmer_id: farmer.id,
                    crop_id: crop.id,
                    advice_type,
                    content,
                    weather_snapshot_id: weather.as_ref().map(|w| w.id),
                    validity_days: self.validity_days,
                },
                Utc::now(),
            )
            .await
            .map_err(|e| AppError::GenerationFailure(e.to_string()))?;

        tracing::info!(
            farmer_id = %farmer.id,
            crop = %crop.name_en,
            advice_type = %advice_type,
            urgent = record.is_urgent,
            "Generated advice"
        );

        Ok(view(record, &crop, farmer.preferred_language))
    }

    /// Every advice record for the farmer, newest first
    pub async fn history(&self, user_id: Uuid) -> AppResult<Vec<AdviceView>> {
        self.recent(user_id, None, None).await
    }

    /// Advice since `since`, newest first, at most `limit`
    pub async fn recent(
        &self,
        user_id: Uuid,
        since: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> AppResult<Vec<AdviceView>> {
        let farmer = FarmerService::new(self.store.clone())
            .require_farmer(user_id)
            .await?;
        let records = self.store.list_advice(farmer.id, since, limit).await?;

        let mut views = Vec::with_capacity(records.len());
        for record in records {
            // advice rows always reference an existing crop
            let crop = self.store.get_crop(record.crop_id).await?;
            let crop_name = crop.map(|c| c.name()).unwrap_or_default();
            views.push(AdviceView {
                crop_name,
                language: farmer.preferred_language,
                title: record.title().get(farmer.preferred_language).to_string(),
                content: record.content().get(farmer.preferred_language).to_string(),
                expires_at: record.expires_at(),
                record,
            });
        }
        Ok(views)
    }

    /// Crops the farmer grows and the advice types on offer
    pub async fn options(&self, user_id: Uuid) -> AppResult<AdviceOptions> {
        let farmer = FarmerService::new(self.store.clone())
            .require_farmer(user_id)
            .await?;
        let crops = self
            .store
            .list_crops(&CropFilter::default())
            .await?
            .into_iter()
            .filter(|c| farmer.grows(c.id))
            .collect();

        Ok(AdviceOptions {
            crops,
            advice_types: AdviceType::ALL
                .into_iter()
                .map(|value| AdviceTypeOption {
                    value,
                    label: value.label(),
                })
                .collect(),
        })
    }
}

fn view(record: AdviceRecord, crop: &Crop, language: Language) -> AdviceView {
    let (title, content) = record.localized(language);
    AdviceView {
        crop_name: crop.name(),
        language,
        title,
        content,
        expires_at: record.expires_at(),
        record,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::farmer::ProfileInput;
    use crate::services::seed::SeedService;
    use crate::store::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 15).unwrap()
    }

    async fn setup(with_location: bool) -> (AdvisoryService, DynStore, Uuid, Uuid) {
        let store: DynStore = Arc::new(MemoryStore::new());
        SeedService::new(store.clone(), 0).run(today()).await.unwrap();
        let maize = store.find_crop_by_name("Maize").await.unwrap().unwrap();
        let lilongwe = store.find_region_by_name("Lilongwe").await.unwrap().unwrap();

        let user_id = Uuid::new_v4();
        FarmerService::new(store.clone())
            .save_profile(
                user_id,
                ProfileInput {
                    phone_number: "0991234567".to_string(),
                    location: with_location.then_some(lilongwe.id),
                    farm_size_acres: 3.0,
                    preferred_language: Language::Ny,
                    primary_crops: BTreeSet::from([maize.id]),
                },
            )
            .await
            .unwrap();

        let service = AdvisoryService::new(store.clone(), &Config::in_memory())
            .with_weather(WeatherService::with_rng(store.clone(), StdRng::seed_from_u64(3)));
        (service, store, user_id, maize.id)
    }

    #[tokio::test]
    async fn test_generate_attaches_weather_and_calendar() {
        let (service, store, user_id, maize) = setup(true).await;

        let advice = service
            .generate_advice(user_id, maize, "planting", today())
            .await
            .unwrap();

        assert_eq!(advice.record.advice_type, AdviceType::Planting);
        assert_eq!(advice.record.validity_days, 7);
        assert_eq!(advice.language, Language::Ny);
        assert_eq!(advice.title, advice.record.title_ny);
        assert!(advice.record.content_en.contains("**Current Month Activity:**"));

        let lilongwe = store.find_region_by_name("Lilongwe").await.unwrap().unwrap();
        let snapshot = store.get_snapshot(lilongwe.id, today()).await.unwrap().unwrap();
        assert_eq!(advice.record.weather_snapshot_id, Some(snapshot.id));
    }

    #[tokio::test]
    async fn test_unknown_type_is_general() {
        let (service, _, user_id, maize) = setup(true).await;
        let advice = service
            .generate_advice(user_id, maize, "unknown_value", today())
            .await
            .unwrap();
        assert_eq!(advice.record.advice_type, AdviceType::General);
        assert!(!advice.record.is_urgent);
    }

    #[tokio::test]
    async fn test_without_location_has_no_weather() {
        let (service, _, user_id, maize) = setup(false).await;
        let advice = service
            .generate_advice(user_id, maize, "weather", today())
            .await
            .unwrap();
        assert_eq!(advice.record.weather_snapshot_id, None);
        assert!(advice
            .record
            .content_en
            .contains("Weather data not available"));
    }

    #[tokio::test]
    async fn test_missing_farmer_and_crop() {
        let (service, _, user_id, maize) = setup(true).await;

        let err = service
            .generate_advice(Uuid::new_v4(), maize, "care", today())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::IncompleteProfile(_)));

        let err = service
            .generate_advice(user_id, Uuid::new_v4(), "care", today())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_history_newest_first_and_options() {
        let (service, _, user_id, maize) = setup(true).await;
        for advice_type in ["care", "harvest", "disease"] {
            service
                .generate_advice(user_id, maize, advice_type, today())
                .await
                .unwrap();
        }

        let history = service.history(user_id).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].record.advice_type, AdviceType::Disease);
        assert_eq!(history[0].crop_name.en, "Maize");

        let options = service.options(user_id).await.unwrap();
        assert_eq!(options.crops.len(), 1);
        assert_eq!(options.advice_types.len(), 6);
    }
}
