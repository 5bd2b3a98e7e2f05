//! Fixtures shared by the integration tests

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use mfa_backend::services::farmer::{FarmerService, ProfileInput};
use mfa_backend::services::{SeedService, WeatherService};
use mfa_backend::{AdvisoryStore, DynStore, MemoryStore};
use shared::{Crop, Language, Region};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// In-memory store with districts, crops and calendars but no weather
pub async fn seeded_store(today: NaiveDate) -> DynStore {
    let store: DynStore = Arc::new(MemoryStore::new());
    SeedService::new(store.clone(), 0)
        .with_weather(WeatherService::with_rng(store.clone(), StdRng::seed_from_u64(0)))
        .run(today)
        .await
        .unwrap();
    store
}

pub async fn region(store: &DynStore, name: &str) -> Region {
    store.find_region_by_name(name).await.unwrap().unwrap()
}

pub async fn crop(store: &DynStore, name: &str) -> Crop {
    store.find_crop_by_name(name).await.unwrap().unwrap()
}

/// Create a farmer profile for a fresh user id
pub async fn farmer_in(
    store: &DynStore,
    location: Option<Uuid>,
    crops: &[Uuid],
    language: Language,
) -> Uuid {
    let user_id = Uuid::new_v4();
    FarmerService::new(store.clone())
        .save_profile(
            user_id,
            ProfileInput {
                phone_number: "0991234567".to_string(),
                location,
                farm_size_acres: 2.0,
                preferred_language: language,
                primary_crops: crops.iter().copied().collect::<BTreeSet<_>>(),
            },
        )
        .await
        .unwrap();
    user_id
}
