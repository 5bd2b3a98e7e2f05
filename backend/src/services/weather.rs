//! Weather service: one synthesized snapshot per district per day

use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::{DynStore, StoreError};
use shared::weather_gen::synthesize;
use shared::{DateRange, NewWeatherSnapshot, Region, WeatherHistoryPoint, WeatherSnapshot};

/// Days of history shown by the weather views
pub const HISTORY_DAYS: i64 = 7;

type SharedRng = Arc<Mutex<Box<dyn RngCore + Send>>>;

/// Weather service for creating and reading daily snapshots
#[derive(Clone)]
pub struct WeatherService {
    store: DynStore,
    rng: SharedRng,
}

/// Recent snapshots for one district
#[derive(Debug, Serialize)]
pub struct RegionWeather {
    pub region: Region,
    pub snapshots: Vec<WeatherSnapshot>,
}

/// JSON body of the weather history feed
#[derive(Debug, Serialize)]
pub struct WeatherHistory {
    pub weather_data: Vec<WeatherHistoryPoint>,
}

impl WeatherService {
    /// Service drawing from an entropy-seeded generator
    pub fn new(store: DynStore) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    /// Service drawing from `rng`; tests pass seeded or mock generators
    pub fn with_rng<R: RngCore + Send + 'static>(store: DynStore, rng: R) -> Self {
        Self {
            store,
            rng: Arc::new(Mutex::new(Box::new(rng))),
        }
    }

    /// Today's snapshot for `region_id`, synthesizing it on first request
    pub async fn get_or_create_snapshot(
        &self,
        region_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<WeatherSnapshot> {
        if let Some(snapshot) = self.store.get_snapshot(region_id, date).await? {
            return Ok(snapshot);
        }

        if self.store.get_region(region_id).await?.is_none() {
            return Err(AppError::NotFound("Region".to_string()));
        }

        let draft = self.synthesize(region_id, date)?;
        match self.store.insert_snapshot(draft).await {
            Ok(snapshot) => {
                tracing::info!(
                    %region_id,
                    %date,
                    condition = %snapshot.weather_condition,
                    "Created weather snapshot"
                );
                Ok(snapshot)
            }
            // Another request stored this day first
            Err(StoreError::Conflict { entity, key }) => {
                tracing::debug!(%region_id, %date, "Snapshot created concurrently, re-reading");
                self.store
                    .get_snapshot(region_id, date)
                    .await?
                    .ok_or_else(|| AppError::StoreConflict {
                        entity: entity.to_string(),
                        key,
                    })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Existing snapshot only; never synthesizes
    pub async fn find_snapshot(
        &self,
        region_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Option<WeatherSnapshot>> {
        Ok(self.store.get_snapshot(region_id, date).await?)
    }

    /// Last week of weather for one district, newest first
    pub async fn history(&self, region_id: Uuid, today: NaiveDate) -> AppResult<WeatherHistory> {
        if self.store.get_region(region_id).await?.is_none() {
            return Err(AppError::NotFound("Region".to_string()));
        }

        let snapshots = self
            .store
            .list_snapshots(Some(region_id), DateRange::trailing(today, HISTORY_DAYS))
            .await?;

        Ok(WeatherHistory {
            weather_data: snapshots.iter().map(WeatherHistoryPoint::from).collect(),
        })
    }

    /// Recent weather for every district
    pub async fn all_regions(&self, today: NaiveDate) -> AppResult<Vec<RegionWeather>> {
        let regions = self.store.list_regions().await?;
        let mut result = Vec::with_capacity(regions.len());

        for region in regions {
            let mut snapshots = self
                .store
                .list_snapshots(Some(region.id), DateRange::trailing(today, HISTORY_DAYS))
                .await?;
            snapshots.truncate(HISTORY_DAYS as usize);
            result.push(RegionWeather { region, snapshots });
        }

        Ok(result)
    }

    /// Make sure the `days` days before `today` have snapshots
    pub async fn backfill(&self, region_id: Uuid, today: NaiveDate, days: i64) -> AppResult<usize> {
        let mut created = 0;
        for offset in 1..=days {
            let date = today - Duration::days(offset);
            if self.store.get_snapshot(region_id, date).await?.is_none() {
                self.get_or_create_snapshot(region_id, date).await?;
                created += 1;
            }
        }
        Ok(created)
    }

    fn synthesize(&self, region_id: Uuid, date: NaiveDate) -> AppResult<NewWeatherSnapshot> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| AppError::Internal("weather generator lock poisoned".to_string()))?;
        Ok(synthesize(region_id, date, &mut **rng))
    }
}
