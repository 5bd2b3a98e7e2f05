//! Public platform statistics

use chrono::{DateTime, Duration, Utc};

use crate::error::AppResult;
use crate::store::{DynStore, StoreStats};

/// Advice newer than this counts as recent
const RECENT_ADVICE_DAYS: i64 = 7;

#[derive(Clone)]
pub struct StatsService {
    store: DynStore,
}

impl StatsService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn stats(&self, now: DateTime<Utc>) -> AppResult<StoreStats> {
        Ok(self
            .store
            .stats(now - Duration::days(RECENT_ADVICE_DAYS))
            .await?)
    }
}
