//! Domain store
//!
//! Every query the services need, behind one trait. [`PgStore`] backs the
//! server; [`MemoryStore`] holds everything in process for tests and
//! database-less runs. Both enforce the same uniqueness rules.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use shared::{
    AdviceRecord, CalendarEntry, Crop, CropFilter, DateRange, Farmer, FarmerProfile, Language,
    MarketPrice, NewAdviceRecord, NewCalendarEntry, NewCrop, NewMarketPrice, NewRegion,
    NewWeatherSnapshot, Region, User, WeatherSnapshot,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Shared handle used by services
pub type DynStore = Arc<dyn AdvisoryStore>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("{entity} already exists: {key}")]
    Conflict { entity: &'static str, key: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// A stored value could not be mapped back to a domain type
    #[error("invalid stored data: {0}")]
    InvalidData(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Calendar listing filter; unset fields match everything
#[derive(Debug, Clone, Default)]
pub struct CalendarFilter {
    pub month: Option<u32>,
    pub region_id: Option<Uuid>,
    pub crop_ids: Option<Vec<Uuid>>,
}

impl CalendarFilter {
    pub fn matches(&self, entry: &CalendarEntry) -> bool {
        self.month.map_or(true, |m| entry.month == m)
            && self.region_id.map_or(true, |r| entry.region_id == r)
            && self
                .crop_ids
                .as_ref()
                .map_or(true, |ids| ids.contains(&entry.crop_id))
    }
}

/// Market price listing filter. Results are newest first.
#[derive(Debug, Clone)]
pub struct PriceFilter {
    pub crop_id: Option<Uuid>,
    pub range: DateRange,
    pub limit: Option<usize>,
}

/// Row counts for the public stats endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct StoreStats {
    pub total_farmers: i64,
    pub total_crops: i64,
    pub total_regions: i64,
    pub recent_advice: i64,
}

#[axum::async_trait]
pub trait AdvisoryStore: Send + Sync + 'static {
    /// Name shown in logs and the health endpoint
    fn backend_name(&self) -> &'static str;

    async fn ping(&self) -> StoreResult<()>;

    // Regions
    async fn list_regions(&self) -> StoreResult<Vec<Region>>;
    async fn get_region(&self, id: Uuid) -> StoreResult<Option<Region>>;
    async fn find_region_by_name(&self, name: &str) -> StoreResult<Option<Region>>;
    async fn insert_region(&self, region: NewRegion) -> StoreResult<Region>;

    // Crops
    async fn list_crops(&self, filter: &CropFilter) -> StoreResult<Vec<Crop>>;
    async fn get_crop(&self, id: Uuid) -> StoreResult<Option<Crop>>;
    async fn find_crop_by_name(&self, name_en: &str) -> StoreResult<Option<Crop>>;
    async fn insert_crop(&self, crop: NewCrop) -> StoreResult<Crop>;

    // Accounts
    async fn insert_user(
        &self,
        username: &str,
        full_name: Option<&str>,
        password_hash: &str,
    ) -> StoreResult<User>;
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    // Farmers
    async fn get_farmer_by_user(&self, user_id: Uuid) -> StoreResult<Option<Farmer>>;
    /// Create the farmer for `user_id`, or replace its profile fields
    async fn upsert_farmer(&self, user_id: Uuid, profile: FarmerProfile) -> StoreResult<Farmer>;
    async fn set_farmer_language(&self, farmer_id: Uuid, language: Language) -> StoreResult<()>;

    // Weather
    async fn get_snapshot(
        &self,
        region_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<WeatherSnapshot>>;
    /// Fails with [`StoreError::Conflict`] when (region, date) already exists
    async fn insert_snapshot(&self, snapshot: NewWeatherSnapshot) -> StoreResult<WeatherSnapshot>;
    /// Snapshots in `range`, newest first
    async fn list_snapshots(
        &self,
        region_id: Option<Uuid>,
        range: DateRange,
    ) -> StoreResult<Vec<WeatherSnapshot>>;

    // Calendar
    async fn get_calendar_entry(
        &self,
        crop_id: Uuid,
        region_id: Uuid,
        month: u32,
    ) -> StoreResult<Option<CalendarEntry>>;
    async fn list_calendar(&self, filter: &CalendarFilter) -> StoreResult<Vec<CalendarEntry>>;
    /// Insert unless (crop, region, month) exists; returns the stored entry
    async fn ensure_calendar_entry(&self, entry: NewCalendarEntry) -> StoreResult<CalendarEntry>;

    // Market prices
    async fn insert_price(&self, price: NewMarketPrice) -> StoreResult<MarketPrice>;
    async fn list_prices(&self, filter: &PriceFilter) -> StoreResult<Vec<MarketPrice>>;

    // Advice
    async fn insert_advice(
        &self,
        advice: NewAdviceRecord,
        created_at: DateTime<Utc>,
    ) -> StoreResult<AdviceRecord>;
    /// Advice for a farmer, newest first
    async fn list_advice(
        &self,
        farmer_id: Uuid,
        since: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<AdviceRecord>>;

    async fn stats(&self, advice_since: DateTime<Utc>) -> StoreResult<StoreStats>;
}
