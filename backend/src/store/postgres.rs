//! PostgreSQL store

use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{
    AdviceRecord, AdviceType, CalendarEntry, Crop, CropFilter, CropType, DateRange, Farmer,
    FarmerProfile, Language, MacroRegion, MarketPrice, NewAdviceRecord, NewCalendarEntry,
    NewCrop, NewMarketPrice, NewRegion, NewWeatherSnapshot, Region, User, WeatherSnapshot,
};

use super::{
    AdvisoryStore, CalendarFilter, PriceFilter, StoreError, StoreResult, StoreStats,
};

/// Store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }

    async fn crop_regions(&self, crop_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, BTreeSet<Uuid>>> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid)>(
            "SELECT crop_id, region_id FROM crop_suitable_regions WHERE crop_id = ANY($1)",
        )
        .bind(crop_ids)
        .fetch_all(&self.db)
        .await?;

        let mut map: HashMap<Uuid, BTreeSet<Uuid>> = HashMap::new();
        for (crop_id, region_id) in rows {
            map.entry(crop_id).or_default().insert(region_id);
        }
        Ok(map)
    }

    async fn hydrate_crops(&self, rows: Vec<CropRow>) -> StoreResult<Vec<Crop>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut regions = self.crop_regions(&ids).await?;
        rows.into_iter()
            .map(|row| {
                let suitable = regions.remove(&row.id).unwrap_or_default();
                row.into_crop(suitable)
            })
            .collect()
    }

    async fn hydrate_farmer(&self, row: FarmerRow) -> StoreResult<Farmer> {
        let crops = sqlx::query_scalar::<_, Uuid>(
            "SELECT crop_id FROM farmer_crops WHERE farmer_id = $1",
        )
        .bind(row.id)
        .fetch_all(&self.db)
        .await?;
        row.into_farmer(crops.into_iter().collect())
    }
}

/// Map a unique-constraint violation to [`StoreError::Conflict`]
fn on_conflict(entity: &'static str, key: String) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |err| match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict { entity, key }
        }
        _ => StoreError::Database(err),
    }
}

fn parse<T: FromStr<Err = shared::UnknownVariant>>(value: &str) -> StoreResult<T> {
    value
        .parse()
        .map_err(|e: shared::UnknownVariant| StoreError::InvalidData(e.to_string()))
}

fn month_from_db(month: i32) -> StoreResult<u32> {
    u32::try_from(month)
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| StoreError::InvalidData(format!("month out of range: {}", month)))
}

// ============================================================================
// Row types
// ============================================================================

#[derive(Debug, FromRow)]
struct RegionRow {
    id: Uuid,
    name: String,
    region: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    altitude_meters: Option<i32>,
    annual_rainfall_mm: Option<i32>,
}

impl TryFrom<RegionRow> for Region {
    type Error = StoreError;

    fn try_from(row: RegionRow) -> StoreResult<Self> {
        Ok(Region {
            id: row.id,
            name: row.name,
            region: parse::<MacroRegion>(&row.region)?,
            latitude: row.latitude,
            longitude: row.longitude,
            altitude_meters: row.altitude_meters,
            annual_rainfall_mm: row.annual_rainfall_mm,
        })
    }
}

#[derive(Debug, FromRow)]
struct CropRow {
    id: Uuid,
    name_en: String,
    name_ny: String,
    crop_type: String,
    scientific_name: Option<String>,
    planting_season: String,
    harvest_season: String,
    water_requirement: String,
    soil_type: String,
    growing_period_days: i32,
}

impl CropRow {
    fn into_crop(self, suitable_regions: BTreeSet<Uuid>) -> StoreResult<Crop> {
        Ok(Crop {
            id: self.id,
            name_en: self.name_en,
            name_ny: self.name_ny,
            crop_type: parse::<CropType>(&self.crop_type)?,
            scientific_name: self.scientific_name,
            planting_season: self.planting_season,
            harvest_season: self.harvest_season,
            water_requirement: self.water_requirement,
            soil_type: self.soil_type,
            growing_period_days: self.growing_period_days,
            suitable_regions,
        })
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    full_name: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            full_name: row.full_name,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct FarmerRow {
    id: Uuid,
    user_id: Uuid,
    phone_number: String,
    location_id: Option<Uuid>,
    farm_size_acres: f64,
    preferred_language: String,
    registration_date: DateTime<Utc>,
}

impl FarmerRow {
    fn into_farmer(self, primary_crops: BTreeSet<Uuid>) -> StoreResult<Farmer> {
        Ok(Farmer {
            id: self.id,
            user_id: self.user_id,
            phone_number: self.phone_number,
            location: self.location_id,
            farm_size_acres: self.farm_size_acres,
            preferred_language: parse::<Language>(&self.preferred_language)?,
            primary_crops,
            registration_date: self.registration_date,
        })
    }
}

#[derive(Debug, FromRow)]
struct SnapshotRow {
    id: Uuid,
    region_id: Uuid,
    date: NaiveDate,
    temperature_max: f64,
    temperature_min: f64,
    humidity: f64,
    rainfall: f64,
    wind_speed: Option<f64>,
    weather_condition: String,
}

impl From<SnapshotRow> for WeatherSnapshot {
    fn from(row: SnapshotRow) -> Self {
        WeatherSnapshot {
            id: row.id,
            region_id: row.region_id,
            date: row.date,
            temperature_max: row.temperature_max,
            temperature_min: row.temperature_min,
            humidity: row.humidity,
            rainfall: row.rainfall,
            wind_speed: row.wind_speed,
            weather_condition: row.weather_condition,
        }
    }
}

#[derive(Debug, FromRow)]
struct CalendarRow {
    id: Uuid,
    crop_id: Uuid,
    region_id: Uuid,
    month: i32,
    activity_en: String,
    activity_ny: String,
    description_en: String,
    description_ny: String,
}

impl TryFrom<CalendarRow> for CalendarEntry {
    type Error = StoreError;

    fn try_from(row: CalendarRow) -> StoreResult<Self> {
        Ok(CalendarEntry {
            id: row.id,
            crop_id: row.crop_id,
            region_id: row.region_id,
            month: month_from_db(row.month)?,
            activity_en: row.activity_en,
            activity_ny: row.activity_ny,
            description_en: row.description_en,
            description_ny: row.description_ny,
        })
    }
}

#[derive(Debug, FromRow)]
struct PriceRow {
    id: Uuid,
    crop_id: Uuid,
    region_id: Uuid,
    date: NaiveDate,
    price_per_kg: Decimal,
    market_name: String,
    source: String,
}

impl From<PriceRow> for MarketPrice {
    fn from(row: PriceRow) -> Self {
        MarketPrice {
            id: row.id,
            crop_id: row.crop_id,
            region_id: row.region_id,
            date: row.date,
            price_per_kg: row.price_per_kg,
            market_name: row.market_name,
            source: row.source,
        }
    }
}

#[derive(Debug, FromRow)]
struct AdviceRow {
    id: Uuid,
    farmer_id: Uuid,
    crop_id: Uuid,
    advice_type: String,
    title_en: String,
    title_ny: String,
    content_en: String,
    content_ny: String,
    weather_snapshot_id: Option<Uuid>,
    is_urgent: bool,
    validity_days: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<AdviceRow> for AdviceRecord {
    type Error = StoreError;

    fn try_from(row: AdviceRow) -> StoreResult<Self> {
        Ok(AdviceRecord {
            id: row.id,
            farmer_id: row.farmer_id,
            crop_id: row.crop_id,
            advice_type: parse::<AdviceType>(&row.advice_type)?,
            title_en: row.title_en,
            title_ny: row.title_ny,
            content_en: row.content_en,
            content_ny: row.content_ny,
            weather_snapshot_id: row.weather_snapshot_id,
            is_urgent: row.is_urgent,
            validity_days: row.validity_days,
            created_at: row.created_at,
        })
    }
}

const REGION_COLUMNS: &str =
    "id, name, region, latitude, longitude, altitude_meters, annual_rainfall_mm";
const CROP_COLUMNS: &str = "id, name_en, name_ny, crop_type, scientific_name, planting_season, \
     harvest_season, water_requirement, soil_type, growing_period_days";
const FARMER_COLUMNS: &str = "id, user_id, phone_number, location_id, farm_size_acres, \
     preferred_language, registration_date";
const SNAPSHOT_COLUMNS: &str = "id, region_id, date, temperature_max, temperature_min, humidity, \
     rainfall, wind_speed, weather_condition";
const CALENDAR_COLUMNS: &str = "id, crop_id, region_id, month, activity_en, activity_ny, \
     description_en, description_ny";
const ADVICE_COLUMNS: &str = "id, farmer_id, crop_id, advice_type, title_en, title_ny, \
     content_en, content_ny, weather_snapshot_id, is_urgent, validity_days, created_at";

#[axum::async_trait]
impl AdvisoryStore for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    // ========================================================================
    // Regions
    // ========================================================================

    async fn list_regions(&self) -> StoreResult<Vec<Region>> {
        sqlx::query_as::<_, RegionRow>(&format!(
            "SELECT {REGION_COLUMNS} FROM regions ORDER BY region, name"
        ))
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(Region::try_from)
        .collect()
    }

    async fn get_region(&self, id: Uuid) -> StoreResult<Option<Region>> {
        sqlx::query_as::<_, RegionRow>(&format!(
            "SELECT {REGION_COLUMNS} FROM regions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .map(Region::try_from)
        .transpose()
    }

    async fn find_region_by_name(&self, name: &str) -> StoreResult<Option<Region>> {
        sqlx::query_as::<_, RegionRow>(&format!(
            "SELECT {REGION_COLUMNS} FROM regions WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.db)
        .await?
        .map(Region::try_from)
        .transpose()
    }

    async fn insert_region(&self, region: NewRegion) -> StoreResult<Region> {
        let key = region.name.clone();
        sqlx::query_as::<_, RegionRow>(&format!(
            r#"
            INSERT INTO regions (id, name, region, latitude, longitude, altitude_meters, annual_rainfall_mm)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {REGION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&region.name)
        .bind(region.region.as_str())
        .bind(region.latitude)
        .bind(region.longitude)
        .bind(region.altitude_meters)
        .bind(region.annual_rainfall_mm)
        .fetch_one(&self.db)
        .await
        .map_err(on_conflict("region", key))?
        .try_into()
    }

    // ========================================================================
    // Crops
    // ========================================================================

    async fn list_crops(&self, filter: &CropFilter) -> StoreResult<Vec<Crop>> {
        let rows = sqlx::query_as::<_, CropRow>(&format!(
            r#"
            SELECT {CROP_COLUMNS} FROM crops c
            WHERE ($1::uuid IS NULL OR EXISTS (
                    SELECT 1 FROM crop_suitable_regions s
                    WHERE s.crop_id = c.id AND s.region_id = $1))
              AND ($2::text IS NULL OR c.crop_type = $2)
            ORDER BY crop_type, name_en
            "#
        ))
        .bind(filter.region_id)
        .bind(filter.crop_type.map(|t| t.as_str()))
        .fetch_all(&self.db)
        .await?;

        self.hydrate_crops(rows).await
    }

    async fn get_crop(&self, id: Uuid) -> StoreResult<Option<Crop>> {
        let row = sqlx::query_as::<_, CropRow>(&format!(
            "SELECT {CROP_COLUMNS} FROM crops WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => Ok(self.hydrate_crops(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_crop_by_name(&self, name_en: &str) -> StoreResult<Option<Crop>> {
        let row = sqlx::query_as::<_, CropRow>(&format!(
            "SELECT {CROP_COLUMNS} FROM crops WHERE name_en = $1"
        ))
        .bind(name_en)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => Ok(self.hydrate_crops(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn insert_crop(&self, crop: NewCrop) -> StoreResult<Crop> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, CropRow>(&format!(
            r#"
            INSERT INTO crops (id, name_en, name_ny, crop_type, scientific_name, planting_season,
                               harvest_season, water_requirement, soil_type, growing_period_days)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {CROP_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&crop.name_en)
        .bind(&crop.name_ny)
        .bind(crop.crop_type.as_str())
        .bind(&crop.scientific_name)
        .bind(&crop.planting_season)
        .bind(&crop.harvest_season)
        .bind(&crop.water_requirement)
        .bind(&crop.soil_type)
        .bind(crop.growing_period_days)
        .fetch_one(&mut *tx)
        .await
        .map_err(on_conflict("crop", crop.name_en.clone()))?;

        for region_id in &crop.suitable_regions {
            sqlx::query("INSERT INTO crop_suitable_regions (crop_id, region_id) VALUES ($1, $2)")
                .bind(row.id)
                .bind(region_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        row.into_crop(crop.suitable_regions)
    }

    // ========================================================================
    // Accounts & farmers
    // ========================================================================

    async fn insert_user(
        &self,
        username: &str,
        full_name: Option<&str>,
        password_hash: &str,
    ) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, full_name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, full_name, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(full_name)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(on_conflict("user", username.to_string()))?;

        Ok(row.into())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, full_name, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(User::from))
    }

    async fn get_farmer_by_user(&self, user_id: Uuid) -> StoreResult<Option<Farmer>> {
        let row = sqlx::query_as::<_, FarmerRow>(&format!(
            "SELECT {FARMER_COLUMNS} FROM farmers WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate_farmer(row).await?)),
            None => Ok(None),
        }
    }

    async fn upsert_farmer(&self, user_id: Uuid, profile: FarmerProfile) -> StoreResult<Farmer> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, FarmerRow>(&format!(
            r#"
            INSERT INTO farmers (id, user_id, phone_number, location_id, farm_size_acres, preferred_language)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE SET
                phone_number = EXCLUDED.phone_number,
                location_id = EXCLUDED.location_id,
                farm_size_acres = EXCLUDED.farm_size_acres,
                preferred_language = EXCLUDED.preferred_language
            RETURNING {FARMER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&profile.phone_number)
        .bind(profile.location)
        .bind(profile.farm_size_acres)
        .bind(profile.preferred_language.code())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM farmer_crops WHERE farmer_id = $1")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;
        for crop_id in &profile.primary_crops {
            sqlx::query("INSERT INTO farmer_crops (farmer_id, crop_id) VALUES ($1, $2)")
                .bind(row.id)
                .bind(crop_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        row.into_farmer(profile.primary_crops)
    }

    async fn set_farmer_language(&self, farmer_id: Uuid, language: Language) -> StoreResult<()> {
        sqlx::query("UPDATE farmers SET preferred_language = $2 WHERE id = $1")
            .bind(farmer_id)
            .bind(language.code())
            .execute(&self.db)
            .await?;
        Ok(())
    }

    // ========================================================================
    // Weather
    // ========================================================================

    async fn get_snapshot(
        &self,
        region_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<WeatherSnapshot>> {
        let row = sqlx::query_as::<_, SnapshotRow>(&format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM weather_snapshots WHERE region_id = $1 AND date = $2"
        ))
        .bind(region_id)
        .bind(date)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(WeatherSnapshot::from))
    }

    async fn insert_snapshot(&self, snapshot: NewWeatherSnapshot) -> StoreResult<WeatherSnapshot> {
        let key = format!("{}/{}", snapshot.region_id, snapshot.date);
        let row = sqlx::query_as::<_, SnapshotRow>(&format!(
            r#"
            INSERT INTO weather_snapshots (id, region_id, date, temperature_max, temperature_min,
                                           humidity, rainfall, wind_speed, weather_condition)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {SNAPSHOT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(snapshot.region_id)
        .bind(snapshot.date)
        .bind(snapshot.temperature_max)
        .bind(snapshot.temperature_min)
        .bind(snapshot.humidity)
        .bind(snapshot.rainfall)
        .bind(snapshot.wind_speed)
        .bind(&snapshot.weather_condition)
        .fetch_one(&self.db)
        .await
        .map_err(on_conflict("weather snapshot", key))?;

        Ok(row.into())
    }

    async fn list_snapshots(
        &self,
        region_id: Option<Uuid>,
        range: DateRange,
    ) -> StoreResult<Vec<WeatherSnapshot>> {
        let rows = sqlx::query_as::<_, SnapshotRow>(&format!(
            r#"
            SELECT {SNAPSHOT_COLUMNS} FROM weather_snapshots
            WHERE ($1::uuid IS NULL OR region_id = $1)
              AND date BETWEEN $2 AND $3
            ORDER BY date DESC, region_id
            "#
        ))
        .bind(region_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(WeatherSnapshot::from).collect())
    }

    // ========================================================================
    // Calendar
    // ========================================================================

    async fn get_calendar_entry(
        &self,
        crop_id: Uuid,
        region_id: Uuid,
        month: u32,
    ) -> StoreResult<Option<CalendarEntry>> {
        sqlx::query_as::<_, CalendarRow>(&format!(
            r#"
            SELECT {CALENDAR_COLUMNS} FROM calendar_entries
            WHERE crop_id = $1 AND region_id = $2 AND month = $3
            "#
        ))
        .bind(crop_id)
        .bind(region_id)
        .bind(month as i32)
        .fetch_optional(&self.db)
        .await?
        .map(CalendarEntry::try_from)
        .transpose()
    }

    async fn list_calendar(&self, filter: &CalendarFilter) -> StoreResult<Vec<CalendarEntry>> {
        sqlx::query_as::<_, CalendarRow>(&format!(
            r#"
            SELECT {CALENDAR_COLUMNS} FROM calendar_entries
            WHERE ($1::int IS NULL OR month = $1)
              AND ($2::uuid IS NULL OR region_id = $2)
              AND ($3::uuid[] IS NULL OR crop_id = ANY($3))
            ORDER BY month, crop_id, region_id
            "#
        ))
        .bind(filter.month.map(|m| m as i32))
        .bind(filter.region_id)
        .bind(filter.crop_ids.as_deref())
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(CalendarEntry::try_from)
        .collect()
    }

    async fn ensure_calendar_entry(&self, entry: NewCalendarEntry) -> StoreResult<CalendarEntry> {
        sqlx::query(
            r#"
            INSERT INTO calendar_entries (id, crop_id, region_id, month, activity_en, activity_ny,
                                          description_en, description_ny)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (crop_id, region_id, month) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.crop_id)
        .bind(entry.region_id)
        .bind(entry.month as i32)
        .bind(&entry.activity_en)
        .bind(&entry.activity_ny)
        .bind(&entry.description_en)
        .bind(&entry.description_ny)
        .execute(&self.db)
        .await?;

        self.get_calendar_entry(entry.crop_id, entry.region_id, entry.month)
            .await?
            .ok_or_else(|| StoreError::InvalidData("calendar entry vanished after insert".into()))
    }

    // ========================================================================
    // Market prices
    // ========================================================================

    async fn insert_price(&self, price: NewMarketPrice) -> StoreResult<MarketPrice> {
        let row = sqlx::query_as::<_, PriceRow>(
            r#"
            INSERT INTO market_prices (id, crop_id, region_id, date, price_per_kg, market_name, source)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, crop_id, region_id, date, price_per_kg, market_name, source
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(price.crop_id)
        .bind(price.region_id)
        .bind(price.date)
        .bind(price.price_per_kg)
        .bind(&price.market_name)
        .bind(&price.source)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn list_prices(&self, filter: &PriceFilter) -> StoreResult<Vec<MarketPrice>> {
        let rows = sqlx::query_as::<_, PriceRow>(
            r#"
            SELECT id, crop_id, region_id, date, price_per_kg, market_name, source
            FROM market_prices
            WHERE ($1::uuid IS NULL OR crop_id = $1)
              AND date BETWEEN $2 AND $3
            ORDER BY date DESC
            LIMIT $4
            "#,
        )
        .bind(filter.crop_id)
        .bind(filter.range.start)
        .bind(filter.range.end)
        .bind(filter.limit.map(|l| l as i64))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(MarketPrice::from).collect())
    }

    // ========================================================================
    // Advice
    // ========================================================================

    async fn insert_advice(
        &self,
        advice: NewAdviceRecord,
        created_at: DateTime<Utc>,
    ) -> StoreResult<AdviceRecord> {
        sqlx::query_as::<_, AdviceRow>(&format!(
            r#"
            INSERT INTO advice_records (id, farmer_id, crop_id, advice_type, title_en, title_ny,
                                        content_en, content_ny, weather_snapshot_id, is_urgent,
                                        validity_days, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {ADVICE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(advice.farmer_id)
        .bind(advice.crop_id)
        .bind(advice.advice_type.as_str())
        .bind(&advice.content.title_en)
        .bind(&advice.content.title_ny)
        .bind(&advice.content.content_en)
        .bind(&advice.content.content_ny)
        .bind(advice.weather_snapshot_id)
        .bind(advice.content.is_urgent)
        .bind(advice.validity_days)
        .bind(created_at)
        .fetch_one(&self.db)
        .await?
        .try_into()
    }

    async fn list_advice(
        &self,
        farmer_id: Uuid,
        since: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<AdviceRecord>> {
        sqlx::query_as::<_, AdviceRow>(&format!(
            r#"
            SELECT {ADVICE_COLUMNS} FROM advice_records
            WHERE farmer_id = $1
              AND ($2::timestamptz IS NULL OR created_at >= $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#
        ))
        .bind(farmer_id)
        .bind(since)
        .bind(limit.map(|l| l as i64))
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(AdviceRecord::try_from)
        .collect()
    }

    async fn stats(&self, advice_since: DateTime<Utc>) -> StoreResult<StoreStats> {
        let (total_farmers, total_crops, total_regions, recent_advice) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM farmers),
                    (SELECT COUNT(*) FROM crops),
                    (SELECT COUNT(*) FROM regions),
                    (SELECT COUNT(*) FROM advice_records WHERE created_at >= $1)
                "#,
            )
            .bind(advice_since)
            .fetch_one(&self.db)
            .await?;

        Ok(StoreStats {
            total_farmers,
            total_crops,
            total_regions,
            recent_advice,
        })
    }
}
