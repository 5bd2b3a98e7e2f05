//! In-process store

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use shared::{
    AdviceRecord, CalendarEntry, Crop, CropFilter, DateRange, Farmer, FarmerProfile, Language,
    MarketPrice, NewAdviceRecord, NewCalendarEntry, NewCrop, NewMarketPrice, NewRegion,
    NewWeatherSnapshot, Region, User, WeatherSnapshot,
};

use super::{
    AdvisoryStore, CalendarFilter, PriceFilter, StoreError, StoreResult, StoreStats,
};

#[derive(Default)]
struct Tables {
    regions: Vec<Region>,
    crops: Vec<Crop>,
    users: Vec<User>,
    farmers: Vec<Farmer>,
    snapshots: HashMap<(Uuid, NaiveDate), WeatherSnapshot>,
    calendar: HashMap<(Uuid, Uuid, u32), CalendarEntry>,
    prices: Vec<MarketPrice>,
    advice: Vec<AdviceRecord>,
}

/// Store holding every table in memory behind one lock
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

#[axum::async_trait]
impl AdvisoryStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }

    async fn list_regions(&self) -> StoreResult<Vec<Region>> {
        let mut regions = self.read()?.regions.clone();
        regions.sort_by(|a, b| {
            a.region
                .as_str()
                .cmp(b.region.as_str())
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(regions)
    }

    async fn get_region(&self, id: Uuid) -> StoreResult<Option<Region>> {
        Ok(self.read()?.regions.iter().find(|r| r.id == id).cloned())
    }

    async fn find_region_by_name(&self, name: &str) -> StoreResult<Option<Region>> {
        Ok(self.read()?.regions.iter().find(|r| r.name == name).cloned())
    }

    async fn insert_region(&self, region: NewRegion) -> StoreResult<Region> {
        let mut tables = self.write()?;
        if tables.regions.iter().any(|r| r.name == region.name) {
            return Err(StoreError::Conflict {
                entity: "region",
                key: region.name,
            });
        }
        let region = Region {
            id: Uuid::new_v4(),
            name: region.name,
            region: region.region,
            latitude: region.latitude,
            longitude: region.longitude,
            altitude_meters: region.altitude_meters,
            annual_rainfall_mm: region.annual_rainfall_mm,
        };
        tables.regions.push(region.clone());
        Ok(region)
    }

    async fn list_crops(&self, filter: &CropFilter) -> StoreResult<Vec<Crop>> {
        let mut crops: Vec<Crop> = self
            .read()?
            .crops
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        crops.sort_by(|a, b| {
            a.crop_type
                .cmp(&b.crop_type)
                .then_with(|| a.name_en.cmp(&b.name_en))
        });
        Ok(crops)
    }

    async fn get_crop(&self, id: Uuid) -> StoreResult<Option<Crop>> {
        Ok(self.read()?.crops.iter().find(|c| c.id == id).cloned())
    }

    async fn find_crop_by_name(&self, name_en: &str) -> StoreResult<Option<Crop>> {
        Ok(self
            .read()?
            .crops
            .iter()
            .find(|c| c.name_en == name_en)
            .cloned())
    }

    async fn insert_crop(&self, crop: NewCrop) -> StoreResult<Crop> {
        let mut tables = self.write()?;
        if tables.crops.iter().any(|c| c.name_en == crop.name_en) {
            return Err(StoreError::Conflict {
                entity: "crop",
                key: crop.name_en,
            });
        }
        let crop = Crop {
            id: Uuid::new_v4(),
            name_en: crop.name_en,
            name_ny: crop.name_ny,
            crop_type: crop.crop_type,
            scientific_name: crop.scientific_name,
            planting_season: crop.planting_season,
            harvest_season: crop.harvest_season,
            water_requirement: crop.water_requirement,
            soil_type: crop.soil_type,
            growing_period_days: crop.growing_period_days,
            suitable_regions: crop.suitable_regions,
        };
        tables.crops.push(crop.clone());
        Ok(crop)
    }

    async fn insert_user(
        &self,
        username: &str,
        full_name: Option<&str>,
        password_hash: &str,
    ) -> StoreResult<User> {
        let mut tables = self.write()?;
        if tables.users.iter().any(|u| u.username == username) {
            return Err(StoreError::Conflict {
                entity: "user",
                key: username.to_string(),
            });
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            full_name: full_name.map(str::to_string),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_farmer_by_user(&self, user_id: Uuid) -> StoreResult<Option<Farmer>> {
        Ok(self
            .read()?
            .farmers
            .iter()
            .find(|f| f.user_id == user_id)
            .cloned())
    }

    async fn upsert_farmer(&self, user_id: Uuid, profile: FarmerProfile) -> StoreResult<Farmer> {
        let mut tables = self.write()?;
        if let Some(farmer) = tables.farmers.iter_mut().find(|f| f.user_id == user_id) {
            farmer.phone_number = profile.phone_number;
            farmer.location = profile.location;
            farmer.farm_size_acres = profile.farm_size_acres;
            farmer.preferred_language = profile.preferred_language;
            farmer.primary_crops = profile.primary_crops;
            return Ok(farmer.clone());
        }
        let farmer = Farmer {
            id: Uuid::new_v4(),
            user_id,
            phone_number: profile.phone_number,
            location: profile.location,
            farm_size_acres: profile.farm_size_acres,
            preferred_language: profile.preferred_language,
            primary_crops: profile.primary_crops,
            registration_date: Utc::now(),
        };
        tables.farmers.push(farmer.clone());
        Ok(farmer)
    }

    async fn set_farmer_language(&self, farmer_id: Uuid, language: Language) -> StoreResult<()> {
        let mut tables = self.write()?;
        if let Some(farmer) = tables.farmers.iter_mut().find(|f| f.id == farmer_id) {
            farmer.preferred_language = language;
        }
        Ok(())
    }

    async fn get_snapshot(
        &self,
        region_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<WeatherSnapshot>> {
        Ok(self.read()?.snapshots.get(&(region_id, date)).cloned())
    }

    async fn insert_snapshot(&self, snapshot: NewWeatherSnapshot) -> StoreResult<WeatherSnapshot> {
        let mut tables = self.write()?;
        let key = (snapshot.region_id, snapshot.date);
        if tables.snapshots.contains_key(&key) {
            return Err(StoreError::Conflict {
                entity: "weather snapshot",
                key: format!("{}/{}", snapshot.region_id, snapshot.date),
            });
        }
        let snapshot = snapshot.into_snapshot(Uuid::new_v4());
        tables.snapshots.insert(key, snapshot.clone());
        Ok(snapshot)
    }

    async fn list_snapshots(
        &self,
        region_id: Option<Uuid>,
        range: DateRange,
    ) -> StoreResult<Vec<WeatherSnapshot>> {
        let mut snapshots: Vec<WeatherSnapshot> = self
            .read()?
            .snapshots
            .values()
            .filter(|s| region_id.map_or(true, |r| s.region_id == r))
            .filter(|s| range.contains(s.date))
            .cloned()
            .collect();
        snapshots.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.region_id.cmp(&b.region_id)));
        Ok(snapshots)
    }

    async fn get_calendar_entry(
        &self,
        crop_id: Uuid,
        region_id: Uuid,
        month: u32,
    ) -> StoreResult<Option<CalendarEntry>> {
        Ok(self
            .read()?
            .calendar
            .get(&(crop_id, region_id, month))
            .cloned())
    }

    async fn list_calendar(&self, filter: &CalendarFilter) -> StoreResult<Vec<CalendarEntry>> {
        let mut entries: Vec<CalendarEntry> = self
            .read()?
            .calendar
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        entries.sort_by_key(|e| (e.month, e.crop_id, e.region_id));
        Ok(entries)
    }

    async fn ensure_calendar_entry(&self, entry: NewCalendarEntry) -> StoreResult<CalendarEntry> {
        let mut tables = self.write()?;
        let key = (entry.crop_id, entry.region_id, entry.month);
        let stored = tables.calendar.entry(key).or_insert_with(|| CalendarEntry {
            id: Uuid::new_v4(),
            crop_id: entry.crop_id,
            region_id: entry.region_id,
            month: entry.month,
            activity_en: entry.activity_en,
            activity_ny: entry.activity_ny,
            description_en: entry.description_en,
            description_ny: entry.description_ny,
        });
        Ok(stored.clone())
    }

    async fn insert_price(&self, price: NewMarketPrice) -> StoreResult<MarketPrice> {
        let price = MarketPrice {
            id: Uuid::new_v4(),
            crop_id: price.crop_id,
            region_id: price.region_id,
            date: price.date,
            price_per_kg: price.price_per_kg,
            market_name: price.market_name,
            source: price.source,
        };
        self.write()?.prices.push(price.clone());
        Ok(price)
    }

    async fn list_prices(&self, filter: &PriceFilter) -> StoreResult<Vec<MarketPrice>> {
        let mut prices: Vec<MarketPrice> = self
            .read()?
            .prices
            .iter()
            .filter(|p| filter.crop_id.map_or(true, |c| p.crop_id == c))
            .filter(|p| filter.range.contains(p.date))
            .cloned()
            .collect();
        prices.sort_by(|a, b| b.date.cmp(&a.date));
        if let Some(limit) = filter.limit {
            prices.truncate(limit);
        }
        Ok(prices)
    }

    async fn insert_advice(
        &self,
        advice: NewAdviceRecord,
        created_at: DateTime<Utc>,
    ) -> StoreResult<AdviceRecord> {
        let record = advice.into_record(Uuid::new_v4(), created_at);
        self.write()?.advice.push(record.clone());
        Ok(record)
    }

    async fn list_advice(
        &self,
        farmer_id: Uuid,
        since: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<AdviceRecord>> {
        let mut records: Vec<AdviceRecord> = self
            .read()?
            .advice
            .iter()
            .filter(|a| a.farmer_id == farmer_id)
            .filter(|a| since.map_or(true, |s| a.created_at >= s))
            .cloned()
            .collect();
        // latest insert first among equal timestamps
        records.reverse();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    async fn stats(&self, advice_since: DateTime<Utc>) -> StoreResult<StoreStats> {
        let tables = self.read()?;
        Ok(StoreStats {
            total_farmers: tables.farmers.len() as i64,
            total_crops: tables.crops.len() as i64,
            total_regions: tables.regions.len() as i64,
            recent_advice: tables
                .advice
                .iter()
                .filter(|a| a.created_at >= advice_since)
                .count() as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::MacroRegion;

    fn lilongwe() -> NewRegion {
        NewRegion {
            name: "Lilongwe".to_string(),
            region: MacroRegion::Central,
            latitude: Some(-13.9626),
            longitude: Some(33.7741),
            altitude_meters: Some(1050),
            annual_rainfall_mm: Some(900),
        }
    }

    fn snapshot(region_id: Uuid, date: NaiveDate) -> NewWeatherSnapshot {
        NewWeatherSnapshot {
            region_id,
            date,
            temperature_max: 29.0,
            temperature_min: 18.0,
            humidity: 70.0,
            rainfall: 4.0,
            wind_speed: Some(12.0),
            weather_condition: "Sunny".to_string(),
        }
    }

    #[tokio::test]
    async fn test_snapshot_uniqueness() {
        let store = MemoryStore::new();
        let region = store.insert_region(lilongwe()).await.unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        store.insert_snapshot(snapshot(region.id, date)).await.unwrap();
        let err = store
            .insert_snapshot(snapshot(region.id, date))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_calendar_ensure_is_idempotent() {
        let store = MemoryStore::new();
        let entry = NewCalendarEntry {
            crop_id: Uuid::new_v4(),
            region_id: Uuid::new_v4(),
            month: 11,
            activity_en: "Planting".to_string(),
            activity_ny: "Kubzala".to_string(),
            description_en: String::new(),
            description_ny: String::new(),
        };

        let first = store.ensure_calendar_entry(entry.clone()).await.unwrap();
        let second = store.ensure_calendar_entry(entry).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(
            store.list_calendar(&CalendarFilter::default()).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryStore::new();
        store.insert_user("banda", None, "hash").await.unwrap();
        assert!(store.insert_user("banda", None, "hash").await.is_err());
    }
}
