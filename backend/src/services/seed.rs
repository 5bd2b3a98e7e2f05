//! Reference data: districts, crops, farming calendars and weather history
//!
//! Every step looks up existing rows first, so running the seeder on every
//! startup only fills in what is missing.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AppResult;
use crate::services::weather::WeatherService;
use crate::store::DynStore;
use shared::{CropType, MacroRegion, NewCalendarEntry, NewCrop, NewRegion, Region};

struct DistrictSeed {
    name: &'static str,
    region: MacroRegion,
    lat: f64,
    lng: f64,
    altitude: i32,
    rainfall: i32,
}

const fn district(
    name: &'static str,
    region: MacroRegion,
    lat: f64,
    lng: f64,
    altitude: i32,
    rainfall: i32,
) -> DistrictSeed {
    DistrictSeed {
        name,
        region,
        lat,
        lng,
        altitude,
        rainfall,
    }
}

use MacroRegion::{Central, Northern, Southern};

const DISTRICTS: [DistrictSeed; 27] = [
    district("Chitipa", Northern, -9.7, 33.3, 1280, 1000),
    district("Karonga", Northern, -9.9, 33.9, 529, 1200),
    district("Nkhata Bay", Northern, -11.6, 34.3, 476, 1400),
    district("Rumphi", Northern, -11.0, 33.9, 980, 1100),
    district("Mzimba", Northern, -11.9, 33.6, 1340, 1000),
    district("Likoma", Northern, -12.1, 34.7, 520, 1300),
    district("Kasungu", Central, -13.0, 33.5, 1060, 900),
    district("Nkhotakota", Central, -12.9, 34.3, 500, 1100),
    district("Ntchisi", Central, -13.3, 33.9, 1280, 950),
    district("Dowa", Central, -13.7, 33.9, 1200, 1000),
    district("Salima", Central, -13.8, 34.6, 512, 850),
    district("Lilongwe", Central, -13.97, 33.79, 1050, 900),
    district("Mchinji", Central, -13.8, 32.9, 1200, 950),
    district("Dedza", Central, -14.4, 34.3, 1600, 1100),
    district("Ntcheu", Central, -14.7, 34.6, 1100, 1000),
    district("Mangochi", Southern, -14.5, 35.3, 480, 900),
    district("Machinga", Southern, -14.9, 35.5, 760, 1000),
    district("Zomba", Southern, -15.4, 35.3, 915, 1200),
    district("Chiradzulu", Southern, -15.7, 35.1, 800, 1100),
    district("Blantyre", Southern, -15.8, 35.0, 1050, 1200),
    district("Mwanza", Southern, -15.6, 34.5, 1200, 1000),
    district("Thyolo", Southern, -16.1, 35.1, 800, 1300),
    district("Chikwawa", Southern, -16.0, 34.8, 100, 700),
    district("Nsanje", Southern, -16.9, 35.3, 40, 600),
    district("Balaka", Southern, -14.9, 34.9, 350, 850),
    district("Neno", Southern, -15.4, 34.6, 1200, 1000),
    district("Phalombe", Southern, -15.8, 35.7, 650, 1100),
];

struct CropSeed {
    name_en: &'static str,
    name_ny: &'static str,
    crop_type: CropType,
    scientific_name: &'static str,
    planting_season: &'static str,
    harvest_season: &'static str,
    water_requirement: &'static str,
    soil_type: &'static str,
    growing_period_days: i32,
}

#[rustfmt::skip]
const CROPS: [CropSeed; 18] = [
    CropSeed { name_en: "Maize", name_ny: "Chimanga", crop_type: CropType::Cereal, scientific_name: "Zea mays", planting_season: "November-January", harvest_season: "April-July", water_requirement: "Medium", soil_type: "Well-drained fertile soils", growing_period_days: 120 },
    CropSeed { name_en: "Rice", name_ny: "Mpunga", crop_type: CropType::Cereal, scientific_name: "Oryza sativa", planting_season: "November-February", harvest_season: "April-August", water_requirement: "High", soil_type: "Clay soils with good water retention", growing_period_days: 120 },
    CropSeed { name_en: "Sorghum", name_ny: "Mapira", crop_type: CropType::Cereal, scientific_name: "Sorghum bicolor", planting_season: "November-January", harvest_season: "May-July", water_requirement: "Low", soil_type: "Well-drained sandy loam", growing_period_days: 130 },
    CropSeed { name_en: "Millet", name_ny: "Mawere", crop_type: CropType::Cereal, scientific_name: "Pennisetum glaucum", planting_season: "November-January", harvest_season: "April-June", water_requirement: "Low", soil_type: "Sandy soils", growing_period_days: 90 },
    CropSeed { name_en: "Groundnuts", name_ny: "Mtedza", crop_type: CropType::Legume, scientific_name: "Arachis hypogaea", planting_season: "November-January", harvest_season: "April-June", water_requirement: "Medium", soil_type: "Well-drained sandy loam", growing_period_days: 120 },
    CropSeed { name_en: "Common Beans", name_ny: "Nyemba", crop_type: CropType::Legume, scientific_name: "Phaseolus vulgaris", planting_season: "November-February", harvest_season: "March-June", water_requirement: "Medium", soil_type: "Well-drained fertile soils", growing_period_days: 90 },
    CropSeed { name_en: "Cowpeas", name_ny: "Khobwe", crop_type: CropType::Legume, scientific_name: "Vigna unguiculata", planting_season: "November-February", harvest_season: "March-May", water_requirement: "Low", soil_type: "Sandy soils", growing_period_days: 75 },
    CropSeed { name_en: "Pigeon Peas", name_ny: "Nandolo", crop_type: CropType::Legume, scientific_name: "Cajanus cajan", planting_season: "November-January", harvest_season: "May-August", water_requirement: "Low", soil_type: "Well-drained soils", growing_period_days: 180 },
    CropSeed { name_en: "Soybeans", name_ny: "Soya", crop_type: CropType::Legume, scientific_name: "Glycine max", planting_season: "November-January", harvest_season: "April-June", water_requirement: "Medium", soil_type: "Well-drained fertile soils", growing_period_days: 110 },
    CropSeed { name_en: "Sweet Potato", name_ny: "Mbatata", crop_type: CropType::Tuber, scientific_name: "Ipomoea batatas", planting_season: "October-February", harvest_season: "March-July", water_requirement: "Medium", soil_type: "Well-drained sandy loam", growing_period_days: 120 },
    CropSeed { name_en: "Cassava", name_ny: "Chinangwa", crop_type: CropType::Tuber, scientific_name: "Manihot esculenta", planting_season: "October-February", harvest_season: "Year-round after 8-12 months", water_requirement: "Low", soil_type: "Well-drained soils", growing_period_days: 300 },
    CropSeed { name_en: "Irish Potato", name_ny: "Mbatata ya Azungu", crop_type: CropType::Tuber, scientific_name: "Solanum tuberosum", planting_season: "April-August", harvest_season: "July-November", water_requirement: "Medium", soil_type: "Well-drained fertile soils", growing_period_days: 90 },
    CropSeed { name_en: "Tomato", name_ny: "Phwetekele", crop_type: CropType::Vegetable, scientific_name: "Solanum lycopersicum", planting_season: "Year-round", harvest_season: "Year-round", water_requirement: "High", soil_type: "Well-drained fertile soils", growing_period_days: 80 },
    CropSeed { name_en: "Onion", name_ny: "Anyezi", crop_type: CropType::Vegetable, scientific_name: "Allium cepa", planting_season: "April-August", harvest_season: "August-December", water_requirement: "Medium", soil_type: "Well-drained sandy loam", growing_period_days: 120 },
    CropSeed { name_en: "Cabbage", name_ny: "Kabichi", crop_type: CropType::Vegetable, scientific_name: "Brassica oleracea", planting_season: "Year-round", harvest_season: "Year-round", water_requirement: "High", soil_type: "Rich, well-drained soils", growing_period_days: 90 },
    CropSeed { name_en: "Tobacco", name_ny: "Fodya", crop_type: CropType::Cash, scientific_name: "Nicotiana tabacum", planting_season: "September-November", harvest_season: "March-June", water_requirement: "Medium", soil_type: "Well-drained fertile soils", growing_period_days: 180 },
    CropSeed { name_en: "Cotton", name_ny: "Thonje", crop_type: CropType::Cash, scientific_name: "Gossypium hirsutum", planting_season: "November-January", harvest_season: "April-July", water_requirement: "Medium", soil_type: "Well-drained fertile soils", growing_period_days: 150 },
    CropSeed { name_en: "Sunflower", name_ny: "Mpendadzuwa", crop_type: CropType::Cash, scientific_name: "Helianthus annuus", planting_season: "November-January", harvest_season: "April-June", water_requirement: "Medium", soil_type: "Well-drained soils", growing_period_days: 110 },
];

/// (month, activity_en, activity_ny)
type Activity = (u32, &'static str, &'static str);

const MAIZE_CALENDAR: &[Activity] = &[
    (10, "Land preparation", "Konzani munda"),
    (11, "Planting", "Kubzala"),
    (12, "First weeding", "Kuchotsa udzu koyamba"),
    (1, "Second weeding and top dressing", "Kuchotsa udzu kachiwiri ndi feteleza"),
    (2, "Pest and disease control", "Kulimbana ndi tizilombo ndi matenda"),
    (3, "Monitoring and care", "Kuyang'anira"),
    (4, "Harvesting begins", "Kuyamba kutcha"),
    (5, "Main harvesting", "Kutcha kwa kanthawi"),
    (6, "Post-harvest processing", "Kukonza mbewu"),
    (7, "Storage", "Kusunga"),
];

const GROUNDNUT_CALENDAR: &[Activity] = &[
    (11, "Land preparation and planting", "Kukonza munda ndi kubzala"),
    (12, "Weeding and thinning", "Kuchotsa udzu"),
    (1, "Second weeding", "Kuchotsa udzu kachiwiri"),
    (2, "Flowering stage care", "Kusamalira nthawi ya maluwa"),
    (3, "Pod development monitoring", "Kuyang'anira kukula kwa nsonga"),
    (4, "Harvesting preparation", "Kukonzekera kutcha"),
    (5, "Harvesting", "Kutcha"),
    (6, "Drying and processing", "Kuuma ndi kukonza"),
];

const SWEET_POTATO_CALENDAR: &[Activity] = &[
    (10, "Land preparation", "Kukonza munda"),
    (11, "Planting vines", "Kubzala mitengo"),
    (12, "Weeding", "Kuchotsa udzu"),
    (1, "Ridge maintenance", "Kukonza mipanda"),
    (2, "Pest control", "Kulimbana ndi tizilombo"),
    (3, "Harvesting can begin", "Kutcha kungayambe"),
    (4, "Main harvesting", "Kutcha kwa kanthawi"),
    (5, "Continued harvesting", "Kupitirizabe kutcha"),
    (6, "Final harvest", "Kutcha komaliza"),
];

const RICE_CALENDAR: &[Activity] = &[
    (11, "Nursery preparation", "Kukonza malo ophukira"),
    (12, "Transplanting", "Kusamutsa"),
    (1, "Water management", "Kuyang'anira madzi"),
    (2, "Weeding and fertilizer application", "Kuchotsa udzu ndi feteleza"),
    (3, "Flowering stage", "Nthawi ya maluwa"),
    (4, "Grain filling", "Kudzaza kwa mbewu"),
    (5, "Harvesting", "Kutcha"),
    (6, "Processing and storage", "Kukonza ndi kusunga"),
];

const CALENDARS: [(&str, &[Activity]); 4] = [
    ("Maize", MAIZE_CALENDAR),
    ("Groundnuts", GROUNDNUT_CALENDAR),
    ("Sweet Potato", SWEET_POTATO_CALENDAR),
    ("Rice", RICE_CALENDAR),
];

/// Irish potatoes only do well above this altitude
const HIGHLAND_ALTITUDE_M: i32 = 800;

/// What a seeding run added
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub regions_created: usize,
    pub crops_created: usize,
    pub calendar_entries: usize,
    pub snapshots_created: usize,
}

pub struct SeedService {
    store: DynStore,
    weather: WeatherService,
    weather_history_days: i64,
}

impl SeedService {
    pub fn new(store: DynStore, weather_history_days: i64) -> Self {
        Self {
            weather: WeatherService::new(store.clone()),
            store,
            weather_history_days,
        }
    }

    pub fn with_weather(mut self, weather: WeatherService) -> Self {
        self.weather = weather;
        self
    }

    pub async fn run(&self, today: NaiveDate) -> AppResult<SeedReport> {
        let mut report = SeedReport::default();

        let regions = self.seed_regions(&mut report).await?;
        self.seed_crops(&regions, &mut report).await?;
        self.seed_calendars(&regions, &mut report).await?;

        for region in &regions {
            report.snapshots_created += self
                .weather
                .backfill(region.id, today, self.weather_history_days)
                .await?;
        }

        tracing::info!(
            regions = report.regions_created,
            crops = report.crops_created,
            calendar_entries = report.calendar_entries,
            snapshots = report.snapshots_created,
            "Reference data seeded"
        );
        Ok(report)
    }

    async fn seed_regions(&self, report: &mut SeedReport) -> AppResult<Vec<Region>> {
        let mut regions = Vec::with_capacity(DISTRICTS.len());
        for seed in &DISTRICTS {
            let region = match self.store.find_region_by_name(seed.name).await? {
                Some(existing) => existing,
                None => {
                    report.regions_created += 1;
                    self.store
                        .insert_region(NewRegion {
                            name: seed.name.to_string(),
                            region: seed.region,
                            latitude: Some(seed.lat),
                            longitude: Some(seed.lng),
                            altitude_meters: Some(seed.altitude),
                            annual_rainfall_mm: Some(seed.rainfall),
                        })
                        .await?
                }
            };
            regions.push(region);
        }
        Ok(regions)
    }

    async fn seed_crops(&self, regions: &[Region], report: &mut SeedReport) -> AppResult<()> {
        for seed in &CROPS {
            if self.store.find_crop_by_name(seed.name_en).await?.is_some() {
                continue;
            }
            self.store
                .insert_crop(NewCrop {
                    name_en: seed.name_en.to_string(),
                    name_ny: seed.name_ny.to_string(),
                    crop_type: seed.crop_type,
                    scientific_name: Some(seed.scientific_name.to_string()),
                    planting_season: seed.planting_season.to_string(),
                    harvest_season: seed.harvest_season.to_string(),
                    water_requirement: seed.water_requirement.to_string(),
                    soil_type: seed.soil_type.to_string(),
                    growing_period_days: seed.growing_period_days,
                    suitable_regions: suitable_regions(seed.name_en, regions),
                })
                .await?;
            report.crops_created += 1;
        }
        Ok(())
    }

    async fn seed_calendars(&self, regions: &[Region], report: &mut SeedReport) -> AppResult<()> {
        for (crop_name, activities) in CALENDARS {
            let Some(crop) = self.store.find_crop_by_name(crop_name).await? else {
                continue;
            };
            for region in regions {
                for &(month, activity_en, activity_ny) in activities {
                    self.store
                        .ensure_calendar_entry(NewCalendarEntry {
                            crop_id: crop.id,
                            region_id: region.id,
                            month,
                            activity_en: activity_en.to_string(),
                            activity_ny: activity_ny.to_string(),
                            description_en: format!(
                                "{} for {} in {}",
                                activity_en, crop.name_en, region.name
                            ),
                            description_ny: format!(
                                "{} wa {} ku {}",
                                activity_ny,
                                crop.name_ny_or_en(),
                                region.name
                            ),
                        })
                        .await?;
                    report.calendar_entries += 1;
                }
            }
        }
        Ok(())
    }
}

/// Districts a crop is grown in
fn suitable_regions(crop_name: &str, regions: &[Region]) -> BTreeSet<uuid::Uuid> {
    regions
        .iter()
        .filter(|r| match crop_name {
            "Irish Potato" => r.altitude_meters.is_some_and(|a| a > HIGHLAND_ALTITUDE_M),
            "Tobacco" => matches!(r.region, Central | Northern),
            _ => true,
        })
        .map(|r| r.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CalendarFilter, MemoryStore};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::CropFilter;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store: DynStore = Arc::new(MemoryStore::new());
        let seeder = SeedService::new(store.clone(), 3)
            .with_weather(WeatherService::with_rng(store.clone(), StdRng::seed_from_u64(1)));

        let first = seeder.run(today()).await.unwrap();
        assert_eq!(first.regions_created, 27);
        assert_eq!(first.crops_created, 18);
        assert_eq!(first.calendar_entries, 27 * (10 + 8 + 9 + 8));
        assert_eq!(first.snapshots_created, 27 * 3);

        let second = seeder.run(today()).await.unwrap();
        assert_eq!(second.regions_created, 0);
        assert_eq!(second.crops_created, 0);
        assert_eq!(second.snapshots_created, 0);

        let entries = store.list_calendar(&CalendarFilter::default()).await.unwrap();
        assert_eq!(entries.len(), 27 * 35);
    }

    #[tokio::test]
    async fn test_suitability_rules() {
        let store: DynStore = Arc::new(MemoryStore::new());
        SeedService::new(store.clone(), 0).run(today()).await.unwrap();

        let nsanje = store.find_region_by_name("Nsanje").await.unwrap().unwrap();
        let dedza = store.find_region_by_name("Dedza").await.unwrap().unwrap();
        let potato = store.find_crop_by_name("Irish Potato").await.unwrap().unwrap();
        assert!(potato.is_suitable_for(dedza.id));
        assert!(!potato.is_suitable_for(nsanje.id));

        let tobacco = store.find_crop_by_name("Tobacco").await.unwrap().unwrap();
        assert!(tobacco.is_suitable_for(dedza.id));
        assert!(!tobacco.is_suitable_for(nsanje.id));

        let in_nsanje = store
            .list_crops(&CropFilter {
                region_id: Some(nsanje.id),
                crop_type: None,
            })
            .await
            .unwrap();
        assert_eq!(in_nsanje.len(), 16);
    }

    #[tokio::test]
    async fn test_calendar_descriptions() {
        let store: DynStore = Arc::new(MemoryStore::new());
        SeedService::new(store.clone(), 0).run(today()).await.unwrap();

        let maize = store.find_crop_by_name("Maize").await.unwrap().unwrap();
        let zomba = store.find_region_by_name("Zomba").await.unwrap().unwrap();
        let entry = store
            .get_calendar_entry(maize.id, zomba.id, 11)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.description_en, "Planting for Maize in Zomba");
        assert_eq!(entry.description_ny, "Kubzala wa Chimanga ku Zomba");
    }
}
