//! Farming calendar views

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::{CalendarFilter, DynStore};
use shared::{month_name, validate_month, Bilingual, CalendarEntry, CropFilter};

#[derive(Clone)]
pub struct CalendarService {
    store: DynStore,
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub month: Option<u32>,
    pub region: Option<Uuid>,
}

/// Calendar entry with crop and district names resolved
#[derive(Debug, Clone, Serialize)]
pub struct CalendarActivity {
    pub id: Uuid,
    pub month: u32,
    pub crop_id: Uuid,
    pub crop_name: Bilingual,
    pub region_id: Uuid,
    pub region_name: String,
    pub activity: Bilingual,
    pub description: Bilingual,
}

#[derive(Debug, Serialize)]
pub struct MonthActivities {
    pub month: u32,
    pub month_name: &'static str,
    pub activities: Vec<CalendarActivity>,
}

#[derive(Debug, Serialize)]
pub struct CalendarView {
    pub month: u32,
    pub month_name: &'static str,
    pub current_activities: Vec<CalendarActivity>,
    pub by_month: Vec<MonthActivities>,
}

impl CalendarService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    /// Activities for the requested month plus the whole year grouped by month
    pub async fn month_view(
        &self,
        query: CalendarQuery,
        current_month: u32,
    ) -> AppResult<CalendarView> {
        let month = query.month.unwrap_or(current_month);
        validate_month(month).map_err(|m| AppError::invalid("month", m))?;

        let entries = self
            .store
            .list_calendar(&CalendarFilter {
                region_id: query.region,
                ..Default::default()
            })
            .await?;
        let activities = self.resolve(entries).await?;

        let current_activities = activities
            .iter()
            .filter(|a| a.month == month)
            .cloned()
            .collect();

        let mut grouped: BTreeMap<u32, Vec<CalendarActivity>> = BTreeMap::new();
        for activity in activities {
            grouped.entry(activity.month).or_default().push(activity);
        }
        let by_month = grouped
            .into_iter()
            .map(|(month, activities)| MonthActivities {
                month,
                month_name: month_name(month).unwrap_or_default(),
                activities,
            })
            .collect();

        Ok(CalendarView {
            month,
            month_name: month_name(month).unwrap_or_default(),
            current_activities,
            by_month,
        })
    }

    /// This month's work for the given crops in one district
    pub async fn activities_for(
        &self,
        crop_ids: &BTreeSet<Uuid>,
        region_id: Uuid,
        month: u32,
    ) -> AppResult<Vec<CalendarActivity>> {
        if crop_ids.is_empty() {
            return Ok(Vec::new());
        }
        let entries = self
            .store
            .list_calendar(&CalendarFilter {
                month: Some(month),
                region_id: Some(region_id),
                crop_ids: Some(crop_ids.iter().copied().collect()),
            })
            .await?;
        self.resolve(entries).await
    }

    /// Attach names and order by (month, English crop name)
    async fn resolve(&self, entries: Vec<CalendarEntry>) -> AppResult<Vec<CalendarActivity>> {
        let crops: HashMap<Uuid, Bilingual> = self
            .store
            .list_crops(&CropFilter::default())
            .await?
            .into_iter()
            .map(|c| (c.id, c.name()))
            .collect();
        let regions: HashMap<Uuid, String> = self
            .store
            .list_regions()
            .await?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();

        let mut activities: Vec<CalendarActivity> = entries
            .into_iter()
            .map(|entry| CalendarActivity {
                id: entry.id,
                month: entry.month,
                crop_id: entry.crop_id,
                crop_name: crops.get(&entry.crop_id).cloned().unwrap_or_default(),
                region_id: entry.region_id,
                region_name: regions.get(&entry.region_id).cloned().unwrap_or_default(),
                activity: entry.activity(),
                description: entry.description(),
            })
            .collect();

        activities.sort_by(|a, b| {
            a.month
                .cmp(&b.month)
                .then_with(|| a.crop_name.en.cmp(&b.crop_name.en))
                .then_with(|| a.region_name.cmp(&b.region_name))
        });
        Ok(activities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::seed::SeedService;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use std::sync::Arc;

    async fn seeded() -> DynStore {
        let store: DynStore = Arc::new(MemoryStore::new());
        SeedService::new(store.clone(), 0)
            .run(NaiveDate::from_ymd_opt(2024, 11, 15).unwrap())
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_month_view_for_one_district() {
        let store = seeded().await;
        let lilongwe = store.find_region_by_name("Lilongwe").await.unwrap().unwrap();
        let service = CalendarService::new(store);

        let view = service
            .month_view(
                CalendarQuery {
                    month: None,
                    region: Some(lilongwe.id),
                },
                11,
            )
            .await
            .unwrap();

        assert_eq!(view.month_name, "November");
        assert!(view.current_activities.iter().all(|a| a.month == 11));
        assert!(view
            .current_activities
            .iter()
            .any(|a| a.crop_name.en == "Maize" && a.region_name == "Lilongwe"));
        assert!(view.by_month.windows(2).all(|w| w[0].month < w[1].month));
    }

    #[tokio::test]
    async fn test_invalid_month() {
        let service = CalendarService::new(seeded().await);
        let err = service
            .month_view(
                CalendarQuery {
                    month: Some(13),
                    region: None,
                },
                1,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_activities_for_no_crops() {
        let service = CalendarService::new(seeded().await);
        let activities = service
            .activities_for(&BTreeSet::new(), Uuid::new_v4(), 11)
            .await
            .unwrap();
        assert!(activities.is_empty());
    }
}
