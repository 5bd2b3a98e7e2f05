//! Crop catalogue and district lookups

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::{CalendarFilter, DynStore, PriceFilter};
use shared::{
    CalendarEntry, Crop, CropFilter, CropType, DateRange, MarketPrice, Region, UnknownVariant,
};

/// Prices shown on the crop detail page
const DETAIL_PRICE_DAYS: i64 = 30;
const DETAIL_PRICE_LIMIT: usize = 10;

#[derive(Clone)]
pub struct CropService {
    store: DynStore,
}

/// Query string of the crop listing
#[derive(Debug, Default, Deserialize)]
pub struct CropQuery {
    pub region: Option<Uuid>,
    #[serde(rename = "type")]
    pub crop_type: Option<String>,
}

impl CropQuery {
    pub fn into_filter(self) -> Result<CropFilter, UnknownVariant> {
        let crop_type = match self.crop_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(value.parse::<CropType>()?),
        };
        Ok(CropFilter {
            region_id: self.region,
            crop_type,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CropDetail {
    pub crop: Crop,
    pub calendar: Vec<CalendarEntry>,
    pub recent_prices: Vec<MarketPrice>,
}

impl CropService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list_regions(&self) -> AppResult<Vec<Region>> {
        Ok(self.store.list_regions().await?)
    }

    pub async fn list_crops(&self, query: CropQuery) -> AppResult<Vec<Crop>> {
        let filter = query.into_filter().map_err(|e| AppError::Validation {
            field: "type".to_string(),
            message: e.to_string(),
            message_ny: "Mtundu wa mbewu sukudziwika".to_string(),
        })?;
        Ok(self.store.list_crops(&filter).await?)
    }

    pub async fn get_crop(&self, crop_id: Uuid) -> AppResult<Crop> {
        self.store
            .get_crop(crop_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Crop".to_string()))
    }

    /// Crop with its calendar across districts and its latest prices
    pub async fn crop_detail(&self, crop_id: Uuid, today: NaiveDate) -> AppResult<CropDetail> {
        let crop = self.get_crop(crop_id).await?;

        let mut calendar = self
            .store
            .list_calendar(&CalendarFilter {
                crop_ids: Some(vec![crop_id]),
                ..Default::default()
            })
            .await?;
        calendar.sort_by_key(|entry| entry.month);

        let recent_prices = self
            .store
            .list_prices(&PriceFilter {
                crop_id: Some(crop_id),
                range: DateRange::trailing(today, DETAIL_PRICE_DAYS),
                limit: Some(DETAIL_PRICE_LIMIT),
            })
            .await?;

        Ok(CropDetail {
            crop,
            calendar,
            recent_prices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parses_type() {
        let filter = CropQuery {
            region: None,
            crop_type: Some("legume".to_string()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.crop_type, Some(CropType::Legume));

        let filter = CropQuery {
            region: None,
            crop_type: Some(String::new()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.crop_type, None);

        assert!(CropQuery {
            region: None,
            crop_type: Some("grain".to_string()),
        }
        .into_filter()
        .is_err());
    }
}
