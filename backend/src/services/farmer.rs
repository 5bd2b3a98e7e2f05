//! Farmer profile service

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::DynStore;
use shared::{
    normalize_phone, validate_farm_size, validate_malawi_phone, CropFilter, Farmer, FarmerProfile,
    Language, Region,
};

#[derive(Clone)]
pub struct FarmerService {
    store: DynStore,
}

/// Profile fields supplied at registration or on update
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    pub phone_number: String,
    pub location: Option<Uuid>,
    pub farm_size_acres: f64,
    #[serde(default)]
    pub preferred_language: Language,
    #[serde(default)]
    pub primary_crops: BTreeSet<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct LanguageInput {
    pub language: String,
}

/// Farmer profile with the district resolved
#[derive(Debug, Serialize)]
pub struct FarmerView {
    #[serde(flatten)]
    pub farmer: Farmer,
    pub region: Option<Region>,
}

impl FarmerService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    /// The farmer linked to `user_id`
    pub async fn require_farmer(&self, user_id: Uuid) -> AppResult<Farmer> {
        self.store
            .get_farmer_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::IncompleteProfile("farmer profile".to_string()))
    }

    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<FarmerView> {
        let farmer = self.require_farmer(user_id).await?;
        let region = match farmer.location {
            Some(id) => self.store.get_region(id).await?,
            None => None,
        };
        Ok(FarmerView { farmer, region })
    }

    /// Create the profile for `user_id`, or replace it
    pub async fn save_profile(&self, user_id: Uuid, input: ProfileInput) -> AppResult<FarmerView> {
        let profile = self.prepare_profile(input).await?;
        let farmer = self.store.upsert_farmer(user_id, profile).await?;
        tracing::info!(farmer_id = %farmer.id, "Saved farmer profile");
        self.get_profile(user_id).await
    }

    /// Check the input and normalize it into storable form
    pub async fn prepare_profile(&self, input: ProfileInput) -> AppResult<FarmerProfile> {
        let phone_number = normalize_phone(&input.phone_number);
        validate_malawi_phone(&phone_number)
            .map_err(|m| AppError::invalid("phone_number", m))?;
        validate_farm_size(input.farm_size_acres)
            .map_err(|m| AppError::invalid("farm_size_acres", m))?;

        if let Some(location) = input.location {
            if self.store.get_region(location).await?.is_none() {
                return Err(AppError::NotFound("Region".to_string()));
            }
        }

        if !input.primary_crops.is_empty() {
            let known: BTreeSet<Uuid> = self
                .store
                .list_crops(&CropFilter::default())
                .await?
                .into_iter()
                .map(|c| c.id)
                .collect();
            if !input.primary_crops.is_subset(&known) {
                return Err(AppError::NotFound("Crop".to_string()));
            }
        }

        Ok(FarmerProfile {
            phone_number,
            location: input.location,
            farm_size_acres: input.farm_size_acres,
            preferred_language: input.preferred_language,
            primary_crops: input.primary_crops,
        })
    }

    /// Switch the farmer's interface language; only "en" and "ny" exist
    pub async fn set_language(&self, user_id: Uuid, code: &str) -> AppResult<Language> {
        let language: Language = code.trim().parse().map_err(|_| AppError::Validation {
            field: "language".to_string(),
            message: "Language must be 'en' or 'ny'".to_string(),
            message_ny: "Chiyankhulo chiyenera kukhala 'en' kapena 'ny'".to_string(),
        })?;

        let farmer = self.require_farmer(user_id).await?;
        self.store.set_farmer_language(farmer.id, language).await?;
        tracing::debug!(farmer_id = %farmer.id, language = language.code(), "Language changed");
        Ok(language)
    }
}
