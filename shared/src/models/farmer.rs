//! Farmer accounts and profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::types::Language;

/// A login account; a farmer profile hangs off it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Farmer profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Farmer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub phone_number: String,
    /// District the farm is in; advice needs it for weather and calendar data
    pub location: Option<Uuid>,
    pub farm_size_acres: f64,
    pub preferred_language: Language,
    pub primary_crops: BTreeSet<Uuid>,
    pub registration_date: DateTime<Utc>,
}

impl Farmer {
    pub fn grows(&self, crop_id: Uuid) -> bool {
        self.primary_crops.contains(&crop_id)
    }
}

/// Profile fields a farmer may set at registration or later
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmerProfile {
    pub phone_number: String,
    pub location: Option<Uuid>,
    pub farm_size_acres: f64,
    pub preferred_language: Language,
    pub primary_crops: BTreeSet<Uuid>,
}
