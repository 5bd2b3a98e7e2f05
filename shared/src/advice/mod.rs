//! Bilingual advice rule engine
//!
//! Given a crop, an advice type, and whatever context is available (the
//! farmer's district, this month's calendar entry, today's weather) the engine
//! renders a title and body in English and Chichewa and decides whether the
//! advice is urgent. It is a pure function of its input.

pub mod diseases;
mod rules;
mod text;

use crate::models::{AdviceContent, AdviceType, CalendarEntry, Crop, WeatherSnapshot};

pub use diseases::{profile_for, DiseaseProfile};

/// Weather thresholds the rules compare against. Values are exclusive bounds
/// (`>` or `<`), in mm of rain, °C, or percent relative humidity.
pub mod thresholds {
    pub const PLANTING_GOOD_RAIN_MM: f64 = 20.0;
    pub const PLANTING_LOW_RAIN_MM: f64 = 5.0;

    pub const CARE_HEAT_C: f64 = 30.0;
    pub const CARE_HEAVY_RAIN_MM: f64 = 50.0;

    pub const DISEASE_HUMIDITY_PCT: f64 = 80.0;

    pub const HARVEST_RAIN_MM: f64 = 20.0;

    pub const WEATHER_HOT_C: f64 = 32.0;
    pub const WEATHER_COOL_C: f64 = 18.0;
    pub const WEATHER_HEAVY_RAIN_MM: f64 = 50.0;
    pub const WEATHER_LOW_RAIN_MM: f64 = 5.0;
    pub const WEATHER_HUMID_PCT: f64 = 85.0;

    pub const URGENT_RAIN_MM: f64 = 50.0;
    pub const URGENT_HEAT_C: f64 = 35.0;
    pub const URGENT_HUMIDITY_PCT: f64 = 90.0;
}

/// What the engine knows about the farmer asking
#[derive(Debug, Clone, Default)]
pub struct FarmerContext {
    /// District name, when the farmer has set a location
    pub region_name: Option<String>,
}

/// Everything needed to render one piece of advice
#[derive(Debug, Clone)]
pub struct AdviceRequest<'a> {
    pub advice_type: AdviceType,
    pub crop: &'a Crop,
    pub farmer: FarmerContext,
    pub calendar_entry: Option<&'a CalendarEntry>,
    pub weather: Option<&'a WeatherSnapshot>,
}

impl<'a> AdviceRequest<'a> {
    pub fn new(advice_type: AdviceType, crop: &'a Crop) -> Self {
        Self {
            advice_type,
            crop,
            farmer: FarmerContext::default(),
            calendar_entry: None,
            weather: None,
        }
    }

    pub fn with_farmer(mut self, farmer: FarmerContext) -> Self {
        self.farmer = farmer;
        self
    }

    pub fn with_calendar(mut self, entry: Option<&'a CalendarEntry>) -> Self {
        self.calendar_entry = entry;
        self
    }

    pub fn with_weather(mut self, weather: Option<&'a WeatherSnapshot>) -> Self {
        self.weather = weather;
        self
    }
}

/// Render advice for `request`
pub fn generate_advice(request: &AdviceRequest<'_>) -> AdviceContent {
    let (title_en, title_ny) = titles(request.advice_type, request.crop);

    let body = match request.advice_type {
        AdviceType::Planting => rules::planting(request),
        AdviceType::Care => rules::care(request),
        AdviceType::Disease => rules::disease(request),
        AdviceType::Harvest => rules::harvest(request),
        AdviceType::Weather => rules::weather(request),
        AdviceType::General => rules::general(request),
    };

    AdviceContent {
        title_en,
        title_ny,
        content_en: body.en,
        content_ny: body.ny,
        is_urgent: body.urgent,
    }
}

/// English and Chichewa titles for an advice type and crop
pub fn titles(advice_type: AdviceType, crop: &Crop) -> (String, String) {
    let en = &crop.name_en;
    let ny = crop.name_ny_or_en();

    match advice_type {
        AdviceType::Planting => (
            format!("Planting Advice for {en}"),
            format!("Malangizo a Kubzala {ny}"),
        ),
        AdviceType::Care => (
            format!("Care Instructions for {en}"),
            format!("Kusamalira {ny}"),
        ),
        AdviceType::Disease => (
            format!("Disease Prevention for {en}"),
            format!("Kupewa Matenda a {ny}"),
        ),
        AdviceType::Harvest => (
            format!("Harvest Guidelines for {en}"),
            format!("Malangizo a Kutcha {ny}"),
        ),
        AdviceType::Weather => (
            format!("Weather Advisory for {en}"),
            format!("Malangizo a Nyengo pa {ny}"),
        ),
        AdviceType::General => (
            format!("General Advice for {en}"),
            format!("Malangizo Onse a {ny}"),
        ),
    }
}

/// Whether today's weather alone makes weather advice urgent
pub fn weather_is_severe(weather: &WeatherSnapshot) -> bool {
    weather.rainfall > thresholds::URGENT_RAIN_MM
        || weather.temperature_max > thresholds::URGENT_HEAT_C
        || weather.humidity > thresholds::URGENT_HUMIDITY_PCT
}
