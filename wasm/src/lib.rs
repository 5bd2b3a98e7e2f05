//! WebAssembly module for the Malawi Farm Advisory Platform
//!
//! Provides client-side helpers for:
//! - Phone number and farm size validation before submitting forms
//! - Season lookup for the farming calendar
//! - Offline advice preview using the same rule engine as the server

use serde::Deserialize;
use wasm_bindgen::prelude::*;

use shared::advice::{generate_advice, AdviceRequest, FarmerContext};
use shared::climate::Season;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("farm advisory helpers loaded"));
}

/// Normalized phone number, or the reason it was rejected
#[wasm_bindgen]
pub fn check_phone_number(phone: &str) -> Result<String, JsValue> {
    normalized_phone(phone).map_err(|e| JsValue::from_str(e))
}

/// Whether `phone` is a Malawi mobile or landline number
#[wasm_bindgen]
pub fn is_valid_phone_number(phone: &str) -> bool {
    normalized_phone(phone).is_ok()
}

/// Whether `acres` is an acceptable farm size
#[wasm_bindgen]
pub fn is_valid_farm_size(acres: f64) -> bool {
    shared::validate_farm_size(acres).is_ok()
}

/// Season name ("rainy", "dry", "transitional") for a month 1-12
#[wasm_bindgen]
pub fn season_for_month(month: u32) -> Result<String, JsValue> {
    season_name(month).map_err(|e| JsValue::from_str(e))
}

/// Season of the browser's current month
#[wasm_bindgen]
pub fn current_season() -> String {
    // JS months are 0-based
    let month = js_sys::Date::new_0().get_month() + 1;
    Season::for_month(month).as_str().to_string()
}

/// Display label for an advice type; unknown values read as general advice
#[wasm_bindgen]
pub fn advice_type_label(value: &str) -> String {
    AdviceType::parse_lenient(value).label().to_string()
}

/// Render advice locally from a JSON request; returns the advice as JSON
#[wasm_bindgen]
pub fn preview_advice(request_json: &str) -> Result<String, JsValue> {
    preview(request_json)
        .and_then(|content| serde_json::to_string(&content).map_err(|e| e.to_string()))
        .map_err(|e| JsValue::from_str(&e))
}

/// Body accepted by [`preview_advice`]
#[derive(Debug, Deserialize)]
struct PreviewRequest {
    #[serde(default)]
    advice_type: String,
    crop: Crop,
    region_name: Option<String>,
    calendar_entry: Option<CalendarEntry>,
    weather: Option<WeatherSnapshot>,
}

fn preview(request_json: &str) -> Result<AdviceContent, String> {
    let request: PreviewRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid request JSON: {}", e))?;

    let advice = AdviceRequest::new(AdviceType::parse_lenient(&request.advice_type), &request.crop)
        .with_farmer(FarmerContext {
            region_name: request.region_name.clone(),
        })
        .with_calendar(request.calendar_entry.as_ref())
        .with_weather(request.weather.as_ref());

    Ok(generate_advice(&advice))
}

fn normalized_phone(phone: &str) -> Result<String, &'static str> {
    let phone = shared::normalize_phone(phone);
    shared::validate_malawi_phone(&phone)?;
    Ok(phone)
}

fn season_name(month: u32) -> Result<String, &'static str> {
    shared::validate_month(month)?;
    Ok(Season::for_month(month).as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn maize_json() -> serde_json::Value {
        json!({
            "id": uuid::Uuid::new_v4(),
            "name_en": "Maize",
            "name_ny": "Chimanga",
            "crop_type": "cereal",
            "scientific_name": "Zea mays",
            "planting_season": "November-January",
            "harvest_season": "April-July",
            "water_requirement": "Medium",
            "soil_type": "Well-drained fertile soils",
            "growing_period_days": 120,
            "suitable_regions": []
        })
    }

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_phone_number("+265 991 234 567"));
        assert!(is_valid_phone_number("0881234567"));
        assert!(!is_valid_phone_number("0551234567"));
        assert_eq!(normalized_phone("099 123 4567").unwrap(), "0991234567");
    }

    #[test]
    fn test_farm_size() {
        assert!(is_valid_farm_size(0.5));
        assert!(!is_valid_farm_size(0.0));
        assert!(!is_valid_farm_size(-3.0));
    }

    #[test]
    fn test_season_names() {
        assert_eq!(season_name(1).unwrap(), "rainy");
        assert_eq!(season_name(6).unwrap(), "dry");
        assert_eq!(season_name(10).unwrap(), "transitional");
        assert!(season_name(13).is_err());
    }

    #[test]
    fn test_advice_type_label() {
        assert_eq!(advice_type_label("disease"), "Disease Management");
        assert_eq!(advice_type_label("whatever"), "General Advice");
    }

    #[test]
    fn test_preview_without_weather() {
        let request = json!({
            "advice_type": "weather",
            "crop": maize_json(),
            "language": "ny"
        });
        let content = preview(&request.to_string()).unwrap();
        assert_eq!(content.title_ny, "Malangizo a Nyengo pa Chimanga");
        assert!(content.content_en.contains("Weather data not available"));
        assert!(!content.is_urgent);
    }

    #[test]
    fn test_preview_renders_both_languages_for_any_farmer() {
        let english = json!({ "advice_type": "planting", "crop": maize_json(), "language": "en" });
        let chichewa = json!({ "advice_type": "planting", "crop": maize_json(), "language": "ny" });

        let en = preview(&english.to_string()).unwrap();
        let ny = preview(&chichewa.to_string()).unwrap();
        assert_eq!(en.content_en, ny.content_en);
        assert_eq!(en.content_ny, ny.content_ny);
        assert!(en.content_ny.contains("masiku 120"));
    }

    #[test]
    fn test_preview_urgent_weather() {
        let request = json!({
            "advice_type": "weather",
            "crop": maize_json(),
            "region_name": "Chikwawa",
            "weather": {
                "id": uuid::Uuid::new_v4(),
                "region_id": uuid::Uuid::new_v4(),
                "date": "2024-10-20",
                "temperature_max": 36.0,
                "temperature_min": 24.0,
                "humidity": 60.0,
                "rainfall": 0.0,
                "wind_speed": null,
                "weather_condition": "Sunny"
            }
        });
        let content = preview(&request.to_string()).unwrap();
        assert!(content.is_urgent);
    }

    #[test]
    fn test_preview_rejects_bad_json() {
        assert!(preview("{\"advice_type\": \"care\"}").is_err());
    }
}
