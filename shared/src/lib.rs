//! Shared types and advisory logic for the Malawi Farm Advisory Platform
//!
//! This crate contains the domain model, the climate table used to synthesize
//! weather, and the bilingual advice rule engine. It performs no I/O so it can
//! be used by the backend, the WASM client helpers, and tests alike.

pub mod advice;
pub mod climate;
pub mod models;
pub mod types;
pub mod validation;
pub mod weather_gen;

pub use models::*;
pub use types::*;
pub use validation::*;
