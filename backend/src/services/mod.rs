//! Business logic services for the Malawi Farm Advisory Platform

pub mod advisory;
pub mod auth;
pub mod calendar;
pub mod crop;
pub mod dashboard;
pub mod farmer;
pub mod market;
pub mod seed;
pub mod stats;
pub mod weather;

pub use advisory::AdvisoryService;
pub use auth::AuthService;
pub use calendar::CalendarService;
pub use crop::CropService;
pub use dashboard::DashboardService;
pub use farmer::FarmerService;
pub use market::MarketService;
pub use seed::SeedService;
pub use stats::StatsService;
pub use weather::WeatherService;
