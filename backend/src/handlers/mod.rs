//! HTTP handlers for the Malawi Farm Advisory API

mod advice;
mod auth;
mod calendar;
mod crop;
mod dashboard;
mod farmer;
mod health;
mod market;
mod weather;

pub use advice::*;
pub use auth::*;
pub use calendar::*;
pub use crop::*;
pub use dashboard::*;
pub use farmer::*;
pub use health::*;
pub use market::*;
pub use weather::*;
