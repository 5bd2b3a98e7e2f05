//! Domain models for the Malawi Farm Advisory Platform

mod advice;
mod calendar;
mod crop;
mod farmer;
mod market;
mod region;
mod weather;

pub use advice::*;
pub use calendar::*;
pub use crop::*;
pub use farmer::*;
pub use market::*;
pub use region::*;
pub use weather::*;
