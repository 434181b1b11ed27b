//! Core domain types and logic.

pub mod price_series;
pub mod indicator;
pub mod analysis;
pub mod chart;
pub mod params;
pub mod config_validation;
pub mod error;
