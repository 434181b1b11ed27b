//! stockcharts: technical-analysis charts for historical equity prices.
//!
//! Hexagonal architecture: indicator math and chart model in [`domain`], port
//! traits in [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
