//! Configuration validation.
//!
//! Validates every chart setting before any data is fetched.

use crate::domain::error::ChartsError;
use crate::domain::indicator::WindowSize;
use crate::domain::indicator::rsi::{DEFAULT_RSI_TIMEFRAME, ZeroLossPolicy};
use crate::domain::params::parse_symbols;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const SECTION: &str = "chart";

pub fn validate_chart_config(config: &dyn ConfigPort) -> Result<(), ChartsError> {
    validate_symbols(config)?;
    validate_dates(config)?;
    validate_window(config)?;
    validate_rsi_timeframe(config)?;
    validate_zero_loss(config)?;
    validate_band_alpha(config)?;
    validate_rsi_panel(config)?;
    validate_dimensions(config)?;
    Ok(())
}

fn invalid(key: &str, reason: impl Into<String>) -> ChartsError {
    ChartsError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), ChartsError> {
    let raw = config
        .get_string(SECTION, "symbols")
        .ok_or_else(|| ChartsError::ConfigMissing {
            section: SECTION.to_string(),
            key: "symbols".to_string(),
        })?;
    parse_symbols(&raw).map_err(|e| invalid("symbols", e.to_string()))?;
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), ChartsError> {
    let start_str = config.get_string(SECTION, "start_date");
    let start_date = parse_date(start_str.as_deref(), "start_date")?;

    if let Some(end_str) = config.get_string(SECTION, "end_date") {
        let end_date = parse_date(Some(&end_str), "end_date")?;
        if start_date >= end_date {
            return Err(invalid("start_date", "start_date must be before end_date"));
        }
    }
    Ok(())
}

pub fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, ChartsError> {
    match value {
        None => Err(ChartsError::ConfigMissing {
            section: SECTION.to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| invalid(field, format!("invalid {} format, expected YYYY-MM-DD", field))),
    }
}

/// Reads an integer setting, rejecting values that are present but not integers.
pub fn parse_int(config: &dyn ConfigPort, key: &str, default: i64) -> Result<i64, ChartsError> {
    match config.get_string(SECTION, key) {
        None => Ok(default),
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(key, format!("{} must be an integer, got '{}'", key, s))),
    }
}

pub fn parse_window(config: &dyn ConfigPort) -> Result<WindowSize, ChartsError> {
    let raw = parse_int(config, "window", WindowSize::DEFAULT.get() as i64)?;
    WindowSize::try_from(raw).map_err(|e| invalid("window", e.to_string()))
}

fn validate_window(config: &dyn ConfigPort) -> Result<(), ChartsError> {
    parse_window(config).map(|_| ())
}

pub fn parse_rsi_timeframe(config: &dyn ConfigPort, default: usize) -> Result<usize, ChartsError> {
    let raw = parse_int(config, "rsi_timeframe", default as i64)?;
    if raw <= 0 {
        return Err(invalid("rsi_timeframe", "rsi_timeframe must be positive"));
    }
    usize::try_from(raw).map_err(|_| invalid("rsi_timeframe", "rsi_timeframe is too large"))
}

fn validate_rsi_timeframe(config: &dyn ConfigPort) -> Result<(), ChartsError> {
    parse_rsi_timeframe(config, DEFAULT_RSI_TIMEFRAME).map(|_| ())
}

pub fn parse_zero_loss(config: &dyn ConfigPort) -> Result<ZeroLossPolicy, ChartsError> {
    match config.get_string(SECTION, "zero_loss") {
        None => Ok(ZeroLossPolicy::default()),
        Some(s) => s
            .parse::<ZeroLossPolicy>()
            .map_err(|reason| invalid("zero_loss", reason)),
    }
}

fn validate_zero_loss(config: &dyn ConfigPort) -> Result<(), ChartsError> {
    parse_zero_loss(config).map(|_| ())
}

/// Reads a decimal setting, rejecting values that are present but not numbers.
pub fn parse_double(config: &dyn ConfigPort, key: &str, default: f64) -> Result<f64, ChartsError> {
    match config.get_string(SECTION, key) {
        None => Ok(default),
        Some(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(key, format!("{} must be a number, got '{}'", key, s))),
    }
}

/// Reads an on/off setting: true/yes/on/1 or false/no/off/0, any case.
pub fn parse_bool(config: &dyn ConfigPort, key: &str, default: bool) -> Result<bool, ChartsError> {
    let Some(s) = config.get_string(SECTION, key) else {
        return Ok(default);
    };
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(
            key,
            format!("{} must be true or false, got '{}'", key, s),
        )),
    }
}

pub fn parse_band_alpha(config: &dyn ConfigPort, default: f64) -> Result<f64, ChartsError> {
    let value = parse_double(config, "band_alpha", default)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid("band_alpha", "band_alpha must be between 0 and 1"));
    }
    Ok(value)
}

fn validate_band_alpha(config: &dyn ConfigPort) -> Result<(), ChartsError> {
    parse_band_alpha(config, 0.2).map(|_| ())
}

fn validate_rsi_panel(config: &dyn ConfigPort) -> Result<(), ChartsError> {
    parse_bool(config, "rsi_panel", true).map(|_| ())
}

fn validate_dimensions(config: &dyn ConfigPort) -> Result<(), ChartsError> {
    for (key, default) in [("width", 800), ("height", 600), ("rsi_height", 200)] {
        let value = parse_int(config, key, default)?;
        if !(1..=10_000).contains(&value) {
            return Err(invalid(key, format!("{} must be between 1 and 10000", key)));
        }
    }
    Ok(())
}
