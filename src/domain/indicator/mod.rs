//! Technical indicator implementations.
//!
//! This module provides the shared types for indicator outputs:
//! - `WindowSize`: validated rolling-window period shared by SMA and Bollinger
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: values aligned index-for-index with the source prices,
//!   where `None` marks positions before the window has filled

pub mod window_stats;
pub mod sma;
pub mod bollinger;
pub mod band_fill;
pub mod rsi;

use crate::domain::error::IndicatorError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowSize(usize);

impl WindowSize {
    pub const DEFAULT: WindowSize = WindowSize(50);

    pub fn new(n: usize) -> Result<Self, IndicatorError> {
        if n == 0 {
            return Err(IndicatorError::invalid_parameter(
                "window",
                "window size must be at least 1",
            ));
        }
        Ok(Self(n))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<i64> for WindowSize {
    type Error = IndicatorError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(IndicatorError::invalid_parameter(
                "window",
                format!("window size must be positive, got {}", value),
            ));
        }
        let n = usize::try_from(value).map_err(|_| {
            IndicatorError::invalid_parameter("window", format!("window size {} is too large", value))
        })?;
        Self::new(n)
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Stddev(usize),
    Bollinger(usize),
    Rsi(usize),
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::Bollinger(period) => write!(f, "BOLLINGER({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Index of the first defined value, if any.
    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(Option::is_some)
    }

    /// `(index, value)` pairs for every defined position.
    pub fn defined(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
    }
}
