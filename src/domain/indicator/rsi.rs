//! RSI (Relative Strength Index) indicator implementation.
//!
//! Seeded average followed by Wilder-style smoothing:
//! - Seed: gains and losses summed over the first (timeframe + 1) price
//!   changes, each sum divided by timeframe. The extra change in the seed is
//!   long-standing charting behaviour and is kept as is.
//! - Every position before `timeframe` carries the single seeded value.
//! - Subsequent: avg = (prev_avg * (timeframe - 1) + current) / timeframe,
//!   where position i consumes the change from i - 1 to i.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! A zero average loss is resolved by [`ZeroLossPolicy`].
//!
//! Every position of the output is defined.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_RSI_TIMEFRAME: usize = 14;

/// What to do when the average loss is exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroLossPolicy {
    /// RSI is 100, including the flat case where the average gain is zero too.
    #[default]
    Saturate,
    /// Fail with `DivisionByZero` at the first affected position.
    Error,
}

impl FromStr for ZeroLossPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "saturate" => Ok(ZeroLossPolicy::Saturate),
            "error" => Ok(ZeroLossPolicy::Error),
            other => Err(format!(
                "unknown zero-loss policy '{}', expected saturate or error",
                other
            )),
        }
    }
}

impl fmt::Display for ZeroLossPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZeroLossPolicy::Saturate => write!(f, "saturate"),
            ZeroLossPolicy::Error => write!(f, "error"),
        }
    }
}

pub fn calculate_rsi(
    prices: &[f64],
    timeframe: usize,
    policy: ZeroLossPolicy,
) -> Result<IndicatorSeries, IndicatorError> {
    if timeframe == 0 {
        return Err(IndicatorError::invalid_parameter(
            "rsi_timeframe",
            "timeframe must be at least 1",
        ));
    }
    if timeframe >= prices.len() {
        return Err(IndicatorError::invalid_parameter(
            "rsi_timeframe",
            format!(
                "timeframe {} needs more than {} prices",
                timeframe,
                prices.len()
            ),
        ));
    }

    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let period = timeframe as f64;

    let seed = &deltas[..deltas.len().min(timeframe + 1)];
    let mut avg_gain = seed.iter().filter(|d| **d >= 0.0).sum::<f64>() / period;
    let mut avg_loss = -seed.iter().filter(|d| **d < 0.0).sum::<f64>() / period;

    let seeded = rsi_value(avg_gain, avg_loss, 0, policy)?;
    let mut values = vec![Some(seeded); timeframe];
    values.reserve(prices.len() - timeframe);

    for i in timeframe..prices.len() {
        let change = deltas[i - 1];
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        avg_gain = (avg_gain * (period - 1.0) + gain) / period;
        avg_loss = (avg_loss * (period - 1.0) + loss) / period;

        values.push(Some(rsi_value(avg_gain, avg_loss, i, policy)?));
    }

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Rsi(timeframe),
        values,
    })
}

fn rsi_value(
    avg_gain: f64,
    avg_loss: f64,
    index: usize,
    policy: ZeroLossPolicy,
) -> Result<f64, IndicatorError> {
    if avg_loss == 0.0 {
        return match policy {
            ZeroLossPolicy::Saturate => Ok(100.0),
            ZeroLossPolicy::Error => Err(IndicatorError::DivisionByZero { index }),
        };
    }
    Ok(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
}
