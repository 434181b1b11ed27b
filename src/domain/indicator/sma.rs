//! Simple Moving Average.
//!
//! SMA(n)[i] = mean of the trailing n prices ending at i.
//! Warmup: first (n-1) positions are undefined.

use crate::domain::indicator::window_stats::window_stats;
use crate::domain::indicator::{IndicatorSeries, WindowSize};

pub fn calculate_sma(prices: &[f64], window: WindowSize) -> IndicatorSeries {
    window_stats(prices, window).mean
}
