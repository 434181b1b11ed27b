//! Rolling mean and rolling standard deviation.
//!
//! Trailing window of exactly n observations ending at the current index.
//! Sample standard deviation (divides by n - 1):
//! STDDEV(n)[i] = sqrt(sum((P[i-j] - SMA(n)[i])^2 for j in 0..n-1) / (n - 1))
//! Warmup: first (n-1) positions are undefined. With n = 1 the deviation is
//! undefined everywhere while the mean equals the price.
//!
//! Computed in one O(L) pass. The window keeps a running mean and the sum of
//! squared deviations from it (Welford), updated when a price enters or leaves,
//! so the deviation stays accurate when prices are large and nearly flat.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, WindowSize};

#[derive(Debug, Clone, PartialEq)]
pub struct WindowStats {
    pub mean: IndicatorSeries,
    pub stddev: IndicatorSeries,
}

pub fn window_stats(prices: &[f64], window: WindowSize) -> WindowStats {
    let n = window.get();
    let mut mean = Vec::with_capacity(prices.len());
    let mut stddev = Vec::with_capacity(prices.len());

    let size = n as f64;
    let mut running_mean = 0.0;
    let mut m2 = 0.0;

    for (i, &price) in prices.iter().enumerate() {
        if i < n {
            let delta = price - running_mean;
            running_mean += delta / (i + 1) as f64;
            m2 += delta * (price - running_mean);
        } else {
            // The window is full: the oldest price is swapped for the new one.
            let leaving = prices[i - n];
            let previous = running_mean;
            running_mean += (price - leaving) / size;
            m2 += (price - leaving) * (price - running_mean + leaving - previous);
        }

        if i + 1 < n {
            mean.push(None);
            stddev.push(None);
            continue;
        }

        if n < 2 {
            mean.push(Some(price));
            stddev.push(None);
        } else {
            mean.push(Some(running_mean));
            let variance = (m2 / (size - 1.0)).max(0.0);
            stddev.push(Some(variance.sqrt()));
        }
    }

    WindowStats {
        mean: IndicatorSeries {
            indicator_type: IndicatorType::Sma(n),
            values: mean,
        },
        stddev: IndicatorSeries {
            indicator_type: IndicatorType::Stddev(n),
            values: stddev,
        },
    }
}

/// Same as [`window_stats`] for an unvalidated period.
pub fn window_stats_raw(prices: &[f64], period: usize) -> Result<WindowStats, IndicatorError> {
    Ok(window_stats(prices, WindowSize::new(period)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn window(n: usize) -> WindowSize {
        WindowSize::new(n).unwrap()
    }

    #[test]
    fn warmup_is_undefined() {
        let stats = window_stats(&[10.0, 20.0, 30.0, 40.0, 50.0], window(3));

        assert_eq!(stats.mean.values[0], None);
        assert_eq!(stats.mean.values[1], None);
        assert!(stats.mean.values[2].is_some());
        assert_eq!(stats.stddev.values[0], None);
        assert_eq!(stats.stddev.values[1], None);
        assert!(stats.stddev.values[4].is_some());
    }

    #[test]
    fn constant_values_have_zero_deviation() {
        let stats = window_stats(&[100.0; 5], window(3));

        for i in 2..5 {
            assert_relative_eq!(stats.mean.values[i].unwrap(), 100.0);
            assert_eq!(stats.stddev.values[i], Some(0.0));
        }
    }

    #[test]
    fn uses_sample_deviation() {
        let stats = window_stats(&[10.0, 20.0, 30.0], window(3));

        // Squared deviations sum to 200; sample variance is 200 / 2.
        assert_relative_eq!(stats.stddev.values[2].unwrap(), 10.0, epsilon = 1e-12);
        assert_ne!(stats.stddev.values[2].unwrap(), (200.0_f64 / 3.0).sqrt());
    }

    #[test]
    fn known_values() {
        let prices = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = window_stats(&prices, window(8));

        assert_relative_eq!(stats.mean.values[7].unwrap(), 5.0);
        // Population deviation of this set is 2; sample is sqrt(32 / 7).
        assert_relative_eq!(
            stats.stddev.values[7].unwrap(),
            (32.0_f64 / 7.0).sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn matches_direct_computation_on_each_window() {
        let prices = [44.0, 44.25, 44.5, 43.75, 44.5, 44.25, 44.75, 45.25, 45.5, 45.25];
        let n = 4;
        let stats = window_stats(&prices, window(n));

        for i in (n - 1)..prices.len() {
            let slice = &prices[i + 1 - n..=i];
            let mean = slice.iter().sum::<f64>() / n as f64;
            let var = slice.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / (n - 1) as f64;

            assert_relative_eq!(stats.mean.values[i].unwrap(), mean, epsilon = 1e-9);
            assert_relative_eq!(stats.stddev.values[i].unwrap(), var.sqrt(), epsilon = 1e-9);
        }
    }

    #[test]
    fn large_nearly_flat_prices_keep_their_deviation() {
        let prices: Vec<f64> = (0..3000)
            .map(|i| 500_000.0 + ((i * 37) % 11) as f64 * 0.01)
            .collect();
        let n = 50;
        let stats = window_stats(&prices, window(n));

        for i in (n - 1)..prices.len() {
            let slice = &prices[i + 1 - n..=i];
            let mean = slice.iter().sum::<f64>() / n as f64;
            let var = slice.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / (n - 1) as f64;

            assert_relative_eq!(stats.stddev.values[i].unwrap(), var.sqrt(), max_relative = 1e-6);
        }
    }

    #[test]
    fn flat_fractional_prices_have_exactly_zero_deviation() {
        let stats = window_stats(&[0.1; 200], window(20));

        for v in &stats.stddev.values[19..] {
            assert_eq!(*v, Some(0.0));
        }
    }

    #[test]
    fn window_of_one_has_undefined_deviation() {
        let stats = window_stats(&[1.0, 2.0, 3.0], window(1));

        assert_eq!(stats.mean.values, vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert!(stats.stddev.values.iter().all(Option::is_none));
    }

    #[test]
    fn window_longer_than_series_is_all_undefined() {
        let stats = window_stats(&[1.0, 2.0], window(5));

        assert_eq!(stats.mean.values, vec![None, None]);
        assert_eq!(stats.stddev.values, vec![None, None]);
    }

    #[test]
    fn zero_period_is_invalid() {
        let err = window_stats_raw(&[1.0, 2.0, 3.0], 0).unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidParameter { .. }));
    }

    #[test]
    fn indicator_types_carry_period() {
        let stats = window_stats(&[1.0, 2.0, 3.0], window(2));
        assert_eq!(stats.mean.indicator_type, IndicatorType::Sma(2));
        assert_eq!(stats.stddev.indicator_type, IndicatorType::Stddev(2));
    }
}
