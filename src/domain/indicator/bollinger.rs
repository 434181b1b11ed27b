//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (2 × StdDev)
//! - Lower: Middle - (2 × StdDev)
//!
//! Where StdDev is the sample standard deviation over the same n periods
//! (see [`window_stats`](super::window_stats)). A position is undefined in
//! both bands whenever the middle or the deviation is undefined.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::window_stats::{WindowStats, window_stats};
use crate::domain::indicator::{IndicatorSeries, IndicatorType, WindowSize};

pub const BOLLINGER_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BandPair {
    pub window: WindowSize,
    pub upper: IndicatorSeries,
    pub lower: IndicatorSeries,
}

/// Bands around a caller-supplied SMA, which must be `SMA(window)` over the
/// same prices.
pub fn calculate_bollinger(
    prices: &[f64],
    sma: &IndicatorSeries,
    window: WindowSize,
) -> Result<BandPair, IndicatorError> {
    let n = window.get();
    if sma.indicator_type != IndicatorType::Sma(n) {
        return Err(IndicatorError::invalid_parameter(
            "window",
            format!("bands use window {} but the moving average is {}", n, sma.indicator_type),
        ));
    }
    if sma.len() != prices.len() {
        return Err(IndicatorError::LengthMismatch {
            expected: prices.len(),
            actual: sma.len(),
        });
    }

    let stddev = window_stats(prices, window).stddev;
    Ok(bands_around(&sma.values, &stddev.values, window))
}

/// Bands with the moving average derived from the same window.
pub fn bollinger_from_window(prices: &[f64], window: WindowSize) -> BandPair {
    bollinger_from_stats(&window_stats(prices, window), window)
}

/// Bands from statistics already computed over `window`, so a caller that
/// also needs the SMA makes a single pass over the prices.
pub fn bollinger_from_stats(stats: &WindowStats, window: WindowSize) -> BandPair {
    bands_around(&stats.mean.values, &stats.stddev.values, window)
}

fn bands_around(middle: &[Option<f64>], stddev: &[Option<f64>], window: WindowSize) -> BandPair {
    let (upper, lower) = middle
        .iter()
        .zip(stddev)
        .map(|(middle, sd)| match (middle, sd) {
            (Some(m), Some(sd)) => (
                Some(m + BOLLINGER_MULTIPLIER * sd),
                Some(m - BOLLINGER_MULTIPLIER * sd),
            ),
            _ => (None, None),
        })
        .unzip();

    let n = window.get();
    BandPair {
        window,
        upper: IndicatorSeries {
            indicator_type: IndicatorType::Bollinger(n),
            values: upper,
        },
        lower: IndicatorSeries {
            indicator_type: IndicatorType::Bollinger(n),
            values: lower,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::sma::calculate_sma;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn window(n: usize) -> WindowSize {
        WindowSize::new(n).unwrap()
    }

    #[test]
    fn bollinger_warmup() {
        let prices = [10.0, 20.0, 30.0, 40.0, 50.0];
        let bands = bollinger_from_window(&prices, window(3));

        assert_eq!(bands.upper.values[0], None);
        assert_eq!(bands.lower.values[1], None);
        assert!(bands.upper.values[2].is_some());
        assert!(bands.lower.values[4].is_some());
    }

    #[test]
    fn bollinger_constant_values() {
        let bands = bollinger_from_window(&[100.0; 5], window(3));

        assert_relative_eq!(bands.upper.values[2].unwrap(), 100.0);
        assert_relative_eq!(bands.lower.values[2].unwrap(), 100.0);
    }

    #[test]
    fn bollinger_basic_calculation() {
        let prices = [10.0, 20.0, 30.0];
        let sma = calculate_sma(&prices, window(3));
        let bands = calculate_bollinger(&prices, &sma, window(3)).unwrap();

        // Middle 20, sample deviation 10.
        assert_relative_eq!(bands.upper.values[2].unwrap(), 40.0, epsilon = 1e-10);
        assert_relative_eq!(bands.lower.values[2].unwrap(), 0.0, epsilon = 1e-10);
        assert_eq!(bands.upper.indicator_type, IndicatorType::Bollinger(3));
    }

    #[test]
    fn bollinger_rejects_mismatched_window() {
        let prices = [10.0, 20.0, 30.0, 40.0];
        let sma = calculate_sma(&prices, window(2));

        let err = calculate_bollinger(&prices, &sma, window(3)).unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidParameter { .. }));
    }

    #[test]
    fn bollinger_rejects_misaligned_sma() {
        let prices = [10.0, 20.0, 30.0, 40.0];
        let sma = calculate_sma(&prices[..3], window(2));

        let err = calculate_bollinger(&prices, &sma, window(2)).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::LengthMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn bollinger_window_of_one_is_undefined() {
        let bands = bollinger_from_window(&[1.0, 2.0, 3.0], window(1));
        assert!(bands.upper.values.iter().all(Option::is_none));
        assert!(bands.lower.values.iter().all(Option::is_none));
    }

    proptest! {
        #[test]
        fn band_width_is_four_deviations(
            prices in prop::collection::vec(1.0f64..500.0, 2..60),
            n in 2usize..15,
        ) {
            prop_assume!(n <= prices.len());
            let w = window(n);
            let sma = calculate_sma(&prices, w);
            let stddev = window_stats(&prices, w).stddev;
            let bands = calculate_bollinger(&prices, &sma, w).unwrap();

            for i in 0..prices.len() {
                match (bands.upper.values[i], bands.lower.values[i]) {
                    (Some(up), Some(lo)) => {
                        let sd = stddev.values[i].unwrap();
                        let m = sma.values[i].unwrap();
                        prop_assert!(((up - lo) - 4.0 * sd).abs() <= 1e-6 * up.abs().max(1.0));
                        prop_assert!(up >= m && m >= lo);
                    }
                    (None, None) => prop_assert!(i + 1 < n),
                    _ => prop_assert!(false, "bands disagree on definedness at {}", i),
                }
            }
        }
    }
}
