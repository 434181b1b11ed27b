//! Closed polygon boundary for filling the area between two bands.
//!
//! The boundary walks the lower band forward in time, then the upper band
//! backward. Dates are stacked the same way so x and y stay paired.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::bollinger::BandPair;
use chrono::NaiveDate;

/// `lower` followed by `upper` reversed.
pub fn stack_fill<T: Clone>(upper: &[T], lower: &[T]) -> Result<Vec<T>, IndicatorError> {
    if upper.len() != lower.len() {
        return Err(IndicatorError::LengthMismatch {
            expected: lower.len(),
            actual: upper.len(),
        });
    }

    let mut stacked = Vec::with_capacity(lower.len() * 2);
    stacked.extend_from_slice(lower);
    stacked.extend(upper.iter().rev().cloned());
    Ok(stacked)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillPolygon {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

impl FillPolygon {
    pub fn from_bands(dates: &[NaiveDate], bands: &BandPair) -> Result<Self, IndicatorError> {
        if bands.upper.len() != dates.len() {
            return Err(IndicatorError::LengthMismatch {
                expected: dates.len(),
                actual: bands.upper.len(),
            });
        }

        Ok(Self {
            dates: stack_fill(dates, dates)?,
            values: stack_fill(&bands.upper.values, &bands.lower.values)?,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Vertices with a defined value, in boundary order.
    pub fn vertices(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates
            .iter()
            .zip(&self.values)
            .filter_map(|(d, v)| v.map(|v| (*d, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::{IndicatorSeries, IndicatorType, WindowSize};
    use proptest::prelude::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn reverses_upper_after_lower() {
        let upper = ['a', 'b', 'c'];
        let lower = ['x', 'y', 'z'];

        assert_eq!(
            stack_fill(&upper, &lower).unwrap(),
            vec!['x', 'y', 'z', 'c', 'b', 'a']
        );
    }

    #[test]
    fn undefined_markers_pass_through() {
        let upper = [None, Some(12.0), Some(13.0)];
        let lower = [None, Some(8.0), Some(7.0)];

        assert_eq!(
            stack_fill(&upper, &lower).unwrap(),
            vec![None, Some(8.0), Some(7.0), Some(13.0), Some(12.0), None]
        );
    }

    #[test]
    fn mismatched_lengths_fail() {
        let err = stack_fill(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::LengthMismatch {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn empty_inputs_stack_to_empty() {
        let empty: [f64; 0] = [];
        assert!(stack_fill(&empty, &empty).unwrap().is_empty());
    }

    #[test]
    fn polygon_keeps_dates_paired_with_values() {
        let dates = [date(1), date(2), date(3)];
        let bands = BandPair {
            window: WindowSize::new(2).unwrap(),
            upper: IndicatorSeries {
                indicator_type: IndicatorType::Bollinger(2),
                values: vec![None, Some(11.0), Some(12.0)],
            },
            lower: IndicatorSeries {
                indicator_type: IndicatorType::Bollinger(2),
                values: vec![None, Some(9.0), Some(8.0)],
            },
        };

        let polygon = FillPolygon::from_bands(&dates, &bands).unwrap();

        assert_eq!(polygon.len(), 6);
        assert_eq!(
            polygon.dates,
            vec![date(1), date(2), date(3), date(3), date(2), date(1)]
        );
        assert_eq!(
            polygon.vertices().collect::<Vec<_>>(),
            vec![
                (date(2), 9.0),
                (date(3), 8.0),
                (date(3), 12.0),
                (date(2), 11.0),
            ]
        );
    }

    #[test]
    fn polygon_rejects_misaligned_dates() {
        let bands = BandPair {
            window: WindowSize::new(1).unwrap(),
            upper: IndicatorSeries {
                indicator_type: IndicatorType::Bollinger(1),
                values: vec![None, None],
            },
            lower: IndicatorSeries {
                indicator_type: IndicatorType::Bollinger(1),
                values: vec![None, None],
            },
        };

        let err = FillPolygon::from_bands(&[date(1)], &bands).unwrap_err();
        assert!(matches!(err, IndicatorError::LengthMismatch { .. }));
    }

    proptest! {
        #[test]
        fn stacked_is_twice_as_long_and_mirrored(
            pairs in prop::collection::vec((any::<i32>(), any::<i32>()), 0..50),
        ) {
            let (upper, lower): (Vec<i32>, Vec<i32>) = pairs.into_iter().unzip();
            let stacked = stack_fill(&upper, &lower).unwrap();
            let len = upper.len();

            prop_assert_eq!(stacked.len(), 2 * len);
            prop_assert_eq!(&stacked[..len], &lower[..]);
            for i in 0..len {
                prop_assert_eq!(stacked[len + i], upper[len - 1 - i]);
            }
        }
    }
}
