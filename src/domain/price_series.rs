//! Closing-price series for a single symbol.

use crate::domain::error::IndicatorError;
use chrono::NaiveDate;

/// Daily closing prices, strictly increasing by date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    dates: Vec<NaiveDate>,
    closes: Vec<f64>,
}

impl PriceSeries {
    pub fn new(
        symbol: impl Into<String>,
        points: Vec<(NaiveDate, f64)>,
    ) -> Result<Self, IndicatorError> {
        let symbol = symbol.into();

        for window in points.windows(2) {
            let (prev, curr) = (window[0].0, window[1].0);
            if curr == prev {
                return Err(IndicatorError::InvalidSeries {
                    reason: format!("{}: duplicate date {}", symbol, curr),
                });
            }
            if curr < prev {
                return Err(IndicatorError::InvalidSeries {
                    reason: format!("{}: {} comes after {}", symbol, curr, prev),
                });
            }
        }

        if let Some((date, close)) = points.iter().find(|(_, c)| !c.is_finite()) {
            return Err(IndicatorError::InvalidSeries {
                reason: format!("{}: non-finite price {} on {}", symbol, close, date),
            });
        }

        let (dates, closes) = points.into_iter().unzip();
        Ok(Self {
            symbol,
            dates,
            closes,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}
