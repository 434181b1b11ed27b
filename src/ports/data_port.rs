//! Market data access port trait.

use crate::domain::error::ChartsError;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Closing prices for `symbol` between `start_date` and `end_date`
    /// inclusive. Provider failures surface as `ChartsError::DataUnavailable`.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, ChartsError>;

    fn list_symbols(&self) -> Result<Vec<String>, ChartsError>;
}
