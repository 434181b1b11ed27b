//! CSV file data adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with a header row naming at
//! least a `date` and a `close` column. Other columns are ignored.

use crate::domain::error::ChartsError;
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, ChartsError> {
        let unavailable = |reason: String| ChartsError::DataUnavailable {
            symbol: symbol.to_string(),
            reason,
        };

        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| unavailable(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| unavailable(format!("CSV parse error: {}", e)))?
            .clone();
        let date_col =
            column(&headers, "date").ok_or_else(|| unavailable("missing date column".into()))?;
        let close_col =
            column(&headers, "close").ok_or_else(|| unavailable("missing close column".into()))?;

        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| unavailable(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(date_col)
                .ok_or_else(|| unavailable("missing date value".into()))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| unavailable(format!("invalid date '{}': {}", date_str, e)))?;

            if date < start_date || date > end_date {
                continue;
            }

            let close: f64 = record
                .get(close_col)
                .ok_or_else(|| unavailable("missing close value".into()))?
                .trim()
                .parse()
                .map_err(|e| unavailable(format!("invalid close value on {}: {}", date, e)))?;

            points.push((date, close));
        }

        points.sort_by_key(|(date, _)| *date);
        Ok(PriceSeries::new(symbol, points)?)
    }

    fn list_symbols(&self) -> Result<Vec<String>, ChartsError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| ChartsError::Io(
            std::io::Error::new(
                e.kind(),
                format!("failed to read directory {}: {}", self.base_path.display(), e),
            ),
        ))?;

        let mut symbols = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !is_csv {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                symbols.push(stem.to_string_lossy().into_owned());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
