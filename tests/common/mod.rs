#![allow(dead_code)]

use chrono::NaiveDate;
use stockcharts::domain::chart::ChartDocument;
use stockcharts::domain::error::ChartsError;
use stockcharts::domain::price_series::PriceSeries;
use stockcharts::ports::chart_port::ChartPort;
use stockcharts::ports::data_port::DataPort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<(NaiveDate, f64)>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, symbol: &str, points: Vec<(NaiveDate, f64)>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, ChartsError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ChartsError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        let points = self
            .data
            .get(symbol)
            .ok_or_else(|| ChartsError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "unknown symbol".into(),
            })?
            .iter()
            .filter(|(d, _)| *d >= start_date && *d <= end_date)
            .copied()
            .collect();
        Ok(PriceSeries::new(symbol, points)?)
    }

    fn list_symbols(&self) -> Result<Vec<String>, ChartsError> {
        let mut symbols: Vec<_> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

/// Records every document it is asked to render instead of writing files.
pub struct RecordingChartPort {
    pub rendered: RefCell<Vec<(ChartDocument, PathBuf)>>,
    pub fail_with: Option<String>,
}

impl RecordingChartPort {
    pub fn new() -> Self {
        Self {
            rendered: RefCell::new(Vec::new()),
            fail_with: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            rendered: RefCell::new(Vec::new()),
            fail_with: Some(reason.to_string()),
        }
    }
}

impl ChartPort for RecordingChartPort {
    fn render(&self, document: &ChartDocument, output_path: &Path) -> Result<(), ChartsError> {
        if let Some(reason) = &self.fail_with {
            return Err(ChartsError::Render {
                reason: reason.clone(),
            });
        }
        self.rendered
            .borrow_mut()
            .push((document.clone(), output_path.to_path_buf()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily prices oscillating around `start_price` with a slow upward drift.
pub fn generate_prices(start_date: &str, count: usize, start_price: f64) -> Vec<(NaiveDate, f64)> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| {
            let wave = [0.0, 1.5, -0.5, 2.0, -1.0][i % 5];
            (
                start + chrono::Duration::days(i as i64),
                start_price + i as f64 * 0.1 + wave,
            )
        })
        .collect()
}

pub fn exit_status(code: ExitCode) -> String {
    format!("{code:?}")
}

pub fn assert_exit(code: ExitCode, expected: u8) {
    assert_eq!(exit_status(code), exit_status(ExitCode::from(expected)));
}
