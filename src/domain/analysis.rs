//! Per-symbol indicator pipeline.
//!
//! Each symbol is fetched and analysed independently. A symbol that cannot be
//! fetched or analysed is recorded as skipped and the rest carry on.

use crate::domain::error::{ChartsError, IndicatorError};
use crate::domain::indicator::band_fill::FillPolygon;
use crate::domain::indicator::bollinger::{BandPair, bollinger_from_stats};
use crate::domain::indicator::rsi::{DEFAULT_RSI_TIMEFRAME, ZeroLossPolicy, calculate_rsi};
use crate::domain::indicator::window_stats::window_stats;
use crate::domain::indicator::{IndicatorSeries, WindowSize};
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorParams {
    pub window: WindowSize,
    pub rsi_timeframe: usize,
    pub zero_loss: ZeroLossPolicy,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            window: WindowSize::DEFAULT,
            rsi_timeframe: DEFAULT_RSI_TIMEFRAME,
            zero_loss: ZeroLossPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SymbolAnalysis {
    pub prices: PriceSeries,
    pub sma: IndicatorSeries,
    pub bands: BandPair,
    pub fill: FillPolygon,
    pub rsi: IndicatorSeries,
}

impl SymbolAnalysis {
    pub fn symbol(&self) -> &str {
        self.prices.symbol()
    }
}

pub fn analyze(
    prices: PriceSeries,
    params: &IndicatorParams,
) -> Result<SymbolAnalysis, IndicatorError> {
    let window = params.window;
    if window.get() > prices.len() {
        return Err(IndicatorError::invalid_parameter(
            "window",
            format!(
                "window {} exceeds the {} prices available for {}",
                window,
                prices.len(),
                prices.symbol()
            ),
        ));
    }

    let closes = prices.closes();
    let stats = window_stats(closes, window);
    let bands = bollinger_from_stats(&stats, window);
    let sma = stats.mean;
    let fill = FillPolygon::from_bands(prices.dates(), &bands)?;
    let rsi = calculate_rsi(closes, params.rsi_timeframe, params.zero_loss)?;

    Ok(SymbolAnalysis {
        prices,
        sma,
        bands,
        fill,
        rsi,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    DataUnavailable(String),
    NoData,
    Indicator(IndicatorError),
}

#[derive(Debug, Clone)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: SkipReason,
}

pub struct AnalysisRun {
    pub analyses: Vec<SymbolAnalysis>,
    pub skipped: Vec<SkippedSymbol>,
}

impl AnalysisRun {
    /// Error for a run that charted nothing. It is an indicator error when
    /// every symbol was fetched but failed analysis, otherwise a data error.
    pub fn failure(&self) -> ChartsError {
        let indicator_errors: Vec<&IndicatorError> = self
            .skipped
            .iter()
            .filter_map(|s| match &s.reason {
                SkipReason::Indicator(e) => Some(e),
                _ => None,
            })
            .collect();

        match indicator_errors.first() {
            Some(&first) if indicator_errors.len() == self.skipped.len() => {
                ChartsError::Indicator(first.clone())
            }
            _ => ChartsError::DataUnavailable {
                symbol: self
                    .skipped
                    .iter()
                    .map(|s| s.symbol.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
                reason: "no symbol could be charted".to_string(),
            },
        }
    }
}

pub fn analyze_symbols(
    data_port: &dyn DataPort,
    symbols: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
    params: &IndicatorParams,
) -> AnalysisRun {
    let mut analyses = Vec::with_capacity(symbols.len());
    let mut skipped = Vec::new();

    for symbol in symbols {
        let prices = match data_port.fetch_prices(symbol, start_date, end_date) {
            Ok(prices) => prices,
            Err(e) => {
                warn!(%symbol, error = %e, "skipping symbol");
                skipped.push(SkippedSymbol {
                    symbol: symbol.clone(),
                    reason: SkipReason::DataUnavailable(e.to_string()),
                });
                continue;
            }
        };

        if prices.is_empty() {
            warn!(%symbol, "skipping symbol: no prices in range");
            skipped.push(SkippedSymbol {
                symbol: symbol.clone(),
                reason: SkipReason::NoData,
            });
            continue;
        }

        let count = prices.len();
        match analyze(prices, params) {
            Ok(analysis) => {
                info!(%symbol, prices = count, "computed indicators");
                analyses.push(analysis);
            }
            Err(e) => {
                warn!(%symbol, error = %e, "skipping symbol");
                skipped.push(SkippedSymbol {
                    symbol: symbol.clone(),
                    reason: SkipReason::Indicator(e),
                });
            }
        }
    }

    AnalysisRun { analyses, skipped }
}
