//! Chart model handed to the rendering port.
//!
//! One price panel (close, SMA, shaded Bollinger region) and one RSI panel per
//! symbol. Undefined indicator positions stay `None`; renderers break lines at
//! them rather than drawing zeros.

use crate::domain::analysis::SymbolAnalysis;
use chrono::NaiveDate;

pub const DEFAULT_DOCUMENT_TITLE: &str = "How are my stocks doing today?";
pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillStyle {
    pub color: String,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub label: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
    pub style: LineStyle,
}

impl LineSeries {
    /// Runs of consecutive defined points.
    pub fn segments(&self) -> Vec<Vec<(NaiveDate, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();

        for (date, value) in self.dates.iter().zip(&self.values) {
            match value {
                Some(v) => current.push((*date, *v)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

/// Closed region given as a boundary walk; see
/// [`FillPolygon`](crate::domain::indicator::band_fill::FillPolygon).
#[derive(Debug, Clone, PartialEq)]
pub struct FillSeries {
    pub label: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
    pub style: FillStyle,
}

impl FillSeries {
    pub fn vertices(&self) -> Vec<(NaiveDate, f64)> {
        self.dates
            .iter()
            .zip(&self.values)
            .filter_map(|(d, v)| v.map(|v| (*d, v)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanel {
    pub title: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
    pub grid_alpha: f64,
    /// Fixed vertical range; derived from the data when `None`.
    pub y_range: Option<(f64, f64)>,
    /// Horizontal reference lines.
    pub guides: Vec<f64>,
    pub fills: Vec<FillSeries>,
    pub lines: Vec<LineSeries>,
}

impl ChartPanel {
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self
            .lines
            .iter()
            .flat_map(|l| l.segments().into_iter().flatten().map(|(d, _)| d))
            .chain(self.fills.iter().flat_map(|f| f.vertices().into_iter().map(|(d, _)| d)));
        min_max(dates)
    }

    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        if self.y_range.is_some() {
            return self.y_range;
        }
        let values = self
            .lines
            .iter()
            .flat_map(|l| l.values.iter().flatten().copied())
            .chain(self.fills.iter().flat_map(|f| f.values.iter().flatten().copied()));

        values.fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
    }
}

fn min_max<T: Ord + Copy>(items: impl Iterator<Item = T>) -> Option<(T, T)> {
    items.fold(None, |acc, x| match acc {
        None => Some((x, x)),
        Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartDocument {
    pub title: String,
    pub panels: Vec<ChartPanel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub close_color: String,
    pub sma_color: String,
    pub band_color: String,
    pub band_alpha: f64,
    pub rsi_color: String,
    pub line_width: f64,
    pub width: u32,
    pub height: u32,
    pub rsi_height: u32,
    pub grid_alpha: f64,
    pub price_label: String,
    pub rsi_panel: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            close_color: "#1B9E77".into(),
            sma_color: "#D95F02".into(),
            band_color: "#7570B3".into(),
            band_alpha: 0.2,
            rsi_color: "#E7298A".into(),
            line_width: 1.5,
            width: 800,
            height: 600,
            rsi_height: 200,
            grid_alpha: 0.4,
            price_label: "Price (USD)".into(),
            rsi_panel: true,
        }
    }
}

pub fn build_price_panel(analysis: &SymbolAnalysis, style: &ChartStyle) -> ChartPanel {
    let dates = analysis.prices.dates();
    let window = analysis.bands.window.get();
    let close_from = window.min(dates.len());

    let close = LineSeries {
        label: "Close".into(),
        dates: dates[close_from..].to_vec(),
        values: analysis.prices.closes()[close_from..]
            .iter()
            .map(|c| Some(*c))
            .collect(),
        style: LineStyle {
            color: style.close_color.clone(),
            width: style.line_width,
        },
    };

    let sma = LineSeries {
        label: analysis.sma.indicator_type.to_string(),
        dates: dates.to_vec(),
        values: analysis.sma.values.clone(),
        style: LineStyle {
            color: style.sma_color.clone(),
            width: style.line_width,
        },
    };

    let bands = FillSeries {
        label: analysis.bands.upper.indicator_type.to_string(),
        dates: analysis.fill.dates.clone(),
        values: analysis.fill.values.clone(),
        style: FillStyle {
            color: style.band_color.clone(),
            alpha: style.band_alpha,
        },
    };

    ChartPanel {
        title: analysis.symbol().to_string(),
        y_label: style.price_label.clone(),
        width: style.width,
        height: style.height,
        grid_alpha: style.grid_alpha,
        y_range: None,
        guides: Vec::new(),
        fills: vec![bands],
        lines: vec![close, sma],
    }
}

pub fn build_rsi_panel(analysis: &SymbolAnalysis, style: &ChartStyle) -> ChartPanel {
    let rsi = LineSeries {
        label: analysis.rsi.indicator_type.to_string(),
        dates: analysis.prices.dates().to_vec(),
        values: analysis.rsi.values.clone(),
        style: LineStyle {
            color: style.rsi_color.clone(),
            width: style.line_width,
        },
    };

    ChartPanel {
        title: format!("{} {}", analysis.symbol(), analysis.rsi.indicator_type),
        y_label: "RSI".into(),
        width: style.width,
        height: style.rsi_height,
        grid_alpha: style.grid_alpha,
        y_range: Some((0.0, 100.0)),
        guides: vec![RSI_OVERSOLD, RSI_OVERBOUGHT],
        fills: Vec::new(),
        lines: vec![rsi],
    }
}

pub fn build_document(title: &str, analyses: &[SymbolAnalysis], style: &ChartStyle) -> ChartDocument {
    let mut panels = Vec::with_capacity(analyses.len() * 2);
    for analysis in analyses {
        panels.push(build_price_panel(analysis, style));
        if style.rsi_panel {
            panels.push(build_rsi_panel(analysis, style));
        }
    }

    ChartDocument {
        title: title.to_string(),
        panels,
    }
}
