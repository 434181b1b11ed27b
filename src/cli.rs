//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_chart::HtmlChartAdapter;
use crate::domain::analysis::{IndicatorParams, SymbolAnalysis, analyze, analyze_symbols};
use crate::domain::chart::{ChartStyle, DEFAULT_DOCUMENT_TITLE, build_document};
use crate::domain::config_validation::{
    SECTION, parse_band_alpha, parse_bool, parse_date, parse_int, parse_rsi_timeframe,
    parse_window, parse_zero_loss,
    validate_chart_config,
};
use crate::domain::error::ChartsError;
use crate::domain::indicator::rsi::DEFAULT_RSI_TIMEFRAME;
use crate::domain::params::{ChartParams, DEFAULT_OUTPUT, parse_symbols};
use crate::ports::chart_port::ChartPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(
    name = "stockcharts",
    about = "Stock price charts with moving averages, Bollinger Bands and RSI"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render charts for the configured symbols
    Chart {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Chart only these symbols (repeatable)
        #[arg(long)]
        symbol: Vec<String>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Print indicator values for one symbol as CSV
    Compute {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
    },
    /// Validate a chart configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Chart {
            config,
            output,
            symbol,
            start,
            end,
        } => run_chart(&config, output, &symbol, start, end),
        Command::Compute { config, symbol } => run_compute(&config, &symbol),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn fail(err: &ChartsError) -> ExitCode {
    error!("{err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        fail(&ChartsError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })
    })
}

fn config_invalid(key: &str, reason: impl Into<String>) -> ChartsError {
    ChartsError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn dimension(config: &dyn ConfigPort, key: &str, default: u32) -> Result<u32, ChartsError> {
    let value = parse_int(config, key, i64::from(default))?;
    u32::try_from(value).map_err(|_| config_invalid(key, format!("{key} is out of range")))
}

/// Resolves a validated configuration into run parameters. A missing
/// `end_date` means `today`.
pub fn build_chart_params(
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<ChartParams, ChartsError> {
    validate_chart_config(config)?;

    let symbols_str = config
        .get_string(SECTION, "symbols")
        .ok_or_else(|| ChartsError::ConfigMissing {
            section: SECTION.into(),
            key: "symbols".into(),
        })?;
    let symbols = parse_symbols(&symbols_str).map_err(|e| config_invalid("symbols", e.to_string()))?;

    let start_date = parse_date(config.get_string(SECTION, "start_date").as_deref(), "start_date")?;
    let end_date = match config.get_string(SECTION, "end_date") {
        Some(s) => parse_date(Some(&s), "end_date")?,
        None => today,
    };
    if start_date >= end_date {
        return Err(config_invalid(
            "start_date",
            format!("start_date {start_date} must be before end_date {end_date}"),
        ));
    }

    let data_path = config
        .get_string("data", "path")
        .ok_or_else(|| ChartsError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;

    let indicators = IndicatorParams {
        window: parse_window(config)?,
        rsi_timeframe: parse_rsi_timeframe(config, DEFAULT_RSI_TIMEFRAME)?,
        zero_loss: parse_zero_loss(config)?,
    };

    let defaults = ChartStyle::default();
    let style = ChartStyle {
        band_alpha: parse_band_alpha(config, defaults.band_alpha)?,
        width: dimension(config, "width", defaults.width)?,
        height: dimension(config, "height", defaults.height)?,
        rsi_height: dimension(config, "rsi_height", defaults.rsi_height)?,
        rsi_panel: parse_bool(config, "rsi_panel", defaults.rsi_panel)?,
        ..defaults
    };

    Ok(ChartParams {
        symbols,
        start_date,
        end_date,
        indicators,
        data_path: PathBuf::from(data_path),
        output: config
            .get_string(SECTION, "output")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        title: config
            .get_string(SECTION, "title")
            .unwrap_or_else(|| DEFAULT_DOCUMENT_TITLE.to_string()),
        style,
    })
}

/// Applies command-line overrides on top of the configured parameters.
pub fn apply_overrides(
    mut params: ChartParams,
    output: Option<PathBuf>,
    symbols: &[String],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<ChartParams, ChartsError> {
    if !symbols.is_empty() {
        params.symbols =
            parse_symbols(&symbols.join(",")).map_err(|e| config_invalid("symbols", e.to_string()))?;
    }
    if let Some(start) = start {
        params.start_date = start;
    }
    if let Some(end) = end {
        params.end_date = end;
    }
    if params.start_date >= params.end_date {
        return Err(config_invalid(
            "start_date",
            format!(
                "start_date {} must be before end_date {}",
                params.start_date, params.end_date
            ),
        ));
    }
    if let Some(output) = output {
        params.output = output;
    }
    Ok(params)
}

fn run_chart(
    config_path: &Path,
    output: Option<PathBuf>,
    symbols: &[String],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> ExitCode {
    info!(config = %config_path.display(), "loading config");
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let params = match build_chart_params(&config, today())
        .and_then(|p| apply_overrides(p, output, symbols, start, end))
    {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    let data_port = CsvAdapter::new(params.data_path.clone());
    run_chart_pipeline(&data_port, &HtmlChartAdapter::new(), &params)
}

/// Fetches, analyses and renders every symbol. Symbols that fail are skipped;
/// the run fails only when none succeed.
pub fn run_chart_pipeline(
    data_port: &dyn DataPort,
    chart_port: &dyn ChartPort,
    params: &ChartParams,
) -> ExitCode {
    info!(
        symbols = params.symbols.len(),
        start = %params.start_date,
        end = %params.end_date,
        window = %params.indicators.window,
        "charting"
    );

    let run = analyze_symbols(
        data_port,
        &params.symbols,
        params.start_date,
        params.end_date,
        &params.indicators,
    );

    if run.analyses.is_empty() {
        return fail(&run.failure());
    }

    let document = build_document(&params.title, &run.analyses, &params.style);
    match chart_port.render(&document, &params.output) {
        Ok(()) => {
            info!(
                charted = run.analyses.len(),
                skipped = run.skipped.len(),
                output = %params.output.display(),
                "chart complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes `date,close,sma,upper,lower,rsi` rows; undefined values are empty.
pub fn write_indicator_table<W: Write>(
    writer: W,
    analysis: &SymbolAnalysis,
) -> Result<(), ChartsError> {
    let to_io = |e: csv::Error| ChartsError::Io(e.into());
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["date", "close", "sma", "upper", "lower", "rsi"])
        .map_err(to_io)?;

    let dates = analysis.prices.dates();
    let closes = analysis.prices.closes();
    for (i, (date, close)) in dates.iter().zip(closes).enumerate() {
        wtr.write_record([
            date.format("%Y-%m-%d").to_string(),
            close.to_string(),
            format_value(analysis.sma.get(i)),
            format_value(analysis.bands.upper.get(i)),
            format_value(analysis.bands.lower.get(i)),
            format_value(analysis.rsi.get(i)),
        ])
        .map_err(to_io)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Fetches and analyses a single symbol, failing on any error.
pub fn compute_symbol(
    data_port: &dyn DataPort,
    symbol: &str,
    params: &ChartParams,
) -> Result<SymbolAnalysis, ChartsError> {
    let prices = data_port.fetch_prices(symbol, params.start_date, params.end_date)?;
    if prices.is_empty() {
        return Err(ChartsError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: format!(
                "no prices between {} and {}",
                params.start_date, params.end_date
            ),
        });
    }
    Ok(analyze(prices, &params.indicators)?)
}

fn run_compute(config_path: &Path, symbol: &str) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let params = match build_chart_params(&config, today()) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    let symbol = symbol.trim().to_uppercase();
    let data_port = CsvAdapter::new(params.data_path.clone());
    let result = compute_symbol(&data_port, &symbol, &params)
        .and_then(|analysis| write_indicator_table(io::stdout().lock(), &analysis));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    info!(config = %config_path.display(), "validating config");
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let params = match build_chart_params(&config, today()) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    eprintln!("Symbols:        {}", params.symbols.join(", "));
    eprintln!("Date range:     {} to {}", params.start_date, params.end_date);
    eprintln!("Window:         {}", params.indicators.window);
    eprintln!("RSI timeframe:  {}", params.indicators.rsi_timeframe);
    eprintln!("Zero loss:      {}", params.indicators.zero_loss);
    eprintln!("Data path:      {}", params.data_path.display());
    eprintln!("Output:         {}", params.output.display());
    eprintln!("Title:          {}", params.title);
    eprintln!("\nChart configuration is valid.");
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let Some(data_path) = config.get_string("data", "path") else {
        return fail(&ChartsError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        });
    };

    let symbols = match CsvAdapter::new(PathBuf::from(&data_path)).list_symbols() {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    if symbols.is_empty() {
        warn!(path = %data_path, "no symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        info!(count = symbols.len(), "symbols found");
    }
    ExitCode::SUCCESS
}
