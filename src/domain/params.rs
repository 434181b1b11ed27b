//! Charting run parameters.

use crate::domain::analysis::IndicatorParams;
use crate::domain::chart::ChartStyle;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "stocks.html";

#[derive(Debug, Clone)]
pub struct ChartParams {
    pub symbols: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub indicators: IndicatorParams,
    pub data_path: PathBuf,
    pub output: PathBuf,
    pub title: String,
    pub style: ChartStyle,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SymbolListError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

/// Parses a comma-separated ticker list, upper-casing each entry.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, SymbolListError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(SymbolListError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(SymbolListError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_uppercases() {
        assert_eq!(
            parse_symbols("aapl, GOOG,msft ,NTDOY").unwrap(),
            vec!["AAPL", "GOOG", "MSFT", "NTDOY"]
        );
    }

    #[test]
    fn single_symbol() {
        assert_eq!(parse_symbols("AAPL").unwrap(), vec!["AAPL"]);
    }

    #[test]
    fn rejects_empty_tokens() {
        assert_eq!(parse_symbols("AAPL,,MSFT"), Err(SymbolListError::EmptyToken));
        assert_eq!(parse_symbols(""), Err(SymbolListError::EmptyToken));
    }

    #[test]
    fn rejects_duplicates_case_insensitively() {
        assert_eq!(
            parse_symbols("AAPL,aapl"),
            Err(SymbolListError::DuplicateSymbol("AAPL".into()))
        );
    }
}
