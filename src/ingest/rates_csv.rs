//! Exchange-rate CSV ingestion.
//!
//! Reads `from_currency,to_currency,rate,rate_date` rows into
//! [`RawExchangeRate`] values. Columns may appear in any order and extra
//! columns are ignored. Cell contents are not validated here.

use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::RawExchangeRate;

/// Default location of the exchange-rate file.
pub const DEFAULT_RATES_CSV: &str = "currency_rates.csv";

const REQUIRED_COLUMNS: [&str; 4] = ["from_currency", "to_currency", "rate", "rate_date"];

/// Parses exchange-rate rows from CSV text.
///
/// `origin` names the source in error messages.
///
/// # Example
///
/// ```
/// use revenue_engine::ingest::parse_rates_csv;
///
/// let csv = "rate_date,from_currency,to_currency,rate\n2024-03-01,USD,GBP,0.79\n";
/// let rows = parse_rates_csv(csv, "inline")?;
/// assert_eq!(rows[0].from_currency.as_deref(), Some("USD"));
/// assert_eq!(rows[0].rate.as_deref(), Some("0.79"));
/// # Ok::<(), revenue_engine::error::EngineError>(())
/// ```
pub fn parse_rates_csv(content: &str, origin: &str) -> EngineResult<Vec<RawExchangeRate>> {
    let rate_error = |message: String| EngineError::RateFileError {
        path: origin.to_string(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| rate_error(format!("Unreadable header row: {}", e)))?
        .clone();

    let mut indices = [0usize; 4];
    for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| rate_error(format!("Missing required column '{}'", column)))?;
    }
    let [from_idx, to_idx, rate_idx, date_idx] = indices;

    let mut rows = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| rate_error(format!("CSV parse error at row {}: {}", row_idx + 1, e)))?;
        let cell = |idx: usize| {
            record
                .get(idx)
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        };
        rows.push(RawExchangeRate {
            from_currency: cell(from_idx),
            to_currency: cell(to_idx),
            rate: cell(rate_idx),
            rate_date: cell(date_idx),
        });
    }

    Ok(rows)
}

/// Reads exchange-rate rows from a CSV file.
///
/// # Errors
///
/// Returns [`EngineError::RateFileError`] if the file cannot be read, has no
/// header row, or lacks a required column.
pub fn read_rates_csv(path: &Path) -> EngineResult<Vec<RawExchangeRate>> {
    let content = std::fs::read_to_string(path).map_err(|e| EngineError::RateFileError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let rows = parse_rates_csv(&content, &path.display().to_string())?;
    info!(path = %path.display(), rows = rows.len(), "Read exchange-rate file");
    Ok(rows)
}
