//! End-to-end statement pipeline.
//!
//! Runs the rate normalizer, fee aggregator, currency converter and
//! statement builder in order against one immutable snapshot of inputs.
//! Set-level problems (an empty source, a fee total beyond the decimal range)
//! abort the run; row-level anomalies are absorbed and recorded in the
//! [`RunReport`].

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Booking, CountryCurrencyMapping, RawExchangeRate, RunReport, Statement};

use super::currency_converter::{MonthlyRateTable, convert_to_reference};
use super::fee_aggregator::aggregate_fees;
use super::rate_normalizer::normalize_monthly_rates;
use super::statement_builder::build_statement_lines;

/// The version recorded on every statement.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The three input sources of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementInputs {
    /// Cleaned bookings.
    pub bookings: Vec<Booking>,
    /// Raw daily exchange-rate rows.
    pub exchange_rates: Vec<RawExchangeRate>,
    /// Country to settlement currency mapping.
    pub country_currencies: CountryCurrencyMapping,
}

/// Builds the monthly revenue statement.
///
/// # Errors
///
/// Returns [`EngineError::EmptyInput`] if any of the three sources holds no
/// records, and [`EngineError::InvalidConfig`] if the configuration cannot
/// drive a run. No other condition fails: every company/month present in the
/// bookings appears in the statement, converted or not.
///
/// # Example
///
/// ```
/// use revenue_engine::calculation::{StatementInputs, build_statement};
/// use revenue_engine::config::EngineConfig;
/// use revenue_engine::models::{Booking, RawExchangeRate};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let config = EngineConfig::default();
/// let inputs = StatementInputs {
///     bookings: vec![Booking {
///         booking_id: "1".to_string(),
///         check_in_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///         check_out_date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
///         owner_company: "Acme".to_string(),
///         owner_company_country: "USA".to_string(),
///     }],
///     exchange_rates: vec![RawExchangeRate::new("USD", "GBP", "0.79", "2024-03-10")],
///     country_currencies: config.country_currencies.clone(),
/// };
///
/// let statement = build_statement(&inputs, &config)?;
/// assert_eq!(statement.lines[0].month, "03");
/// assert_eq!(statement.lines[0].original_monthly_revenue, Decimal::from(140));
/// # Ok::<(), revenue_engine::error::EngineError>(())
/// ```
pub fn build_statement(inputs: &StatementInputs, config: &EngineConfig) -> EngineResult<Statement> {
    config.validate()?;
    ensure_not_empty(inputs)?;

    let run_id = Uuid::new_v4();
    let reference_currency = config.reference_currency.as_str();
    let mut report = RunReport::default();

    let normalized = normalize_monthly_rates(&inputs.exchange_rates, reference_currency);
    debug!(
        run_id = %run_id,
        monthly_rates = normalized.monthly_rates.len(),
        skipped_rows = normalized.skipped_rows,
        "Normalized exchange rates"
    );
    report.skipped_rate_rows = normalized.skipped_rows;
    report.non_reference_rate_rows = normalized.non_reference_rows;
    report.monthly_rates = normalized.monthly_rates.len();
    if normalized.skipped_rows > 0 {
        warn!(
            run_id = %run_id,
            skipped_rows = normalized.skipped_rows,
            "Excluded malformed exchange-rate rows from averaging"
        );
        report.warn(
            "MALFORMED_RATE_ROWS",
            format!(
                "{} exchange-rate rows had an unusable currency, rate or date and were excluded",
                normalized.skipped_rows
            ),
        );
    }

    let aggregated = aggregate_fees(
        &inputs.bookings,
        &inputs.country_currencies,
        &config.fee_schedule,
    )?;
    report.bookings_aggregated = inputs.bookings.len();
    for country in &aggregated.unmapped_countries {
        warn!(run_id = %run_id, country = %country, "No currency mapped for country");
        report.warn(
            "UNMAPPED_COUNTRY",
            format!("No currency is mapped for country '{}'; its revenue is not converted", country),
        );
    }
    report.unmapped_countries = aggregated.unmapped_countries;

    let rate_table = MonthlyRateTable::new(&normalized.monthly_rates);
    let conversion = convert_to_reference(aggregated.rows, &rate_table, reference_currency);
    report.unconverted_lines = conversion.unconverted;
    if conversion.unconverted > 0 {
        report.warn(
            "UNCONVERTED_REVENUE",
            format!(
                "{} statement lines carry original-currency figures in the {} column",
                conversion.unconverted, reference_currency
            ),
        );
    }

    let lines = build_statement_lines(conversion.rows);

    info!(
        run_id = %run_id,
        bookings = inputs.bookings.len(),
        lines = lines.len(),
        converted = conversion.converted,
        unconverted = conversion.unconverted,
        "Built revenue statement"
    );

    Ok(Statement {
        run_id,
        generated_at: Utc::now(),
        engine_version: ENGINE_VERSION.to_string(),
        reference_currency: reference_currency.to_string(),
        lines,
        report,
    })
}

fn ensure_not_empty(inputs: &StatementInputs) -> EngineResult<()> {
    if inputs.bookings.is_empty() {
        return Err(EngineError::empty_input("bookings"));
    }
    if inputs.exchange_rates.is_empty() {
        return Err(EngineError::empty_input("exchange_rates"));
    }
    if inputs.country_currencies.is_empty() {
        return Err(EngineError::empty_input("country_currencies"));
    }
    Ok(())
}
