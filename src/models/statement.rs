//! Statement models.
//!
//! This module contains the [`Statement`] produced by a pipeline run, the
//! per-company, per-month [`StatementLine`] records it holds, and the
//! [`RunReport`] that records every row-level anomaly absorbed on the way.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ConversionStatus, MonthlyCompanyRevenue};

/// One line of the monthly revenue statement.
///
/// The first four fields form the presentation contract; the rest let
/// consumers tell converted figures from pass-through ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// The owning company.
    pub owner_company: String,
    /// The billing month as a two-digit string ("01".."12").
    pub month: String,
    /// Revenue in the booking's original currency.
    pub original_monthly_revenue: Decimal,
    /// Revenue in the reference currency (equal to the original when unconverted).
    pub monthly_revenue_in_reference_currency: Decimal,
    /// The owning company's country.
    pub owner_company_country: String,
    /// The original currency, `None` when the country is unmapped.
    pub currency: Option<String>,
    /// The first day of the billing month.
    pub month_start: NaiveDate,
    /// How the reference figure was obtained.
    pub conversion_status: ConversionStatus,
}

impl From<MonthlyCompanyRevenue> for StatementLine {
    fn from(row: MonthlyCompanyRevenue) -> Self {
        let month = row.month_label();
        let reference = row
            .revenue_in_reference_currency
            .unwrap_or(row.total_revenue_original);
        Self {
            owner_company: row.owner_company,
            month,
            original_monthly_revenue: row.total_revenue_original,
            monthly_revenue_in_reference_currency: reference,
            owner_company_country: row.owner_company_country,
            currency: row.revenue_currency,
            month_start: row.month_start,
            conversion_status: row.conversion_status,
        }
    }
}

/// Counts produced while cleaning raw bookings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Raw records received.
    pub received: usize,
    /// Records dropped for having no booking identifier.
    pub missing_id: usize,
    /// Earlier duplicates dropped in favour of a later record with the same identifier.
    pub duplicates: usize,
    /// Records dropped for having no owner company or country.
    pub missing_owner: usize,
    /// Records dropped because a date was absent or unparseable.
    pub invalid_dates: usize,
    /// Records dropped because check-out preceded check-in.
    pub inverted_ranges: usize,
    /// Records that survived cleaning.
    pub kept: usize,
}

/// A non-fatal condition recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunWarning {
    /// A code identifying the kind of warning.
    pub code: String,
    /// A human-readable description.
    pub message: String,
}

/// Row-level anomalies absorbed by a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Booking records aggregated.
    pub bookings_aggregated: usize,
    /// Daily rate rows that could not be parsed and were excluded.
    pub skipped_rate_rows: usize,
    /// Valid daily rate rows whose target was not the reference currency.
    pub non_reference_rate_rows: usize,
    /// Monthly average rates available for conversion.
    pub monthly_rates: usize,
    /// Distinct countries (as written on bookings) with no currency mapping.
    pub unmapped_countries: Vec<String>,
    /// Statement lines whose reference figure is a pass-through.
    pub unconverted_lines: usize,
    /// Booking cleaning counts, when the bookings went through cleaning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaning: Option<CleaningReport>,
    /// Warnings raised along the way.
    pub warnings: Vec<RunWarning>,
}

impl RunReport {
    /// Records a warning.
    pub fn warn(&mut self, code: &str, message: impl Into<String>) {
        self.warnings.push(RunWarning {
            code: code.to_string(),
            message: message.into(),
        });
    }
}

/// The complete result of a pipeline run.
///
/// # Example
///
/// ```
/// use revenue_engine::models::{RunReport, Statement};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let statement = Statement {
///     run_id: Uuid::new_v4(),
///     generated_at: Utc::now(),
///     engine_version: "0.1.0".to_string(),
///     reference_currency: "GBP".to_string(),
///     lines: vec![],
///     report: RunReport::default(),
/// };
/// assert!(statement.lines.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the statement was built.
    pub generated_at: DateTime<Utc>,
    /// The version of the engine that built the statement.
    pub engine_version: String,
    /// The currency every `monthly_revenue_in_reference_currency` is expressed in.
    pub reference_currency: String,
    /// Statement lines ordered by company, then month.
    pub lines: Vec<StatementLine>,
    /// Anomalies absorbed during the run.
    pub report: RunReport,
}
