//! Statement ordering.
//!
//! This module turns converted revenue rows into statement lines in
//! presentation order: owner company ascending, then the two-digit month
//! string ascending.

use std::cmp::Ordering;

use crate::models::{MonthlyCompanyRevenue, StatementLine};

/// Orders two statement lines for presentation.
///
/// The primary keys are the company name and the `"MM"` month string, so
/// months compare numerically only within a single year. Lines equal on both
/// are ordered by full month start date, country, then currency (absent
/// currency first), which makes the order total for any set of buckets.
pub fn statement_order(a: &StatementLine, b: &StatementLine) -> Ordering {
    a.owner_company
        .cmp(&b.owner_company)
        .then_with(|| a.month.cmp(&b.month))
        .then_with(|| a.month_start.cmp(&b.month_start))
        .then_with(|| a.owner_company_country.cmp(&b.owner_company_country))
        .then_with(|| a.currency.cmp(&b.currency))
}

/// Builds the ordered statement lines from converted revenue rows.
///
/// # Example
///
/// ```
/// use revenue_engine::calculation::build_statement_lines;
/// use revenue_engine::models::{ConversionStatus, MonthlyCompanyRevenue};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let row = |company: &str, month: u32| MonthlyCompanyRevenue {
///     owner_company: company.to_string(),
///     owner_company_country: "Uk".to_string(),
///     revenue_currency: Some("GBP".to_string()),
///     month_start: NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
///     booking_count: 1,
///     total_booking_fee: Decimal::from(10),
///     total_revenue_original: Decimal::from(100),
///     revenue_in_reference_currency: Some(Decimal::from(100)),
///     conversion_status: ConversionStatus::Converted,
/// };
///
/// let lines = build_statement_lines(vec![row("Zeta", 1), row("Acme", 11), row("Acme", 2)]);
/// let order: Vec<(&str, &str)> = lines
///     .iter()
///     .map(|l| (l.owner_company.as_str(), l.month.as_str()))
///     .collect();
/// assert_eq!(order, vec![("Acme", "02"), ("Acme", "11"), ("Zeta", "01")]);
/// ```
pub fn build_statement_lines(rows: Vec<MonthlyCompanyRevenue>) -> Vec<StatementLine> {
    let mut lines: Vec<StatementLine> = rows.into_iter().map(StatementLine::from).collect();
    lines.sort_by(statement_order);
    lines
}
