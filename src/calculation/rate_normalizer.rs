//! Monthly exchange-rate normalization.
//!
//! This module collapses a noisy daily exchange-rate series into one
//! arithmetic-mean rate per (source currency, target currency, month),
//! keeping only pairs that convert into the reference currency.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{
    DailyExchangeRate, MonthlyAverageRate, RawExchangeRate, month_start, parse_calendar_date,
};

/// The result of normalizing a daily rate series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateNormalizationResult {
    /// One average per (source, reference, month), ordered by source then month.
    pub monthly_rates: Vec<MonthlyAverageRate>,
    /// Rows excluded because a currency, the rate or the date was unusable,
    /// plus every row of a month whose rate total overflowed.
    pub skipped_rows: usize,
    /// Valid rows dropped because their target was not the reference currency.
    pub non_reference_rows: usize,
}

/// Validates one raw rate row.
///
/// Returns `None` when either currency code is blank, the rate is not a
/// positive decimal, or the date does not parse. Currency codes are trimmed
/// but otherwise kept exactly as written.
///
/// # Example
///
/// ```
/// use revenue_engine::calculation::parse_daily_rate;
/// use revenue_engine::models::RawExchangeRate;
///
/// let ok = RawExchangeRate::new("USD", "GBP", "0.79", "2024-03-04");
/// assert!(parse_daily_rate(&ok).is_some());
///
/// let bad = RawExchangeRate::new("USD", "GBP", "n/a", "2024-03-04");
/// assert!(parse_daily_rate(&bad).is_none());
/// ```
pub fn parse_daily_rate(raw: &RawExchangeRate) -> Option<DailyExchangeRate> {
    let from_currency = non_blank(raw.from_currency.as_deref())?;
    let to_currency = non_blank(raw.to_currency.as_deref())?;
    let rate = Decimal::from_str(raw.rate.as_deref()?.trim()).ok()?;
    if rate <= Decimal::ZERO {
        return None;
    }
    let rate_date = parse_calendar_date(raw.rate_date.as_deref()?)?;

    Some(DailyExchangeRate {
        from_currency,
        to_currency,
        rate_date,
        rate,
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Computes monthly average rates into the reference currency.
///
/// Rows are grouped by (source currency, target currency, first day of the
/// month) and each group's rates are averaged with equal weight. Duplicate
/// rows for the same day all count. A pair with no rows in a month produces
/// no average for that month; callers must treat absence as "no rate known".
///
/// # Arguments
///
/// * `rows` - The raw daily rate rows, in any order
/// * `reference_currency` - The only target currency kept
///
/// # Example
///
/// ```
/// use revenue_engine::calculation::normalize_monthly_rates;
/// use revenue_engine::models::RawExchangeRate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rows = vec![
///     RawExchangeRate::new("USD", "GBP", "0.78", "2024-03-01"),
///     RawExchangeRate::new("USD", "GBP", "0.80", "2024-03-15"),
///     RawExchangeRate::new("USD", "EUR", "0.92", "2024-03-15"),
/// ];
///
/// let result = normalize_monthly_rates(&rows, "GBP");
/// assert_eq!(result.monthly_rates.len(), 1);
/// assert_eq!(result.monthly_rates[0].avg_rate, Decimal::from_str("0.79").unwrap());
/// assert_eq!(result.non_reference_rows, 1);
/// ```
pub fn normalize_monthly_rates(
    rows: &[RawExchangeRate],
    reference_currency: &str,
) -> RateNormalizationResult {
    // A `None` total marks a group whose sum overflowed.
    let mut groups: BTreeMap<(String, String, NaiveDate), (Option<Decimal>, usize)> =
        BTreeMap::new();
    let mut skipped_rows = 0;
    let mut non_reference_rows = 0;

    for raw in rows {
        let Some(daily) = parse_daily_rate(raw) else {
            skipped_rows += 1;
            continue;
        };
        if daily.to_currency != reference_currency {
            non_reference_rows += 1;
            continue;
        }

        let key = (
            daily.from_currency,
            daily.to_currency,
            month_start(daily.rate_date),
        );
        let entry = groups.entry(key).or_insert((Some(Decimal::ZERO), 0));
        entry.0 = entry.0.and_then(|total| total.checked_add(daily.rate));
        entry.1 += 1;
    }

    let mut monthly_rates = Vec::with_capacity(groups.len());
    for ((from_currency, to_currency, month_start), (total, count)) in groups {
        let Some(avg_rate) = total.and_then(|t| t.checked_div(Decimal::from(count))) else {
            warn!(
                from_currency = %from_currency,
                to_currency = %to_currency,
                month = %month_start.format("%Y-%m"),
                rows = count,
                "Exchange-rate total overflowed; month excluded from averaging"
            );
            skipped_rows += count;
            continue;
        };
        monthly_rates.push(MonthlyAverageRate {
            from_currency,
            to_currency,
            month_start,
            avg_rate,
            observations: count,
        });
    }

    RateNormalizationResult {
        monthly_rates,
        skipped_rows,
        non_reference_rows,
    }
}
