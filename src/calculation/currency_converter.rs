//! Reference-currency conversion.
//!
//! This module joins monthly company revenue against the monthly average
//! rates. Rows without a matching rate keep their original figure as the
//! reference figure; this pass-through is a deliberate fallback, never an
//! error, and is recorded in each row's [`ConversionStatus`].

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{ConversionStatus, MonthlyAverageRate, MonthlyCompanyRevenue};

/// Monthly average rates indexed for lookup by (source, target, month).
#[derive(Debug, Clone, Default)]
pub struct MonthlyRateTable {
    rates: HashMap<(String, String, NaiveDate), Decimal>,
}

impl MonthlyRateTable {
    /// Indexes a set of monthly averages.
    pub fn new(monthly_rates: &[MonthlyAverageRate]) -> Self {
        let rates = monthly_rates
            .iter()
            .map(|r| {
                (
                    (r.from_currency.clone(), r.to_currency.clone(), r.month_start),
                    r.avg_rate,
                )
            })
            .collect();
        Self { rates }
    }

    /// Looks up the average rate for a pair in the month starting at `month_start`.
    pub fn rate_for(&self, from: &str, to: &str, month_start: NaiveDate) -> Option<Decimal> {
        self.rates
            .get(&(from.to_string(), to.to_string(), month_start))
            .copied()
    }

    /// Number of indexed averages.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if no averages are indexed.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// The result of converting revenue rows into the reference currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    /// The input rows with their reference figure populated.
    pub rows: Vec<MonthlyCompanyRevenue>,
    /// Rows multiplied by a monthly average rate.
    pub converted: usize,
    /// Rows whose reference figure is the original figure.
    pub unconverted: usize,
}

/// Populates the reference-currency figure of every revenue row.
///
/// For a row with currency `C` in month `M`, the rate keyed by
/// (`C`, `reference_currency`, `M`) is applied when present:
/// `revenue_in_reference_currency = total_revenue_original × avg_rate`.
/// Otherwise the original figure is reused verbatim and the status records
/// whether the country was unmapped or the rate was missing. A product too
/// large for the decimal range is treated as a missing rate.
///
/// # Example
///
/// ```
/// use revenue_engine::calculation::{MonthlyRateTable, convert_to_reference};
/// use revenue_engine::models::{ConversionStatus, MonthlyAverageRate, MonthlyCompanyRevenue};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let table = MonthlyRateTable::new(&[MonthlyAverageRate {
///     from_currency: "USD".to_string(),
///     to_currency: "GBP".to_string(),
///     month_start: march,
///     avg_rate: Decimal::from_str("0.79").unwrap(),
///     observations: 1,
/// }]);
/// let row = MonthlyCompanyRevenue {
///     owner_company: "Acme".to_string(),
///     owner_company_country: "USA".to_string(),
///     revenue_currency: Some("USD".to_string()),
///     month_start: march,
///     booking_count: 1,
///     total_booking_fee: Decimal::from(14),
///     total_revenue_original: Decimal::from(140),
///     revenue_in_reference_currency: None,
///     conversion_status: ConversionStatus::Pending,
/// };
///
/// let result = convert_to_reference(vec![row], &table, "GBP");
/// assert_eq!(
///     result.rows[0].revenue_in_reference_currency,
///     Some(Decimal::from_str("110.6").unwrap())
/// );
/// ```
pub fn convert_to_reference(
    rows: Vec<MonthlyCompanyRevenue>,
    rates: &MonthlyRateTable,
    reference_currency: &str,
) -> ConversionResult {
    let mut converted = 0;
    let mut unconverted = 0;

    let rows = rows
        .into_iter()
        .map(|mut row| {
            let rate = row
                .revenue_currency
                .as_deref()
                .and_then(|currency| rates.rate_for(currency, reference_currency, row.month_start));

            let product = rate.and_then(|avg_rate| {
                let product = row.total_revenue_original.checked_mul(avg_rate);
                if product.is_none() {
                    warn!(
                        owner_company = %row.owner_company,
                        month = %row.month_start.format("%Y-%m"),
                        "Converted revenue overflowed; keeping the original figure"
                    );
                }
                product
            });

            match product {
                Some(reference) => {
                    row.revenue_in_reference_currency = Some(reference);
                    row.conversion_status = ConversionStatus::Converted;
                    converted += 1;
                }
                None => {
                    row.revenue_in_reference_currency = Some(row.total_revenue_original);
                    row.conversion_status = if row.revenue_currency.is_some() {
                        ConversionStatus::MissingRate
                    } else {
                        ConversionStatus::UnmappedCountry
                    };
                    unconverted += 1;
                }
            }
            row
        })
        .collect();

    ConversionResult {
        rows,
        converted,
        unconverted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn month(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn avg(from: &str, to: &str, month_start: NaiveDate, rate: &str) -> MonthlyAverageRate {
        MonthlyAverageRate {
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            month_start,
            avg_rate: dec(rate),
            observations: 1,
        }
    }

    fn revenue(currency: Option<&str>, month_start: NaiveDate, total: &str) -> MonthlyCompanyRevenue {
        MonthlyCompanyRevenue {
            owner_company: "Acme".to_string(),
            owner_company_country: "Somewhere".to_string(),
            revenue_currency: currency.map(str::to_string),
            month_start,
            booking_count: 1,
            total_booking_fee: dec(total),
            total_revenue_original: dec(total),
            revenue_in_reference_currency: None,
            conversion_status: ConversionStatus::Pending,
        }
    }

    fn table() -> MonthlyRateTable {
        MonthlyRateTable::new(&[
            avg("USD", "GBP", month(2024, 3), "0.79"),
            avg("GBP", "GBP", month(2024, 3), "1.0"),
            avg("EUR", "USD", month(2024, 3), "1.08"),
        ])
    }

    /// CC-001: matching rate multiplies the original figure
    #[test]
    fn test_matching_rate_converts() {
        let result = convert_to_reference(vec![revenue(Some("USD"), month(2024, 3), "140")], &table(), "GBP");

        let row = &result.rows[0];
        assert_eq!(row.revenue_in_reference_currency, Some(dec("110.6")));
        assert_eq!(row.conversion_status, ConversionStatus::Converted);
        assert_eq!(result.converted, 1);
        assert_eq!(result.unconverted, 0);
    }

    /// CC-002: identity rate leaves the value unchanged
    #[test]
    fn test_identity_rate() {
        let result = convert_to_reference(vec![revenue(Some("GBP"), month(2024, 3), "100")], &table(), "GBP");
        assert_eq!(result.rows[0].revenue_in_reference_currency, Some(dec("100.0")));
        assert_eq!(result.rows[0].conversion_status, ConversionStatus::Converted);
    }

    /// CC-003: missing month falls back to the original figure exactly
    #[test]
    fn test_missing_month_falls_back() {
        let result = convert_to_reference(vec![revenue(Some("USD"), month(2024, 4), "140")], &table(), "GBP");

        let row = &result.rows[0];
        assert_eq!(row.revenue_in_reference_currency, Some(row.total_revenue_original));
        assert_eq!(row.conversion_status, ConversionStatus::MissingRate);
        assert_eq!(result.unconverted, 1);
    }

    /// CC-004: unknown currency falls back
    #[test]
    fn test_unknown_currency_falls_back() {
        let result = convert_to_reference(vec![revenue(Some("JPY"), month(2024, 3), "120")], &table(), "GBP");
        assert_eq!(result.rows[0].revenue_in_reference_currency, Some(dec("120")));
        assert_eq!(result.rows[0].conversion_status, ConversionStatus::MissingRate);
    }

    /// CC-005: unmapped country (no currency) falls back
    #[test]
    fn test_unmapped_country_falls_back() {
        let result = convert_to_reference(vec![revenue(None, month(2024, 3), "120")], &table(), "GBP");
        assert_eq!(result.rows[0].revenue_in_reference_currency, Some(dec("120")));
        assert_eq!(result.rows[0].conversion_status, ConversionStatus::UnmappedCountry);
    }

    /// CC-006: a rate into another target is never used
    #[test]
    fn test_rate_into_other_target_is_ignored() {
        let result = convert_to_reference(vec![revenue(Some("EUR"), month(2024, 3), "120")], &table(), "GBP");
        assert_eq!(result.rows[0].revenue_in_reference_currency, Some(dec("120")));
        assert_eq!(result.rows[0].conversion_status, ConversionStatus::MissingRate);
    }

    #[test]
    fn test_same_month_other_year_does_not_match() {
        let result = convert_to_reference(vec![revenue(Some("USD"), month(2023, 3), "140")], &table(), "GBP");
        assert_eq!(result.rows[0].conversion_status, ConversionStatus::MissingRate);
    }

    #[test]
    fn test_rate_table_lookup() {
        let table = table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rate_for("USD", "GBP", month(2024, 3)), Some(dec("0.79")));
        assert_eq!(table.rate_for("usd", "GBP", month(2024, 3)), None);
        assert!(MonthlyRateTable::default().is_empty());
    }

    /// CC-007: a product beyond the decimal range falls back like a missing rate
    #[test]
    fn test_overflowing_product_falls_back() {
        let rates = MonthlyRateTable::new(&[avg(
            "USD",
            "GBP",
            month(2024, 3),
            "1000000000000000000000000000",
        )]);
        let result = convert_to_reference(vec![revenue(Some("USD"), month(2024, 3), "140")], &rates, "GBP");

        let row = &result.rows[0];
        assert_eq!(row.revenue_in_reference_currency, Some(dec("140")));
        assert_eq!(row.conversion_status, ConversionStatus::MissingRate);
        assert_eq!(result.converted, 0);
        assert_eq!(result.unconverted, 1);
    }
}
