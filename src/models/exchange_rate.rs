//! Exchange-rate models.
//!
//! Rates arrive as [`RawExchangeRate`] rows straight from the rate source,
//! are validated into [`DailyExchangeRate`] observations, and are collapsed
//! into one [`MonthlyAverageRate`] per currency pair and month.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An unvalidated exchange-rate row as read from the rate source.
///
/// Every field is optional text; a row only becomes a [`DailyExchangeRate`]
/// once all four fields parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExchangeRate {
    /// The source currency code (e.g., "USD").
    #[serde(default)]
    pub from_currency: Option<String>,
    /// The target currency code (e.g., "GBP").
    #[serde(default)]
    pub to_currency: Option<String>,
    /// The rate as text, units of target per unit of source.
    #[serde(default)]
    pub rate: Option<String>,
    /// The observation date as text (`YYYY-MM-DD`).
    #[serde(default)]
    pub rate_date: Option<String>,
}

impl RawExchangeRate {
    /// Convenience constructor for a fully populated row.
    pub fn new(from_currency: &str, to_currency: &str, rate: &str, rate_date: &str) -> Self {
        Self {
            from_currency: Some(from_currency.to_string()),
            to_currency: Some(to_currency.to_string()),
            rate: Some(rate.to_string()),
            rate_date: Some(rate_date.to_string()),
        }
    }
}

/// A validated daily exchange-rate observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyExchangeRate {
    /// The source currency code.
    pub from_currency: String,
    /// The target currency code.
    pub to_currency: String,
    /// The observation date.
    pub rate_date: NaiveDate,
    /// Units of target currency per unit of source currency (always positive).
    pub rate: Decimal,
}

/// The mean of all daily observations for a currency pair within one month.
///
/// # Example
///
/// ```
/// use revenue_engine::models::MonthlyAverageRate;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let avg = MonthlyAverageRate {
///     from_currency: "USD".to_string(),
///     to_currency: "GBP".to_string(),
///     month_start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     avg_rate: Decimal::from_str("0.79").unwrap(),
///     observations: 31,
/// };
/// assert_eq!(avg.observations, 31);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAverageRate {
    /// The source currency code.
    pub from_currency: String,
    /// The target currency code (the reference currency).
    pub to_currency: String,
    /// The first day of the month this average covers.
    pub month_start: NaiveDate,
    /// The arithmetic mean of the month's daily rates.
    pub avg_rate: Decimal,
    /// How many daily rows contributed to the mean.
    pub observations: usize,
}
