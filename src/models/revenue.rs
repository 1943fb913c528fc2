//! Monthly company revenue models.
//!
//! This module contains [`MonthlyCompanyRevenue`], the aggregation unit
//! produced by the fee aggregator and completed by the currency converter,
//! together with the [`ConversionStatus`] recorded for every row.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the reference-currency figure of a revenue row was obtained.
///
/// Unconverted rows carry the original figure verbatim; the status tells
/// consumers which of the two fallback cases applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    /// Not yet passed through the currency converter.
    Pending,
    /// Multiplied by the matching monthly average rate.
    Converted,
    /// The owner company's country has no currency mapping.
    UnmappedCountry,
    /// The currency is known but no monthly average rate exists for it.
    MissingRate,
}

impl ConversionStatus {
    /// Returns true if the reference figure is a pass-through of the original.
    pub fn is_fallback(self) -> bool {
        matches!(self, Self::UnmappedCountry | Self::MissingRate)
    }

    /// The wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Converted => "converted",
            Self::UnmappedCountry => "unmapped_country",
            Self::MissingRate => "missing_rate",
        }
    }
}

/// Revenue for one (company, country, currency, month) bucket.
///
/// # Example
///
/// ```
/// use revenue_engine::models::{ConversionStatus, MonthlyCompanyRevenue};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let row = MonthlyCompanyRevenue {
///     owner_company: "Acme".to_string(),
///     owner_company_country: "Uk".to_string(),
///     revenue_currency: Some("GBP".to_string()),
///     month_start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     booking_count: 3,
///     total_booking_fee: Decimal::from(30),
///     total_revenue_original: Decimal::from(100),
///     revenue_in_reference_currency: None,
///     conversion_status: ConversionStatus::Pending,
/// };
/// assert_eq!(row.month_label(), "03");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCompanyRevenue {
    /// The owning company.
    pub owner_company: String,
    /// The owning company's country as it appeared on the bookings.
    pub owner_company_country: String,
    /// The settlement currency, `None` when the country is unmapped.
    pub revenue_currency: Option<String>,
    /// The first day of the billing month.
    pub month_start: NaiveDate,
    /// Number of bookings in the bucket.
    pub booking_count: usize,
    /// Sum of per-booking fees before the minimum is applied.
    pub total_booking_fee: Decimal,
    /// Revenue in the original currency, never below the country minimum.
    pub total_revenue_original: Decimal,
    /// Revenue in the reference currency, filled in by the converter.
    pub revenue_in_reference_currency: Option<Decimal>,
    /// How the reference figure was obtained.
    pub conversion_status: ConversionStatus,
}

impl MonthlyCompanyRevenue {
    /// The billing month as a two-digit string ("01".."12").
    pub fn month_label(&self) -> String {
        format!("{:02}", self.month_start.month())
    }

    /// Returns true if the minimum fee, rather than the booking fees, set the revenue.
    pub fn minimum_applied(&self) -> bool {
        self.total_revenue_original > self.total_booking_fee
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_row(month: u32, fees: i64, revenue: i64) -> MonthlyCompanyRevenue {
        MonthlyCompanyRevenue {
            owner_company: "Acme".to_string(),
            owner_company_country: "Uk".to_string(),
            revenue_currency: Some("GBP".to_string()),
            month_start: NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
            booking_count: 1,
            total_booking_fee: Decimal::from(fees),
            total_revenue_original: Decimal::from(revenue),
            revenue_in_reference_currency: None,
            conversion_status: ConversionStatus::Pending,
        }
    }

    #[test]
    fn test_month_label_is_zero_padded() {
        assert_eq!(create_row(3, 10, 100).month_label(), "03");
        assert_eq!(create_row(11, 10, 100).month_label(), "11");
    }

    #[test]
    fn test_minimum_applied_when_revenue_exceeds_fees() {
        assert!(create_row(1, 30, 100).minimum_applied());
        assert!(!create_row(1, 120, 120).minimum_applied());
    }

    #[test]
    fn test_fallback_statuses() {
        assert!(ConversionStatus::UnmappedCountry.is_fallback());
        assert!(ConversionStatus::MissingRate.is_fallback());
        assert!(!ConversionStatus::Converted.is_fallback());
        assert!(!ConversionStatus::Pending.is_fallback());
    }

    #[test]
    fn test_conversion_status_serialization() {
        let json = serde_json::to_string(&ConversionStatus::UnmappedCountry).unwrap();
        assert_eq!(json, "\"unmapped_country\"");
        let status: ConversionStatus = serde_json::from_str("\"missing_rate\"").unwrap();
        assert_eq!(status, ConversionStatus::MissingRate);
    }
}
