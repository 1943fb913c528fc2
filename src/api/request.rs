//! Request types for the Revenue Statement Engine API.
//!
//! This module defines the JSON request structure for the `/statement` endpoint.

use serde::{Deserialize, Serialize};

use crate::ingest::RawBooking;
use crate::models::{CountryCurrencyMapping, RawExchangeRate};

/// Request body for the `/statement` endpoint.
///
/// Bookings are cleaned server-side before aggregation, so they may arrive
/// in the same loose shape the booking API serves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementRequest {
    /// Raw booking records.
    pub bookings: Vec<RawBooking>,
    /// Daily exchange-rate rows.
    pub exchange_rates: Vec<RateRequest>,
    /// Country to currency entries overriding the server's configured mapping.
    #[serde(default)]
    pub country_currencies: Option<CountryCurrencyMapping>,
}

/// A rate value given either as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RateValue {
    /// A JSON number.
    Number(serde_json::Number),
    /// A decimal string.
    Text(String),
}

impl RateValue {
    fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// A daily exchange-rate row in a statement request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateRequest {
    /// The source currency code.
    #[serde(default)]
    pub from_currency: Option<String>,
    /// The target currency code.
    #[serde(default)]
    pub to_currency: Option<String>,
    /// Units of target per unit of source.
    #[serde(default)]
    pub rate: Option<RateValue>,
    /// The observation date (`YYYY-MM-DD`).
    #[serde(default)]
    pub rate_date: Option<String>,
}

impl From<RateRequest> for RawExchangeRate {
    fn from(req: RateRequest) -> Self {
        RawExchangeRate {
            from_currency: req.from_currency,
            to_currency: req.to_currency,
            rate: req.rate.map(RateValue::into_text),
            rate_date: req.rate_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_request_deserialization() {
        let json = r#"{
            "bookings": [
                {"booking_id": 1, "check_in_date": "2024-03-01", "check_out_date": "2024-03-02",
                 "owner_company": "Acme", "owner_company_country": "UK"}
            ],
            "exchange_rates": [
                {"from_currency": "USD", "to_currency": "GBP", "rate": 0.79, "rate_date": "2024-03-01"},
                {"from_currency": "EUR", "to_currency": "GBP", "rate": "0.85", "rate_date": "2024-03-01"}
            ]
        }"#;

        let request: StatementRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.bookings.len(), 1);
        assert!(request.country_currencies.is_none());

        let rates: Vec<RawExchangeRate> = request.exchange_rates.into_iter().map(Into::into).collect();
        assert_eq!(rates[0].rate.as_deref(), Some("0.79"));
        assert_eq!(rates[1].rate.as_deref(), Some("0.85"));
    }

    #[test]
    fn test_country_currencies_override_is_parsed() {
        let json = r#"{"bookings": [], "exchange_rates": [], "country_currencies": {"Japan": "JPY"}}"#;
        let request: StatementRequest = serde_json::from_str(json).unwrap();
        let mapping = request.country_currencies.unwrap();
        assert_eq!(mapping.currency_for("japan"), Some("JPY"));
    }

    #[test]
    fn test_missing_rate_stays_missing() {
        let rate: RawExchangeRate = RateRequest {
            from_currency: Some("USD".to_string()),
            ..RateRequest::default()
        }
        .into();
        assert_eq!(rate.rate, None);
        assert_eq!(rate.to_currency, None);
    }
}
