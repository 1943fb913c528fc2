//! Booking model and the country→currency mapping.
//!
//! This module defines the [`Booking`] record consumed by the fee aggregator
//! and the [`CountryCurrencyMapping`] used to resolve each booking's
//! settlement currency.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Normalizes a country name into the key used for case-insensitive lookups.
///
/// Surrounding whitespace is ignored and letters are lowercased, so `"UK"`,
/// `"uk"` and `" Uk "` all resolve to the same key.
///
/// # Example
///
/// ```
/// use revenue_engine::models::country_key;
///
/// assert_eq!(country_key(" Usa "), "usa");
/// assert_eq!(country_key("UK"), country_key("uk"));
/// ```
pub fn country_key(country: &str) -> String {
    country.trim().to_lowercase()
}

/// Truncates a date to the first day of its calendar month.
///
/// # Example
///
/// ```
/// use revenue_engine::models::month_start;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
/// assert_eq!(month_start(date), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
/// ```
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Parses a calendar date from source text.
///
/// Accepts `YYYY-MM-DD`, optionally followed by a time part
/// (`YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` or RFC 3339). Returns `None`
/// for blank or unparseable text.
///
/// # Example
///
/// ```
/// use revenue_engine::models::parse_calendar_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
/// assert_eq!(parse_calendar_date("2024-03-05"), expected);
/// assert_eq!(parse_calendar_date("2024-03-05T10:30:00"), expected);
/// assert_eq!(parse_calendar_date("05/03/2024"), None);
/// ```
pub fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|datetime| datetime.date_naive())
}

/// A single booking owned by a company.
///
/// Bookings are immutable once cleaned. The check-out date determines which
/// month the booking's fee is billed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier for the booking.
    pub booking_id: String,
    /// The check-in date.
    pub check_in_date: NaiveDate,
    /// The check-out date (never before the check-in date).
    pub check_out_date: NaiveDate,
    /// The company that owns the booked property.
    pub owner_company: String,
    /// The country of the owning company, used for fee tiering and currency.
    pub owner_company_country: String,
}

impl Booking {
    /// Returns the first day of the month the booking is billed in.
    pub fn billing_month(&self) -> NaiveDate {
        month_start(self.check_out_date)
    }
}

/// Static mapping from country to settlement currency.
///
/// Lookups are case-insensitive. Each country maps to at most one currency;
/// inserting a country that is already present (in any casing) replaces the
/// earlier currency.
///
/// # Example
///
/// ```
/// use revenue_engine::models::CountryCurrencyMapping;
///
/// let mut mapping = CountryCurrencyMapping::new();
/// mapping.insert("UK", "GBP");
/// mapping.insert("USA", "USD");
///
/// assert_eq!(mapping.currency_for("uk"), Some("GBP"));
/// assert_eq!(mapping.currency_for("Usa"), Some("USD"));
/// assert_eq!(mapping.currency_for("France"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct CountryCurrencyMapping {
    entries: BTreeMap<String, String>,
}

impl CountryCurrencyMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the currency for a country.
    pub fn insert(&mut self, country: &str, currency: &str) {
        self.entries
            .insert(country_key(country), currency.trim().to_string());
    }

    /// Resolves the settlement currency for a country, ignoring case.
    pub fn currency_for(&self, country: &str) -> Option<&str> {
        self.entries.get(&country_key(country)).map(String::as_str)
    }

    /// Overlays `other` on top of this mapping; entries in `other` win.
    pub fn merged_with(&self, other: &CountryCurrencyMapping) -> CountryCurrencyMapping {
        let mut entries = self.entries.clone();
        entries.extend(other.entries.clone());
        Self { entries }
    }

    /// Number of countries in the mapping.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no country is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, String>> for CountryCurrencyMapping {
    fn from(raw: BTreeMap<String, String>) -> Self {
        let mut mapping = Self::new();
        for (country, currency) in &raw {
            mapping.insert(country, currency);
        }
        mapping
    }
}

impl From<CountryCurrencyMapping> for BTreeMap<String, String> {
    fn from(mapping: CountryCurrencyMapping) -> Self {
        mapping.entries
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for CountryCurrencyMapping {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (country, currency) in iter {
            mapping.insert(country, currency);
        }
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_billing_month_uses_check_out_date() {
        let booking = Booking {
            booking_id: "b1".to_string(),
            check_in_date: make_date("2024-02-27"),
            check_out_date: make_date("2024-03-02"),
            owner_company: "Acme".to_string(),
            owner_company_country: "UK".to_string(),
        };
        assert_eq!(booking.billing_month(), make_date("2024-03-01"));
    }

    #[test]
    fn test_month_start_on_first_day_is_identity() {
        assert_eq!(month_start(make_date("2024-12-01")), make_date("2024-12-01"));
    }

    #[test]
    fn test_parse_calendar_date_formats() {
        let expected = Some(make_date("2024-03-05"));
        assert_eq!(parse_calendar_date(" 2024-03-05 "), expected);
        assert_eq!(parse_calendar_date("2024-03-05 23:59:59"), expected);
        assert_eq!(parse_calendar_date("2024-03-05T00:00:00.000"), expected);
        assert_eq!(parse_calendar_date("2024-03-05T10:00:00+02:00"), expected);
    }

    #[test]
    fn test_parse_calendar_date_rejects_garbage() {
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("not a date"), None);
        assert_eq!(parse_calendar_date("2024-02-30"), None);
    }

    #[test]
    fn test_mapping_lookup_ignores_case() {
        let mapping: CountryCurrencyMapping = [("UK", "GBP"), ("usa", "USD")].into_iter().collect();
        assert_eq!(mapping.currency_for("uk"), Some("GBP"));
        assert_eq!(mapping.currency_for("USA"), Some("USD"));
        assert_eq!(mapping.currency_for("Uk"), Some("GBP"));
    }

    #[test]
    fn test_mapping_reinsert_replaces_currency() {
        let mut mapping = CountryCurrencyMapping::new();
        mapping.insert("Ireland", "GBP");
        mapping.insert("IRELAND", "EUR");
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.currency_for("ireland"), Some("EUR"));
    }

    #[test]
    fn test_unmapped_country_returns_none() {
        let mapping: CountryCurrencyMapping = [("UK", "GBP")].into_iter().collect();
        assert_eq!(mapping.currency_for("Narnia"), None);
    }

    #[test]
    fn test_merged_with_prefers_overlay() {
        let base: CountryCurrencyMapping = [("UK", "GBP"), ("USA", "USD")].into_iter().collect();
        let overlay: CountryCurrencyMapping = [("usa", "CAD"), ("France", "EUR")].into_iter().collect();
        let merged = base.merged_with(&overlay);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.currency_for("USA"), Some("CAD"));
        assert_eq!(merged.currency_for("uk"), Some("GBP"));
    }

    #[test]
    fn test_mapping_deserializes_from_json_object() {
        let json = r#"{"UK": "GBP", "Usa": "USD"}"#;
        let mapping: CountryCurrencyMapping = serde_json::from_str(json).unwrap();
        assert_eq!(mapping.currency_for("usa"), Some("USD"));
        assert_eq!(mapping.currency_for("UK"), Some("GBP"));
    }

    #[test]
    fn test_deserialize_booking() {
        let json = r#"{
            "booking_id": "1001",
            "check_in_date": "2024-03-01",
            "check_out_date": "2024-03-04",
            "owner_company": "Acme",
            "owner_company_country": "Uk"
        }"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.booking_id, "1001");
        assert_eq!(booking.check_out_date, make_date("2024-03-04"));
    }
}
