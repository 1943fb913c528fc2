//! Booking cleaning.
//!
//! Raw booking records from the booking API are loosely typed: identifiers
//! may be strings or numbers, fields may be missing, text may be padded or
//! oddly cased, and dates may not parse. This module turns them into
//! [`Booking`] values the pipeline can trust.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Booking, CleaningReport, parse_calendar_date};

/// A booking identifier as delivered by the source: text or a number.
///
/// Any other JSON value lands in [`RawBookingId::Other`] so a single odd
/// identifier never fails the whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawBookingId {
    /// A numeric identifier.
    Number(i64),
    /// A textual identifier.
    Text(String),
    /// Anything else: fractional numbers, booleans, arrays, objects.
    Other(serde_json::Value),
}

impl RawBookingId {
    /// The identifier as text, `None` if blank or unusable.
    ///
    /// Unsigned integers beyond `i64` are kept; every other
    /// [`RawBookingId::Other`] value is unusable.
    fn normalized(&self) -> Option<String> {
        match self {
            Self::Number(n) => Some(n.to_string()),
            Self::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Self::Other(value) => value.as_u64().map(|n| n.to_string()),
        }
    }
}

/// An unvalidated booking record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBooking {
    /// The booking identifier.
    #[serde(default)]
    pub booking_id: Option<RawBookingId>,
    /// Check-in date text.
    #[serde(default)]
    pub check_in_date: Option<String>,
    /// Check-out date text.
    #[serde(default)]
    pub check_out_date: Option<String>,
    /// Owner company name.
    #[serde(default)]
    pub owner_company: Option<String>,
    /// Owner company country.
    #[serde(default)]
    pub owner_company_country: Option<String>,
}

/// The result of cleaning raw bookings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleaningResult {
    /// Bookings that survived cleaning, in source order.
    pub bookings: Vec<Booking>,
    /// What was dropped and why.
    pub report: CleaningReport,
}

/// Trims text and capitalizes the first letter of every alphabetic run.
///
/// Letters following another letter are lowercased; any non-letter starts a
/// new word.
///
/// # Example
///
/// ```
/// use revenue_engine::ingest::title_case;
///
/// assert_eq!(title_case("  acme HOTELS ltd "), "Acme Hotels Ltd");
/// assert_eq!(title_case("USA"), "Usa");
/// assert_eq!(title_case("o'neil-smith"), "O'Neil-Smith");
/// ```
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.trim().chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Cleans raw booking records.
///
/// Steps, in order:
/// 1. drop records without a usable identifier;
/// 2. keep only the last record for each identifier;
/// 3. drop records without an owner company or country;
/// 4. parse both dates, dropping records where either fails;
/// 5. trim and title-case the company and country;
/// 6. drop records whose check-out precedes check-in.
///
/// # Example
///
/// ```
/// use revenue_engine::ingest::{RawBooking, RawBookingId, clean_bookings};
///
/// let raw = RawBooking {
///     booking_id: Some(RawBookingId::Number(7)),
///     check_in_date: Some("2024-03-01".to_string()),
///     check_out_date: Some("2024-03-04".to_string()),
///     owner_company: Some(" acme ".to_string()),
///     owner_company_country: Some("uk".to_string()),
/// };
///
/// let result = clean_bookings(vec![raw]);
/// assert_eq!(result.bookings[0].booking_id, "7");
/// assert_eq!(result.bookings[0].owner_company, "Acme");
/// assert_eq!(result.bookings[0].owner_company_country, "Uk");
/// ```
pub fn clean_bookings(records: Vec<RawBooking>) -> CleaningResult {
    let mut report = CleaningReport {
        received: records.len(),
        ..CleaningReport::default()
    };

    let mut with_ids: Vec<(String, RawBooking)> = Vec::with_capacity(records.len());
    for record in records {
        match record.booking_id.as_ref().and_then(RawBookingId::normalized) {
            Some(id) => with_ids.push((id, record)),
            None => report.missing_id += 1,
        }
    }

    let mut last_index: HashMap<&str, usize> = HashMap::new();
    for (index, (id, _)) in with_ids.iter().enumerate() {
        last_index.insert(id.as_str(), index);
    }
    let keep: Vec<bool> = with_ids
        .iter()
        .enumerate()
        .map(|(index, (id, _))| last_index.get(id.as_str()) == Some(&index))
        .collect();

    let mut bookings = Vec::new();
    for ((booking_id, record), keep) in with_ids.into_iter().zip(keep) {
        if !keep {
            report.duplicates += 1;
            continue;
        }

        let (Some(company), Some(country)) = (
            record.owner_company.as_deref().filter(|s| !s.trim().is_empty()),
            record.owner_company_country.as_deref().filter(|s| !s.trim().is_empty()),
        ) else {
            report.missing_owner += 1;
            continue;
        };

        let dates = (
            record.check_in_date.as_deref().and_then(parse_calendar_date),
            record.check_out_date.as_deref().and_then(parse_calendar_date),
        );
        let (Some(check_in_date), Some(check_out_date)) = dates else {
            report.invalid_dates += 1;
            continue;
        };

        if check_out_date < check_in_date {
            report.inverted_ranges += 1;
            continue;
        }

        bookings.push(Booking {
            booking_id,
            check_in_date,
            check_out_date,
            owner_company: title_case(company),
            owner_company_country: title_case(country),
        });
    }

    report.kept = bookings.len();
    CleaningResult { bookings, report }
}
