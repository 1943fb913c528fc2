//! Property-based tests for the statement pipeline.
//!
//! These tests verify that the aggregation and conversion rules hold across
//! generated inputs, using the `proptest` crate.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use revenue_engine::calculation::{
    StatementInputs, aggregate_fees, build_statement, normalize_monthly_rates,
};
use revenue_engine::config::{EngineConfig, FeeSchedule};
use revenue_engine::ingest::{RawBooking, RawBookingId, clean_bookings};
use revenue_engine::models::{Booking, ConversionStatus, RawExchangeRate};

// =============================================================================
// Generators
// =============================================================================

/// Generates a country, in varying case, from the tiered and default sets.
fn arb_country() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("UK".to_string()),
        Just("uk".to_string()),
        Just("USA".to_string()),
        Just("Usa".to_string()),
        Just("France".to_string()),
        Just("Atlantis".to_string()),
    ]
}

/// Generates a booking checked out in 2024.
fn arb_booking() -> impl Strategy<Value = Booking> {
    (
        0u32..10_000,
        prop_oneof![Just("Acme"), Just("Beta"), Just("Zeta")],
        arb_country(),
        1u32..=12,
        1u32..=28,
    )
        .prop_map(|(id, company, country, month, day)| {
            let date = NaiveDate::from_ymd_opt(2024, month, day).unwrap();
            Booking {
                booking_id: id.to_string(),
                check_in_date: date,
                check_out_date: date,
                owner_company: company.to_string(),
                owner_company_country: country,
            }
        })
}

/// Generates a positive rate with four decimal places.
fn arb_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000).prop_map(|units| Decimal::new(units, 4))
}

fn expected_tier(country: &str) -> (i64, i64) {
    match country.to_lowercase().as_str() {
        "uk" => (10, 100),
        "usa" => (14, 140),
        _ => (12, 120),
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The monthly average is the arithmetic mean of every row, duplicates included.
    #[test]
    fn prop_monthly_average_is_arithmetic_mean(
        rates in proptest::collection::vec((arb_rate(), 1u32..=28), 1..40),
    ) {
        let raw: Vec<RawExchangeRate> = rates
            .iter()
            .map(|(rate, day)| {
                RawExchangeRate::new("USD", "GBP", &rate.to_string(), &format!("2024-03-{:02}", day))
            })
            .collect();

        let result = normalize_monthly_rates(&raw, "GBP");
        prop_assert_eq!(result.monthly_rates.len(), 1);

        let average = &result.monthly_rates[0];
        let sum: Decimal = rates.iter().map(|(rate, _)| *rate).sum();
        prop_assert_eq!(average.observations, rates.len());
        prop_assert_eq!(average.avg_rate, sum / Decimal::from(rates.len()));

        let min = rates.iter().map(|(rate, _)| *rate).min().unwrap();
        let max = rates.iter().map(|(rate, _)| *rate).max().unwrap();
        prop_assert!(average.avg_rate >= min && average.avg_rate <= max);
    }

    /// Revenue equals max(count × fee, minimum) for the booking's country tier.
    #[test]
    fn prop_revenue_respects_minimum_floor(
        country in arb_country(),
        count in 1usize..30,
    ) {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let bookings: Vec<Booking> = (0..count)
            .map(|i| Booking {
                booking_id: i.to_string(),
                check_in_date: date,
                check_out_date: date,
                owner_company: "Acme".to_string(),
                owner_company_country: country.clone(),
            })
            .collect();
        let config = EngineConfig::default();

        let result = aggregate_fees(&bookings, &config.country_currencies, &FeeSchedule::default()).unwrap();
        prop_assert_eq!(result.rows.len(), 1);

        let (fee, minimum) = expected_tier(&country);
        let row = &result.rows[0];
        let expected = Decimal::from((count as i64 * fee).max(minimum));
        prop_assert_eq!(row.total_revenue_original, expected);
        prop_assert!(row.total_revenue_original >= Decimal::from(minimum));
    }

    /// Without any rate into the reference currency, every figure passes through unchanged.
    #[test]
    fn prop_no_rate_means_pass_through(
        bookings in proptest::collection::vec(arb_booking(), 1..40),
    ) {
        let config = EngineConfig::default();
        let inputs = StatementInputs {
            bookings,
            exchange_rates: vec![RawExchangeRate::new("USD", "EUR", "0.9", "2024-03-01")],
            country_currencies: config.country_currencies.clone(),
        };

        let statement = build_statement(&inputs, &config).unwrap();
        for line in &statement.lines {
            prop_assert_eq!(line.monthly_revenue_in_reference_currency, line.original_monthly_revenue);
            prop_assert!(line.conversion_status.is_fallback());
        }
    }

    /// Every company/month in the bookings appears in the statement.
    #[test]
    fn prop_every_company_month_is_reported(
        bookings in proptest::collection::vec(arb_booking(), 1..40),
    ) {
        let config = EngineConfig::default();
        let inputs = StatementInputs {
            bookings: bookings.clone(),
            exchange_rates: vec![RawExchangeRate::new("USD", "GBP", "0.79", "2024-03-01")],
            country_currencies: config.country_currencies.clone(),
        };

        let statement = build_statement(&inputs, &config).unwrap();
        for booking in &bookings {
            let month = booking.billing_month().format("%m").to_string();
            prop_assert!(statement.lines.iter().any(|l| l.owner_company == booking.owner_company
                && l.month == month));
        }
        let converted = statement
            .lines
            .iter()
            .filter(|l| l.conversion_status == ConversionStatus::Converted)
            .count();
        prop_assert_eq!(converted + statement.report.unconverted_lines, statement.lines.len());
    }

    /// Reordering the bookings never changes the statement lines.
    #[test]
    fn prop_line_order_is_independent_of_input_order(
        bookings in proptest::collection::vec(arb_booking(), 1..40),
    ) {
        let config = EngineConfig::default();
        let rates = vec![
            RawExchangeRate::new("GBP", "GBP", "1", "2024-03-01"),
            RawExchangeRate::new("USD", "GBP", "0.79", "2024-03-01"),
        ];
        let mut reversed = bookings.clone();
        reversed.reverse();

        let forward = StatementInputs {
            bookings,
            exchange_rates: rates.clone(),
            country_currencies: config.country_currencies.clone(),
        };
        let backward = StatementInputs {
            bookings: reversed,
            exchange_rates: rates,
            country_currencies: config.country_currencies.clone(),
        };

        let first = build_statement(&forward, &config).unwrap();
        let second = build_statement(&backward, &config).unwrap();
        prop_assert_eq!(first.lines, second.lines);
    }

    /// Cleaning accounts for every received record exactly once.
    #[test]
    fn prop_cleaning_counts_add_up(
        records in proptest::collection::vec(
            (
                proptest::option::of(0i64..20),
                prop_oneof![Just("2024-03-01"), Just("2024-03-09"), Just("bad")],
                prop_oneof![Just("2024-03-05"), Just("2024-02-28")],
                proptest::option::of(prop_oneof![Just("acme"), Just(" ")]),
            ),
            0..40,
        ),
    ) {
        let raw: Vec<RawBooking> = records
            .iter()
            .map(|(id, check_in, check_out, company)| RawBooking {
                booking_id: id.map(RawBookingId::Number),
                check_in_date: Some(check_in.to_string()),
                check_out_date: Some(check_out.to_string()),
                owner_company: company.map(str::to_string),
                owner_company_country: Some("uk".to_string()),
            })
            .collect();

        let result = clean_bookings(raw);
        let report = &result.report;
        prop_assert_eq!(report.received, records.len());
        prop_assert_eq!(report.kept, result.bookings.len());
        prop_assert_eq!(
            report.missing_id
                + report.duplicates
                + report.missing_owner
                + report.invalid_dates
                + report.inverted_ranges
                + report.kept,
            report.received
        );
        prop_assert!(result.bookings.iter().all(|b| b.check_out_date >= b.check_in_date));
    }
}
