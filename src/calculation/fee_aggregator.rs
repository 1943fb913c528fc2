//! Monthly booking-fee aggregation.
//!
//! This module groups bookings into revenue buckets keyed by
//! (owner company, country, resolved currency, check-out month), sums the
//! country's per-booking fee across each bucket and raises the total to the
//! country's monthly minimum when it falls short.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::FeeSchedule;
use crate::error::{EngineError, EngineResult};
use crate::models::{Booking, ConversionStatus, CountryCurrencyMapping, MonthlyCompanyRevenue};

/// The result of aggregating bookings into monthly revenue rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeAggregationResult {
    /// One row per revenue bucket, reference figure unset.
    pub rows: Vec<MonthlyCompanyRevenue>,
    /// Distinct booking countries (as written) with no currency mapping.
    pub unmapped_countries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct BucketKey {
    owner_company: String,
    owner_company_country: String,
    revenue_currency: Option<String>,
    month_start: NaiveDate,
}

/// Aggregates bookings into monthly company revenue.
///
/// Each booking's currency is resolved by a case-insensitive lookup of its
/// country. Bookings from unmapped countries are still aggregated, with no
/// currency, so they can never be converted later. Companies with bookings
/// in two countries in the same month get two separate rows.
///
/// For every bucket:
/// `total_revenue_original = max(bookings × per_booking_fee, monthly_minimum)`
///
/// Returns [`EngineError::ArithmeticOverflow`] when a bucket's fee total
/// exceeds the decimal range.
///
/// # Arguments
///
/// * `bookings` - Cleaned bookings
/// * `country_currencies` - Country to settlement currency mapping
/// * `fee_schedule` - Per-country fee tiers with a default tier
///
/// # Example
///
/// ```
/// use revenue_engine::calculation::aggregate_fees;
/// use revenue_engine::config::FeeSchedule;
/// use revenue_engine::models::{Booking, CountryCurrencyMapping};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let booking = Booking {
///     booking_id: "1".to_string(),
///     check_in_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     check_out_date: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
///     owner_company: "Acme".to_string(),
///     owner_company_country: "Uk".to_string(),
/// };
/// let mapping: CountryCurrencyMapping = [("UK", "GBP")].into_iter().collect();
///
/// let result = aggregate_fees(&[booking], &mapping, &FeeSchedule::default()).unwrap();
/// assert_eq!(result.rows[0].total_booking_fee, Decimal::from(10));
/// assert_eq!(result.rows[0].total_revenue_original, Decimal::from(100));
/// ```
pub fn aggregate_fees(
    bookings: &[Booking],
    country_currencies: &CountryCurrencyMapping,
    fee_schedule: &FeeSchedule,
) -> EngineResult<FeeAggregationResult> {
    let mut buckets: BTreeMap<BucketKey, (usize, Decimal)> = BTreeMap::new();
    let mut unmapped: BTreeSet<String> = BTreeSet::new();

    for booking in bookings {
        let country = &booking.owner_company_country;
        let revenue_currency = country_currencies.currency_for(country).map(str::to_string);
        if revenue_currency.is_none() {
            unmapped.insert(country.clone());
        }

        let key = BucketKey {
            owner_company: booking.owner_company.clone(),
            owner_company_country: country.clone(),
            revenue_currency,
            month_start: booking.billing_month(),
        };
        let fee = fee_schedule.per_booking_fee(country);
        let entry = buckets.entry(key.clone()).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 = entry
            .1
            .checked_add(fee)
            .ok_or_else(|| EngineError::ArithmeticOverflow {
                context: format!(
                    "summing booking fees for '{}' ({}) in {}",
                    key.owner_company,
                    key.owner_company_country,
                    key.month_start.format("%Y-%m")
                ),
            })?;
    }

    let rows = buckets
        .into_iter()
        .map(|(key, (booking_count, total_booking_fee))| {
            let minimum = fee_schedule.monthly_minimum(&key.owner_company_country);
            let conversion_status = if key.revenue_currency.is_some() {
                ConversionStatus::Pending
            } else {
                ConversionStatus::UnmappedCountry
            };
            MonthlyCompanyRevenue {
                owner_company: key.owner_company,
                owner_company_country: key.owner_company_country,
                revenue_currency: key.revenue_currency,
                month_start: key.month_start,
                booking_count,
                total_booking_fee,
                total_revenue_original: total_booking_fee.max(minimum),
                revenue_in_reference_currency: None,
                conversion_status,
            }
        })
        .collect();

    Ok(FeeAggregationResult {
        rows,
        unmapped_countries: unmapped.into_iter().collect(),
    })
}
