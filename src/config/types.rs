//! Configuration types for revenue statement runs.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, plus the built-in
//! defaults used when no configuration directory is supplied.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{CountryCurrencyMapping, country_key};

/// The reference currency used when none is configured.
pub const DEFAULT_REFERENCE_CURRENCY: &str = "GBP";

/// The fees charged to companies in one country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTier {
    /// Flat fee charged per booking.
    pub per_booking_fee: Decimal,
    /// Floor applied to the summed monthly booking fees.
    pub monthly_minimum: Decimal,
}

impl FeeTier {
    /// Creates a tier from whole-unit amounts.
    pub fn new(per_booking_fee: i64, monthly_minimum: i64) -> Self {
        Self {
            per_booking_fee: Decimal::from(per_booking_fee),
            monthly_minimum: Decimal::from(monthly_minimum),
        }
    }
}

/// On-disk shape of the fee schedule, before country keys are normalized.
#[derive(Debug, Clone, Deserialize)]
struct FeeScheduleFile {
    #[serde(default)]
    tiers: BTreeMap<String, FeeTier>,
    default: FeeTier,
}

/// Country-keyed fee policy with an explicit default tier.
///
/// Country lookups are case-insensitive. Any country without its own tier,
/// including misspelled or unmapped ones, is charged at the default tier.
///
/// # Example
///
/// ```
/// use revenue_engine::config::{FeeSchedule, FeeTier};
///
/// let schedule = FeeSchedule::default();
/// assert_eq!(schedule.tier_for("uk"), FeeTier::new(10, 100));
/// assert_eq!(schedule.tier_for("USA"), FeeTier::new(14, 140));
/// assert_eq!(schedule.tier_for("France"), FeeTier::new(12, 120));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FeeScheduleFile")]
pub struct FeeSchedule {
    tiers: BTreeMap<String, FeeTier>,
    default: FeeTier,
}

impl FeeSchedule {
    /// Creates a schedule from per-country tiers and a default tier.
    pub fn new<'a, I>(tiers: I, default: FeeTier) -> Self
    where
        I: IntoIterator<Item = (&'a str, FeeTier)>,
    {
        Self {
            tiers: tiers
                .into_iter()
                .map(|(country, tier)| (country_key(country), tier))
                .collect(),
            default,
        }
    }

    /// Returns the tier that applies to a country.
    pub fn tier_for(&self, country: &str) -> FeeTier {
        self.tiers
            .get(&country_key(country))
            .copied()
            .unwrap_or(self.default)
    }

    /// The per-booking fee for a country.
    pub fn per_booking_fee(&self, country: &str) -> Decimal {
        self.tier_for(country).per_booking_fee
    }

    /// The monthly minimum fee for a country.
    pub fn monthly_minimum(&self, country: &str) -> Decimal {
        self.tier_for(country).monthly_minimum
    }

    /// The tier charged to countries without their own entry.
    pub fn default_tier(&self) -> FeeTier {
        self.default
    }

    /// The explicitly configured tiers, keyed by normalized country.
    pub fn tiers(&self) -> &BTreeMap<String, FeeTier> {
        &self.tiers
    }

    fn validate(&self) -> EngineResult<()> {
        let all = self
            .tiers
            .iter()
            .map(|(k, t)| (k.as_str(), t))
            .chain(std::iter::once(("default", &self.default)));
        for (country, tier) in all {
            if tier.per_booking_fee.is_sign_negative() || tier.monthly_minimum.is_sign_negative() {
                return Err(EngineError::InvalidConfig {
                    field: format!("fee_schedule.{}", country),
                    message: "fees must not be negative".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl From<FeeScheduleFile> for FeeSchedule {
    fn from(file: FeeScheduleFile) -> Self {
        Self::new(
            file.tiers.iter().map(|(country, tier)| (country.as_str(), *tier)),
            file.default,
        )
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::new(
            [("UK", FeeTier::new(10, 100)), ("USA", FeeTier::new(14, 140))],
            FeeTier::new(12, 120),
        )
    }
}

/// Contents of `engine.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// The currency all revenue is converted into.
    pub reference_currency: String,
    /// The fee policy.
    pub fee_schedule: FeeSchedule,
}

/// Contents of `country_currency.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryCurrencyConfig {
    /// Country to settlement currency.
    pub countries: CountryCurrencyMapping,
}

/// Everything a pipeline run needs beyond its input records.
///
/// Passed explicitly into [`crate::calculation::build_statement`] so that
/// tests can run against alternate schedules and reference currencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// The currency all revenue is converted into.
    pub reference_currency: String,
    /// The fee policy.
    pub fee_schedule: FeeSchedule,
    /// Default country to currency mapping.
    pub country_currencies: CountryCurrencyMapping,
}

impl EngineConfig {
    /// Checks that the configuration can drive a run.
    pub fn validate(&self) -> EngineResult<()> {
        if self.reference_currency.trim().is_empty() {
            return Err(EngineError::InvalidConfig {
                field: "reference_currency".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        self.fee_schedule.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_currency: DEFAULT_REFERENCE_CURRENCY.to_string(),
            fee_schedule: FeeSchedule::default(),
            country_currencies: [("UK", "GBP"), ("USA", "USD")].into_iter().collect(),
        }
    }
}
