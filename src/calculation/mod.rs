//! Calculation logic for the Revenue Statement Engine.
//!
//! This module contains the revenue aggregation and currency normalization
//! pipeline: monthly averaging of daily exchange rates, per-company monthly
//! fee aggregation with country minimums, conversion into the reference
//! currency, and statement ordering.

mod currency_converter;
mod fee_aggregator;
mod pipeline;
mod rate_normalizer;
mod statement_builder;

pub use currency_converter::{ConversionResult, MonthlyRateTable, convert_to_reference};
pub use fee_aggregator::{FeeAggregationResult, aggregate_fees};
pub use pipeline::{ENGINE_VERSION, StatementInputs, build_statement};
pub use rate_normalizer::{RateNormalizationResult, normalize_monthly_rates, parse_daily_rate};
pub use statement_builder::{build_statement_lines, statement_order};
