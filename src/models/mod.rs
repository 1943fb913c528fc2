//! Core data models for the Revenue Statement Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod booking;
mod exchange_rate;
mod revenue;
mod statement;

pub use booking::{Booking, CountryCurrencyMapping, country_key, month_start, parse_calendar_date};
pub use exchange_rate::{DailyExchangeRate, MonthlyAverageRate, RawExchangeRate};
pub use revenue::{ConversionStatus, MonthlyCompanyRevenue};
pub use statement::{CleaningReport, RunReport, RunWarning, Statement, StatementLine};
