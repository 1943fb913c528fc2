//! Revenue Statement Engine
//!
//! This crate turns per-booking records into a monthly revenue statement per
//! company. Booking fees are aggregated under a country-dependent fee
//! schedule with a monthly minimum, then converted into a reference currency
//! using monthly averages of daily exchange rates.
//!
//! The pure pipeline lives in [`calculation`]. The [`ingest`] and
//! [`present`] modules are the side-effecting adapters around it, and
//! [`api`] exposes the pipeline over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod present;
