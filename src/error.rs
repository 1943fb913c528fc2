//! Error types for the Revenue Statement Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for the set-level failures that abort a run. Row-level anomalies (malformed
//! rate rows, unmapped countries, missing monthly rates) are not errors; they
//! are absorbed by the pipeline and counted in the run report.

use thiserror::Error;

/// The main error type for the Revenue Statement Engine.
///
/// # Example
///
/// ```
/// use revenue_engine::error::EngineError;
///
/// let error = EngineError::EmptyInput {
///     source_name: "bookings".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Input source 'bookings' yielded no records; a statement cannot be built"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds values the engine cannot use.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// One of the three input sources produced zero records.
    #[error("Input source '{source_name}' yielded no records; a statement cannot be built")]
    EmptyInput {
        /// Which source was empty ("bookings", "exchange_rates", "country_currencies").
        source_name: String,
    },

    /// The exchange-rate file could not be read.
    #[error("Failed to read exchange rates from '{path}': {message}")]
    RateFileError {
        /// The rate file path.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// The booking source failed or returned an unusable payload.
    #[error("Booking source error: {message}")]
    BookingSourceError {
        /// A description of the failure.
        message: String,
    },

    /// The statement could not be exported.
    #[error("Failed to export statement to '{path}': {message}")]
    ExportError {
        /// The export destination.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// A monetary sum exceeded the range of the decimal type.
    #[error("Arithmetic overflow while {context}")]
    ArithmeticOverflow {
        /// What was being computed.
        context: String,
    },

    /// The HTTP server could not bind or stopped with an error.
    #[error("HTTP server error on '{address}': {message}")]
    ServerError {
        /// The listen address.
        address: String,
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Builds an [`EngineError::EmptyInput`] for the named source.
    pub fn empty_input(source_name: &str) -> Self {
        Self::EmptyInput {
            source_name: source_name.to_string(),
        }
    }
}
