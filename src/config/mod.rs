//! Configuration loading and management for the Revenue Statement Engine.
//!
//! This module loads the reference currency, the country fee schedule and
//! the country to currency mapping from YAML files, and provides the
//! built-in defaults used when no configuration directory is given.
//!
//! # Example
//!
//! ```no_run
//! use revenue_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Reference currency: {}", config.reference_currency());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CountryCurrencyConfig, DEFAULT_REFERENCE_CURRENCY, EngineConfig, EngineSettings, FeeSchedule,
    FeeTier,
};
