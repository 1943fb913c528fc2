//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::CountryCurrencyMapping;

use super::types::{CountryCurrencyConfig, EngineConfig, EngineSettings, FeeSchedule, FeeTier};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml            # Reference currency and fee schedule
/// └── country_currency.yaml  # Country to settlement currency
/// ```
///
/// # Example
///
/// ```no_run
/// use revenue_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Reference currency: {}", loader.reference_currency());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Either required file is missing (`ConfigNotFound`)
    /// - Either file contains invalid YAML or misses a field (`ConfigParseError`)
    /// - The values cannot drive a run (`InvalidConfig`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<EngineSettings>(&path.join("engine.yaml"))?;
        let countries =
            Self::load_yaml::<CountryCurrencyConfig>(&path.join("country_currency.yaml"))?;

        let config = EngineConfig {
            reference_currency: settings.reference_currency.trim().to_string(),
            fee_schedule: settings.fee_schedule,
            country_currencies: countries.countries,
        };
        config.validate()?;

        info!(
            path = %path.display(),
            reference_currency = %config.reference_currency,
            countries = config.country_currencies.len(),
            "Loaded engine configuration"
        );

        Ok(Self { config })
    }

    /// Wraps the built-in configuration (GBP reference, UK/USA tiers).
    pub fn builtin() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Wraps an already-built configuration after validating it.
    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the reference currency.
    pub fn reference_currency(&self) -> &str {
        &self.config.reference_currency
    }

    /// Returns the fee schedule.
    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.config.fee_schedule
    }

    /// Returns the fee tier for a country.
    pub fn fee_tier(&self, country: &str) -> FeeTier {
        self.config.fee_schedule.tier_for(country)
    }

    /// Returns the configured country to currency mapping.
    pub fn country_currencies(&self) -> &CountryCurrencyMapping {
        &self.config.country_currencies
    }
}
