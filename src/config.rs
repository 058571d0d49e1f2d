//! Shop configuration
//!
//! Loaded from YAML. Every field is optional:
//!
//! ```yaml
//! currency: USD
//! release_stock_on_remove: true
//! keys:
//!   catalog: parts
//!   cart: cart
//! ```

use std::{fs, io, path::Path};

use rusty_money::iso::{Currency, EUR, GBP, USD};
use serde::Deserialize;
use thiserror::Error;

use crate::cart::StockRelease;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Storage keys for the two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageKeys {
    /// Key for the catalog snapshot (`parts` or `products`)
    pub catalog: String,

    /// Key for the cart snapshot
    pub cart: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            catalog: "parts".to_string(),
            cart: "cart".to_string(),
        }
    }
}

/// Shop configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShopConfig {
    /// ISO currency code used for display
    pub currency: String,

    /// Return reserved stock to the catalog when cart lines are removed or reduced
    pub release_stock_on_remove: bool,

    /// Storage keys
    pub keys: StorageKeys,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            release_stock_on_remove: true,
            keys: StorageKeys::default(),
        }
    }
}

impl ShopConfig {
    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the YAML is invalid or names an unknown currency.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_norway::from_str(yaml)?;

        config.currency()?;

        Ok(config)
    }

    /// Read configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Resolve the configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for unsupported codes.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        match self.currency.trim().to_ascii_uppercase().as_str() {
            "GBP" => Ok(GBP),
            "USD" => Ok(USD),
            "EUR" => Ok(EUR),
            _ => Err(ConfigError::UnknownCurrency(self.currency.clone())),
        }
    }

    /// Stock release policy for the cart.
    pub fn stock_release(&self) -> StockRelease {
        StockRelease::from(self.release_stock_on_remove)
    }
}
