//! # Storefront Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Explicit path passed to `load()`                                    │
//! │  2. Platform config dir                                                 │
//! │     • Linux: ~/.config/storefront/storefront.toml                      │
//! │     • macOS: ~/Library/Application Support/com.basket.storefront/      │
//! │  3. Defaults (this file)                                                │
//! │                                                                         │
//! │  A file only has to name the keys it changes; every section and key    │
//! │  falls back to its default.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use basket_core::validation::validate_tax_rate_bps;
use basket_core::{
    TaxRate, CHECKOUT_GRACE_PERIOD_MS, DEFAULT_STORAGE_KEY, DEFAULT_TAX_RATE_BPS,
    TOAST_DURATION_MS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE_NAME: &str = "storefront.toml";
const DATABASE_FILE_NAME: &str = "basket.db";

// =============================================================================
// Errors
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema.
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// No explicit path was given and the platform has no config directory.
    #[error("No {0} directory available on this platform")]
    NoDirectory(&'static str),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Where the cart snapshot is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. Unset means `basket.db` in the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Key the snapshot is written under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: None,
            storage_key: default_storage_key(),
        }
    }
}

/// Cart arithmetic and checkout timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSettings {
    /// Tax rate in basis points (1400 = 14%).
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,

    /// Delay between a placed order and the cart clearing.
    #[serde(default = "default_checkout_grace_ms")]
    pub checkout_grace_ms: u64,
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_TAX_RATE_BPS
}

fn default_checkout_grace_ms() -> u64 {
    CHECKOUT_GRACE_PERIOD_MS
}

impl Default for CartSettings {
    fn default() -> Self {
        CartSettings {
            tax_rate_bps: default_tax_rate_bps(),
            checkout_grace_ms: default_checkout_grace_ms(),
        }
    }
}

/// Toasts and price display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// How long a toast stays visible.
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,

    /// Printed after every amount, e.g. `12.50 $`.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_toast_duration_ms() -> u64 {
    TOAST_DURATION_MS
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for NotificationSettings {
    fn default() -> Self {
        NotificationSettings {
            toast_duration_ms: default_toast_duration_ms(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
///
/// ## Example Config File
/// ```toml
/// [storage]
/// database_path = "/var/lib/basket/basket.db"
/// storage_key = "cartLists"
///
/// [cart]
/// tax_rate_bps = 1400
/// checkout_grace_ms = 2000
///
/// [notifications]
/// toast_duration_ms = 4000
/// currency_symbol = "$"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub cart: CartSettings,

    #[serde(default)]
    pub notifications: NotificationSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, falling back to defaults.
    ///
    /// A missing file is not an error; an unreadable or invalid one is.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file as pretty TOML.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoDirectory("config"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.storage.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage_key must not be blank".into(),
            ));
        }

        validate_tax_rate_bps(self.cart.tax_rate_bps)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.notifications.toast_duration_ms == 0 {
            return Err(ConfigError::Invalid(
                "toast_duration_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Resolves the SQLite file, creating the platform data dir if needed.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoDirectory("data"))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        Ok(data_dir.join(DATABASE_FILE_NAME))
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.cart.tax_rate_bps)
    }

    pub fn checkout_grace(&self) -> Duration {
        Duration::from_millis(self.cart.checkout_grace_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.notifications.toast_duration_ms)
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "basket", "storefront")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("basket-config-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.storage.storage_key, "cartLists");
        assert_eq!(config.tax_rate().bps(), 1400);
        assert_eq!(config.checkout_grace(), Duration::from_secs(2));
        assert_eq!(config.toast_duration(), Duration::from_secs(4));
        assert_eq!(config.notifications.currency_symbol, "$");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: StorefrontConfig = toml::from_str(
            r#"
            [cart]
            tax_rate_bps = 825
            "#,
        )
        .unwrap();

        assert_eq!(config.cart.tax_rate_bps, 825);
        assert_eq!(config.cart.checkout_grace_ms, 2000);
        assert_eq!(config.storage.storage_key, "cartLists");
    }

    #[test]
    fn test_config_validation() {
        let mut config = StorefrontConfig::default();

        config.storage.storage_key = "  ".to_string();
        assert!(config.validate().is_err());

        config.storage.storage_key = "cartLists".to_string();
        config.cart.tax_rate_bps = 10_001;
        assert!(config.validate().is_err());

        config.cart.tax_rate_bps = 1400;
        config.notifications.toast_duration_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = StorefrontConfig::load(Some(temp_path("absent.toml"))).unwrap();
        assert_eq!(config, StorefrontConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("storefront.toml");
        let mut config = StorefrontConfig::default();
        config.cart.checkout_grace_ms = 500;
        config.storage.database_path = Some(PathBuf::from("/tmp/basket-test.db"));

        config.save(Some(path.clone())).unwrap();
        let loaded = StorefrontConfig::load(Some(path.clone())).unwrap();
        assert_eq!(loaded, config);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_invalid_file_is_rejected_but_load_or_default_recovers() {
        let path = temp_path("broken.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[cart]\ntax_rate_bps = 99999\n").unwrap();

        assert!(matches!(
            StorefrontConfig::load(Some(path.clone())),
            Err(ConfigError::Invalid(_))
        ));
        assert_eq!(
            StorefrontConfig::load_or_default(Some(path.clone())),
            StorefrontConfig::default()
        );

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&StorefrontConfig::default()).unwrap();
        assert!(toml_str.contains("[storage]"));
        assert!(toml_str.contains("[cart]"));
        assert!(toml_str.contains("[notifications]"));
    }
}
