//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command line flags (`--db`)
//! 2. Environment variables (`FIADO_*`, `GEMINI_API_KEY`)
//! 3. `.env` file in the working directory (loaded into the environment)
//! 4. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use fiado_ai::InsightConfig;
use fiado_core::validation::{validate_pin_format, verify_pin};
use fiado_core::{DEFAULT_PIN, DEFAULT_STORE_NAME, LOW_STOCK_THRESHOLD};

use crate::error::ApiError;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct ConfigState {
    /// Store name printed on customer messages.
    pub store_name: String,

    /// Access PIN. Compared in memory; never logged.
    pub pin: SecretString,

    /// Dashboard and insight prompt low-stock threshold (exclusive).
    pub low_stock_threshold: i64,

    /// Where backups are written.
    /// Default: current directory
    pub backup_dir: PathBuf,

    /// Database file override. `None` means the platform data directory.
    pub db_path: Option<PathBuf>,

    /// Insight client settings. No key disables the call.
    pub insight: InsightConfig,
}

impl Default for ConfigState {
    /// Returns the configuration used when nothing is set.
    ///
    /// ## Default Values
    /// - Store: "MERCADINHO DAVI"
    /// - PIN: 1540
    /// - Low stock: fewer than 5 units
    /// - Backups: current directory
    /// - Insights: disabled (no key)
    fn default() -> Self {
        ConfigState {
            store_name: DEFAULT_STORE_NAME.to_string(),
            pin: SecretString::from(DEFAULT_PIN.to_string()),
            low_stock_threshold: LOW_STOCK_THRESHOLD,
            backup_dir: PathBuf::from("."),
            db_path: None,
            insight: InsightConfig::default(),
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `FIADO_STORE_NAME`: Store name on messages
    /// - `FIADO_PIN`: Access PIN (4 digits)
    /// - `FIADO_LOW_STOCK`: Low-stock threshold
    /// - `FIADO_BACKUP_DIR`: Backup directory
    /// - `FIADO_DB_PATH`: Database file
    /// - `GEMINI_API_KEY` (or `API_KEY`): Insight credential
    /// - `FIADO_AI_MODEL`, `FIADO_AI_ENDPOINT`: Insight model and base URL
    ///
    /// ## Errors
    /// A `FIADO_PIN` that is not exactly four digits is rejected rather than
    /// replaced with the default.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConfigState::from_env`], reading from any lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(store_name) = var("FIADO_STORE_NAME") {
            config.store_name = store_name.trim().to_string();
        }

        if let Some(pin) = var("FIADO_PIN") {
            let pin = pin.trim().to_string();
            validate_pin_format(&pin)?;
            config.pin = SecretString::from(pin);
        }

        if let Some(threshold) = var("FIADO_LOW_STOCK") {
            match threshold.trim().parse::<i64>() {
                Ok(n) if n >= 0 => config.low_stock_threshold = n,
                _ => warn!(value = %threshold, "Ignoring invalid FIADO_LOW_STOCK"),
            }
        }

        if let Some(dir) = var("FIADO_BACKUP_DIR") {
            config.backup_dir = PathBuf::from(dir);
        }

        if let Some(path) = var("FIADO_DB_PATH") {
            config.db_path = Some(PathBuf::from(path));
        }

        let api_key = var("GEMINI_API_KEY")
            .or_else(|| var("API_KEY"))
            .map(SecretString::from);
        let mut insight = InsightConfig::new(api_key);
        if let Some(model) = var("FIADO_AI_MODEL") {
            insight = insight.model(model);
        }
        if let Some(endpoint) = var("FIADO_AI_ENDPOINT") {
            insight = insight.endpoint(endpoint);
        }
        config.insight = insight;

        Ok(config)
    }

    /// Checks an entered PIN against the configured one.
    pub fn pin_matches(&self, entered: &str) -> bool {
        verify_pin(self.pin.expose_secret(), entered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.store_name, "MERCADINHO DAVI");
        assert_eq!(config.low_stock_threshold, 5);
        assert!(config.pin_matches("1540"));
        assert!(!config.insight.is_configured());
        assert!(config.db_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ConfigState::from_lookup(lookup(&[
            ("FIADO_STORE_NAME", "  Mercearia Boa Vista "),
            ("FIADO_PIN", "9876"),
            ("FIADO_LOW_STOCK", "3"),
            ("FIADO_DB_PATH", "/tmp/fiado.db"),
            ("API_KEY", "secret-key"),
            ("FIADO_AI_MODEL", "gemini-test"),
        ]))
        .unwrap();

        assert_eq!(config.store_name, "Mercearia Boa Vista");
        assert!(config.pin_matches("9876"));
        assert!(!config.pin_matches("1540"));
        assert_eq!(config.low_stock_threshold, 3);
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/fiado.db")));
        assert!(config.insight.is_configured());
        assert_eq!(config.insight.model, "gemini-test");
    }

    #[test]
    fn test_gemini_key_wins_over_generic_key() {
        let config = ConfigState::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "gemini"),
            ("API_KEY", "generic"),
        ]))
        .unwrap();
        let key = config.insight.api_key.unwrap();
        assert_eq!(key.expose_secret(), "gemini");
    }

    #[test]
    fn test_malformed_pin_is_rejected() {
        let err = ConfigState::from_lookup(lookup(&[("FIADO_PIN", "12a4")])).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
    }

    #[test]
    fn test_bad_threshold_keeps_default() {
        let config = ConfigState::from_lookup(lookup(&[("FIADO_LOW_STOCK", "-2")])).unwrap();
        assert_eq!(config.low_stock_threshold, 5);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = ConfigState::from_lookup(lookup(&[("API_KEY", "super-secret")])).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("1540"));
    }
}
