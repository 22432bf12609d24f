//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `TIENDA_DATA_PATH` - JSON document backing the store (default: `data/tienda.json`)
//! - `TIENDA_TRACKING_BASE_URL` - Base that tracking links are built on
//!   (default: `http://localhost:3000/#`)
//! - `TIENDA_STOCK_POLICY` - `reject` or `allow-oversell` (default: `reject`)
//! - `TIENDA_SEED_FILE` - YAML fixtures used in place of the built-in seed
//! - `TIENDA_ADMIN_PASSWORD` - Password the CLI presents to the admin gate

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::orders::StockPolicy;

pub const DEFAULT_DATA_PATH: &str = "data/tienda.json";
pub const DEFAULT_TRACKING_BASE_URL: &str = "http://localhost:3000/#";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where the store lives and how it behaves.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// JSON document backing the store
    pub data_path: PathBuf,
    /// Base for customer tracking links
    pub tracking_base_url: String,
    /// Checkout behavior when stock runs short
    pub stock_policy: StockPolicy,
    /// YAML fixtures replacing the built-in seed
    pub seed_file: Option<PathBuf>,
    /// Admin password supplied through the environment
    pub admin_password: Option<SecretString>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            tracking_base_url: DEFAULT_TRACKING_BASE_URL.to_owned(),
            stock_policy: StockPolicy::default(),
            seed_file: None,
            admin_password: None,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_path = PathBuf::from(get_or_default(&lookup, "TIENDA_DATA_PATH", DEFAULT_DATA_PATH));

        let tracking_base_url = get_or_default(
            &lookup,
            "TIENDA_TRACKING_BASE_URL",
            DEFAULT_TRACKING_BASE_URL,
        );
        Url::parse(&tracking_base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("TIENDA_TRACKING_BASE_URL".to_string(), e.to_string())
        })?;

        let stock_policy = get_or_default(&lookup, "TIENDA_STOCK_POLICY", StockPolicy::Reject.as_str())
            .parse::<StockPolicy>()
            .map_err(|e| ConfigError::InvalidEnvVar("TIENDA_STOCK_POLICY".to_string(), e))?;

        let seed_file = get_optional(&lookup, "TIENDA_SEED_FILE").map(PathBuf::from);
        let admin_password = get_optional(&lookup, "TIENDA_ADMIN_PASSWORD").map(SecretString::from);

        Ok(Self {
            data_path,
            tracking_base_url,
            stock_policy,
            seed_file,
            admin_password,
        })
    }

    /// The configured admin password.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `TIENDA_ADMIN_PASSWORD` was not set.
    pub fn require_admin_password(&self) -> Result<&SecretString, ConfigError> {
        self.admin_password
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("TIENDA_ADMIN_PASSWORD".to_string()))
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Get an optional variable, treating blank values as unset.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}
