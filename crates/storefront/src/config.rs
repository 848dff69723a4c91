//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `AMBRA_BACKEND_URL` - Base URL of the hosted document backend
//! - `AMBRA_BACKEND_API_KEY` - API key for the hosted backend
//! - `AMBRA_RATES_URL` - Exchange-rate provider endpoint
//!
//! ## Optional
//! - `AMBRA_STORAGE_PUBLIC_URL` - Public CDN base for stored objects
//!   (default: `<AMBRA_BACKEND_URL>/storage`)
//! - `AMBRA_BASE_CURRENCY` - Base currency code (default: USD)
//! - `AMBRA_DATA_DIR` - Directory for durable local state (default: ./data)

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use ambra_core::CurrencyCode;

/// Blocklist of common placeholder patterns (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &["your-", "changeme", "replace", "placeholder", "example"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Hosted backend connection.
    pub backend: BackendConfig,
    /// Exchange-rate provider endpoint.
    pub rates_url: String,
    /// Base currency every catalog price is denominated in.
    pub base_currency: CurrencyCode,
    /// Directory backing the durable local store.
    pub data_dir: PathBuf,
}

/// Hosted backend connection settings.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL, e.g. `https://db.ambra-maison.com`.
    pub base_url: String,
    /// API key sent with every request.
    pub api_key: SecretString,
    /// Public CDN base for stored objects.
    pub storage_public_url: String,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("storage_public_url", &self.storage_public_url)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = normalize_url(get_required_env("AMBRA_BACKEND_URL")?);
        let api_key = get_validated_secret("AMBRA_BACKEND_API_KEY")?;
        let storage_public_url = std::env::var("AMBRA_STORAGE_PUBLIC_URL")
            .map_or_else(|_| format!("{base_url}/storage"), normalize_url);

        let rates_url = normalize_url(get_required_env("AMBRA_RATES_URL")?);
        let base_currency = get_env_or_default("AMBRA_BASE_CURRENCY", "USD");
        let base_currency = CurrencyCode::parse(&base_currency).map_err(|err| {
            ConfigError::InvalidEnvVar("AMBRA_BASE_CURRENCY".to_string(), err.to_string())
        })?;

        let data_dir = PathBuf::from(get_env_or_default("AMBRA_DATA_DIR", "./data"));

        Ok(Self {
            backend: BackendConfig {
                base_url,
                api_key,
                storage_public_url,
            },
            rates_url,
            base_currency,
            data_dir,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Strip a trailing slash so path joins stay predictable.
fn normalize_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Validate that a secret is not an obvious placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
