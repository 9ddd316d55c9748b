//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `MENEN_API_URL` - Backend API base URL (default: `http://localhost:5000/api`)
//! - `MENEN_API_TOKEN` - Bearer token sent to the backend API
//! - `MENEN_CART_DIR` - Directory the cart is persisted in (default: `.menen`)
//! - `MENEN_CART_KEY` - Storage key for the cart (default: `menen_cart`)
//! - `MENEN_TAX_RATE` - Sales tax rate as a fraction (default: 0.08)
//! - `MENEN_FREE_SHIPPING_THRESHOLD` - Subtotal above which shipping is free (default: 100)
//! - `MENEN_FLAT_SHIPPING` - Shipping charged below the threshold (default: 9.99)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::cart::{DEFAULT_CART_KEY, PricingPolicy};

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_CART_DIR: &str = ".menen";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Where and under which key the cart is persisted
    pub cart: CartConfig,
    /// Shipping and tax rules
    pub pricing: PricingPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Backend API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: Url,
    /// Bearer token, when signed in
    pub token: Option<SecretString>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Cart persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Directory holding the cart blob
    pub dir: PathBuf,
    /// Storage key
    pub key: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_CART_DIR),
            key: DEFAULT_CART_KEY.to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let base_url = env.parsed("MENEN_API_URL", DEFAULT_API_URL, Url::parse)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "MENEN_API_URL".to_string(),
                format!("unsupported scheme '{}'", base_url.scheme()),
            ));
        }
        let api = ApiConfig {
            base_url,
            token: env.optional("MENEN_API_TOKEN").map(SecretString::from),
        };

        let cart = CartConfig {
            dir: PathBuf::from(env.or_default("MENEN_CART_DIR", DEFAULT_CART_DIR)),
            key: env.or_default("MENEN_CART_KEY", DEFAULT_CART_KEY),
        };

        let defaults = PricingPolicy::default();
        let pricing = PricingPolicy {
            tax_rate: env.decimal("MENEN_TAX_RATE", defaults.tax_rate)?,
            free_shipping_threshold: env.decimal(
                "MENEN_FREE_SHIPPING_THRESHOLD",
                defaults.free_shipping_threshold,
            )?,
            flat_shipping: env.decimal("MENEN_FLAT_SHIPPING", defaults.flat_shipping)?,
        };

        Ok(Self {
            api,
            cart,
            pricing,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable (or its default) with `parse`.
    fn parsed<T, E: std::fmt::Display>(
        &self,
        key: &str,
        default: &str,
        parse: impl Fn(&str) -> Result<T, E>,
    ) -> Result<T, ConfigError> {
        let raw = self.or_default(key, default);
        parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Parse a non-negative decimal amount.
    fn decimal(&self, key: &str, default: Decimal) -> Result<Decimal, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(default);
        };
        let value = Decimal::from_str(raw.trim())
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must not be negative".to_string(),
            ));
        }
        Ok(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.api.base_url.as_str(), "http://localhost:5000/api");
        assert!(config.api.token.is_none());
        assert_eq!(config.cart, CartConfig::default());
        assert_eq!(config.cart.key, "menen_cart");
        assert_eq!(config.pricing, PricingPolicy::default());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("MENEN_API_URL", "https://api.menen.example/v1"),
            ("MENEN_API_TOKEN", "tok_abc"),
            ("MENEN_CART_DIR", "/var/lib/menen"),
            ("MENEN_CART_KEY", "guest_cart"),
            ("MENEN_TAX_RATE", "0.2"),
            ("MENEN_FREE_SHIPPING_THRESHOLD", "50"),
            ("MENEN_FLAT_SHIPPING", "4.50"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ])
        .unwrap();

        assert_eq!(config.api.base_url.host_str(), Some("api.menen.example"));
        assert_eq!(config.api.token.unwrap().expose_secret(), "tok_abc");
        assert_eq!(config.cart.dir, PathBuf::from("/var/lib/menen"));
        assert_eq!(config.cart.key, "guest_cart");
        assert_eq!(config.pricing.tax_rate, Decimal::new(2, 1));
        assert_eq!(config.pricing.free_shipping_threshold, Decimal::from(50));
        assert_eq!(config.pricing.flat_shipping, Decimal::new(450, 2));
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = load(&[("MENEN_CART_KEY", "  "), ("MENEN_TAX_RATE", "")]).unwrap();
        assert_eq!(config.cart.key, "menen_cart");
        assert_eq!(config.pricing.tax_rate, Decimal::new(8, 2));
    }

    #[test]
    fn test_invalid_decimal() {
        let err = load(&[("MENEN_TAX_RATE", "eight percent")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "MENEN_TAX_RATE"));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let err = load(&[("MENEN_FLAT_SHIPPING", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_invalid_url() {
        assert!(load(&[("MENEN_API_URL", "not a url")]).is_err());
        assert!(load(&[("MENEN_API_URL", "ftp://files.example")]).is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = load(&[("MENEN_API_TOKEN", "tok_secret_value")]).unwrap();
        let debug = format!("{:?}", config.api);
        assert!(!debug.contains("tok_secret_value"));
        assert!(debug.contains("[REDACTED]"));
    }
}
