//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string for the merch
//!   catalog (falls back to `DATABASE_URL`; in-memory catalog when unset)
//! - `STOREFRONT_ADMIN_ENABLED` - Mount the merch admin API (default: false)
//! - `VEILBOUND_DISCOUNT_RATE` - Pre-order discount rate (default: 0.25)
//! - `VEILBOUND_TAX_RATE` - Tax rate on the discounted subtotal (default: 0.08)
//! - `VEILBOUND_FREE_SHIPPING_THRESHOLD` - Free shipping above this subtotal (default: 50)
//! - `VEILBOUND_FLAT_SHIPPING` - Shipping charged otherwise (default: 9.99)
//! - `VEILBOUND_MAX_LINE_QUANTITY` - Per-line quantity cap (default: 99)
//! - `VEILBOUND_CHECKOUT_DELAY_MS` - Simulated payment processing time (default: 2000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use veilbound_core::{CartStore, PricingPolicy};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// `PostgreSQL` connection URL for the merch catalog (contains password)
    pub database_url: Option<SecretString>,
    /// Whether the merch admin API is mounted
    pub admin_enabled: bool,
    /// Discount, tax, and shipping rules
    pub pricing: PricingPolicy,
    /// Upper bound on a single cart line's quantity
    pub max_line_quantity: u32,
    /// How long the simulated payment takes
    pub checkout_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(&|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_source(source: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(source);

        let host = env.parse_or("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = env.parse_or("STOREFRONT_PORT", 3000_u16)?;
        let base_url = env.required("STOREFRONT_BASE_URL")?;
        let database_url = env
            .optional("STOREFRONT_DATABASE_URL")
            .or_else(|| env.optional("DATABASE_URL"))
            .map(SecretString::from);
        let admin_enabled = env.flag("STOREFRONT_ADMIN_ENABLED")?;

        let pricing = PricingPolicy::new(
            env.parse_or("VEILBOUND_DISCOUNT_RATE", PricingPolicy::DEFAULT_DISCOUNT_RATE)?,
            env.parse_or("VEILBOUND_TAX_RATE", PricingPolicy::DEFAULT_TAX_RATE)?,
            env.parse_or::<Decimal>(
                "VEILBOUND_FREE_SHIPPING_THRESHOLD",
                PricingPolicy::DEFAULT_FREE_SHIPPING_THRESHOLD,
            )?,
            env.parse_or("VEILBOUND_FLAT_SHIPPING", PricingPolicy::DEFAULT_FLAT_SHIPPING)?,
        )
        .map_err(|e| ConfigError::InvalidEnvVar("VEILBOUND_*".to_string(), e.to_string()))?;

        let max_line_quantity =
            env.parse_or("VEILBOUND_MAX_LINE_QUANTITY", CartStore::DEFAULT_MAX_QUANTITY)?;
        if max_line_quantity == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "VEILBOUND_MAX_LINE_QUANTITY".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let checkout_delay =
            Duration::from_millis(env.parse_or("VEILBOUND_CHECKOUT_DELAY_MS", 2000_u64)?);

        Ok(Self {
            host,
            port,
            base_url,
            database_url,
            admin_enabled,
            pricing,
            max_line_quantity,
            checkout_delay,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable. Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Parse a variable, falling back to a default when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Boolean flag: `1`/`true`/`yes`/`on` or `0`/`false`/`no`/`off`.
    fn flag(&self, key: &str) -> Result<bool, ConfigError> {
        let Some(value) = self.optional(key) else {
            return Ok(false);
        };
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected a boolean, got '{other}'"),
            )),
        }
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
        StorefrontConfig::from_source(&|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("STOREFRONT_BASE_URL", "http://localhost:3000")]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert!(config.database_url.is_none());
        assert!(!config.admin_enabled);
        assert!(!config.is_secure());
        assert_eq!(config.pricing, PricingPolicy::default());
        assert_eq!(config.max_line_quantity, 99);
        assert_eq!(config.checkout_delay, Duration::from_secs(2));
    }

    #[test]
    fn test_base_url_required() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "STOREFRONT_BASE_URL"));
    }

    #[test]
    fn test_database_url_fallback() {
        let config = load(&[
            ("STOREFRONT_BASE_URL", "https://veilbound.game"),
            ("DATABASE_URL", "postgres://localhost/veilbound"),
        ])
        .unwrap();
        assert_eq!(
            config.database_url.unwrap().expose_secret(),
            "postgres://localhost/veilbound"
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_BASE_URL", "https://veilbound.game"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_ADMIN_ENABLED", "true"),
            ("VEILBOUND_DISCOUNT_RATE", "0.10"),
            ("VEILBOUND_MAX_LINE_QUANTITY", "5"),
            ("VEILBOUND_CHECKOUT_DELAY_MS", "0"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.admin_enabled);
        assert!(config.is_secure());
        assert_eq!(config.pricing.discount_rate(), Decimal::new(10, 2));
        assert_eq!(config.max_line_quantity, 5);
        assert_eq!(config.checkout_delay, Duration::ZERO);
    }

    #[test]
    fn test_invalid_values() {
        let base = ("STOREFRONT_BASE_URL", "http://localhost:3000");
        assert!(matches!(
            load(&[base, ("STOREFRONT_PORT", "eighty")]),
            Err(ConfigError::InvalidEnvVar(..))
        ));
        assert!(matches!(
            load(&[base, ("VEILBOUND_TAX_RATE", "1.5")]),
            Err(ConfigError::InvalidEnvVar(..))
        ));
        assert!(matches!(
            load(&[base, ("VEILBOUND_MAX_LINE_QUANTITY", "0")]),
            Err(ConfigError::InvalidEnvVar(..))
        ));
        assert!(matches!(
            load(&[base, ("STOREFRONT_ADMIN_ENABLED", "maybe")]),
            Err(ConfigError::InvalidEnvVar(..))
        ));
    }
}
