use std::time::Duration;

use shop_client::ClientConfig;
use shop_client::config::{DEFAULT_API_VERSION, DEFAULT_TIMEOUT_MS};

use super::error::ServerError;
use crate::reconcile::EditSessionOptions;
use crate::reconcile::orchestrator::{DEFAULT_CURRENCY_CODE, DEFAULT_STAFF_NOTE};

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HTTP_PORT | 3000 | HTTP listen port |
/// | SHOP_DOMAIN | (required) | shop domain, e.g. my-shop.myshopify.com |
/// | SHOP_ACCESS_TOKEN | (required) | admin API access token |
/// | SHOP_API_VERSION | 2024-10 | admin API version |
/// | REQUEST_TIMEOUT_MS | 30000 | timeout of each platform call |
/// | CURRENCY_CODE | USD | currency of added items and discounts |
/// | STAFF_NOTE | Final order weight | staff note recorded on commit |
/// | NOTIFY_CUSTOMER | false | notify the customer on commit |
/// | RETIRE_ORIGINAL_ON_UPCHARGE | false | zero out the original line after an upcharge |
/// | LOG_LEVEL | info | default log filter (`RUST_LOG` wins) |
/// | LOG_JSON | false | JSON log lines |
/// | LOG_DIR | unset | daily rolling log files |
/// | ENVIRONMENT | development | environment name |
///
/// # Example
///
/// ```ignore
/// SHOP_DOMAIN=demo.myshopify.com SHOP_ACCESS_TOKEN=shpat_xxx cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub shop_domain: String,
    pub access_token: String,
    pub api_version: String,
    /// Timeout of each platform call (milliseconds)
    pub request_timeout_ms: u64,
    pub currency_code: String,
    pub staff_note: String,
    pub notify_customer: bool,
    pub retire_original_on_upcharge: bool,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// development | staging | production
    pub environment: String,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

impl Config {
    /// Configuration for a shop with every other value at its default
    pub fn new(shop_domain: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http_port: 3000,
            shop_domain: shop_domain.into(),
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.into(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            currency_code: DEFAULT_CURRENCY_CODE.into(),
            staff_note: DEFAULT_STAFF_NOTE.into(),
            notify_customer: false,
            retire_original_on_upcharge: false,
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            environment: "development".into(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Unset or unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            http_port: env_or("HTTP_PORT", 3000),
            shop_domain: env_string("SHOP_DOMAIN", ""),
            access_token: env_string("SHOP_ACCESS_TOKEN", ""),
            api_version: env_string("SHOP_API_VERSION", DEFAULT_API_VERSION),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", DEFAULT_TIMEOUT_MS),
            currency_code: env_string("CURRENCY_CODE", DEFAULT_CURRENCY_CODE),
            staff_note: env_string("STAFF_NOTE", DEFAULT_STAFF_NOTE),
            notify_customer: env_or("NOTIFY_CUSTOMER", false),
            retire_original_on_upcharge: env_or("RETIRE_ORIGINAL_ON_UPCHARGE", false),
            log_level: env_string("LOG_LEVEL", "info"),
            log_json: env_or("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
            environment: env_string("ENVIRONMENT", "development"),
        }
    }

    /// Reject configuration the server cannot start with
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.shop_domain.trim().is_empty() {
            return Err(ServerError::Config("SHOP_DOMAIN is required".into()));
        }
        if self.access_token.trim().is_empty() {
            return Err(ServerError::Config("SHOP_ACCESS_TOKEN is required".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ServerError::Config(
                "REQUEST_TIMEOUT_MS must be greater than zero".into(),
            ));
        }
        if self.currency_code.trim().is_empty() {
            return Err(ServerError::Config("CURRENCY_CODE must not be empty".into()));
        }
        Ok(())
    }

    /// Platform client configuration
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.shop_domain, &self.access_token)
            .with_api_version(&self.api_version)
            .with_timeout(Duration::from_millis(self.request_timeout_ms))
    }

    /// Edit session knobs
    pub fn edit_options(&self) -> EditSessionOptions {
        EditSessionOptions {
            currency_code: self.currency_code.clone(),
            staff_note: self.staff_note.clone(),
            notify_customer: self.notify_customer,
            retire_original_on_upcharge: self.retire_original_on_upcharge,
        }
    }

    /// Whether this is a production environment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
