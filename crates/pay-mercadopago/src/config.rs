//! # Mercado Pago Configuration
//!
//! Configuration management for the Mercado Pago integration.
//! The access token is loaded from the environment, never from source.

use pay_core::PaymentError;
use std::env;
use std::time::Duration;

/// Production API host
pub const DEFAULT_API_BASE_URL: &str = "https://api.mercadopago.com";

/// Outbound request timeout when `MP_TIMEOUT_SECS` is unset
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Mercado Pago API configuration
#[derive(Clone)]
pub struct MercadoPagoConfig {
    /// Access token (APP_USR-... or TEST-...)
    pub access_token: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Timeout for each outbound request
    pub timeout: Duration,
}

impl MercadoPagoConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `MP_ACCESS_TOKEN`
    ///
    /// Optional:
    /// - `MP_API_BASE_URL` (default `https://api.mercadopago.com`)
    /// - `MP_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let access_token = env::var("MP_ACCESS_TOKEN").map_err(|_| {
            PaymentError::Configuration("MP_ACCESS_TOKEN not set".to_string())
        })?;

        if !access_token.starts_with("APP_USR-") && !access_token.starts_with("TEST-") {
            return Err(PaymentError::Configuration(
                "MP_ACCESS_TOKEN must start with APP_USR- or TEST-".to_string(),
            ));
        }

        let api_base_url =
            env::var("MP_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let timeout_secs = match env::var("MP_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                PaymentError::Configuration(format!(
                    "MP_TIMEOUT_SECS must be a positive integer, got {:?}",
                    raw
                ))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            access_token,
            api_base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Create config with an explicit token (for testing)
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Check if using test credentials
    pub fn is_test_mode(&self) -> bool {
        self.access_token.starts_with("TEST-")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for MercadoPagoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MercadoPagoConfig")
            .field("access_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
