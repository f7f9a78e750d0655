//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the payment strategy, the preference builder, and configuration.
//! Everything here is read-only after start-up.

use pay_core::{BoxedPaymentStrategy, CheckoutPolicy, PreferenceBuilder};
use pay_mercadopago::MercadoPagoStrategy;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Log output format ("pretty" or "json")
    pub log_format: String,
    /// Explicit checkout policy file
    pub checkout_config: Option<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            checkout_config: std::env::var("CHECKOUT_CONFIG").ok(),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e)
            })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether logs should be emitted as JSON lines
    pub fn log_json(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment provider
    pub strategy: BoxedPaymentStrategy,
    /// Cart to preference transformation
    pub builder: Arc<PreferenceBuilder>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState for an already loaded config
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let policy = load_checkout_policy(config.checkout_config.as_deref())?;

        let strategy = MercadoPagoStrategy::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Mercado Pago: {}", e))?;

        if strategy.config().is_test_mode() {
            tracing::warn!("Mercado Pago is using TEST credentials");
        }

        Ok(Self::with_strategy(config, policy, Arc::new(strategy)))
    }

    /// Assemble state from explicit parts
    pub fn with_strategy(
        config: AppConfig,
        policy: CheckoutPolicy,
        strategy: BoxedPaymentStrategy,
    ) -> Self {
        Self {
            strategy,
            builder: Arc::new(PreferenceBuilder::new(policy)),
            config,
        }
    }
}

/// Load the checkout policy.
///
/// An explicit path must exist. Otherwise `config/checkout.toml` is searched
/// upwards from the working directory, falling back to built-in defaults.
pub fn load_checkout_policy(path: Option<&str>) -> anyhow::Result<CheckoutPolicy> {
    let policy = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
            parse_policy(path, &content)?
        }
        None => {
            let config_paths = [
                "config/checkout.toml",
                "../config/checkout.toml",
                "../../config/checkout.toml",
            ];

            match config_paths
                .iter()
                .find_map(|p| std::fs::read_to_string(p).ok().map(|c| (*p, c)))
            {
                Some((path, content)) => parse_policy(path, &content)?,
                None => {
                    tracing::warn!("No checkout policy found, using defaults");
                    CheckoutPolicy::default()
                }
            }
        }
    };

    policy
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid checkout policy: {}", e))?;
    Ok(policy)
}

fn parse_policy(path: &str, content: &str) -> anyhow::Result<CheckoutPolicy> {
    let policy: CheckoutPolicy = toml::from_str(content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
    tracing::info!("Loaded checkout policy from {}", path);
    Ok(policy)
}
