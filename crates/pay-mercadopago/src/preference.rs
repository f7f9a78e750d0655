//! # Mercado Pago Preferences
//!
//! Implementation of the Checkout Pro preference API
//! (`POST /checkout/preferences`). One attempt per call, no retries.

use crate::config::MercadoPagoConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pay_core::{PaymentError, PaymentResult, PaymentStrategy, Preference, PreferenceResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "mercadopago";

/// Mercado Pago Checkout Pro strategy
///
/// Creates a preference and hands back the hosted checkout links.
pub struct MercadoPagoStrategy {
    config: MercadoPagoConfig,
    client: Client,
}

impl MercadoPagoStrategy {
    /// Create a new strategy with its own HTTP client
    pub fn new(config: MercadoPagoConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = MercadoPagoConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &MercadoPagoConfig {
        &self.config
    }

    fn preferences_url(&self) -> String {
        format!(
            "{}/checkout/preferences",
            self.config.api_base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl PaymentStrategy for MercadoPagoStrategy {
    #[instrument(skip(self, preference), fields(items = preference.items.len()))]
    async fn create_preference(&self, preference: &Preference) -> PaymentResult<PreferenceResult> {
        debug!(
            "Creating Mercado Pago preference: {} units, total={}",
            preference.item_count(),
            preference.total_display()
        );

        let response = self
            .client
            .post(self.preferences_url())
            .header("Authorization", self.config.auth_header())
            .json(preference)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if status.as_u16() >= 400 {
            error!("Mercado Pago API error: status={}, body={}", status, body);

            let details = serde_json::from_str::<serde_json::Value>(&body)
                .unwrap_or(serde_json::Value::String(body));

            return Err(PaymentError::ProviderRejected {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                details,
            });
        }

        let created: MercadoPagoPreferenceResponse =
            serde_json::from_str(&body).map_err(|e| {
                PaymentError::Serialization(format!(
                    "Failed to parse Mercado Pago response: {}",
                    e
                ))
            })?;

        info!(
            "Created Mercado Pago preference: id={}, init_point={}",
            created.id, created.init_point
        );

        let date_created = created
            .date_created
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc));

        Ok(PreferenceResult {
            id: created.id,
            init_point: created.init_point,
            sandbox_init_point: created.sandbox_init_point,
            date_created,
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Mercado Pago API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct MercadoPagoPreferenceResponse {
    id: String,
    init_point: String,
    sandbox_init_point: String,
    #[serde(default)]
    date_created: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pay_core::{CartRequest, LineItemInput, PreferenceBuilder};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_preference() -> Preference {
        let cart = CartRequest::new(vec![LineItemInput::new("Shirt", 19.999).with_quantity(2.0)])
            .with_shipping(10.0)
            .with_customer(None, Some("a@b.com"));
        PreferenceBuilder::default().build(&cart).unwrap()
    }

    fn strategy_for(server: &MockServer) -> MercadoPagoStrategy {
        let config = MercadoPagoConfig::new("TEST-123-abc").with_api_base_url(server.uri());
        MercadoPagoStrategy::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_create_preference_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/checkout/preferences"))
            .and(header("Authorization", "Bearer TEST-123-abc"))
            .and(body_partial_json(json!({
                "statement_descriptor": "BLEESHOP",
                "auto_return": "approved",
                "external_reference": "ORDER_a@b.com",
                "payment_methods": { "installments": 12 }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "3162478356-abc",
                "init_point": "https://www.mercadopago.com.br/checkout/v1/redirect?pref_id=3162478356-abc",
                "sandbox_init_point": "https://sandbox.mercadopago.com.br/checkout/v1/redirect?pref_id=3162478356-abc",
                "date_created": "2024-05-01T10:00:00.000-04:00",
                "collector_id": 3162478356u64
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = strategy_for(&server)
            .create_preference(&sample_preference())
            .await
            .unwrap();

        assert_eq!(result.id, "3162478356-abc");
        assert!(result.init_point.starts_with("https://www.mercadopago.com.br/"));
        assert!(result.sandbox_init_point.starts_with("https://sandbox.mercadopago.com.br/"));
        assert_eq!(
            result.date_created.map(|d| d.to_rfc3339()),
            Some("2024-05-01T14:00:00+00:00".to_string())
        );
    }

    #[tokio::test]
    async fn test_rejection_keeps_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/checkout/preferences"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "invalid access token",
                "error": "unauthorized",
                "status": 401,
                "cause": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = strategy_for(&server)
            .create_preference(&sample_preference())
            .await
            .unwrap_err();

        match err {
            PaymentError::ProviderRejected {
                provider,
                status,
                details,
            } => {
                assert_eq!(provider, "mercadopago");
                assert_eq!(status, 401);
                assert_eq!(details["message"], "invalid access token");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejection_with_plain_text_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let err = strategy_for(&server)
            .create_preference(&sample_preference())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 503);
        assert_eq!(err.details(), Some(&json!("upstream unavailable")));
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "only-id" })))
            .mount(&server)
            .await;

        let err = strategy_for(&server)
            .create_preference(&sample_preference())
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::Serialization(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let config = MercadoPagoConfig::new("TEST-123-abc")
            .with_api_base_url(server.uri())
            .with_timeout(Duration::from_millis(200));
        let strategy = MercadoPagoStrategy::new(config).unwrap();

        let err = strategy
            .create_preference(&sample_preference())
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::NetworkError(_)));
    }

    #[tokio::test]
    async fn test_unreachable_provider() {
        let config = MercadoPagoConfig::new("TEST-123-abc").with_api_base_url("http://127.0.0.1:1");
        let strategy = MercadoPagoStrategy::new(config).unwrap();

        let err = strategy
            .create_preference(&sample_preference())
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::NetworkError(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_preferences_url_trims_slash() {
        let config = MercadoPagoConfig::new("TEST-1").with_api_base_url("http://localhost:8080/");
        let strategy = MercadoPagoStrategy::new(config).unwrap();
        assert_eq!(
            strategy.preferences_url(),
            "http://localhost:8080/checkout/preferences"
        );
    }
}
