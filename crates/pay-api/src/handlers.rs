//! # Request Handlers
//!
//! Axum request handlers for the checkout API.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pay_core::{CartRequest, PaymentError};
use serde::Serialize;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create payment response
#[derive(Debug, Serialize)]
pub struct CreatePaymentResponse {
    /// Provider preference id
    #[serde(rename = "preferenceId")]
    pub preference_id: String,
    /// Production checkout URL (redirect user here)
    pub init_point: String,
    /// Sandbox checkout URL
    pub sandbox_init_point: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

fn payment_error_to_response(err: PaymentError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);
    if let Some(details) = err.details() {
        response = response.with_details(details.clone());
    }
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "blee-checkout",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.strategy.provider_name()
    }))
}

/// Build a preference from the posted cart and submit it to the provider
#[instrument(skip(state, payload), fields(request_id = %Uuid::new_v4()))]
pub async fn create_payment(
    State(state): State<AppState>,
    payload: Result<Json<CartRequest>, JsonRejection>,
) -> Result<Json<CreatePaymentResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected checkout body: {}", rejection.body_text());
        payment_error_to_response(PaymentError::InvalidRequest(rejection.body_text()))
    })?;

    info!(
        customer_email = request.customer_email().unwrap_or("<none>"),
        origin = request.origin().unwrap_or("<default>"),
        items = request.items.len(),
        "Creating payment preference"
    );

    let preference = state.builder.build(&request).map_err(|e| {
        error!("Failed to build preference: {}", e);
        payment_error_to_response(e)
    })?;

    info!(
        "Submitting preference: {} units, total={}, success_url={}",
        preference.item_count(),
        preference.total_display(),
        preference.back_urls.success
    );

    let result = state
        .strategy
        .create_preference(&preference)
        .await
        .map_err(|e| {
            error!("Failed to create preference: {}", e);
            payment_error_to_response(e)
        })?;

    info!("Created preference: {}", result.id);

    Ok(Json(CreatePaymentResponse {
        preference_id: result.id,
        init_point: result.init_point,
        sandbox_init_point: result.sandbox_init_point,
    }))
}
