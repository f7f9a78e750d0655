//! # Payment Error Types
//!
//! Typed error handling for the checkout preference service.
//! All checkout operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing token, unreadable policy)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request body could not be accepted at all
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A cart field could not be converted to its expected type
    #[error("Invalid value for {field}: {message}")]
    InputCoercion { field: String, message: String },

    /// Provider answered with a status >= 400
    #[error("Provider error [{provider}]: HTTP {status}")]
    ProviderRejected {
        provider: String,
        status: u16,
        details: serde_json::Value,
    },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Provider response could not be parsed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PaymentError {
    /// Shorthand for an [`PaymentError::InputCoercion`] error
    pub fn coercion(field: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::InputCoercion {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the HTTP status code appropriate for this error.
    ///
    /// Provider rejections mirror the provider's own status.
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::InputCoercion { .. } => 500,
            PaymentError::ProviderRejected { status, .. } => *status,
            PaymentError::NetworkError(_) => 500,
            PaymentError::Serialization(_) => 500,
            PaymentError::Internal(_) => 500,
        }
    }

    /// Provider payload to relay to the caller, if any
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            PaymentError::ProviderRejected { details, .. } => Some(details),
            _ => None,
        }
    }
}

/// Result type alias for checkout operations
pub type PaymentResult<T> = Result<T, PaymentError>;
