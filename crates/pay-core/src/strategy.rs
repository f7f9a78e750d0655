//! # Provider Strategy Traits
//!
//! Seams between the preference builder and the outside world.
//!
//! ```text
//! ┌──────────────────────────────┐     ┌──────────────────────────────┐
//! │  PaymentStrategy (trait)     │     │  BackUrlBuilder (trait)      │
//! │  ├── create_preference()     │     │  └── back_urls()             │
//! │  └── provider_name()         │     └──────────────────────────────┘
//! └──────────────────────────────┘                  ▲
//!                ▲                         ┌────────┴────────┐
//!   ┌────────────┴───────────┐       BackUrlPolicy    Fn(Option<&str>)
//!   │ MercadoPagoStrategy    │
//!   └────────────────────────┘
//! ```

use crate::error::PaymentResult;
use crate::preference::{BackUrls, Preference, PreferenceResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment provider implementations.
///
/// A strategy submits a fully built [`Preference`] and returns the
/// provider-issued identifiers. It makes exactly one attempt.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Create a checkout preference and return its redirect links.
    ///
    /// # Errors
    /// `ProviderRejected` when the provider answers with status >= 400,
    /// `NetworkError` / `Serialization` for transport or parse failures.
    async fn create_preference(&self, preference: &Preference) -> PaymentResult<PreferenceResult>;

    /// Get the provider name (for logging and error reporting).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment strategy (dynamic dispatch)
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;

/// Builds the provider back-urls from the caller's origin.
///
/// `origin` is `None` when the caller did not send one.
pub trait BackUrlBuilder: Send + Sync {
    fn back_urls(&self, origin: Option<&str>) -> BackUrls;
}

impl<F> BackUrlBuilder for F
where
    F: Fn(Option<&str>) -> BackUrls + Send + Sync,
{
    fn back_urls(&self, origin: Option<&str>) -> BackUrls {
        self(origin)
    }
}
