//! # pay-core
//!
//! Core types and traits for the Blee checkout preference service.
//!
//! This crate provides:
//! - `CartRequest` and `LineItemInput` for the storefront request body
//! - `PreferenceBuilder` turning a cart into a provider `Preference`
//! - `CheckoutPolicy` holding the fixed business fields and back-url rules
//! - `PaymentStrategy` trait for implementing payment providers
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{CartRequest, LineItemInput, PreferenceBuilder, PaymentStrategy};
//!
//! let cart = CartRequest::new(vec![LineItemInput::new("Colar Favo", 89.9).with_quantity(2.0)])
//!     .with_shipping(22.9)
//!     .with_customer(Some("Ana"), Some("ana@example.com"));
//!
//! let preference = PreferenceBuilder::default().build(&cart)?;
//! let result = strategy.create_preference(&preference).await?;
//!
//! // Redirect the buyer to result.init_point
//! ```

pub mod cart;
pub mod error;
pub mod money;
pub mod policy;
pub mod preference;
pub mod strategy;

// Re-exports for convenience
pub use cart::{CartRequest, CustomerInfo, ItemId, LineItemInput, NumericValue};
pub use error::{PaymentError, PaymentResult};
pub use money::{round_amount, Currency, Price};
pub use policy::{
    BackUrlPolicy, CheckoutPolicy, PaymentMethodsPolicy, ShippingPolicy, DEFAULT_ORIGIN,
};
pub use preference::{
    BackUrls, ExcludedPaymentType, Payer, PaymentMethods, Preference, PreferenceBuilder,
    PreferenceItem, PreferenceResult,
};
pub use strategy::{BackUrlBuilder, BoxedPaymentStrategy, PaymentStrategy};
