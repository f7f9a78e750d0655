//! # Checkout Policy
//!
//! Fixed business fields of a preference, in one place.
//! Defaults match the Blee Shop storefront; `config/checkout.toml`
//! can override any of them.

use crate::error::{PaymentError, PaymentResult};
use crate::money::Currency;
use crate::preference::BackUrls;
use crate::strategy::BackUrlBuilder;
use serde::{Deserialize, Serialize};

/// Storefront used when the request carries no origin
pub const DEFAULT_ORIGIN: &str = "https://bleeshop.web.app";

/// Business policy applied to every preference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutPolicy {
    /// Currency of every line item
    pub currency: Currency,

    /// Text shown on the buyer's card statement
    pub statement_descriptor: String,

    /// Provider auto-return mode
    pub auto_return: String,

    /// Payer name when the customer sent none
    pub default_payer_name: String,

    /// Item description is this prefix followed by the title
    pub item_description_prefix: Option<String>,

    /// External reference is this prefix followed by the customer email
    pub external_reference_prefix: Option<String>,

    /// Truncate item ids to this many characters
    pub item_id_max_chars: Option<usize>,

    pub payment_methods: PaymentMethodsPolicy,

    pub shipping: ShippingPolicy,

    pub back_urls: BackUrlPolicy,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            currency: Currency::BRL,
            statement_descriptor: "BLEESHOP".to_string(),
            auto_return: "approved".to_string(),
            default_payer_name: "Cliente Blee".to_string(),
            item_description_prefix: Some("Produto Blee Shop: ".to_string()),
            external_reference_prefix: Some("ORDER_".to_string()),
            item_id_max_chars: None,
            payment_methods: PaymentMethodsPolicy::default(),
            shipping: ShippingPolicy::default(),
            back_urls: BackUrlPolicy::default(),
        }
    }
}

impl CheckoutPolicy {
    /// Load policy from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Reject policies the provider would refuse
    pub fn validate(&self) -> PaymentResult<()> {
        if self.payment_methods.installments == 0 {
            return Err(PaymentError::Configuration(
                "payment_methods.installments must be at least 1".to_string(),
            ));
        }
        if self.back_urls.default_origin.trim().is_empty() {
            return Err(PaymentError::Configuration(
                "back_urls.default_origin must not be empty".to_string(),
            ));
        }
        if self.item_id_max_chars == Some(0) {
            return Err(PaymentError::Configuration(
                "item_id_max_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Installments and excluded payment types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentMethodsPolicy {
    pub installments: u32,
    pub excluded_payment_types: Vec<String>,
}

impl Default for PaymentMethodsPolicy {
    fn default() -> Self {
        Self {
            installments: 12,
            // boleto is left out so buyers go through Pix or card
            excluded_payment_types: vec!["ticket".to_string()],
        }
    }
}

/// The synthetic shipping line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingPolicy {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            id: "shipping-cost".to_string(),
            title: "Custo de Envio (Logística Blee)".to_string(),
            description: Some("Entrega via transportadora parceira".to_string()),
        }
    }
}

/// Back-urls as origin + fixed path suffix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackUrlPolicy {
    pub default_origin: String,
    pub success_path: String,
    pub failure_path: String,
    pub pending_path: String,
}

impl Default for BackUrlPolicy {
    fn default() -> Self {
        Self {
            default_origin: DEFAULT_ORIGIN.to_string(),
            success_path: "/#/dashboard".to_string(),
            failure_path: "/#/cart".to_string(),
            pending_path: "/#/dashboard".to_string(),
        }
    }
}

impl BackUrlPolicy {
    /// Origin actually used for a request
    pub fn effective_origin<'a>(&'a self, origin: Option<&'a str>) -> &'a str {
        origin
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .unwrap_or(self.default_origin.as_str())
            .trim_end_matches('/')
    }
}

impl BackUrlBuilder for BackUrlPolicy {
    fn back_urls(&self, origin: Option<&str>) -> BackUrls {
        let origin = self.effective_origin(origin);
        BackUrls {
            success: format!("{}{}", origin, self.success_path),
            failure: format!("{}{}", origin, self.failure_path),
            pending: format!("{}{}", origin, self.pending_path),
        }
    }
}
