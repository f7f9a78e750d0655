//! # Preference Types
//!
//! The preference object sent to the provider, the result it returns,
//! and the builder that turns a [`CartRequest`] into a [`Preference`].

use crate::cart::{CartRequest, LineItemInput};
use crate::error::{PaymentError, PaymentResult};
use crate::money::{round_amount, Currency, Price};
use crate::policy::CheckoutPolicy;
use crate::strategy::BackUrlBuilder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A line item as the provider receives it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceItem {
    pub id: String,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Always >= 1
    pub quantity: u32,

    pub currency_id: Currency,

    /// Rounded to the currency's decimals
    pub unit_price: f64,
}

impl PreferenceItem {
    /// Line total, `None` when it does not fit in the smallest unit
    pub fn total(&self) -> Option<Price> {
        Price::checked(self.unit_price, self.currency_id)?.checked_mul(self.quantity)
    }
}

/// Payer block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payer {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Redirect targets after payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedPaymentType {
    pub id: String,
}

/// Installments and excluded payment types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethods {
    pub installments: u32,
    pub excluded_payment_types: Vec<ExcludedPaymentType>,
}

/// Checkout Pro preference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    pub items: Vec<PreferenceItem>,

    pub payer: Payer,

    pub back_urls: BackUrls,

    pub auto_return: String,

    pub statement_descriptor: String,

    pub payment_methods: PaymentMethods,

    /// Correlation string, not unique across submissions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
}

impl Preference {
    /// Sum of all line totals, shipping included; `None` on overflow
    pub fn total(&self) -> Option<Price> {
        let currency = self
            .items
            .first()
            .map(|item| item.currency_id)
            .unwrap_or_default();
        let amount = self.items.iter().try_fold(0_i64, |sum, item| {
            sum.checked_add(item.total()?.amount)
        })?;
        Some(Price { amount, currency })
    }

    /// Total formatted for logs
    pub fn total_display(&self) -> String {
        self.total()
            .map(|total| total.display())
            .unwrap_or_else(|| "<overflow>".to_string())
    }

    /// Total number of units
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Identifiers and links returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceResult {
    /// Provider's preference id
    pub id: String,

    /// Production checkout URL
    pub init_point: String,

    /// Sandbox checkout URL
    pub sandbox_init_point: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
}

/// Turns carts into preferences under a [`CheckoutPolicy`]
#[derive(Clone)]
pub struct PreferenceBuilder {
    policy: CheckoutPolicy,
    back_urls: Arc<dyn BackUrlBuilder>,
}

impl PreferenceBuilder {
    /// Builder using the policy's own back-url rules
    pub fn new(policy: CheckoutPolicy) -> Self {
        let back_urls = Arc::new(policy.back_urls.clone());
        Self { policy, back_urls }
    }

    /// Replace the back-url rules
    pub fn with_back_url_builder(mut self, builder: impl BackUrlBuilder + 'static) -> Self {
        self.back_urls = Arc::new(builder);
        self
    }

    pub fn policy(&self) -> &CheckoutPolicy {
        &self.policy
    }

    /// Build the preference for `cart`.
    ///
    /// Deterministic: the same cart and policy always give the same preference.
    pub fn build(&self, cart: &CartRequest) -> PaymentResult<Preference> {
        if cart.items.is_empty() {
            return Err(PaymentError::InvalidRequest("Cart has no items".to_string()));
        }

        let mut items = cart
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| self.build_item(index, item))
            .collect::<PaymentResult<Vec<_>>>()?;

        let shipping_price = cart.resolved_shipping_price()?;
        if shipping_price > 0.0 {
            items.push(self.shipping_item(shipping_price));
        }

        let policy = &self.policy;
        let email = cart.customer_email();

        Ok(Preference {
            items,
            payer: Payer {
                name: cart
                    .customer_name()
                    .unwrap_or(policy.default_payer_name.as_str())
                    .to_string(),
                email: email.map(String::from),
            },
            back_urls: self.back_urls.back_urls(cart.origin()),
            auto_return: policy.auto_return.clone(),
            statement_descriptor: policy.statement_descriptor.clone(),
            payment_methods: PaymentMethods {
                installments: policy.payment_methods.installments,
                excluded_payment_types: policy
                    .payment_methods
                    .excluded_payment_types
                    .iter()
                    .map(|id| ExcludedPaymentType { id: id.clone() })
                    .collect(),
            },
            external_reference: policy
                .external_reference_prefix
                .as_ref()
                .zip(email)
                .map(|(prefix, email)| format!("{}{}", prefix, email)),
        })
    }

    fn build_item(&self, index: usize, item: &LineItemInput) -> PaymentResult<PreferenceItem> {
        let title = item.resolved_title(index)?;
        let quantity = item.resolved_quantity(index)?;
        let unit_price = item.resolved_unit_price(index)?;

        let mut id = item.resolved_id(&title);
        if let Some(max) = self.policy.item_id_max_chars {
            id = id.chars().take(max).collect();
        }

        let description = self
            .policy
            .item_description_prefix
            .as_ref()
            .map(|prefix| format!("{}{}", prefix, title));

        Ok(PreferenceItem {
            id,
            title,
            description,
            quantity,
            currency_id: self.policy.currency,
            unit_price: round_amount(unit_price, self.policy.currency),
        })
    }

    fn shipping_item(&self, price: f64) -> PreferenceItem {
        let shipping = &self.policy.shipping;
        PreferenceItem {
            id: shipping.id.clone(),
            title: shipping.title.clone(),
            description: shipping.description.clone(),
            quantity: 1,
            currency_id: self.policy.currency,
            unit_price: round_amount(price, self.policy.currency),
        }
    }
}

impl Default for PreferenceBuilder {
    fn default() -> Self {
        Self::new(CheckoutPolicy::default())
    }
}
