//! # Cart Types
//!
//! The request body posted by the storefront checkout page.
//! Numeric fields accept either JSON numbers or numeric strings; the
//! conversion happens once, in [`NumericValue::to_f64`], with a typed error.

use crate::error::{PaymentError, PaymentResult};
use serde::Deserialize;

/// A numeric field as the storefront may send it
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    Number(f64),
    Text(String),
    /// Any other JSON value; always rejected by [`NumericValue::to_f64`]
    Other(serde_json::Value),
}

impl NumericValue {
    /// Coerce to a finite `f64`, naming `field` in the error
    pub fn to_f64(&self, field: &str) -> PaymentResult<f64> {
        let value = match self {
            NumericValue::Number(n) => *n,
            NumericValue::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                PaymentError::coercion(field, format!("expected a number, got {:?}", s))
            })?,
            NumericValue::Other(v) => {
                return Err(PaymentError::coercion(
                    field,
                    format!("expected a number, got {}", v),
                ))
            }
        };

        if !value.is_finite() {
            return Err(PaymentError::coercion(field, "expected a finite number"));
        }
        Ok(value)
    }

    fn is_blank(&self) -> bool {
        matches!(self, NumericValue::Text(s) if s.trim().is_empty())
    }
}

impl From<f64> for NumericValue {
    fn from(value: f64) -> Self {
        NumericValue::Number(value)
    }
}

impl From<&str> for NumericValue {
    fn from(value: &str) -> Self {
        NumericValue::Text(value.to_string())
    }
}

/// Item identifier; some storefront builds post numeric ids
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Text(String),
    Number(serde_json::Number),
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemId::Text(s) => f.write_str(s),
            ItemId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A cart line as posted by the storefront
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineItemInput {
    /// Product id (falls back to the title)
    #[serde(default)]
    pub id: Option<ItemId>,

    /// Display title
    #[serde(default)]
    pub title: Option<String>,

    /// Older storefront builds send `name` instead of `title`
    #[serde(default)]
    pub name: Option<String>,

    /// Quantity, defaults to 1
    #[serde(default)]
    pub quantity: Option<NumericValue>,

    /// Unit price in the checkout currency
    #[serde(default)]
    pub unit_price: Option<NumericValue>,

    /// Older storefront builds send `price` instead of `unit_price`
    #[serde(default)]
    pub price: Option<NumericValue>,
}

impl LineItemInput {
    /// Create a line with a title and unit price
    pub fn new(title: impl Into<String>, unit_price: impl Into<NumericValue>) -> Self {
        Self {
            title: Some(title.into()),
            unit_price: Some(unit_price.into()),
            ..Self::default()
        }
    }

    /// Builder: set quantity
    pub fn with_quantity(mut self, quantity: impl Into<NumericValue>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    /// Builder: set id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(ItemId::Text(id.into()));
        self
    }

    /// Resolved, non-empty title
    pub fn resolved_title(&self, index: usize) -> PaymentResult<String> {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .ok_or_else(|| {
                PaymentError::coercion(format!("items[{}].title", index), "must not be empty")
            })
    }

    /// Resolved id, falling back to the title
    pub fn resolved_id(&self, title: &str) -> String {
        match &self.id {
            Some(id) => {
                let id = id.to_string();
                if id.trim().is_empty() {
                    title.to_string()
                } else {
                    id
                }
            }
            None => title.to_string(),
        }
    }

    /// Quantity as a positive integer.
    ///
    /// Absent, blank and non-positive values become 1; fractions truncate.
    pub fn resolved_quantity(&self, index: usize) -> PaymentResult<u32> {
        let value = match &self.quantity {
            Some(q) if !q.is_blank() => q.to_f64(&format!("items[{}].quantity", index))?,
            _ => return Ok(1),
        };

        let value = value.trunc();
        if value < 1.0 {
            return Ok(1);
        }
        if value > u32::MAX as f64 {
            return Err(PaymentError::coercion(
                format!("items[{}].quantity", index),
                "quantity is too large",
            ));
        }
        Ok(value as u32)
    }

    /// Unit price as a non-negative decimal (not yet rounded)
    pub fn resolved_unit_price(&self, index: usize) -> PaymentResult<f64> {
        let field = format!("items[{}].unit_price", index);
        let price = self
            .unit_price
            .as_ref()
            .or(self.price.as_ref())
            .ok_or_else(|| PaymentError::coercion(&field, "missing"))?
            .to_f64(&field)?;

        if price < 0.0 {
            return Err(PaymentError::coercion(field, "must not be negative"));
        }
        Ok(price)
    }
}

/// Customer details used for the payer block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Cart posted to `POST /criar-pagamento`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRequest {
    /// Cart lines
    #[serde(default)]
    pub items: Vec<LineItemInput>,

    /// Selected shipping price, 0 when none
    #[serde(default)]
    pub shipping_price: Option<NumericValue>,

    /// Customer details
    #[serde(default)]
    pub customer: Option<CustomerInfo>,

    /// Storefront origin the back-urls are built from
    #[serde(default)]
    pub origin: Option<String>,
}

impl CartRequest {
    /// Create a cart from items
    pub fn new(items: Vec<LineItemInput>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Builder: set shipping price
    pub fn with_shipping(mut self, price: impl Into<NumericValue>) -> Self {
        self.shipping_price = Some(price.into());
        self
    }

    /// Builder: set customer
    pub fn with_customer(mut self, name: Option<&str>, email: Option<&str>) -> Self {
        self.customer = Some(CustomerInfo {
            name: name.map(String::from),
            email: email.map(String::from),
        });
        self
    }

    /// Builder: set origin
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Shipping price, 0 when absent or blank
    pub fn resolved_shipping_price(&self) -> PaymentResult<f64> {
        match &self.shipping_price {
            Some(price) if !price.is_blank() => price.to_f64("shippingPrice"),
            _ => Ok(0.0),
        }
    }

    /// Customer email if present and non-empty
    pub fn customer_email(&self) -> Option<&str> {
        self.customer
            .as_ref()
            .and_then(|c| c.email.as_deref())
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// Customer name if present and non-empty
    pub fn customer_name(&self) -> Option<&str> {
        self.customer
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    /// Origin if present and non-empty
    pub fn origin(&self) -> Option<&str> {
        self.origin
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_storefront_body() {
        let body = r#"{
            "items": [{ "title": "Colar Favo", "unit_price": 89.9, "quantity": 2 }],
            "shippingPrice": 22.9,
            "customer": { "name": "Ana", "email": "ana@example.com" }
        }"#;
        let cart: CartRequest = serde_json::from_str(body).unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].resolved_title(0).unwrap(), "Colar Favo");
        assert_eq!(cart.items[0].resolved_quantity(0).unwrap(), 2);
        assert_eq!(cart.resolved_shipping_price().unwrap(), 22.9);
        assert_eq!(cart.customer_email(), Some("ana@example.com"));
        assert_eq!(cart.origin(), None);
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let item: LineItemInput =
            serde_json::from_str(r#"{ "title": "Anel", "unit_price": " 12.50 ", "quantity": "3" }"#)
                .unwrap();

        assert_eq!(item.resolved_unit_price(0).unwrap(), 12.5);
        assert_eq!(item.resolved_quantity(0).unwrap(), 3);
    }

    #[test]
    fn test_quantity_defaults() {
        let absent = LineItemInput::new("A", 1.0);
        assert_eq!(absent.resolved_quantity(0).unwrap(), 1);

        let null: LineItemInput =
            serde_json::from_str(r#"{ "title": "A", "unit_price": 1, "quantity": null }"#).unwrap();
        assert_eq!(null.resolved_quantity(0).unwrap(), 1);

        assert_eq!(absent.clone().with_quantity(0.0).resolved_quantity(0).unwrap(), 1);
        assert_eq!(absent.clone().with_quantity(-4.0).resolved_quantity(0).unwrap(), 1);
        assert_eq!(absent.with_quantity(2.7).resolved_quantity(0).unwrap(), 2);
    }

    #[test]
    fn test_uncoercible_fields_are_errors() {
        let item = LineItemInput::new("A", "abc");
        let err = item.resolved_unit_price(3).unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("items[3].unit_price"));

        let item = LineItemInput::new("A", 1.0).with_quantity("two");
        assert!(item.resolved_quantity(0).is_err());

        let missing = LineItemInput {
            title: Some("A".into()),
            ..LineItemInput::default()
        };
        assert!(missing.resolved_unit_price(0).is_err());

        assert!(LineItemInput::new("A", -1.0).resolved_unit_price(0).is_err());
        assert!(LineItemInput::new("A", "NaN").resolved_unit_price(0).is_err());
    }

    #[test]
    fn test_title_falls_back_to_name() {
        let item: LineItemInput =
            serde_json::from_str(r#"{ "id": 42, "name": "Brinco", "unit_price": 10 }"#).unwrap();
        assert_eq!(item.resolved_title(0).unwrap(), "Brinco");
        assert_eq!(item.resolved_id("Brinco"), "42");

        let blank = LineItemInput::new("   ", 1.0);
        assert!(blank.resolved_title(0).is_err());
    }

    #[test]
    fn test_legacy_price_field() {
        let item: LineItemInput =
            serde_json::from_str(r#"{ "id": 7, "name": "Brinco", "price": 10, "quantity": 1 }"#)
                .unwrap();
        assert_eq!(item.resolved_title(0).unwrap(), "Brinco");
        assert_eq!(item.resolved_unit_price(0).unwrap(), 10.0);

        let both: LineItemInput =
            serde_json::from_str(r#"{ "title": "Anel", "price": 99, "unit_price": "12.5" }"#)
                .unwrap();
        assert_eq!(both.resolved_unit_price(0).unwrap(), 12.5);
    }

    #[test]
    fn test_non_numeric_json_types_are_coercion_errors() {
        for raw in [r#"true"#, r#"[1]"#, r#"{}"#] {
            let body = format!(r#"{{ "title": "Anel", "unit_price": {} }}"#, raw);
            let item: LineItemInput = serde_json::from_str(&body).unwrap();
            assert!(matches!(item.unit_price, Some(NumericValue::Other(_))));

            let err = item.resolved_unit_price(0).unwrap_err();
            assert_eq!(err.status_code(), 500);
            assert!(err.to_string().contains("items[0].unit_price"));
        }
    }

    #[test]
    fn test_customer_and_origin_blank_values() {
        let cart = CartRequest::new(vec![])
            .with_customer(Some(""), Some("  "))
            .with_origin("");

        assert_eq!(cart.customer_email(), None);
        assert_eq!(cart.customer_name(), None);
        assert_eq!(cart.origin(), None);
        assert_eq!(cart.resolved_shipping_price().unwrap(), 0.0);
    }
}
