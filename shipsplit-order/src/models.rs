use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::splitter::SplitError;

/// A customer order as held by the upstream order-management system.
///
/// Only the fields the splitter reads or rewrites are typed. Everything else
/// the upstream sends is kept in `extra` and written back untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_key: Option<String>,
    /// Opaque; ShipStation sends an integer but nothing here reads it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Value>,
    pub items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_amount: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Order {
    pub fn new(order_number: impl Into<String>, items: Vec<LineItem>) -> Self {
        Self {
            order_number: order_number.into(),
            order_key: None,
            order_id: None,
            items,
            amount_paid: None,
            tax_amount: None,
            shipping_amount: None,
            extra: Map::new(),
        }
    }

    /// Decode and validate one raw upstream order record.
    pub fn from_value(value: Value) -> Result<Self, SplitError> {
        let order_number = order_number_hint(&value);
        let order: Order = serde_json::from_value(value).map_err(|e| SplitError::MalformedOrder {
            order_number,
            reason: e.to_string(),
        })?;
        order.validate()?;
        Ok(order)
    }

    pub fn to_value(&self) -> Result<Value, SplitError> {
        serde_json::to_value(self).map_err(|e| SplitError::MalformedOrder {
            order_number: Some(self.order_number.clone()),
            reason: e.to_string(),
        })
    }

    /// Check the fields a split depends on.
    pub fn validate(&self) -> Result<(), SplitError> {
        let malformed = |reason: String| SplitError::MalformedOrder {
            order_number: Some(self.order_number.clone()).filter(|n| !n.trim().is_empty()),
            reason,
        };

        if self.order_number.trim().is_empty() {
            return Err(malformed("orderNumber is blank".to_string()));
        }

        for (field, amount) in [
            ("amountPaid", self.amount_paid),
            ("taxAmount", self.tax_amount),
            ("shippingAmount", self.shipping_amount),
        ] {
            if let Some(value) = amount {
                if !value.is_finite() || value < 0.0 {
                    return Err(malformed(format!("{} must be a non-negative number, got {}", field, value)));
                }
            }
        }

        Ok(())
    }

    /// Copy of this order with a new number and item list; every other field is cloned as-is.
    pub(crate) fn derive(&self, order_number: String, items: Vec<LineItem>) -> Self {
        Self {
            order_number,
            order_key: self.order_key.clone(),
            order_id: self.order_id.clone(),
            items,
            amount_paid: self.amount_paid,
            tax_amount: self.tax_amount,
            shipping_amount: self.shipping_amount,
            extra: self.extra.clone(),
        }
    }
}

/// One ordered product. The sku prefix tells which fulfillment source ships it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub sku: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineItem {
    pub fn new(sku: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            extra: Map::new(),
        }
    }
}

/// Best-effort read of `orderNumber` from a record that may not decode.
pub fn order_number_hint(value: &Value) -> Option<String> {
    value
        .get("orderNumber")
        .and_then(Value::as_str)
        .map(str::to_string)
}
