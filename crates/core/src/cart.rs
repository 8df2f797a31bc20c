//! Payload for the add-to-cart form.
//!
//! The form posts a hidden `cartFormInput` field whose value is the JSON
//! produced here. The cart endpoint that consumes it lives outside this
//! workspace.

use serde::{Deserialize, Serialize};

use crate::types::{ProductVariant, VariantId};

/// A single line to add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: VariantId,
    pub quantity: u32,
}

/// Cart form actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "inputs")]
pub enum CartFormInput {
    LinesAdd { lines: Vec<CartLineInput> },
}

impl CartFormInput {
    /// Add one unit of `variant`.
    #[must_use]
    pub fn add_variant(variant: &ProductVariant) -> Self {
        Self::LinesAdd {
            lines: vec![CartLineInput {
                merchandise_id: variant.id.clone(),
                quantity: 1,
            }],
        }
    }

    /// JSON for the hidden form field.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::Money;

    #[test]
    fn test_lines_add_payload_shape() {
        let variant = ProductVariant {
            id: VariantId::new("gid://shopify/ProductVariant/42"),
            title: "Default Title".to_string(),
            available_for_sale: true,
            selected_options: [("Title", "Default Title")].into_iter().collect(),
            price: Money::new(Decimal::new(999, 2), "USD"),
            compare_at_price: None,
            unit_price: None,
            image: None,
            sku: None,
        };

        let json = CartFormInput::add_variant(&variant).to_json().expect("json");
        assert_eq!(
            json,
            r#"{"action":"LinesAdd","inputs":{"lines":[{"merchandiseId":"gid://shopify/ProductVariant/42","quantity":1}]}}"#
        );
    }

    #[test]
    fn test_payload_parses_back() {
        let raw = r#"{"action":"LinesAdd","inputs":{"lines":[{"merchandiseId":"gid://shopify/ProductVariant/7","quantity":2}]}}"#;
        let parsed: CartFormInput = serde_json::from_str(raw).expect("parse");
        let CartFormInput::LinesAdd { lines } = parsed;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().map(|l| l.quantity), Some(2));
    }
}
