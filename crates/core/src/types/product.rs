//! Product, option and variant snapshots.
//!
//! These are read-only views of what the Storefront API returned for one
//! request. Nothing here is mutated after it is fetched.

use serde::{Deserialize, Serialize};

use super::id::{ImageId, VariantId};
use super::price::Money;
use crate::variant::SelectedOptions;

/// Option name and value the Storefront API uses for single-variant products.
pub const DEFAULT_TITLE_OPTION: (&str, &str) = ("Title", "Default Title");

/// A product option definition (e.g., "Color" with its values).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Values in merchant order (e.g., `["S", "M", "L"]`).
    pub values: Vec<String>,
}

impl ProductOption {
    /// Create an option from a name and its values.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// A product or variant image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: Option<ImageId>,
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// A purchasable combination of a product's option values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub title: String,
    pub available_for_sale: bool,
    /// One entry per product option.
    pub selected_options: SelectedOptions,
    pub price: Money,
    pub compare_at_price: Option<Money>,
    pub unit_price: Option<Money>,
    pub image: Option<Image>,
    pub sku: Option<String>,
}

impl ProductVariant {
    /// Whether this is the placeholder variant of a product without options.
    #[must_use]
    pub fn is_default_title(&self) -> bool {
        let (name, value) = DEFAULT_TITLE_OPTION;
        self.selected_options.get(name) == Some(value)
    }

    /// Whether the variant is discounted against its compare-at price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price
            .as_ref()
            .is_some_and(|compare_at| compare_at.amount > self.price.amount)
    }
}
