//! Domain types for Shopify Storefront API.
//!
//! These types provide a clean, ergonomic API separate from the raw GraphQL
//! response shapes in `storefront::queries`. Shared catalog types (money,
//! images, options, variants) come from `impact_core`.

use impact_core::pagination::Connection;
use impact_core::types::{CollectionId, Image, Money, ProductId, ProductOption, ProductVariant};
use impact_core::variant::SelectedOptions;

// =============================================================================
// Shared Types
// =============================================================================

/// Price range for a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Money,
    /// Maximum price among all variants.
    pub max_variant_price: Money,
}

/// SEO metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seo {
    /// Page title for search engines.
    pub title: Option<String>,
    /// Meta description.
    pub description: Option<String>,
}

// =============================================================================
// Product Types
// =============================================================================

/// A product as loaded for its detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
    pub vendor: String,
    /// Plain-text description.
    pub description: String,
    /// Description HTML (trusted, rendered unescaped).
    pub description_html: String,
    pub options: Vec<ProductOption>,
    /// Gallery, first 10 images.
    pub images: Vec<Image>,
    pub seo: Seo,
    /// Variant the API resolved for the requested options, if any.
    pub selected_variant: Option<ProductVariant>,
    pub first_variant: Option<ProductVariant>,
}

/// A product card in a collection grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductItem {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
    pub featured_image: Option<Image>,
    pub price_range: PriceRange,
    /// Options of the first variant; the card links straight to it.
    pub first_variant_options: SelectedOptions,
}

/// A product card in the home page "favorites" row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendedProduct {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
    pub min_price: Money,
    pub featured_image: Option<Image>,
    pub images: Vec<Image>,
}

// =============================================================================
// Collection Types
// =============================================================================

/// Collection summary used by listings and the home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    pub id: CollectionId,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub image: Option<Image>,
}

/// A collection with one page of its products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub id: CollectionId,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub products: Connection<ProductItem>,
}
