//! Cache types for Storefront API responses.

use impact_core::pagination::{Connection, PaginationVariables};
use impact_core::types::{ProductOption, ProductVariant};

use crate::shopify::types::{
    Collection, CollectionSummary, Product, RecommendedProduct,
};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    FeaturedCollections,
    RecommendedProducts,
    Collections(PaginationVariables),
    Collection {
        handle: String,
        page: PaginationVariables,
    },
    /// Keyed by the canonical (sorted) pairs of the requested options the
    /// product actually has.
    Product {
        handle: String,
        selection: Vec<(String, String)>,
    },
    ProductVariants(String),
    /// Option names and values of a product, used to strip unrelated query
    /// parameters before building a `Product` key.
    ProductOptions(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    FeaturedCollections(Vec<CollectionSummary>),
    RecommendedProducts(Vec<RecommendedProduct>),
    Collections(Connection<CollectionSummary>),
    Collection(Box<Collection>),
    Product(Box<Product>),
    ProductVariants(Vec<ProductVariant>),
    ProductOptions(Vec<ProductOption>),
}
