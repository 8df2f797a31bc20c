//! Type conversion functions for Shopify Storefront API responses.

pub mod collections;
pub mod products;

pub use collections::{
    convert_collection, convert_collection_connection, convert_collection_summary,
};
pub use products::{convert_product, convert_recommended_product, convert_variants};
