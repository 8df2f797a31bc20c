//! Core types for the Impact storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;

pub use id::{CollectionId, ImageId, ProductId, VariantId};
pub use price::Money;
pub use product::{DEFAULT_TITLE_OPTION, Image, ProductOption, ProductVariant};
