//! Impact Core - Storefront view-model library.
//!
//! This crate holds the pieces of the storefront that do not talk to the
//! network: catalog types, variant selection and URL building, pagination
//! variables, and the add-to-cart payload. The `impact-storefront` server
//! fetches data and feeds it through these types before rendering.
//!
//! # Modules
//!
//! - [`types`] - Typed global IDs, money, products, options and variants
//! - [`variant`] - Selected options, variant matching, option URLs and the
//!   selection controller
//! - [`pagination`] - Cursor/direction query parameters and page links
//! - [`cart`] - `LinesAdd` payload for the cart form

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod pagination;
pub mod types;
pub mod variant;

pub use types::*;
