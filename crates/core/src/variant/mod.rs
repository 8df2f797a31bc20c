//! Product variant selection.
//!
//! Everything here is pure: given a product's options, its variants and the
//! request URL, work out which variant is selected and where each option
//! value leads.

pub mod matcher;
pub mod options;
pub mod selection;
pub mod selector;
pub mod url;

use thiserror::Error;

use crate::types::VariantId;

pub use matcher::{VariantIndex, find_variant};
pub use options::{
    SelectedOption, SelectedOptions, TRACKING_PARAM_PREFIXES, is_tracking_param, query_pairs,
};
pub use selection::{Navigation, SelectionController, SelectionState};
pub use selector::{VariantCatalog, VariantOption, VariantOptionValue, variant_options};
pub use self::url::{OptionChange, ProductLocation};

/// Errors raised while indexing variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariantError {
    /// Two variants resolve to the same option combination.
    #[error("variants {first} and {second} share the option combination `{combination}`")]
    DuplicateCombination {
        first: VariantId,
        second: VariantId,
        combination: String,
    },
}
