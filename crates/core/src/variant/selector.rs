//! Option value lists for the variant picker.
//!
//! For every value of every option, the picker needs to know where selecting
//! it leads, whether that combination can be bought, and whether it is the
//! current choice.

use super::VariantError;
use super::matcher::VariantIndex;
use super::options::SelectedOptions;
use super::url::{OptionChange, ProductLocation};
use crate::types::{ProductOption, ProductVariant};

/// The variants known while rendering, and whether that list is exhaustive.
#[derive(Debug, Clone, Default)]
pub struct VariantCatalog {
    index: VariantIndex,
    complete: bool,
}

impl VariantCatalog {
    /// Catalog from a subset of variants (e.g., only the first one).
    ///
    /// Combinations that are not in the subset are treated as available, so
    /// the picker may offer values that turn out to be sold out.
    ///
    /// # Errors
    ///
    /// Returns an error if two distinct variants share a combination.
    pub fn partial<'a, I>(known: I) -> Result<Self, VariantError>
    where
        I: IntoIterator<Item = &'a ProductVariant>,
    {
        let mut variants: Vec<ProductVariant> = Vec::new();
        for variant in known {
            if !variants.iter().any(|v| v.id == variant.id) {
                variants.push(variant.clone());
            }
        }
        Ok(Self {
            index: VariantIndex::build(variants)?,
            complete: false,
        })
    }

    /// Catalog from the full variant list.
    ///
    /// # Errors
    ///
    /// Returns an error if two variants share a combination.
    pub fn complete(variants: Vec<ProductVariant>) -> Result<Self, VariantError> {
        Ok(Self {
            index: VariantIndex::build(variants)?,
            complete: true,
        })
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    #[must_use]
    pub fn find(&self, selection: &SelectedOptions) -> Option<&ProductVariant> {
        self.index.find(selection)
    }

    /// Whether `selection` can be bought, as far as this catalog knows.
    #[must_use]
    pub fn is_available(&self, selection: &SelectedOptions) -> bool {
        self.find(selection)
            .map_or(!self.complete, |variant| variant.available_for_sale)
    }
}

/// One option with its selectable values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantOption {
    pub name: String,
    pub values: Vec<VariantOptionValue>,
}

/// A single value of an option, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantOptionValue {
    pub value: String,
    pub is_available: bool,
    /// Whether this is the currently selected value.
    pub is_active: bool,
    /// URL selecting this value with every other option kept.
    pub to: String,
    /// The variant this combination resolves to, if known.
    pub variant: Option<ProductVariant>,
}

/// Build the picker for `options` given the current selection.
///
/// Options with a single value are omitted; there is nothing to choose.
#[must_use]
pub fn variant_options(
    location: &ProductLocation,
    options: &[ProductOption],
    current: &SelectedOptions,
    catalog: &VariantCatalog,
) -> Vec<VariantOption> {
    options
        .iter()
        .filter(|option| option.values.len() > 1)
        .map(|option| VariantOption {
            name: option.name.clone(),
            values: option
                .values
                .iter()
                .map(|value| {
                    let candidate = current.retain_known(options).with(&option.name, value);
                    let change = OptionChange::new(option.name.as_str(), value.as_str());
                    VariantOptionValue {
                        value: value.clone(),
                        is_available: catalog.is_available(&candidate),
                        is_active: current.get(&option.name) == Some(value.as_str()),
                        to: location.resolve_change(options, current, &change),
                        variant: catalog.find(&candidate).cloned(),
                    }
                })
                .collect(),
        })
        .collect()
}
