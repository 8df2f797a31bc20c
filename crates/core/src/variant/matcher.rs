//! Exact variant lookup by option combination.

use std::collections::HashMap;

use super::VariantError;
use super::options::SelectedOptions;
use crate::types::ProductVariant;

/// The variant whose options equal `selection` exactly.
///
/// A partial selection never matches: there is no best-effort fallback.
#[must_use]
pub fn find_variant<'a>(
    variants: &'a [ProductVariant],
    selection: &SelectedOptions,
) -> Option<&'a ProductVariant> {
    variants
        .iter()
        .find(|variant| variant.selected_options == *selection)
}

/// Variants keyed by their full option combination.
#[derive(Debug, Clone, Default)]
pub struct VariantIndex {
    variants: Vec<ProductVariant>,
    by_combination: HashMap<Vec<(String, String)>, usize>,
}

impl VariantIndex {
    /// Index `variants`.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::DuplicateCombination`] if two variants share
    /// the same option combination.
    pub fn build(variants: Vec<ProductVariant>) -> Result<Self, VariantError> {
        let mut by_combination = HashMap::with_capacity(variants.len());

        for (position, variant) in variants.iter().enumerate() {
            let key = variant.selected_options.canonical_key();
            if let Some(&existing) = by_combination.get(&key) {
                let first = variants
                    .get(existing)
                    .map(|v: &ProductVariant| v.id.clone())
                    .unwrap_or_else(|| variant.id.clone());
                return Err(VariantError::DuplicateCombination {
                    first,
                    second: variant.id.clone(),
                    combination: variant.selected_options.to_query(),
                });
            }
            by_combination.insert(key, position);
        }

        Ok(Self {
            variants,
            by_combination,
        })
    }

    /// Exact match for `selection`, or `None`.
    #[must_use]
    pub fn find(&self, selection: &SelectedOptions) -> Option<&ProductVariant> {
        self.by_combination
            .get(&selection.canonical_key())
            .and_then(|&position| self.variants.get(position))
    }

    #[must_use]
    pub fn variants(&self) -> &[ProductVariant] {
        &self.variants
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{Money, VariantId};

    fn variant(id: u32, options: &[(&str, &str)], available: bool) -> ProductVariant {
        ProductVariant {
            id: VariantId::new(format!("gid://shopify/ProductVariant/{id}")),
            title: options
                .iter()
                .map(|(_, value)| *value)
                .collect::<Vec<_>>()
                .join(" / "),
            available_for_sale: available,
            selected_options: options.iter().copied().collect(),
            price: Money::new(Decimal::new(2500, 2), "USD"),
            compare_at_price: None,
            unit_price: None,
            image: None,
            sku: None,
        }
    }

    fn catalog() -> Vec<ProductVariant> {
        vec![
            variant(1, &[("Color", "red"), ("Size", "S")], true),
            variant(2, &[("Color", "red"), ("Size", "M")], true),
            variant(3, &[("Color", "blue"), ("Size", "S")], false),
            variant(4, &[("Color", "blue"), ("Size", "M")], true),
        ]
    }

    fn selection(pairs: &[(&str, &str)]) -> SelectedOptions {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_find_exact_match_in_any_order() {
        let variants = catalog();
        let found = find_variant(&variants, &selection(&[("Size", "M"), ("Color", "blue")]))
            .expect("variant");
        assert_eq!(found.id.as_str(), "gid://shopify/ProductVariant/4");
    }

    #[test]
    fn test_partial_selection_never_matches() {
        let variants = catalog();
        assert!(find_variant(&variants, &selection(&[("Color", "red")])).is_none());

        let index = VariantIndex::build(variants).expect("index");
        assert!(index.find(&selection(&[("Color", "red")])).is_none());
    }

    #[test]
    fn test_extra_entry_never_matches() {
        let index = VariantIndex::build(catalog()).expect("index");
        let over = selection(&[("Color", "red"), ("Size", "S"), ("Material", "wool")]);
        assert!(index.find(&over).is_none());
    }

    #[test]
    fn test_index_agrees_with_linear_search() {
        let variants = catalog();
        let index = VariantIndex::build(variants.clone()).expect("index");
        for color in ["red", "blue", "green"] {
            for size in ["S", "M", "L"] {
                let s = selection(&[("Color", color), ("Size", size)]);
                assert_eq!(index.find(&s), find_variant(&variants, &s), "{color}/{size}");
            }
        }
    }

    #[test]
    fn test_duplicate_combination_rejected() {
        let mut variants = catalog();
        variants.push(variant(5, &[("Size", "S"), ("Color", "red")], true));

        let err = VariantIndex::build(variants).expect_err("duplicate");
        match err {
            VariantError::DuplicateCombination { first, second, .. } => {
                assert_eq!(first.as_str(), "gid://shopify/ProductVariant/1");
                assert_eq!(second.as_str(), "gid://shopify/ProductVariant/5");
            }
        }
    }

    #[test]
    fn test_every_indexed_combination_is_unique() {
        let index = VariantIndex::build(catalog()).expect("index");
        let variants = index.variants();
        for (i, a) in variants.iter().enumerate() {
            for b in variants.iter().skip(i + 1) {
                assert_ne!(a.selected_options, b.selected_options);
            }
        }
    }
}
