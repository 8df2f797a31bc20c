//! Option selection state for a single product page.
//!
//! The controller owns the current selection and the variant the server
//! resolved for it. Changing an option does not pick a variant locally: it
//! asks for a navigation to the canonical URL and waits for the new page data
//! to arrive.

use super::options::SelectedOptions;
use super::selector::{VariantCatalog, VariantOption, variant_options};
use super::url::{OptionChange, ProductLocation};
use crate::types::{ProductOption, ProductVariant};

/// Where the controller is in the select/navigate cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    /// Showing the variant resolved for the current URL.
    Idle,
    /// An option changed; waiting for the page at `target`.
    PendingNavigation { target: String },
}

/// A navigation request produced by [`SelectionController::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub to: String,
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

#[derive(Debug, Clone)]
pub struct SelectionController {
    location: ProductLocation,
    options: Vec<ProductOption>,
    selection: SelectedOptions,
    selected_variant: Option<ProductVariant>,
    state: SelectionState,
}

impl SelectionController {
    /// Start idle at `location`.
    ///
    /// The selection is read from the location's query. When the server
    /// resolved a variant, its options take precedence.
    #[must_use]
    pub fn new(
        location: ProductLocation,
        options: Vec<ProductOption>,
        selected_variant: Option<ProductVariant>,
    ) -> Self {
        let selection = reconcile(&location, &options, selected_variant.as_ref());
        Self {
            location,
            options,
            selection,
            selected_variant,
            state: SelectionState::Idle,
        }
    }

    /// Change `option` to `value`.
    ///
    /// Returns the navigation to perform, or `None` when the product has no
    /// such option (the state is left untouched).
    pub fn select(&mut self, option: &str, value: &str) -> Option<Navigation> {
        if !self.options.iter().any(|o| o.name == option) {
            return None;
        }

        let change = OptionChange::new(option, value);
        let target = self
            .location
            .resolve_change(&self.options, &self.selection, &change);
        self.selection.set(option, value);
        self.state = SelectionState::PendingNavigation {
            target: target.clone(),
        };

        Some(Navigation {
            to: target,
            replace: true,
        })
    }

    /// New page data arrived for the pending target.
    ///
    /// `None` means the combination does not resolve to a variant; the page
    /// shows no selection rather than falling back to another variant.
    pub fn arrive(&mut self, selected_variant: Option<ProductVariant>) {
        if let SelectionState::PendingNavigation { target } = &self.state {
            let search = target.split_once('?').map_or("", |(_, query)| query);
            let pathname = target.split_once('?').map_or(target.as_str(), |(path, _)| path);
            self.location = ProductLocation::new(self.location.handle(), pathname, search);
        }

        self.selection = reconcile(&self.location, &self.options, selected_variant.as_ref());
        self.selected_variant = selected_variant;
        self.state = SelectionState::Idle;
    }

    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectedOptions {
        &self.selection
    }

    #[must_use]
    pub const fn selected_variant(&self) -> Option<&ProductVariant> {
        self.selected_variant.as_ref()
    }

    #[must_use]
    pub const fn location(&self) -> &ProductLocation {
        &self.location
    }

    /// Add-to-cart is enabled only for an available, selected variant.
    #[must_use]
    pub fn can_add_to_cart(&self) -> bool {
        self.selected_variant
            .as_ref()
            .is_some_and(|variant| variant.available_for_sale)
    }

    /// Picker values for the current selection.
    #[must_use]
    pub fn option_values(&self, catalog: &VariantCatalog) -> Vec<VariantOption> {
        variant_options(&self.location, &self.options, &self.selection, catalog)
    }
}

fn reconcile(
    location: &ProductLocation,
    options: &[ProductOption],
    selected_variant: Option<&ProductVariant>,
) -> SelectedOptions {
    let mut selection = SelectedOptions::from_query(location.search()).retain_known(options);
    if let Some(variant) = selected_variant {
        for option in &variant.selected_options {
            selection.set(option.name.as_str(), option.value.as_str());
        }
    }
    selection.ordered_by(options)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{Money, VariantId};

    fn options() -> Vec<ProductOption> {
        vec![
            ProductOption::new("Color", ["red", "blue"]),
            ProductOption::new("Size", ["S", "M"]),
        ]
    }

    fn variant(id: u32, color: &str, size: &str, available: bool) -> ProductVariant {
        ProductVariant {
            id: VariantId::new(format!("gid://shopify/ProductVariant/{id}")),
            title: format!("{color} / {size}"),
            available_for_sale: available,
            selected_options: [("Color", color), ("Size", size)].into_iter().collect(),
            price: Money::new(Decimal::new(3000, 2), "USD"),
            compare_at_price: None,
            unit_price: None,
            image: None,
            sku: None,
        }
    }

    fn controller() -> SelectionController {
        let location = ProductLocation::new("tee", "/products/tee", "Color=red&Size=M");
        SelectionController::new(location, options(), Some(variant(2, "red", "M", true)))
    }

    #[test]
    fn test_starts_idle_with_server_variant() {
        let controller = controller();
        assert_eq!(controller.state(), &SelectionState::Idle);
        assert_eq!(controller.selection().get("Color"), Some("red"));
        assert!(controller.can_add_to_cart());
    }

    #[test]
    fn test_select_requests_navigation() {
        let mut controller = controller();
        let navigation = controller.select("Color", "blue").expect("navigation");
        assert_eq!(navigation.to, "/products/tee?Color=blue&Size=M");
        assert!(navigation.replace);
        assert_eq!(
            controller.state(),
            &SelectionState::PendingNavigation {
                target: "/products/tee?Color=blue&Size=M".to_string()
            }
        );
        assert_eq!(controller.selection().get("Color"), Some("blue"));
    }

    #[test]
    fn test_unknown_option_keeps_state() {
        let mut controller = controller();
        assert!(controller.select("Material", "wool").is_none());
        assert_eq!(controller.state(), &SelectionState::Idle);
        assert_eq!(controller.selection().get("Color"), Some("red"));
    }

    #[test]
    fn test_arrive_returns_to_idle_with_new_variant() {
        let mut controller = controller();
        controller.select("Color", "blue");
        controller.arrive(Some(variant(4, "blue", "M", false)));

        assert_eq!(controller.state(), &SelectionState::Idle);
        assert_eq!(controller.location().search(), "Color=blue&Size=M");
        assert_eq!(
            controller.selected_variant().map(|v| v.id.as_str()),
            Some("gid://shopify/ProductVariant/4")
        );
        assert!(!controller.can_add_to_cart());
    }

    #[test]
    fn test_arrive_without_variant_shows_no_selection() {
        let mut controller = controller();
        controller.select("Size", "S");
        controller.arrive(None);

        assert!(controller.selected_variant().is_none());
        assert!(!controller.can_add_to_cart());
        // the selection still reflects the URL
        assert_eq!(controller.selection().get("Size"), Some("S"));
    }

    #[test]
    fn test_option_values_follow_selection() {
        let controller = controller();
        let variants = vec![variant(1, "red", "S", true), variant(2, "red", "M", true)];
        let catalog = VariantCatalog::complete(variants).expect("catalog");
        let picker = controller.option_values(&catalog);

        let colors = picker.iter().find(|o| o.name == "Color").expect("color");
        let blue = colors.values.iter().find(|v| v.value == "blue").expect("blue");
        assert!(!blue.is_available);
        assert_eq!(blue.to, "/products/tee?Color=blue&Size=M");
    }
}
