//! Selected option sets and query string parsing.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::types::ProductOption;

/// Query parameter prefixes that never carry an option selection.
///
/// Predictive search appends `_sid`, `_pos`, `_psq`, `_ss` and `_v`; ad
/// networks append `fbclid`.
pub const TRACKING_PARAM_PREFIXES: &[&str] = &["_sid", "_pos", "_psq", "_ss", "_v", "fbclid"];

/// Whether a query parameter name belongs to the tracking denylist.
#[must_use]
pub fn is_tracking_param(name: &str) -> bool {
    TRACKING_PARAM_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// Decode a query string into name/value pairs, in order.
///
/// A leading `?` is ignored.
#[must_use]
pub fn query_pairs(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect()
}

/// Encode name/value pairs as a query string (no leading `?`).
#[must_use]
pub fn encode_query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in pairs {
        serializer.append_pair(name, value);
    }
    serializer.finish()
}

/// A single option name/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Selected value (e.g., "Large", "Blue").
    pub value: String,
}

impl SelectedOption {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Mapping from option name to chosen value.
///
/// Names are unique. Insertion order is kept for URL building, but equality
/// is set equality: `{Color: red, Size: M}` equals `{Size: M, Color: red}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedOptions(Vec<SelectedOption>);

impl SelectedOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Parse option selections from a request query string.
    ///
    /// Tracking parameters are dropped. When a name repeats, the first value
    /// wins.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut selected = Self::new();
        for (name, value) in query_pairs(query) {
            if is_tracking_param(&name) || selected.contains(&name) {
                continue;
            }
            selected.0.push(SelectedOption { name, value });
        }
        selected
    }

    /// Value chosen for `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|option| option.name == name)
            .map(|option| option.value.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set `name` to `value`, replacing an existing entry in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.0.iter_mut().find(|option| option.name == name) {
            existing.value = value;
        } else {
            self.0.push(SelectedOption { name, value });
        }
    }

    /// Copy of this selection with `name` set to `value`.
    #[must_use]
    pub fn with(&self, name: &str, value: &str) -> Self {
        let mut next = self.clone();
        next.set(name, value);
        next
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedOption> {
        self.0.iter()
    }

    /// Keep only entries naming one of `options`.
    #[must_use]
    pub fn retain_known(&self, options: &[ProductOption]) -> Self {
        Self(
            self.0
                .iter()
                .filter(|selected| options.iter().any(|option| option.name == selected.name))
                .cloned()
                .collect(),
        )
    }

    /// Reorder entries to follow `options`; unknown names keep their order
    /// after the known ones.
    #[must_use]
    pub fn ordered_by(&self, options: &[ProductOption]) -> Self {
        let known = options
            .iter()
            .filter_map(|option| {
                self.0
                    .iter()
                    .find(|selected| selected.name == option.name)
                    .cloned()
            });
        let unknown = self
            .0
            .iter()
            .filter(|selected| !options.iter().any(|option| option.name == selected.name))
            .cloned();
        Self(known.chain(unknown).collect())
    }

    /// Whether there is exactly one entry per option, each naming a value
    /// the option offers.
    #[must_use]
    pub fn is_complete_for(&self, options: &[ProductOption]) -> bool {
        self.len() == options.len()
            && options.iter().all(|option| {
                self.get(&option.name)
                    .is_some_and(|value| option.values.iter().any(|v| v == value))
            })
    }

    /// Order-independent key: pairs sorted by name.
    #[must_use]
    pub fn canonical_key(&self) -> Vec<(String, String)> {
        let mut key: Vec<(String, String)> = self
            .0
            .iter()
            .map(|option| (option.name.clone(), option.value.clone()))
            .collect();
        key.sort();
        key
    }

    /// Encode as a query string in entry order (no leading `?`).
    #[must_use]
    pub fn to_query(&self) -> String {
        encode_query(
            self.0
                .iter()
                .map(|option| (option.name.as_str(), option.value.as_str())),
        )
    }
}

impl PartialEq for SelectedOptions {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .0
                .iter()
                .all(|option| other.get(&option.name) == Some(option.value.as_str()))
    }
}

impl Eq for SelectedOptions {}

impl FromIterator<SelectedOption> for SelectedOptions {
    fn from_iter<I: IntoIterator<Item = SelectedOption>>(iter: I) -> Self {
        let mut selected = Self::new();
        for option in iter {
            selected.set(option.name, option.value);
        }
        selected
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for SelectedOptions {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, value)| SelectedOption::new(name, value))
            .collect()
    }
}

impl<'a> IntoIterator for &'a SelectedOptions {
    type Item = &'a SelectedOption;
    type IntoIter = std::slice::Iter<'a, SelectedOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<ProductOption> {
        vec![
            ProductOption::new("Color", ["red", "blue"]),
            ProductOption::new("Size", ["S", "M"]),
        ]
    }

    #[test]
    fn test_tracking_prefixes() {
        for name in ["_sid", "_pos", "_psq", "_ss", "_v", "fbclid", "_ss_extra", "fbclid2"] {
            assert!(is_tracking_param(name), "{name} should be filtered");
        }
        for name in ["Color", "cursor", "v", "sid"] {
            assert!(!is_tracking_param(name), "{name} should be kept");
        }
    }

    #[test]
    fn test_from_query_filters_tracking_and_decodes() {
        let selected = SelectedOptions::from_query("?Color=Ocean+Blue&_pos=1&fbclid=abc&Size=M");
        assert_eq!(selected.len(), 2);
        assert_eq!(selected.get("Color"), Some("Ocean Blue"));
        assert_eq!(selected.get("Size"), Some("M"));
        assert!(!selected.contains("_pos"));
    }

    #[test]
    fn test_from_query_first_value_wins() {
        let selected = SelectedOptions::from_query("Size=S&Size=L");
        assert_eq!(selected.get("Size"), Some("S"));
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: SelectedOptions = [("Color", "red"), ("Size", "M")].into_iter().collect();
        let b: SelectedOptions = [("Size", "M"), ("Color", "red")].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn test_equality_requires_same_entries() {
        let full: SelectedOptions = [("Color", "red"), ("Size", "M")].into_iter().collect();
        let partial: SelectedOptions = [("Color", "red")].into_iter().collect();
        assert_ne!(full, partial);
        assert_ne!(partial, full);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut selected: SelectedOptions =
            [("Color", "red"), ("Size", "M")].into_iter().collect();
        selected.set("Color", "blue");
        assert_eq!(selected.to_query(), "Color=blue&Size=M");
    }

    #[test]
    fn test_ordered_by_follows_product_options() {
        let selected: SelectedOptions = [("Material", "wool"), ("Size", "M"), ("Color", "red")]
            .into_iter()
            .collect();
        assert_eq!(
            selected.ordered_by(&options()).to_query(),
            "Color=red&Size=M&Material=wool"
        );
    }

    #[test]
    fn test_complete_for_options() {
        let opts = options();
        let complete: SelectedOptions = [("Color", "red"), ("Size", "M")].into_iter().collect();
        let partial: SelectedOptions = [("Color", "red")].into_iter().collect();
        let bogus: SelectedOptions = [("Color", "green"), ("Size", "M")].into_iter().collect();
        assert!(complete.is_complete_for(&opts));
        assert!(!partial.is_complete_for(&opts));
        assert!(!bogus.is_complete_for(&opts));
    }

    #[test]
    fn test_retain_known_drops_unrelated_params() {
        let selected = SelectedOptions::from_query("Color=red&ref=newsletter");
        let known = selected.retain_known(&options());
        assert_eq!(known.len(), 1);
        assert_eq!(known.get("Color"), Some("red"));
    }
}
