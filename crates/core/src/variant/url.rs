//! Canonical product URLs for option selections.

use super::options::{SelectedOptions, encode_query, is_tracking_param, query_pairs};
use crate::types::ProductOption;

/// A change of one option to a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionChange {
    pub name: String,
    pub value: String,
}

impl OptionChange {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Where a product page request landed: the product handle plus the request
/// path and query it arrived with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductLocation {
    handle: String,
    pathname: String,
    search: String,
}

impl ProductLocation {
    /// `search` may be given with or without its leading `?`.
    #[must_use]
    pub fn new(handle: impl Into<String>, pathname: impl Into<String>, search: &str) -> Self {
        Self {
            handle: handle.into(),
            pathname: pathname.into(),
            search: search.strip_prefix('?').unwrap_or(search).to_string(),
        }
    }

    /// Location for a listing link, with no request path or query to carry.
    #[must_use]
    pub fn for_handle(handle: impl Into<String>) -> Self {
        Self::new(handle, "", "")
    }

    #[must_use]
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// Query string without the leading `?`.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// The URL the request arrived at, minus tracking parameters.
    #[must_use]
    pub fn current_url(&self) -> String {
        let query = encode_query(
            untracked_params(&self.search)
                .iter()
                .map(|(n, v)| (n.as_str(), v.as_str())),
        );
        with_query(&self.pathname, &query)
    }

    /// `/products/{handle}`, under the request's locale prefix if it has one.
    #[must_use]
    pub fn product_path(&self) -> String {
        match locale_prefix(&self.pathname) {
            Some(locale) => format!("/{locale}/products/{}", self.handle),
            None => format!("/products/{}", self.handle),
        }
    }

    /// URL selecting exactly `selected`.
    ///
    /// Existing non-option parameters stay where they were; tracking
    /// parameters are dropped. Each option replaces the first parameter of
    /// the same name (removing later duplicates) or is appended.
    #[must_use]
    pub fn variant_url(&self, selected: &SelectedOptions) -> String {
        let mut params = untracked_params(&self.search);

        for option in selected {
            set_param(&mut params, &option.name, &option.value);
        }

        let query = encode_query(params.iter().map(|(n, v)| (n.as_str(), v.as_str())));
        with_query(&self.product_path(), &query)
    }

    /// URL for `current` with `change` applied.
    ///
    /// Every option stays in the query, not just the changed one. If the
    /// change names an option the product does not have, the current URL is
    /// returned with only its tracking parameters removed.
    #[must_use]
    pub fn resolve_change(
        &self,
        options: &[ProductOption],
        current: &SelectedOptions,
        change: &OptionChange,
    ) -> String {
        if !options.iter().any(|option| option.name == change.name) {
            return self.current_url();
        }

        let target = current
            .retain_known(options)
            .with(&change.name, &change.value)
            .ordered_by(options);
        self.variant_url(&target)
    }
}

fn untracked_params(search: &str) -> Vec<(String, String)> {
    query_pairs(search)
        .into_iter()
        .filter(|(name, _)| !is_tracking_param(name))
        .collect()
}

/// Replace the first `name` parameter in place and drop the rest, or append.
fn set_param(params: &mut Vec<(String, String)>, name: &str, value: &str) {
    let mut seen = false;
    params.retain_mut(|(param, current)| {
        if param.as_str() != name {
            return true;
        }
        if seen {
            return false;
        }
        seen = true;
        value.clone_into(current);
        true
    });
    if !seen {
        params.push((name.to_string(), value.to_string()));
    }
}

fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

/// First path segment when it looks like `en-us`.
fn locale_prefix(pathname: &str) -> Option<&str> {
    let mut segments = pathname.strip_prefix('/')?.splitn(2, '/');
    let first = segments.next()?;
    // The locale must be followed by another segment.
    segments.next()?;

    let (language, country) = first.split_once('-')?;
    let is_pair = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_alphabetic());
    (is_pair(language) && is_pair(country)).then_some(first)
}
