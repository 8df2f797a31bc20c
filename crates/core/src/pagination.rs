//! Cursor pagination over GraphQL connections.
//!
//! Pages are addressed with `?cursor=<opaque>&direction=next|previous`. The
//! cursor is passed back to the API untouched.

use serde::{Deserialize, Serialize};

use crate::variant::options::{encode_query, query_pairs};

/// Query parameter carrying the cursor.
pub const CURSOR_PARAM: &str = "cursor";
/// Query parameter carrying the direction.
pub const DIRECTION_PARAM: &str = "direction";

/// Which way to page from the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Next,
    Previous,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "previous",
        }
    }
}

/// Connection arguments for one page.
///
/// Exactly one of `first` / `last` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationVariables {
    pub first: Option<i64>,
    pub last: Option<i64>,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

impl PaginationVariables {
    /// First page of `page_by` items.
    #[must_use]
    pub const fn first_page(page_by: i64) -> Self {
        Self {
            first: Some(page_by),
            last: None,
            start_cursor: None,
            end_cursor: None,
        }
    }

    /// Read `cursor` and `direction` from a request query string.
    ///
    /// Any direction other than `previous` pages forward.
    #[must_use]
    pub fn from_query(query: &str, page_by: i64) -> Self {
        let pairs = query_pairs(query);
        let param = |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        };

        let cursor = param(CURSOR_PARAM).filter(|cursor| !cursor.is_empty());
        let direction = match param(DIRECTION_PARAM).as_deref() {
            Some("previous") => Direction::Previous,
            _ => Direction::Next,
        };

        match direction {
            Direction::Previous => Self {
                first: None,
                last: Some(page_by),
                start_cursor: cursor,
                end_cursor: None,
            },
            Direction::Next => Self {
                first: Some(page_by),
                last: None,
                start_cursor: None,
                end_cursor: cursor,
            },
        }
    }
}

/// Relay-style page info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// A page of nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection<T> {
    pub nodes: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    /// Links to the neighbouring pages, relative to `pathname`.
    #[must_use]
    pub fn links(&self, pathname: &str, query: &str) -> PageLinks {
        PageLinks::new(&self.page_info, pathname, query)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            page_info: PageInfo::default(),
        }
    }
}

/// Previous/next page URLs. A link is present only when the page exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl PageLinks {
    /// Build links from `page_info`, keeping every other parameter of `query`.
    #[must_use]
    pub fn new(page_info: &PageInfo, pathname: &str, query: &str) -> Self {
        let previous = page_info
            .has_previous_page
            .then_some(page_info.start_cursor.as_deref())
            .flatten()
            .map(|cursor| page_url(pathname, query, cursor, Direction::Previous));
        let next = page_info
            .has_next_page
            .then_some(page_info.end_cursor.as_deref())
            .flatten()
            .map(|cursor| page_url(pathname, query, cursor, Direction::Next));
        Self { previous, next }
    }
}

fn page_url(pathname: &str, query: &str, cursor: &str, direction: Direction) -> String {
    let mut pairs: Vec<(String, String)> = query_pairs(query)
        .into_iter()
        .filter(|(name, _)| name != CURSOR_PARAM && name != DIRECTION_PARAM)
        .collect();
    pairs.push((CURSOR_PARAM.to_string(), cursor.to_string()));
    pairs.push((DIRECTION_PARAM.to_string(), direction.as_str().to_string()));

    let encoded = encode_query(pairs.iter().map(|(n, v)| (n.as_str(), v.as_str())));
    format!("{pathname}?{encoded}")
}
