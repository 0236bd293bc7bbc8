//! Resource URIs and routing
//!
//! Format: `content://<authority>/<path>`
//!
//! Examples:
//! - `content://com.example.stockroom/items` - the whole collection
//! - `content://com.example.stockroom/items/42` - the item with `_id = 42`

use crate::contract;
use crate::{Error, Result};

/// Routing granularity of a matched URI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// All rows of the items table
    Collection,
    /// One row, addressed by primary key
    Item(i64),
}

impl Route {
    /// Parse a URI against the inventory routing table
    pub fn parse(uri: &str) -> Result<Self> {
        UriMatcher::inventory()
            .match_uri(uri)
            .ok_or_else(|| Error::UnsupportedResource(uri.to_string()))
    }

    /// MIME type tag for this granularity
    pub fn mime_type(&self) -> &'static str {
        match self {
            Route::Collection => contract::CONTENT_LIST_TYPE,
            Route::Item(_) => contract::CONTENT_ITEM_TYPE,
        }
    }

    /// Canonical inventory URI for this route
    pub fn to_uri_string(&self) -> String {
        match self {
            Route::Collection => contract::CONTENT_URI.to_string(),
            Route::Item(id) => with_appended_id(contract::CONTENT_URI, *id),
        }
    }
}

/// What a route pattern resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Collection,
    Item,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `#` in a pattern: a non-negative decimal id
    Number,
}

/// Routing table from URI path patterns to [`Route`]s.
///
/// Patterns are `/`-separated; a `#` segment matches a numeric id.
#[derive(Debug, Clone)]
pub struct UriMatcher {
    authority: String,
    routes: Vec<(Vec<Segment>, RouteKind)>,
}

impl UriMatcher {
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            routes: Vec::new(),
        }
    }

    /// The two inventory routes: `items` and `items/#`
    pub fn inventory() -> Self {
        Self::new(contract::CONTENT_AUTHORITY)
            .with_route(contract::PATH_ITEMS, RouteKind::Collection)
            .with_route(&format!("{}/#", contract::PATH_ITEMS), RouteKind::Item)
    }

    /// Add a path pattern
    pub fn with_route(mut self, pattern: &str, kind: RouteKind) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                "#" => Segment::Number,
                literal => Segment::Literal(literal.to_string()),
            })
            .collect();
        self.routes.push((segments, kind));
        self
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Match a URI, returning `None` when no route applies
    pub fn match_uri(&self, uri: &str) -> Option<Route> {
        let rest = uri.strip_prefix("content://")?;
        // Query and fragment never take part in routing
        let rest = rest.split(['?', '#']).next().unwrap_or("");
        let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));
        if authority != self.authority {
            return None;
        }

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        self.routes.iter().find_map(|(pattern, kind)| {
            if pattern.len() != segments.len() {
                return None;
            }
            let mut id = None;
            for (expected, actual) in pattern.iter().zip(&segments) {
                match expected {
                    Segment::Literal(lit) if lit == actual => {}
                    Segment::Number => id = Some(parse_number(actual)?),
                    _ => return None,
                }
            }
            match kind {
                RouteKind::Collection => Some(Route::Collection),
                RouteKind::Item => id.map(Route::Item),
            }
        })
    }

    /// Match a URI, failing with `UnsupportedResource`
    pub fn route(&self, uri: &str) -> Result<Route> {
        self.match_uri(uri)
            .ok_or_else(|| Error::UnsupportedResource(uri.to_string()))
    }
}

fn parse_number(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Append an id segment to a URI
pub fn with_appended_id(uri: &str, id: i64) -> String {
    format!("{}/{}", uri.trim_end_matches('/'), id)
}

/// Read the trailing numeric segment of a URI, if any
pub fn parse_id(uri: &str) -> Option<i64> {
    uri.rsplit('/').next().and_then(parse_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_route() {
        let matcher = UriMatcher::inventory();
        assert_eq!(matcher.match_uri(contract::CONTENT_URI), Some(Route::Collection));
        assert_eq!(
            matcher.match_uri("content://com.example.stockroom/items/"),
            Some(Route::Collection)
        );
    }

    #[test]
    fn test_item_route() {
        let matcher = UriMatcher::inventory();
        assert_eq!(
            matcher.match_uri("content://com.example.stockroom/items/42"),
            Some(Route::Item(42))
        );
        assert_eq!(
            matcher.match_uri("content://com.example.stockroom/items/7?foo=bar"),
            Some(Route::Item(7))
        );
    }

    #[test]
    fn test_unmatched_uris() {
        let matcher = UriMatcher::inventory();
        assert!(matcher.match_uri("invalid").is_none());
        assert!(matcher.match_uri("content://other.authority/items").is_none());
        assert!(matcher.match_uri("content://com.example.stockroom").is_none());
        assert!(matcher.match_uri("content://com.example.stockroom/items/abc").is_none());
        assert!(matcher.match_uri("content://com.example.stockroom/items/-1").is_none());
        assert!(matcher.match_uri("content://com.example.stockroom/items/1/2").is_none());
        assert!(matcher.match_uri("content://com.example.stockroom/suppliers").is_none());
        assert!(matcher
            .match_uri("content://com.example.stockroom/items/99999999999999999999")
            .is_none());
    }

    #[test]
    fn test_route_error() {
        let err = Route::parse("content://com.example.stockroom/nope").unwrap_err();
        assert!(matches!(err, Error::UnsupportedResource(_)));
    }

    #[test]
    fn test_uri_roundtrip() {
        let uri = Route::Item(5).to_uri_string();
        assert_eq!(uri, "content://com.example.stockroom/items/5");
        assert_eq!(Route::parse(&uri).unwrap(), Route::Item(5));
        assert_eq!(parse_id(&uri), Some(5));
        assert_eq!(parse_id(contract::CONTENT_URI), None);
    }

    #[test]
    fn test_custom_routing_table() {
        let matcher = UriMatcher::new("shop").with_route("stock/#", RouteKind::Item);
        assert_eq!(matcher.match_uri("content://shop/stock/3"), Some(Route::Item(3)));
        assert!(matcher.match_uri("content://shop/stock").is_none());
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(Route::Collection.mime_type(), contract::CONTENT_LIST_TYPE);
        assert_eq!(Route::Item(1).mime_type(), contract::CONTENT_ITEM_TYPE);
    }
}
