//! Route parameters, query strings and router locations.
//!
//! - [`RouteParams`]: values captured from `:param` segments of a mounted
//!   route (e.g. `/order/detail/:id`), handed to screen builders.
//! - [`QueryParams`]: the `?key=value` part of a location; the gate uses it to
//!   carry the return target through the login page (`/login?redirect=...`).
//! - [`Location`]: a path plus its query, as stored in router history.
//!
//! # Example
//!
//! ```
//! use gpui_console_navigator::{Location, RouteParams};
//!
//! let params = RouteParams::from_path("/order/detail/42", "/order/detail/:id");
//! assert_eq!(params.get_as::<u32>("id"), Some(42));
//!
//! let login = Location::new("/login").with_query("redirect", "/orders?page=2");
//! assert_eq!(login.to_string(), "/login?redirect=%2Forders%3Fpage%3D2");
//! assert_eq!(Location::parse(&login.to_string()).query().get("redirect"),
//!            Some(&"/orders?page=2".to_string()));
//! ```

use crate::paths::normalize_path;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Route parameters extracted from path segments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteParams {
    params: HashMap<String, String>,
}

impl RouteParams {
    /// Create empty route parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a parameter value by key.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)
    }

    /// Get a parameter and parse it as a specific type
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, key: String, value: String) {
        self.params.insert(key, value);
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterate over all `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.params.iter()
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Extract route parameters from a path given a pattern
    ///
    /// `:name` segments capture, literal segments must match exactly. A
    /// mismatch (or a different segment count) yields empty params; use
    /// [`match_pattern`](crate::matching::match_pattern) when the distinction
    /// between "no match" and "no params" matters.
    pub fn from_path(path: &str, pattern: &str) -> RouteParams {
        crate::matching::match_pattern(pattern, path).unwrap_or_default()
    }
}

/// Query parameters parsed from a location's query string.
///
/// Keys are kept sorted so a location always renders to the same string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    /// Create empty query parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a query string (without the leading `?`).
    pub fn from_query_string(query: &str) -> Self {
        let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params
                .entry(decode_uri_component(key))
                .or_default()
                .push(decode_uri_component(value));
        }

        Self { params }
    }

    /// Get the first value for a key.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)?.first()
    }

    /// Append a value for the given key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.entry(key.into()).or_default().push(value.into());
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Serialize back into a query string.
    pub fn to_query_string(&self) -> String {
        let pairs: Vec<String> = self
            .params
            .iter()
            .flat_map(|(key, values)| {
                values.iter().map(move |value| {
                    format!(
                        "{}={}",
                        encode_uri_component(key),
                        encode_uri_component(value)
                    )
                })
            })
            .collect();

        pairs.join("&")
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// A router location: normalized path plus query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: QueryParams,
}

impl Location {
    /// Create a location for `path` with no query.
    pub fn new(path: &str) -> Self {
        Self {
            path: normalize_path(path).into_owned(),
            query: QueryParams::new(),
        }
    }

    /// Parse `"/path?key=value"`.
    pub fn parse(raw: &str) -> Self {
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        Self {
            path: normalize_path(path).into_owned(),
            query: QueryParams::from_query_string(query),
        }
    }

    /// Add a query value.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key, value);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}?{}", self.path, self.query.to_query_string())
        }
    }
}

impl From<&str> for Location {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for Location {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

/// Percent-encode everything outside the unreserved set, byte by byte.
fn encode_uri_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(byte));
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn decode_uri_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_params_get_as() {
        let mut params = RouteParams::new();
        params.insert("id".to_string(), "123".to_string());
        params.insert("active".to_string(), "true".to_string());

        assert_eq!(params.get_as::<i32>("id"), Some(123));
        assert_eq!(params.get_as::<bool>("active"), Some(true));
        assert_eq!(params.get_as::<i32>("missing"), None);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_route_params_from_path() {
        let params = RouteParams::from_path("/refund/7/review", "/refund/:id/review");
        assert_eq!(params.get("id"), Some(&"7".to_string()));

        let params = RouteParams::from_path("/products/xyz", "/refund/:id");
        assert!(params.is_empty());
    }

    #[test]
    fn test_query_roundtrip_with_unicode() {
        let mut query = QueryParams::new();
        query.insert("redirect", "/订单?page=2");
        let encoded = query.to_query_string();
        assert!(encoded.starts_with("redirect=%2F%E8"));

        let decoded = QueryParams::from_query_string(&encoded);
        assert_eq!(decoded.get("redirect"), Some(&"/订单?page=2".to_string()));
    }

    #[test]
    fn test_query_params_multiple_values() {
        let query = QueryParams::from_query_string("tag=a&tag=b&flag");
        assert_eq!(query.get("tag"), Some(&"a".to_string()));
        assert!(query.contains("flag"));
        assert_eq!(query.get("flag"), Some(&String::new()));
    }

    #[test]
    fn test_uri_decoding() {
        assert_eq!(decode_uri_component("hello%20world"), "hello world");
        assert_eq!(decode_uri_component("hello+world"), "hello world");
        assert_eq!(decode_uri_component("100%"), "100%");
        assert_eq!(decode_uri_component("%zz"), "%zz");
    }

    #[test]
    fn test_location_parse_and_display() {
        let location = Location::parse("orders/?page=3");
        assert_eq!(location.path(), "/orders");
        assert_eq!(location.query().get("page"), Some(&"3".to_string()));
        assert_eq!(location.to_string(), "/orders?page=3");

        assert_eq!(Location::parse("").to_string(), "/");
    }
}
