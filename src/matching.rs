//! Segment-based pattern matching for mounted routes
//!
//! Mounted routes carry absolute patterns such as `/order/detail/:id`. A
//! destination matches a pattern when both have the same number of segments,
//! literal segments are equal, and every `:name` segment captures the
//! corresponding destination segment.
//!
//! # Design
//!
//! - Split paths by '/' into segments, ignoring empty ones
//! - Match literal segments exactly (case-sensitive)
//! - Extract `:param` segments into [`RouteParams`]
//! - `/` matches only `/`
//! - No wildcards or regex

use crate::params::RouteParams;

/// Match a destination path against a route pattern, extracting parameters
///
/// Returns `None` when the path does not match.
///
/// # Examples
///
/// ```
/// use gpui_console_navigator::matching::match_pattern;
///
/// let params = match_pattern("/refund/:id/review", "/refund/7/review").unwrap();
/// assert_eq!(params.get("id"), Some(&"7".to_string()));
///
/// assert!(match_pattern("/refund/:id", "/refund/7/review").is_none());
/// assert!(match_pattern("/", "/").unwrap().is_empty());
/// ```
pub fn match_pattern(pattern: &str, path: &str) -> Option<RouteParams> {
    let pattern_segments = split_path(pattern);
    let path_segments = split_path(path);

    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = RouteParams::new();
    for (pattern_seg, path_seg) in pattern_segments.iter().zip(path_segments.iter()) {
        if let Some(name) = extract_param_name(pattern_seg) {
            params.insert(name.to_string(), (*path_seg).to_string());
        } else if pattern_seg != path_seg {
            return None;
        }
    }

    Some(params)
}

/// Number of `:param` segments in a pattern; fewer wins on ambiguity.
pub fn param_count(pattern: &str) -> usize {
    split_path(pattern)
        .into_iter()
        .filter(|segment| is_param_segment(segment))
        .count()
}

/// Split a path into segments, filtering empty segments
///
/// # Examples
///
/// ```
/// use gpui_console_navigator::matching::split_path;
///
/// assert_eq!(split_path("/users/123"), vec!["users", "123"]);
/// assert!(split_path("/").is_empty());
/// assert_eq!(split_path("/users/"), vec!["users"]);
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Extract parameter name from a route segment
pub fn extract_param_name(segment: &str) -> Option<&str> {
    segment.strip_prefix(':').filter(|name| !name.is_empty())
}

/// Check if a route segment is a parameter
pub fn is_param_segment(segment: &str) -> bool {
    extract_param_name(segment).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/order/list/"), vec!["order", "list"]);
        assert_eq!(split_path("order"), vec!["order"]);
        assert_eq!(split_path(""), Vec::<&str>::new());
    }

    #[test]
    fn test_extract_param_name() {
        assert_eq!(extract_param_name(":id"), Some("id"));
        assert_eq!(extract_param_name("orders"), None);
        assert_eq!(extract_param_name(":"), None);
    }

    #[test]
    fn test_literal_match() {
        assert!(match_pattern("/order/list", "/order/list").is_some());
        assert!(match_pattern("/order/list", "/order/List").is_none());
        assert!(match_pattern("/order/list", "/order").is_none());
    }

    #[test]
    fn test_root_matches_only_root() {
        assert!(match_pattern("/", "/").is_some());
        assert!(match_pattern("/", "/dashboard").is_none());
        assert!(match_pattern("/dashboard", "/").is_none());
    }

    #[test]
    fn test_multiple_params() {
        let params = match_pattern("/user/:uid/order/:oid", "/user/3/order/99").unwrap();
        assert_eq!(params.get_as::<u32>("uid"), Some(3));
        assert_eq!(params.get_as::<u32>("oid"), Some(99));
        assert_eq!(param_count("/user/:uid/order/:oid"), 2);
        assert_eq!(param_count("/user/list"), 0);
    }
}
