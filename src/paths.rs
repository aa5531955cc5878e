//! Path normalization and hierarchy resolution.
//!
//! Menu trees arrive with mixed conventions: some nodes declare absolute paths
//! (`/dashboard`), others relative ones (`list`). Resolution rewrites every node
//! so that a child's path is always its parent's path plus a suffix, with the
//! anchor `/` as the only path never prefixed:
//!
//! ```text
//! /              → /
//!   list         → /list
//!     detail     → /list/detail
//!   /orders      → /orders        (leading slash stripped, then re-anchored)
//! ```
//!
//! All functions are pure and allocate new values.

use crate::menu::MenuTree;
use crate::trace_log;
use std::borrow::Cow;

/// The root of the navigation hierarchy.
pub const ANCHOR: &str = "/";

/// Strip leading and trailing slashes from a path.
#[inline]
pub(crate) fn trim_slashes(path: &str) -> &str {
    path.trim_start_matches('/').trim_end_matches('/')
}

/// Normalize a path for consistent comparison
///
/// Ensures a single leading slash and no trailing slash (unless root).
/// Returns `Cow<str>` to avoid allocation when the path is already normalized.
///
/// # Examples
///
/// ```
/// use gpui_console_navigator::normalize_path;
///
/// assert_eq!(normalize_path("/dashboard"), "/dashboard");
/// assert_eq!(normalize_path("dashboard"), "/dashboard");
/// assert_eq!(normalize_path("/dashboard/"), "/dashboard");
/// assert_eq!(normalize_path("//"), "/");
/// assert_eq!(normalize_path(""), "/");
/// ```
#[must_use]
pub fn normalize_path(path: &'_ str) -> Cow<'_, str> {
    if path.is_empty() {
        return Cow::Borrowed(ANCHOR);
    }

    if path == ANCHOR {
        return Cow::Borrowed(path);
    }

    let has_leading = path.starts_with('/') && !path.starts_with("//");
    let has_trailing = path.ends_with('/');

    if has_leading && !has_trailing {
        return Cow::Borrowed(path);
    }

    let trimmed = trim_slashes(path);
    if trimmed.is_empty() {
        Cow::Borrowed(ANCHOR)
    } else {
        Cow::Owned(format!("/{trimmed}"))
    }
}

/// Resolve a declared path against its parent's absolute path.
///
/// `parent` is `None` for top-level nodes. The anchor resolves to itself
/// wherever it appears; an empty suffix resolves to the parent (index route).
///
/// # Examples
///
/// ```
/// use gpui_console_navigator::paths::resolve_path;
///
/// assert_eq!(resolve_path("/", Some("/system")), "/");
/// assert_eq!(resolve_path("user", Some("/system")), "/system/user");
/// assert_eq!(resolve_path("/dashboard", Some("/")), "/dashboard");
/// assert_eq!(resolve_path("orders", None), "/orders");
/// ```
#[must_use]
pub fn resolve_path(declared: &str, parent: Option<&str>) -> String {
    if declared == ANCHOR {
        return ANCHOR.to_string();
    }

    let suffix = trim_slashes(declared);
    match parent {
        None | Some(ANCHOR) if suffix.is_empty() => ANCHOR.to_string(),
        None | Some(ANCHOR) => format!("/{suffix}"),
        Some(parent) if suffix.is_empty() => parent.to_string(),
        Some(parent) => format!("{}/{}", parent.trim_end_matches('/'), suffix),
    }
}

/// Rewrite every path in `node`'s subtree to its absolute form.
///
/// Redirect targets are normalized verbatim, never re-derived from the
/// hierarchy.
#[must_use]
pub fn resolve_tree(node: &MenuTree, parent: Option<&str>) -> MenuTree {
    let absolute = resolve_path(&node.path, parent);
    trace_log!("Resolved menu path '{}' → '{}'", node.path, absolute);

    let children = node
        .children
        .iter()
        .map(|child| resolve_tree(child, Some(&absolute)))
        .collect();

    MenuTree {
        path: absolute,
        name: node.name.clone(),
        screen_id: node.screen_id.clone(),
        redirect: node
            .redirect
            .as_deref()
            .map(|target| normalize_path(target).into_owned()),
        meta: node.meta.clone(),
        children,
    }
}
