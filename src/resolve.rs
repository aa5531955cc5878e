//! Route resolution via Match Stack
//!
//! # Architecture
//!
//! A destination is resolved **once** per navigation into a [`MatchStack`]:
//! the root-to-leaf chain of mounted routes that contains it, plus the
//! parameters captured by the leaf's pattern. The page frame renders entry 0,
//! each nested outlet renders the entry at its depth.
//!
//! # Example
//!
//! Given mounted routes:
//! ```text
//! /                      (Layout, frame)
//!   /dashboard           (Dashboard)
//!   /order               (Order, no view)
//!     /order/list        (OrderList)
//!     /order/detail/:id  (OrderDetail)
//! ```
//!
//! For path `/order/detail/42` the match stack is:
//! ```text
//! [0] Layout       "/"
//! [1] Order        "/order"
//! [2] OrderDetail  "/order/detail/:id"   params={id=42}
//! ```
//!
//! Access metadata is merged along the chain: a `roles` list on a deeper
//! route overrides the one inherited from its ancestors.

use crate::params::RouteParams;
use crate::registry::MountedRoute;
use std::sync::Arc;

/// A single entry in the route match stack.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchEntry {
    /// The matched route at this level
    pub route: Arc<MountedRoute>,
    /// Depth in the hierarchy (0 = root)
    pub depth: usize,
}

/// The full resolved route chain for a destination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchStack {
    entries: Vec<MatchEntry>,
    params: RouteParams,
}

impl MatchStack {
    /// Create an empty match stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a stack from a root-to-leaf chain.
    pub fn from_chain(chain: Vec<Arc<MountedRoute>>, params: RouteParams) -> Self {
        let entries = chain
            .into_iter()
            .enumerate()
            .map(|(depth, route)| MatchEntry { route, depth })
            .collect();
        Self { entries, params }
    }

    /// Get entry at a specific depth
    pub fn at_depth(&self, depth: usize) -> Option<&MatchEntry> {
        self.entries.get(depth)
    }

    /// Get the root (depth 0) entry
    pub fn root(&self) -> Option<&MatchEntry> {
        self.entries.first()
    }

    /// Get the leaf (deepest) entry
    pub fn leaf(&self) -> Option<&MatchEntry> {
        self.entries.last()
    }

    /// Total number of matched levels
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty (no routes matched)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get all entries as a slice
    pub fn entries(&self) -> &[MatchEntry] {
        &self.entries
    }

    /// Parameters captured by the leaf's pattern
    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    /// Route names from root to leaf.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.route.name.as_str()).collect()
    }

    /// Redirect declared by the leaf route, if any.
    pub fn redirect(&self) -> Option<&str> {
        self.leaf()?.route.redirect.as_deref()
    }

    /// Roles required to open the destination; the deepest declaration wins.
    pub fn required_roles(&self) -> Option<&[String]> {
        self.entries
            .iter()
            .rev()
            .find_map(|e| e.route.meta.roles.as_deref())
    }

    /// Title of the deepest route declaring one.
    pub fn title(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find_map(|e| e.route.meta.title.as_deref())
    }

    /// Pretty-print for debugging
    pub fn debug_string(&self) -> String {
        if self.entries.is_empty() {
            return "MatchStack: (empty)".to_string();
        }

        let mut lines = vec!["MatchStack:".to_string()];
        for entry in &self.entries {
            let indent = "  ".repeat(entry.depth);
            lines.push(format!(
                "{}[{}] {} \"{}\"",
                indent, entry.depth, entry.route.name, entry.route.pattern
            ));
        }
        if !self.params.is_empty() {
            let mut params: Vec<String> =
                self.params.iter().map(|(k, v)| format!("{k}={v}")).collect();
            params.sort();
            lines.push(format!("params={{{}}}", params.join(", ")));
        }
        lines.join("\n")
    }
}
