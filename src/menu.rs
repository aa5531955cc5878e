//! Server-delivered menu trees and their normalization.
//!
//! The console's backend returns the navigable destinations of the signed-in
//! user as nested JSON ([`MenuItem`]). That input is untrusted: it may repeat
//! siblings, mix absolute and relative paths, omit `children`, or (once turned
//! into shared nodes) contain a node that is its own descendant.
//!
//! The raw tree is loaded into a [`MenuGraph`], an arena addressed by
//! [`NodeId`]. Node identity is the arena index, which is what the cycle guard
//! tracks. [`normalize_menu`] then produces an owned, acyclic [`MenuTree`]
//! forest:
//!
//! 1. siblings are deduplicated on `path:name`, first occurrence wins, later
//!    duplicates are dropped without being merged or traversed;
//! 2. absent children become an empty list;
//! 3. the home path sorts first, remaining siblings sort by name (byte order);
//! 4. a node found among its own ancestors fails with
//!    [`StructuralError::Cycle`].

use crate::error::StructuralError;
use crate::paths::normalize_path;
use crate::{debug_log, trace_log};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Display and access metadata attached to a menu node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Roles allowed to open the destination; `None` means unrestricted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    /// Kept out of the sidebar, still routable.
    #[serde(default)]
    pub hidden: bool,
    /// Anything else the backend attaches, preserved untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RouteMeta {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// Redirect as sent by the backend: a bare path or `{ "path": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RedirectTarget {
    Path(String),
    Object { path: String },
}

impl RedirectTarget {
    pub fn path(&self) -> &str {
        match self {
            Self::Path(path) | Self::Object { path } => path,
        }
    }
}

/// One menu entry in the backend's wire format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Screen identifier, e.g. `Layout` or `order/list/index`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<RedirectTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<RouteMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MenuItem>>,
}

/// Envelope of the menu endpoint: `{ "menus": [...] }`.
#[derive(Debug, Clone, Default, Deserialize)]
struct MenuEnvelope {
    #[serde(default)]
    menus: Option<Vec<MenuItem>>,
}

/// Arena index of a [`MenuNode`]; the node's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A raw node stored in a [`MenuGraph`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuNode {
    pub path: String,
    pub name: String,
    pub screen_id: Option<String>,
    pub redirect: Option<String>,
    pub meta: RouteMeta,
    /// `None` when the backend omitted the list (or sent `null`).
    pub children: Option<Vec<NodeId>>,
}

impl MenuNode {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn screen(mut self, screen_id: impl Into<String>) -> Self {
        self.screen_id = Some(screen_id.into());
        self
    }

    #[must_use]
    pub fn redirect(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    #[must_use]
    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    fn from_item(item: &MenuItem) -> Self {
        Self {
            path: item.path.clone(),
            name: item.name.clone().unwrap_or_default(),
            screen_id: item.component.clone().filter(|c| !c.is_empty()),
            redirect: item.redirect.as_ref().map(|r| r.path().to_string()),
            meta: item.meta.clone().unwrap_or_default(),
            children: None,
        }
    }
}

/// Untrusted menu forest stored as an arena.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuGraph {
    nodes: Vec<MenuNode>,
    roots: Vec<NodeId>,
}

impl MenuGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from the nested wire format.
    pub fn from_items(items: &[MenuItem]) -> Self {
        let mut graph = Self::new();
        for item in items {
            let id = graph.insert_item(item);
            graph.roots.push(id);
        }
        graph
    }

    /// Parse either a bare array of menu items or the `{ "menus": [...] }`
    /// envelope.
    pub fn from_json(json: &str) -> Result<Self, StructuralError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| StructuralError::InvalidPayload {
                message: e.to_string(),
            })?;

        let items: Vec<MenuItem> = if value.is_array() {
            serde_json::from_value(value)
        } else {
            serde_json::from_value::<MenuEnvelope>(value).map(|env| env.menus.unwrap_or_default())
        }
        .map_err(|e| StructuralError::InvalidPayload {
            message: e.to_string(),
        })?;

        Ok(Self::from_items(&items))
    }

    fn insert_item(&mut self, item: &MenuItem) -> NodeId {
        let id = self.push(MenuNode::from_item(item));
        if let Some(children) = &item.children {
            let ids: Vec<NodeId> = children.iter().map(|c| self.insert_item(c)).collect();
            self.nodes[id.0].children = Some(ids);
        }
        id
    }

    fn push(&mut self, node: MenuNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Add a top-level node.
    pub fn add_root(&mut self, node: MenuNode) -> NodeId {
        let id = self.push(node);
        self.roots.push(id);
        id
    }

    /// Add `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, node: MenuNode) -> NodeId {
        let id = self.push(node);
        self.link(parent, id);
        id
    }

    /// Append an existing node to `parent`'s children. The same node may be
    /// linked under several parents, or under itself.
    pub fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.get_or_insert_with(Vec::new).push(child);
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&MenuNode> {
        self.nodes.get(id.0)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Normalized, acyclic menu node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuTree {
    pub path: String,
    pub name: String,
    pub screen_id: Option<String>,
    pub redirect: Option<String>,
    pub meta: RouteMeta,
    pub children: Vec<MenuTree>,
}

/// Normalize the whole forest of `graph`.
///
/// `home_path` is the landing destination, always ordered first among its
/// siblings.
pub fn normalize_menu(graph: &MenuGraph, home_path: &str) -> Result<Vec<MenuTree>, StructuralError> {
    let home = normalize_path(home_path);
    let mut ancestors = HashSet::new();
    let forest = normalize_siblings(graph, graph.roots(), &home, &mut ancestors)?;
    debug_log!(
        "Normalized menu: {} raw nodes → {} top-level entries",
        graph.len(),
        forest.len()
    );
    Ok(forest)
}

fn normalize_siblings(
    graph: &MenuGraph,
    ids: &[NodeId],
    home: &str,
    ancestors: &mut HashSet<NodeId>,
) -> Result<Vec<MenuTree>, StructuralError> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(ids.len());

    for &id in ids {
        let node = graph
            .node(id)
            .ok_or(StructuralError::DanglingNode { index: id.0 })?;

        let key = format!("{}:{}", node.path, node.name);
        if !seen.insert(key) {
            trace_log!("Dropping duplicate menu sibling '{}' ({})", node.name, node.path);
            continue;
        }

        if !ancestors.insert(id) {
            return Err(StructuralError::Cycle {
                path: node.path.clone(),
                name: node.name.clone(),
            });
        }
        let children = match &node.children {
            Some(children) => normalize_siblings(graph, children, home, ancestors),
            None => Ok(Vec::new()),
        };
        ancestors.remove(&id);

        kept.push(MenuTree {
            path: node.path.clone(),
            name: node.name.clone(),
            screen_id: node.screen_id.clone(),
            redirect: node.redirect.clone(),
            meta: node.meta.clone(),
            children: children?,
        });
    }

    kept.sort_by(|a, b| {
        let a_home = normalize_path(&a.path) == home;
        let b_home = normalize_path(&b.path) == home;
        b_home.cmp(&a_home).then_with(|| a.name.cmp(&b.name))
    });

    Ok(kept)
}
