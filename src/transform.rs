//! Route tree transformation.
//!
//! Turns a server menu into the [`RouteNode`] forest the registry mounts:
//!
//! ```text
//! MenuGraph ─normalize_menu─▶ MenuTree forest ─pick root─▶ resolve_tree ─bind─▶ RouteNode
//! ```
//!
//! Also derives the static (always mounted) routes, the landing-page fallback
//! used when the menu is malformed, and the sidebar menu.

use crate::config::GateConfig;
use crate::error::StructuralError;
use crate::menu::{normalize_menu, MenuGraph, MenuTree, RouteMeta};
use crate::paths::{normalize_path, resolve_tree, ANCHOR};
use crate::screen::{ScreenRegistry, ViewUnit};
use crate::session::Identity;
use crate::{debug_log, warn_log};
use serde::Serialize;

/// A routable destination derived from the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteNode {
    pub absolute_path: String,
    pub name: String,
    pub view: Option<ViewUnit>,
    pub redirect: Option<String>,
    pub meta: RouteMeta,
    pub children: Vec<RouteNode>,
}

impl RouteNode {
    pub fn new(absolute_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            absolute_path: absolute_path.into(),
            name: name.into(),
            view: None,
            redirect: None,
            meta: RouteMeta::default(),
            children: Vec::new(),
        }
    }

    /// Title shown in the sidebar and page title.
    pub fn title(&self) -> &str {
        self.meta.title.as_deref().unwrap_or(&self.name)
    }

    /// Number of nodes in this subtree.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(RouteNode::len).sum::<usize>()
    }
}

/// Bind every node of an already path-resolved forest to its view.
pub fn transform_forest(forest: &[MenuTree], screens: &ScreenRegistry) -> Vec<RouteNode> {
    forest.iter().map(|node| transform_node(node, screens)).collect()
}

fn transform_node(node: &MenuTree, screens: &ScreenRegistry) -> RouteNode {
    let name = if node.name.is_empty() {
        node.path.clone()
    } else {
        node.name.clone()
    };

    RouteNode {
        absolute_path: node.path.clone(),
        name,
        view: screens.bind(node.screen_id.as_deref()),
        redirect: node.redirect.clone(),
        meta: node.meta.clone(),
        children: transform_forest(&node.children, screens),
    }
}

/// Full pipeline from a raw menu to a route forest.
///
/// An empty menu yields an empty forest. A non-empty menu must have exactly
/// one top-level anchor (`/`) node; other top-level nodes are dropped.
pub fn build_route_forest(
    graph: &MenuGraph,
    screens: &ScreenRegistry,
    config: &GateConfig,
) -> Result<Vec<RouteNode>, StructuralError> {
    let normalized = normalize_menu(graph, &config.home_path)?;
    if normalized.is_empty() {
        debug_log!("Menu is empty, no dynamic routes");
        return Ok(Vec::new());
    }

    let (roots, others): (Vec<&MenuTree>, Vec<&MenuTree>) = normalized
        .iter()
        .partition(|node| node.path == ANCHOR);

    let root = match roots.as_slice() {
        [root] => *root,
        [] => return Err(StructuralError::MissingRoot),
        many => return Err(StructuralError::MultipleRoots { count: many.len() }),
    };

    for dropped in others {
        warn_log!(
            "Dropping top-level menu entry '{}' ({}) outside the root",
            dropped.name,
            dropped.path
        );
    }

    let resolved = resolve_tree(root, None);
    let forest = transform_forest(std::slice::from_ref(&resolved), screens);
    debug_log!(
        "Built route forest with {} nodes",
        forest.iter().map(RouteNode::len).sum::<usize>()
    );
    Ok(forest)
}

/// Forest used when the menu is malformed: the page frame wrapping the
/// landing page only.
pub fn fallback_forest(config: &GateConfig, screens: &ScreenRegistry) -> Vec<RouteNode> {
    let home = normalize_path(&config.home_path).into_owned();
    let landing = RouteNode {
        absolute_path: home.clone(),
        name: config.landing.name.clone(),
        view: screens.bind(Some(&config.landing.screen)),
        redirect: None,
        meta: RouteMeta {
            title: config.landing.title.clone(),
            ..RouteMeta::default()
        },
        children: Vec::new(),
    };

    if home == ANCHOR {
        return vec![landing];
    }

    vec![RouteNode {
        absolute_path: ANCHOR.to_string(),
        name: "Layout".to_string(),
        view: screens.bind(Some("Layout")),
        redirect: Some(home),
        meta: RouteMeta::default(),
        children: vec![landing],
    }]
}

/// Routes mounted for every session (login, register, ...).
pub fn static_routes(config: &GateConfig, screens: &ScreenRegistry) -> Vec<RouteNode> {
    config
        .static_routes
        .iter()
        .map(|route| RouteNode {
            absolute_path: normalize_path(&route.path).into_owned(),
            name: route.name.clone(),
            view: screens.bind(Some(&route.screen)),
            redirect: None,
            meta: RouteMeta {
                title: route.title.clone(),
                hidden: true,
                ..RouteMeta::default()
            },
            children: Vec::new(),
        })
        .collect()
}

/// One sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuEntry>,
}

/// Sidebar menu: the children of the root, without hidden entries and
/// entries whose roles exclude `identity`.
pub fn sidebar_entries(forest: &[RouteNode], identity: Option<&Identity>) -> Vec<MenuEntry> {
    let top: &[RouteNode] = match forest.iter().find(|node| node.absolute_path == ANCHOR) {
        Some(root) => &root.children,
        None => forest,
    };
    entries(top, identity)
}

fn entries(nodes: &[RouteNode], identity: Option<&Identity>) -> Vec<MenuEntry> {
    nodes
        .iter()
        .filter(|node| !node.meta.hidden && visible_to(&node.meta, identity))
        .map(|node| MenuEntry {
            title: node.title().to_string(),
            icon: node.meta.icon.clone(),
            path: node.absolute_path.clone(),
            children: entries(&node.children, identity),
        })
        .collect()
}

fn visible_to(meta: &RouteMeta, identity: Option<&Identity>) -> bool {
    match &meta.roles {
        None => true,
        Some(roles) => identity.is_some_and(|id| roles.iter().any(|r| id.has_role(r))),
    }
}
