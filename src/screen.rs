//! Screen binding: from declared screen identifiers to GPUI views.
//!
//! Every console screen is registered once at startup in a [`ScreenRegistry`]
//! under its logical path (`order/list`, `system/user`, ...). Menu nodes name
//! their screen by identifier and [`ScreenRegistry::bind`] turns that into a
//! [`ViewUnit`]:
//!
//! | Identifier                          | Result                 |
//! |-------------------------------------|------------------------|
//! | `Layout`, `layouts/default/index`   | the shared page frame  |
//! | a registered logical path           | that screen            |
//! | anything else                       | the not-found view     |
//! | none                                | no view (`None`)       |
//!
//! A missing screen never fails the menu: the node keeps a not-found view and
//! the rest of the tree renders.
//!
//! # Example
//!
//! ```no_run
//! use gpui::{div, IntoElement, ParentElement};
//! use gpui_console_navigator::{ScreenRegistry, ViewKind};
//!
//! let screens = ScreenRegistry::new()
//!     .screen("order/list", |_, _, _| div().child("Orders").into_any_element());
//!
//! let view = screens.bind(Some("views/order/list/index.vue")).unwrap();
//! assert_eq!(view.kind(), ViewKind::Screen);
//! assert_eq!(view.key(), "order/list");
//! ```

use crate::params::RouteParams;
use crate::paths::trim_slashes;
use crate::{trace_log, warn_log};
use gpui::{div, AnyElement, App, IntoElement, ParentElement, Window};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Renders one screen.
pub type ScreenBuilder = Arc<dyn Fn(&mut Window, &mut App, &RouteParams) -> AnyElement + Send + Sync>;

/// Identifiers that always resolve to the page frame.
pub const FRAME_IDS: [&str; 2] = ["Layout", "layouts/default/index"];

/// What kind of view a route is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Shared page frame (sidebar + outlet) wrapping child screens.
    Frame,
    /// A registered console screen.
    Screen,
    /// Fallback for identifiers missing from the build.
    NotFound,
}

/// A loadable view bound to a route.
///
/// Two units are equal when they have the same kind and key; builders are not
/// compared.
#[derive(Clone)]
pub struct ViewUnit {
    kind: ViewKind,
    key: String,
    builder: ScreenBuilder,
}

impl ViewUnit {
    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    /// Normalized screen identifier (or the unresolved one, for not-found).
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ViewKind::NotFound
    }

    /// Render the view for the given route parameters.
    pub fn render(&self, window: &mut Window, cx: &mut App, params: &RouteParams) -> AnyElement {
        (self.builder)(window, cx, params)
    }
}

impl PartialEq for ViewUnit {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.key == other.key
    }
}

impl fmt::Debug for ViewUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewUnit")
            .field("kind", &self.kind)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Table of every screen known to the build.
#[derive(Clone)]
pub struct ScreenRegistry {
    frame: ScreenBuilder,
    not_found: ScreenBuilder,
    frame_ids: Vec<String>,
    screens: HashMap<String, ScreenBuilder>,
}

impl ScreenRegistry {
    /// Registry with placeholder frame and not-found views and no screens.
    pub fn new() -> Self {
        Self {
            frame: Arc::new(blank_frame),
            not_found: Arc::new(page_not_found),
            frame_ids: FRAME_IDS.iter().map(|id| (*id).to_string()).collect(),
            screens: HashMap::new(),
        }
    }

    /// Register a screen under its logical path.
    pub fn screen<F>(mut self, id: &str, builder: F) -> Self
    where
        F: Fn(&mut Window, &mut App, &RouteParams) -> AnyElement + Send + Sync + 'static,
    {
        self.screens.insert(logical_screen_path(id), Arc::new(builder));
        self
    }

    /// Replace the page-frame view.
    pub fn frame<F>(mut self, builder: F) -> Self
    where
        F: Fn(&mut Window, &mut App, &RouteParams) -> AnyElement + Send + Sync + 'static,
    {
        self.frame = Arc::new(builder);
        self
    }

    /// Treat an extra identifier as the page frame.
    pub fn frame_id(mut self, id: impl Into<String>) -> Self {
        self.frame_ids.push(id.into());
        self
    }

    /// Replace the not-found view.
    pub fn not_found<F>(mut self, builder: F) -> Self
    where
        F: Fn(&mut Window, &mut App, &RouteParams) -> AnyElement + Send + Sync + 'static,
    {
        self.not_found = Arc::new(builder);
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.screens.contains_key(&logical_screen_path(id))
    }

    /// Bind a declared screen identifier.
    pub fn bind(&self, screen_id: Option<&str>) -> Option<ViewUnit> {
        let id = screen_id.filter(|id| !id.trim().is_empty())?;

        if self.frame_ids.iter().any(|frame| frame == id) {
            return Some(ViewUnit {
                kind: ViewKind::Frame,
                key: id.to_string(),
                builder: Arc::clone(&self.frame),
            });
        }

        let key = logical_screen_path(id);
        if let Some(builder) = self.screens.get(&key) {
            trace_log!("Bound screen '{}' → '{}'", id, key);
            return Some(ViewUnit {
                kind: ViewKind::Screen,
                key,
                builder: Arc::clone(builder),
            });
        }

        warn_log!("Screen '{}' is not registered, binding not-found view", id);
        Some(ViewUnit {
            kind: ViewKind::NotFound,
            key: id.to_string(),
            builder: Arc::clone(&self.not_found),
        })
    }
}

impl Default for ScreenRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScreenRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&String> = self.screens.keys().collect();
        ids.sort();
        f.debug_struct("ScreenRegistry")
            .field("frame_ids", &self.frame_ids)
            .field("screens", &ids)
            .finish_non_exhaustive()
    }
}

fn blank_frame(_: &mut Window, _: &mut App, _: &RouteParams) -> AnyElement {
    div().into_any_element()
}

fn page_not_found(_: &mut Window, _: &mut App, _: &RouteParams) -> AnyElement {
    div().child("Page not found").into_any_element()
}

/// Reduce a declared identifier to its logical screen path.
///
/// `views/order/list/index.vue`, `/order/list/` and `order/list/index` all
/// become `order/list`.
pub fn logical_screen_path(id: &str) -> String {
    let mut path = trim_slashes(id.trim());
    path = path.strip_prefix("views/").unwrap_or(path);
    path = path.strip_suffix(".vue").unwrap_or(path);
    if path != "index" {
        path = path.strip_suffix("/index").unwrap_or(path);
    }
    path.to_string()
}
