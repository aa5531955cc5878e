//! Mounted route registry.
//!
//! The gate owns exactly one [`RouteRegistry`] and is its only writer. The
//! registry holds two route sets:
//!
//! - **static** routes (login, register, forbidden, ...) mounted once at
//!   construction and never removed;
//! - **dynamic** routes materialized from the current identity's
//!   [`RouteNode`] forest, replaced wholesale on every materialization and
//!   emptied on teardown.
//!
//! Route names are unique across both sets. A dynamic node whose name is
//! already taken is skipped and recorded as a [`NavError::Configuration`];
//! its children still mount, attached to the nearest mounted ancestor.

#[cfg(feature = "cache")]
use crate::cache::RouteCache;
use crate::error::NavError;
use crate::matching::{match_pattern, param_count};
use crate::menu::RouteMeta;
use crate::paths::normalize_path;
use crate::resolve::MatchStack;
use crate::screen::ViewUnit;
use crate::transform::RouteNode;
use crate::{debug_log, error_log, trace_log};
use std::sync::Arc;

/// Capability to mount, unmount and look up routes.
pub trait RouteRegistry {
    /// Replace every dynamic route with `forest`, mounted parent before child.
    ///
    /// Returns the names actually mounted. Materializing an equal forest twice
    /// leaves the same set mounted.
    fn materialize(&mut self, forest: &[RouteNode]) -> Vec<String>;

    /// Unmount every dynamic route.
    fn clear(&mut self);

    /// Dynamic route names in mount order.
    fn mounted_names(&self) -> Vec<String>;

    /// Resolve a destination to its root-to-leaf chain.
    fn resolve(&mut self, path: &str) -> Option<MatchStack>;

    /// Collisions recorded by the last materialization.
    fn conflicts(&self) -> &[NavError] {
        &[]
    }
}

/// A route as mounted in the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct MountedRoute {
    pub name: String,
    /// Absolute path pattern, `:param` segments allowed.
    pub pattern: String,
    /// Name of the mounted parent route.
    pub parent: Option<String>,
    pub redirect: Option<String>,
    pub meta: RouteMeta,
    pub view: Option<ViewUnit>,
    pub is_static: bool,
}

/// Registry backed by flat route lists.
#[derive(Debug, Clone)]
pub struct RouteTable {
    statics: Vec<Arc<MountedRoute>>,
    dynamic: Vec<Arc<MountedRoute>>,
    conflicts: Vec<NavError>,
    #[cfg(feature = "cache")]
    cache: RouteCache,
}

impl RouteTable {
    /// Table with `static_routes` permanently mounted.
    pub fn new(static_routes: &[RouteNode]) -> Self {
        let mut table = Self {
            statics: Vec::new(),
            dynamic: Vec::new(),
            conflicts: Vec::new(),
            #[cfg(feature = "cache")]
            cache: RouteCache::new(),
        };
        for route in static_routes {
            table.mount(route, None, true);
        }
        table
    }

    /// Check if a route with this name is mounted (static or dynamic).
    pub fn is_mounted(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Static route names in mount order.
    pub fn static_names(&self) -> Vec<String> {
        self.statics.iter().map(|r| r.name.clone()).collect()
    }

    /// Resolution cache statistics.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> &crate::cache::CacheStats {
        self.cache.stats()
    }

    fn find(&self, name: &str) -> Option<&Arc<MountedRoute>> {
        self.statics
            .iter()
            .chain(self.dynamic.iter())
            .find(|route| route.name == name)
    }

    fn mount(&mut self, node: &RouteNode, parent: Option<&str>, is_static: bool) {
        let mounted_as = if self.is_mounted(&node.name) {
            let err = NavError::configuration(
                node.name.clone(),
                format!("'{}' skipped, name already mounted", node.absolute_path),
            );
            error_log!("{}", err);
            self.conflicts.push(err);
            parent.map(str::to_string)
        } else {
            trace_log!("Mounting route '{}' at '{}'", node.name, node.absolute_path);
            let route = Arc::new(MountedRoute {
                name: node.name.clone(),
                pattern: normalize_path(&node.absolute_path).into_owned(),
                parent: parent.map(str::to_string),
                redirect: node.redirect.clone(),
                meta: node.meta.clone(),
                view: node.view.clone(),
                is_static,
            });
            if is_static {
                self.statics.push(route);
            } else {
                self.dynamic.push(route);
            }
            Some(node.name.clone())
        };

        for child in &node.children {
            self.mount(child, mounted_as.as_deref(), is_static);
        }
    }

    /// Root-to-leaf chain ending at `route`.
    fn chain(&self, route: &Arc<MountedRoute>) -> Vec<Arc<MountedRoute>> {
        let mut chain = vec![Arc::clone(route)];
        let mut parent = route.parent.as_deref();
        while let Some(name) = parent {
            match self.find(name) {
                Some(found) if chain.len() <= self.statics.len() + self.dynamic.len() => {
                    chain.push(Arc::clone(found));
                    parent = found.parent.as_deref();
                }
                _ => break,
            }
        }
        chain.reverse();
        chain
    }

    fn resolve_uncached(&self, path: &str) -> Option<MatchStack> {
        self.statics
            .iter()
            .chain(self.dynamic.iter())
            .filter_map(|route| {
                let params = match_pattern(&route.pattern, path)?;
                let chain = self.chain(route);
                Some((param_count(&route.pattern), chain, params))
            })
            .min_by_key(|(params, chain, _)| (*params, std::cmp::Reverse(chain.len())))
            .map(|(_, chain, params)| MatchStack::from_chain(chain, params))
    }

    fn invalidate(&mut self) {
        #[cfg(feature = "cache")]
        self.cache.clear();
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl RouteRegistry for RouteTable {
    fn materialize(&mut self, forest: &[RouteNode]) -> Vec<String> {
        self.dynamic.clear();
        self.conflicts.clear();
        for node in forest {
            self.mount(node, None, false);
        }
        self.invalidate();

        let names = self.mounted_names();
        debug_log!(
            "Materialized {} dynamic routes ({} skipped)",
            names.len(),
            self.conflicts.len()
        );
        names
    }

    fn clear(&mut self) {
        let count = self.dynamic.len();
        self.dynamic.clear();
        self.conflicts.clear();
        self.invalidate();
        debug_log!("Unmounted {} dynamic routes", count);
    }

    fn mounted_names(&self) -> Vec<String> {
        self.dynamic.iter().map(|r| r.name.clone()).collect()
    }

    fn resolve(&mut self, path: &str) -> Option<MatchStack> {
        let path = normalize_path(path).into_owned();

        #[cfg(feature = "cache")]
        {
            if let Some(cached) = self.cache.get(&path) {
                return cached;
            }
        }

        let stack = self.resolve_uncached(&path);
        trace_log!(
            "Resolved '{}' → {}",
            path,
            stack.as_ref().map_or("(no route)".to_string(), MatchStack::debug_string)
        );

        #[cfg(feature = "cache")]
        self.cache.insert(path, stack.clone());

        stack
    }

    fn conflicts(&self) -> &[NavError] {
        &self.conflicts
    }
}
