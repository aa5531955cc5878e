//! Permission-driven dynamic navigation for GPUI admin consoles.
//!
//! The console backend decides what a signed-in user may see by sending a
//! menu tree. This crate turns that tree into mounted routes and puts a
//! session-aware gate in front of every navigation:
//!
//! 1. [`menu`]: decode and normalize the server menu (cycle detection, root
//!    index route, relative paths).
//! 2. [`transform`]: resolve absolute paths and bind screen identifiers to
//!    views from the [`ScreenRegistry`].
//! 3. [`registry`]: mount the route forest parent-before-child and resolve
//!    locations to a [`MatchStack`].
//! 4. [`gate`]: the [`SessionGate`] state machine. Restores a stored token,
//!    resolves identity then menu exactly once per session, queues intents
//!    that arrive mid-resolution, and tears everything down on logout or an
//!    expired token.
//!
//! Screens check fine-grained access with [`permission::evaluate`]; routes
//! declaring `meta.roles` are enforced by [`guards::RoleGuard`].
//!
//! # Example
//!
//! ```ignore
//! use gpui_console_navigator::{GateConfig, ScreenRegistry, SessionGate};
//!
//! let screens = ScreenRegistry::new()
//!     .screen("order/index", |_, _, _| div().child("Orders").into_any_element())
//!     .screen("dashboard", |_, _, _| div().child("Home").into_any_element());
//!
//! let gate = SessionGate::new(ConsoleClient::new(base_url), screens, GateConfig::default());
//! gate.start("/orders").await;
//! ```
//!
//! # Features
//!
//! - `log` (default) / `tracing`: logging backend, see [`logging`].
//! - `cache` (default): LRU cache in front of [`RouteTable`] resolution.

pub mod api;
#[cfg(feature = "cache")]
pub mod cache;
pub mod config;
pub mod error;
pub mod gate;
pub mod guards;
pub mod logging;
pub mod matching;
pub mod menu;
pub mod params;
pub mod paths;
pub mod permission;
pub mod registry;
pub mod resolve;
pub mod screen;
pub mod session;
pub mod state;
pub mod transform;

pub use api::{ConsoleApi, Credentials, EventChannel, PushEvent};
pub use config::{GateConfig, LandingPage, StaticRoute};
pub use error::{NavError, NavigationResult, StructuralError};
pub use gate::{GatePhase, SessionGate};
pub use guards::{NavigationAction, NavigationRequest, RouteGuard};
pub use menu::{MenuGraph, MenuItem, MenuNode, MenuTree, NodeId, RouteMeta};
pub use params::{Location, QueryParams, RouteParams};
pub use paths::normalize_path;
pub use permission::{Matcher, Requirement};
pub use registry::{MountedRoute, RouteRegistry, RouteTable};
pub use resolve::MatchStack;
pub use screen::{ScreenRegistry, ViewKind, ViewUnit};
pub use session::{FileTokenStore, Identity, MemoryTokenStore, Session, TokenStore};
pub use state::RouterState;
pub use transform::{MenuEntry, RouteNode};
