//! Route guards for authentication, authorization, and validation.
//!
//! Guards are checked **before** the router moves. They decide whether a
//! navigation should be allowed, denied, or redirected elsewhere.
//!
//! All guard methods are **synchronous** and see only the identity snapshot
//! and the resolved destination; anything asynchronous (identity and menu
//! fetches) has already happened in the gate.
//!
//! # Built-in guards
//!
//! | Guard | Purpose |
//! |-------|---------|
//! | [`AuthGuard`] | Sends anonymous users to the auth page, keeping the destination |
//! | [`RoleGuard`] | Enforces `meta.roles` of the matched route chain |
//! | [`PermissionGuard`] | Enforces a [`Requirement`] under a path prefix |
//!
//! # Execution order
//!
//! Guards run in **priority order** (higher value first). The built-in guards
//! use: `AuthGuard` = 100, `RoleGuard` = 90, `PermissionGuard` = 80.
//! The first non-[`Continue`](NavigationAction::Continue) result
//! short-circuits evaluation.
//!
//! # Example
//!
//! ```
//! use gpui_console_navigator::guards::{Guards, PermissionGuard, RoleGuard, RouteGuard};
//! use gpui_console_navigator::permission::Requirement;
//!
//! let guards = Guards::builder()
//!     .guard(RoleGuard::new("/403"))
//!     .guard(PermissionGuard::new("/refund", Requirement::permission("refund:audit")))
//!     .build();
//! assert_eq!(guards.priority(), 90);
//! ```

use crate::config::GateConfig;
use crate::params::Location;
use crate::paths::normalize_path;
use crate::permission::{evaluate, Requirement};
use crate::resolve::MatchStack;
use crate::session::Identity;

// ============================================================================
// NavigationAction / NavigationRequest
// ============================================================================

/// Verdict of a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationAction {
    /// Allow navigation to proceed.
    Continue,

    /// Deny navigation with a reason.
    Deny {
        /// Human-readable reason for denying navigation.
        reason: String,
    },

    /// Redirect to a different location.
    Redirect {
        /// Location to redirect to (path plus optional query).
        to: String,
        /// Optional human-readable reason for redirecting.
        reason: Option<String>,
    },
}

impl NavigationAction {
    /// Create a result that allows navigation to proceed (alias for [`Continue`](Self::Continue)).
    pub fn allow() -> Self {
        Self::Continue
    }

    /// Create a result that blocks navigation with a human-readable reason.
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }

    /// Create a result that redirects navigation to a different location.
    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            reason: None,
        }
    }

    /// Create a redirect result with a human-readable reason.
    pub fn redirect_with_reason(to: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            reason: Some(reason.into()),
        }
    }

    /// Check if this action allows navigation to continue.
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Check if this action denies navigation.
    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny { .. })
    }

    /// Check if this action redirects navigation.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    /// Redirect target, if this is a redirect.
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            Self::Redirect { to, .. } => Some(to),
            _ => None,
        }
    }
}

/// A navigation about to happen, as seen by guards.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationRequest {
    /// The location we're navigating from (if any)
    pub from: Option<String>,

    /// The location we're navigating to
    pub to: Location,

    /// Resolution of `to`; `None` when no mounted route matches
    pub stack: Option<MatchStack>,
}

impl NavigationRequest {
    /// Create a new navigation request.
    pub fn new(to: impl Into<Location>) -> Self {
        Self {
            from: None,
            to: to.into(),
            stack: None,
        }
    }

    /// Set the source location.
    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Attach the resolved match stack.
    #[must_use]
    pub fn with_stack(mut self, stack: Option<MatchStack>) -> Self {
        self.stack = stack;
        self
    }

    /// Destination path (without query).
    pub fn path(&self) -> &str {
        self.to.path()
    }
}

// ============================================================================
// RouteGuard trait
// ============================================================================

/// Trait for route guards that control access to destinations.
///
/// # Example
///
/// ```
/// use gpui_console_navigator::guards::{NavigationAction, NavigationRequest, RouteGuard};
/// use gpui_console_navigator::Identity;
///
/// struct MaintenanceGuard;
///
/// impl RouteGuard for MaintenanceGuard {
///     fn check(&self, _identity: Option<&Identity>, request: &NavigationRequest) -> NavigationAction {
///         if request.path().starts_with("/refund") {
///             NavigationAction::deny("Refunds are paused")
///         } else {
///             NavigationAction::Continue
///         }
///     }
/// }
/// ```
pub trait RouteGuard: Send + Sync + 'static {
    /// Check if navigation should be allowed.
    ///
    /// Returns:
    /// - [`NavigationAction::Continue`] to allow navigation
    /// - [`NavigationAction::Deny`] to block navigation
    /// - [`NavigationAction::Redirect`] to redirect to a different location
    fn check(&self, identity: Option<&Identity>, request: &NavigationRequest) -> NavigationAction;

    /// Guard name for debugging and error messages.
    fn name(&self) -> &'static str {
        "RouteGuard"
    }

    /// Priority for execution order. Higher runs first. Default is 0.
    fn priority(&self) -> i32 {
        0
    }
}

// ============================================================================
// guard_fn helper
// ============================================================================

/// Create a guard from a function or closure.
///
/// # Example
///
/// ```
/// use gpui_console_navigator::guards::{guard_fn, NavigationAction};
///
/// let ops_only = guard_fn(|identity, _request| match identity {
///     Some(user) if user.has_role("ops") => NavigationAction::Continue,
///     _ => NavigationAction::redirect("/403"),
/// });
/// ```
pub const fn guard_fn<F>(f: F) -> FnGuard<F>
where
    F: Fn(Option<&Identity>, &NavigationRequest) -> NavigationAction + Send + Sync + 'static,
{
    FnGuard { f }
}

/// Guard created from a function or closure.
pub struct FnGuard<F> {
    f: F,
}

impl<F> RouteGuard for FnGuard<F>
where
    F: Fn(Option<&Identity>, &NavigationRequest) -> NavigationAction + Send + Sync + 'static,
{
    fn check(&self, identity: Option<&Identity>, request: &NavigationRequest) -> NavigationAction {
        (self.f)(identity, request)
    }
}

// ============================================================================
// AuthGuard
// ============================================================================

/// Sends anonymous users to the auth page unless the destination is public.
///
/// The redirect carries the destination in the return query key so it can be
/// replayed after login (`/login?redirect=%2Forders`).
#[derive(Debug, Clone)]
pub struct AuthGuard {
    config: GateConfig,
}

impl AuthGuard {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }
}

impl RouteGuard for AuthGuard {
    fn check(&self, identity: Option<&Identity>, request: &NavigationRequest) -> NavigationAction {
        if identity.is_some() || self.config.is_public(request.path()) {
            NavigationAction::Continue
        } else {
            NavigationAction::redirect_with_reason(
                self.config.login_location(&request.to).to_string(),
                "Authentication required",
            )
        }
    }

    fn name(&self) -> &'static str {
        "AuthGuard"
    }

    fn priority(&self) -> i32 {
        100
    }
}

// ============================================================================
// RoleGuard
// ============================================================================

/// Enforces the roles declared in route metadata.
///
/// The requirement comes from the matched chain: the deepest route declaring
/// `roles` wins. Routes without roles are open to every signed-in user.
#[derive(Debug, Clone)]
pub struct RoleGuard {
    redirect_path: String,
}

impl RoleGuard {
    pub fn new(redirect_path: impl Into<String>) -> Self {
        Self {
            redirect_path: redirect_path.into(),
        }
    }
}

impl RouteGuard for RoleGuard {
    fn check(&self, identity: Option<&Identity>, request: &NavigationRequest) -> NavigationAction {
        let Some(roles) = request.stack.as_ref().and_then(MatchStack::required_roles) else {
            return NavigationAction::Continue;
        };

        let allowed = identity.is_some_and(|user| roles.iter().any(|r| user.has_role(r)));
        if allowed {
            NavigationAction::Continue
        } else {
            NavigationAction::redirect_with_reason(
                &self.redirect_path,
                format!("Requires one of roles [{}]", roles.join(", ")),
            )
        }
    }

    fn name(&self) -> &'static str {
        "RoleGuard"
    }

    fn priority(&self) -> i32 {
        90
    }
}

// ============================================================================
// PermissionGuard
// ============================================================================

/// Enforces a permission requirement on every destination under a path
/// prefix.
///
/// # Example
///
/// ```
/// use gpui_console_navigator::guards::PermissionGuard;
/// use gpui_console_navigator::permission::Requirement;
///
/// let guard = PermissionGuard::new("/refund", Requirement::permission(vec!["refund:read", "refund:audit"]))
///     .with_redirect("/403");
/// ```
#[derive(Debug, Clone)]
pub struct PermissionGuard {
    prefix: String,
    requirement: Requirement,
    redirect_path: Option<String>,
}

impl PermissionGuard {
    /// Create a guard for destinations at or below `prefix`.
    pub fn new(prefix: &str, requirement: Requirement) -> Self {
        Self {
            prefix: normalize_path(prefix).into_owned(),
            requirement,
            redirect_path: None,
        }
    }

    /// Add a redirect path for when permission is denied.
    #[must_use]
    pub fn with_redirect(mut self, path: impl Into<String>) -> Self {
        self.redirect_path = Some(path.into());
        self
    }

    fn covers(&self, path: &str) -> bool {
        if self.prefix == "/" {
            return true;
        }
        path.strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

impl RouteGuard for PermissionGuard {
    fn check(&self, identity: Option<&Identity>, request: &NavigationRequest) -> NavigationAction {
        if !self.covers(request.path()) {
            return NavigationAction::Continue;
        }

        if identity.is_some_and(|user| evaluate(&self.requirement, user)) {
            NavigationAction::Continue
        } else if let Some(redirect) = &self.redirect_path {
            NavigationAction::redirect_with_reason(redirect, format!("Requires {}", self.requirement))
        } else {
            NavigationAction::deny(format!("Requires {}", self.requirement))
        }
    }

    fn name(&self) -> &'static str {
        "PermissionGuard"
    }

    fn priority(&self) -> i32 {
        80
    }
}

// ============================================================================
// Guard Composition
// ============================================================================

/// Combines multiple guards with AND logic.
///
/// All guards must return [`NavigationAction::Continue`] for navigation to proceed.
/// The first non-continue result is returned immediately (short-circuit).
///
/// Guards are executed in priority order (higher priority first); equal
/// priorities keep insertion order.
#[derive(Default)]
pub struct Guards {
    guards: Vec<Box<dyn RouteGuard>>,
}

impl Guards {
    /// Create a new AND composition from a vec of boxed guards.
    #[must_use]
    pub fn new(guards: Vec<Box<dyn RouteGuard>>) -> Self {
        let mut composed = Self::default();
        for guard in guards {
            composed.push(guard);
        }
        composed
    }

    /// Start building a guard composition.
    pub fn builder() -> GuardBuilder {
        GuardBuilder::new()
    }

    /// Add a guard, keeping priority order.
    pub fn push(&mut self, guard: Box<dyn RouteGuard>) {
        let priority = guard.priority();
        let at = self
            .guards
            .iter()
            .position(|g| g.priority() < priority)
            .unwrap_or(self.guards.len());
        self.guards.insert(at, guard);
    }

    /// Guard names in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.guards.iter().map(|g| g.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl RouteGuard for Guards {
    fn check(&self, identity: Option<&Identity>, request: &NavigationRequest) -> NavigationAction {
        for guard in &self.guards {
            let result = guard.check(identity, request);
            if !result.is_continue() {
                crate::debug_log!(
                    "Guard '{}' stopped navigation to '{}': {:?}",
                    guard.name(),
                    request.to,
                    result
                );
                return result;
            }
        }
        NavigationAction::Continue
    }

    fn name(&self) -> &'static str {
        "Guards"
    }

    fn priority(&self) -> i32 {
        self.guards.iter().map(|g| g.priority()).max().unwrap_or(0)
    }
}

/// Builder for [`Guards`] with fluent API.
#[must_use]
#[derive(Default)]
pub struct GuardBuilder {
    guards: Guards,
}

impl GuardBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a guard to the composition.
    pub fn guard<G: RouteGuard>(mut self, guard: G) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    /// Build the final [`Guards`].
    #[must_use]
    pub fn build(self) -> Guards {
        self.guards
    }
}

// ============================================================================
// Tests
// ============================================================================
