//! Session-navigation gate.
//!
//! Every navigation intent of the console goes through [`SessionGate`]. The
//! gate owns the session, the router history and the route registry, and
//! decides per intent whether to proceed, resolve identity and menu first,
//! or send the user to the auth page.
//!
//! # Phases
//!
//! ```text
//!              start(token) / login
//! Anonymous ──────────────────────────▶ ResolvingIdentity ──▶ ResolvingRoutes ──▶ Ready
//!     ▲                                        │                     │              │
//!     │ logout                    Unauthorized │        Unauthorized │ logout/expire│
//!     └──────────────── Expired ◀──────────────┴─────────────────────┴──────────────┘
//! ```
//!
//! `Expired` behaves like `Anonymous` for navigation; it only records that the
//! previous session ended involuntarily.
//!
//! # Concurrency
//!
//! The gate is single-threaded. Methods take `&self` and state lives in
//! `RefCell`s that are never borrowed across an `.await`, so intents issued
//! from several tasks on one executor interleave at the suspension points
//! (login, identity fetch, menu fetch, logout):
//!
//! - At most one resolution is in flight. Intents arriving meanwhile wait
//!   behind it and are replayed in arrival order once the gate is ready. Each
//!   waiting intent returns its own outcome: the replayed navigation, the
//!   resolution error, or [`NavigationResult::Cancelled`] when the session
//!   was torn down or replaced first.
//! - Every resolution captures a fence (session epoch + token). A teardown or
//!   new login bumps the epoch; a resolution whose fence no longer holds
//!   discards its result and returns [`NavigationResult::Cancelled`].

use crate::api::{ConsoleApi, Credentials, EventChannel, PushEvent};
use crate::config::GateConfig;
use crate::error::{NavError, NavigationResult};
use crate::guards::{AuthGuard, Guards, NavigationAction, NavigationRequest, RoleGuard, RouteGuard};
use crate::menu::MenuGraph;
use crate::params::Location;
use crate::permission::{evaluate, Requirement};
use crate::registry::{RouteRegistry, RouteTable};
use crate::resolve::MatchStack;
use crate::screen::ScreenRegistry;
use crate::session::{Identity, MemoryTokenStore, Session, TokenStore};
use crate::state::RouterState;
use crate::transform::{
    build_route_forest, fallback_forest, sidebar_entries, static_routes, MenuEntry, RouteNode,
};
use crate::{debug_log, error_log, info_log, warn_log};
use std::cell::{Ref, RefCell};
use std::collections::VecDeque;
use tokio::sync::oneshot;

/// Maximum redirect depth to prevent infinite redirect loops
pub const MAX_REDIRECT_DEPTH: usize = 5;

/// Lifecycle phase of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    /// No session.
    Anonymous,
    /// Token known, identity being fetched.
    ResolvingIdentity,
    /// Identity known, menu being fetched and mounted.
    ResolvingRoutes,
    /// Routes mounted; intents are resolved and guarded synchronously.
    Ready,
    /// Session torn down after the token was rejected.
    Expired,
}

impl GatePhase {
    pub fn is_resolving(self) -> bool {
        matches!(self, Self::ResolvingIdentity | Self::ResolvingRoutes)
    }

    pub fn is_signed_out(self) -> bool {
        matches!(self, Self::Anonymous | Self::Expired)
    }
}

/// Session snapshot a resolution was started for.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fence {
    epoch: u64,
    token: String,
}

enum Resolution {
    Ready,
    Cancelled,
    /// Token rejected; the session is already torn down.
    Expired(NavError),
    /// Transient failure; phase kept for a retry.
    Failed(NavError),
}

/// Intent waiting behind the in-flight resolution.
struct QueuedIntent {
    location: Location,
    reply: oneshot::Sender<NavigationResult>,
}

struct GateState {
    phase: GatePhase,
    session: Session,
    epoch: u64,
    in_flight: bool,
    pending: VecDeque<QueuedIntent>,
    return_to: Option<Location>,
    forest: Vec<RouteNode>,
    diagnostics: Vec<NavError>,
    channel_connected: bool,
}

impl GateState {
    fn new() -> Self {
        Self {
            phase: GatePhase::Anonymous,
            session: Session::default(),
            epoch: 0,
            in_flight: false,
            pending: VecDeque::new(),
            return_to: None,
            forest: Vec::new(),
            diagnostics: Vec::new(),
            channel_connected: false,
        }
    }

    fn set_phase(&mut self, phase: GatePhase) {
        if self.phase != phase {
            info_log!("Gate phase {:?} → {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn fence(&self) -> Fence {
        Fence {
            epoch: self.epoch,
            token: self.session.token.clone(),
        }
    }

    fn holds(&self, fence: &Fence) -> bool {
        self.epoch == fence.epoch && self.session.token == fence.token
    }
}

/// The session-aware navigation gate.
///
/// # Example
///
/// ```ignore
/// let gate = SessionGate::new(api, screens, GateConfig::default())
///     .with_store(FileTokenStore::new(data_dir.join("session.json")));
///
/// gate.start("/orders").await;           // restores a stored session, if any
/// if gate.phase().is_signed_out() {
///     gate.login(&Credentials::new("ops", password)).await?;
/// }
/// assert_eq!(gate.current_path(), "/orders");
/// ```
pub struct SessionGate<A, R = RouteTable> {
    api: A,
    config: GateConfig,
    screens: ScreenRegistry,
    auth: AuthGuard,
    guards: Guards,
    store: Box<dyn TokenStore>,
    state: RefCell<GateState>,
    registry: RefCell<R>,
    router: RefCell<RouterState>,
    channel: RefCell<Option<Box<dyn EventChannel>>>,
}

impl<A: ConsoleApi> SessionGate<A, RouteTable> {
    /// Gate with the built-in route table holding the configured static routes.
    pub fn new(api: A, screens: ScreenRegistry, config: GateConfig) -> Self {
        let table = RouteTable::new(&static_routes(&config, &screens));
        Self::with_registry(api, screens, config, table)
    }
}

impl<A: ConsoleApi, R: RouteRegistry> SessionGate<A, R> {
    /// Gate mounting routes through a caller-supplied registry.
    pub fn with_registry(api: A, screens: ScreenRegistry, config: GateConfig, registry: R) -> Self {
        let guards = Guards::builder()
            .guard(RoleGuard::new(config.forbidden_path.clone()))
            .build();
        Self {
            api,
            auth: AuthGuard::new(config.clone()),
            config,
            screens,
            guards,
            store: Box::new(MemoryTokenStore::new()),
            state: RefCell::new(GateState::new()),
            registry: RefCell::new(registry),
            router: RefCell::new(RouterState::new()),
            channel: RefCell::new(None),
        }
    }

    /// Persist the session token in `store`.
    #[must_use]
    pub fn with_store(mut self, store: impl TokenStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    /// Connect `channel` whenever the gate becomes ready.
    #[must_use]
    pub fn with_channel(self, channel: impl EventChannel + 'static) -> Self {
        *self.channel.borrow_mut() = Some(Box::new(channel));
        self
    }

    /// Add a guard checked on every navigation once ready.
    #[must_use]
    pub fn guard(mut self, guard: impl RouteGuard) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    // ------------------------------------------------------------------------
    // Intents
    // ------------------------------------------------------------------------

    /// Restore a persisted session (if any) and navigate to `initial`.
    pub async fn start(&self, initial: impl Into<Location>) -> NavigationResult {
        match self.store.load(&self.config.token_key) {
            Ok(Some(token)) if !token.is_empty() => {
                info_log!("Restoring persisted session");
                let mut state = self.state.borrow_mut();
                state.epoch += 1;
                state.session = Session::new(token);
                state.set_phase(GatePhase::ResolvingIdentity);
            }
            Ok(_) => {
                debug_log!("No persisted session");
            }
            Err(err) => {
                warn_log!("Could not read persisted session: {}", err);
            }
        }
        self.navigate(initial).await
    }

    /// Navigate to a location.
    ///
    /// While a resolution is in flight the intent waits for it, then returns
    /// the outcome of its own replay.
    pub async fn navigate(&self, target: impl Into<Location>) -> NavigationResult {
        let location = target.into();

        let admitted = {
            let mut state = self.state.borrow_mut();
            if state.in_flight {
                debug_log!("Resolution in flight, queueing '{}'", location);
                let (reply, receiver) = oneshot::channel();
                state.pending.push_back(QueuedIntent {
                    location: location.clone(),
                    reply,
                });
                Err(receiver)
            } else {
                Ok(state.phase)
            }
        };
        let phase = match admitted {
            Ok(phase) => phase,
            Err(receiver) => {
                return receiver.await.unwrap_or_else(|_| cancelled(&location));
            }
        };

        match phase {
            GatePhase::Anonymous | GatePhase::Expired => self.navigate_signed_out(&location),
            GatePhase::Ready => self.navigate_ready(&location, 0),
            GatePhase::ResolvingIdentity | GatePhase::ResolvingRoutes => {
                match self.resolve().await {
                    Resolution::Ready => {
                        let result = self.navigate_ready(&location, 0);
                        self.drain_pending();
                        result
                    }
                    Resolution::Cancelled => {
                        debug_log!("Session changed while resolving '{}'", location);
                        cancelled(&location)
                    }
                    Resolution::Expired(err) => {
                        self.redirect_to_login(&location, Some(err.to_string()))
                    }
                    Resolution::Failed(err) => NavigationResult::Error(err),
                }
            }
        }
    }

    /// Sign in, then replay the destination that sent the user to the auth
    /// page (or `/`).
    ///
    /// Rejected credentials leave the gate untouched.
    pub async fn login(
        &self,
        credentials: &Credentials,
    ) -> Result<NavigationResult, NavError> {
        let session = self.api.login(credentials).await?;
        info_log!("Signed in as '{}'", credentials.account);

        self.registry.borrow_mut().clear();
        let target = {
            let mut state = self.state.borrow_mut();
            state.epoch += 1;
            state.session = Session::new(session.token.clone());
            state.in_flight = false;
            state.forest.clear();
            state.set_phase(GatePhase::ResolvingIdentity);
            state.return_to.take()
        };
        self.settle_pending(cancelled);

        if let Err(err) = self.store.save(&self.config.token_key, &session.token) {
            warn_log!("Could not persist session token: {}", err);
        }

        let target = target.unwrap_or_else(|| Location::new("/"));
        Ok(self.navigate(target).await)
    }

    /// Sign out: tear the session down locally, then tell the backend.
    pub async fn logout(&self) -> NavigationResult {
        let token = self.state.borrow().session.token.clone();
        let current = self.current_location();

        self.teardown(GatePhase::Anonymous);
        let result = self.redirect_to_login(&current, Some("Signed out".to_string()));

        if !token.is_empty() {
            if let Err(err) = self.api.logout(&token).await {
                warn_log!("Backend logout failed (session already cleared): {}", err);
            }
        }
        result
    }

    /// Tear the session down as if the token had been rejected.
    pub fn expire(&self) -> NavigationResult {
        let current = self.current_location();
        self.teardown(GatePhase::Expired);
        self.redirect_to_login(&current, Some("Session expired".to_string()))
    }

    /// Re-fetch the identity. When it changed, routes are rebuilt for the new
    /// identity. Returns whether the identity changed.
    pub async fn refresh_identity(&self) -> Result<bool, NavError> {
        let fence = {
            let mut state = self.state.borrow_mut();
            if state.phase != GatePhase::Ready || state.in_flight {
                return Ok(false);
            }
            state.in_flight = true;
            state.fence()
        };

        let fetched = self.api.fetch_identity(&fence.token).await;
        if !self.state.borrow().holds(&fence) {
            return Ok(false);
        }

        let identity = match fetched {
            Ok(identity) => identity,
            Err(err) => {
                self.state.borrow_mut().in_flight = false;
                if err.is_unauthorized() {
                    let current = self.current_location();
                    self.teardown(GatePhase::Expired);
                    self.redirect_to_login(&current, Some(err.to_string()));
                } else {
                    warn_log!("Identity refresh failed: {}", err);
                    self.settle_pending(|_| NavigationResult::Error(err.clone()));
                }
                return Err(err);
            }
        };

        let changed = {
            let mut state = self.state.borrow_mut();
            if state.session.identity.as_ref() == Some(&identity) {
                state.in_flight = false;
                false
            } else {
                info_log!("Identity changed, rebuilding routes for '{}'", identity.username);
                state.session.identity = Some(identity);
                state.forest.clear();
                state.set_phase(GatePhase::ResolvingRoutes);
                true
            }
        };
        if !changed {
            self.drain_pending();
            return Ok(false);
        }

        self.registry.borrow_mut().clear();
        match self.finish_resolution(fence).await {
            Resolution::Ready => {
                let current = self.current_location();
                let stack = self.registry.borrow_mut().resolve(current.path());
                self.router.borrow_mut().set_current_stack(stack);
                self.drain_pending();
                Ok(true)
            }
            Resolution::Cancelled => Ok(false),
            Resolution::Expired(err) => {
                let current = self.current_location();
                self.redirect_to_login(&current, Some(err.to_string()));
                Err(err)
            }
            Resolution::Failed(err) => Err(err),
        }
    }

    /// Go back one history entry.
    pub fn back(&self) -> NavigationResult {
        let event = self.router.borrow_mut().back();
        let Some(event) = event else {
            return NavigationResult::Blocked {
                reason: "No previous location".to_string(),
            };
        };

        let current = self.current_location();
        let stack = self.registry.borrow_mut().resolve(current.path());
        let found = stack.is_some();
        self.router.borrow_mut().set_current_stack(stack);

        if found {
            NavigationResult::Success { path: event.to }
        } else {
            NavigationResult::NotFound { path: event.to }
        }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn phase(&self) -> GatePhase {
        self.state.borrow().phase
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// The route registry, for inspection.
    pub fn registry(&self) -> Ref<'_, R> {
        self.registry.borrow()
    }

    pub fn current_location(&self) -> Location {
        self.router.borrow().current().clone()
    }

    pub fn current_path(&self) -> String {
        self.router.borrow().current_path().to_string()
    }

    /// Match stack of the current location.
    pub fn current_stack(&self) -> Option<MatchStack> {
        self.router.borrow().current_stack().cloned()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().session.identity.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().session.is_authenticated()
    }

    /// Dynamic route names currently mounted.
    pub fn mounted_routes(&self) -> Vec<String> {
        self.registry.borrow().mounted_names()
    }

    /// The route forest of the current identity.
    pub fn route_forest(&self) -> Vec<RouteNode> {
        self.state.borrow().forest.clone()
    }

    /// Structural and configuration problems found while building routes.
    pub fn diagnostics(&self) -> Vec<NavError> {
        self.state.borrow().diagnostics.clone()
    }

    /// Sidebar menu for the current identity.
    pub fn sidebar(&self) -> Vec<MenuEntry> {
        let state = self.state.borrow();
        sidebar_entries(&state.forest, state.session.identity.as_ref())
    }

    /// Window title for the current location.
    pub fn page_title(&self) -> String {
        let router = self.router.borrow();
        self.config
            .page_title(router.current_stack().and_then(MatchStack::title))
    }

    /// Check a requirement against the current identity. Signed-out users
    /// satisfy nothing.
    pub fn evaluate(&self, requirement: &Requirement) -> bool {
        self.state
            .borrow()
            .session
            .identity
            .as_ref()
            .is_some_and(|identity| evaluate(requirement, identity))
    }

    /// Subscribe to a push event type on the configured channel.
    pub fn on_event(&self, event_type: &str, handler: impl Fn(&PushEvent) + 'static) {
        match self.channel.borrow_mut().as_mut() {
            Some(channel) => channel.on(event_type, Box::new(handler)),
            None => {
                warn_log!("No event channel configured, dropping '{}' handler", event_type);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    async fn resolve(&self) -> Resolution {
        let fence = {
            let mut state = self.state.borrow_mut();
            state.in_flight = true;
            state.fence()
        };
        debug_log!("Resolving session (epoch {})", fence.epoch);

        if self.phase() == GatePhase::ResolvingIdentity {
            let fetched = self.api.fetch_identity(&fence.token).await;
            if !self.state.borrow().holds(&fence) {
                return Resolution::Cancelled;
            }
            match fetched {
                Ok(identity) => {
                    info_log!("Identity resolved: '{}' ({})", identity.username, identity.role);
                    let mut state = self.state.borrow_mut();
                    state.session.identity = Some(identity);
                    state.set_phase(GatePhase::ResolvingRoutes);
                }
                Err(err) => return self.resolution_failed(&fence, err),
            }
        }

        self.finish_resolution(fence).await
    }

    /// Fetch, build and mount the menu, then mark the gate ready.
    async fn finish_resolution(&self, fence: Fence) -> Resolution {
        let fetched = self.api.fetch_menu_tree(&fence.token).await;
        if !self.state.borrow().holds(&fence) {
            return Resolution::Cancelled;
        }

        let forest = match fetched {
            Ok(graph) => self.build_forest(&graph),
            Err(NavError::Structural(err)) => self.fallback(NavError::Structural(err)),
            Err(err) => return self.resolution_failed(&fence, err),
        };
        self.install(forest);

        {
            let mut state = self.state.borrow_mut();
            state.in_flight = false;
            state.set_phase(GatePhase::Ready);
        }
        self.connect_channel(&fence.token);
        Resolution::Ready
    }

    fn resolution_failed(&self, fence: &Fence, err: NavError) -> Resolution {
        if err.is_unauthorized() {
            warn_log!("Token rejected while resolving: {}", err);
            self.teardown(GatePhase::Expired);
            return Resolution::Expired(err);
        }

        let holds = {
            let mut state = self.state.borrow_mut();
            let holds = state.holds(fence);
            if holds {
                state.in_flight = false;
                warn_log!(
                    "Resolution failed in {:?}, failing {} queued intents: {}",
                    state.phase,
                    state.pending.len(),
                    err
                );
            }
            holds
        };
        if holds {
            self.settle_pending(|_| NavigationResult::Error(err.clone()));
        }
        Resolution::Failed(err)
    }

    fn build_forest(&self, graph: &MenuGraph) -> Vec<RouteNode> {
        match build_route_forest(graph, &self.screens, &self.config) {
            Ok(forest) => forest,
            Err(err) => self.fallback(NavError::from(err)),
        }
    }

    fn fallback(&self, err: NavError) -> Vec<RouteNode> {
        error_log!("{}; falling back to the landing page", err);
        self.state.borrow_mut().diagnostics.push(err);
        fallback_forest(&self.config, &self.screens)
    }

    fn install(&self, forest: Vec<RouteNode>) {
        let conflicts = {
            let mut registry = self.registry.borrow_mut();
            registry.clear();
            let names = registry.materialize(&forest);
            info_log!("Mounted {} dynamic routes", names.len());
            registry.conflicts().to_vec()
        };

        let mut state = self.state.borrow_mut();
        state.diagnostics.extend(conflicts);
        state.forest = forest;
    }

    fn connect_channel(&self, token: &str) {
        let mut channel = self.channel.borrow_mut();
        let Some(channel) = channel.as_mut() else {
            return;
        };
        if self.state.borrow().channel_connected {
            return;
        }
        match channel.connect(token) {
            Ok(()) => self.state.borrow_mut().channel_connected = true,
            Err(err) => {
                warn_log!("Event channel failed to connect: {}", err);
            }
        }
    }

    /// Drop the session: bump the epoch, unmount dynamic routes, forget the
    /// token and close the push channel.
    fn teardown(&self, phase: GatePhase) {
        let connected = {
            let mut state = self.state.borrow_mut();
            state.epoch += 1;
            state.session = Session::default();
            state.in_flight = false;
            state.forest.clear();
            state.set_phase(phase);
            std::mem::take(&mut state.channel_connected)
        };
        self.settle_pending(cancelled);

        self.registry.borrow_mut().clear();

        if let Err(err) = self.store.remove(&self.config.token_key) {
            warn_log!("Could not remove persisted session token: {}", err);
        }

        if connected {
            if let Some(channel) = self.channel.borrow_mut().as_mut() {
                channel.close();
            }
        }
    }

    /// Replay queued intents against the mounted routes.
    fn drain_pending(&self) {
        self.settle_pending(|location| self.navigate_ready(location, 0));
    }

    /// Answer every queued intent, in arrival order, with `outcome`.
    fn settle_pending(&self, outcome: impl Fn(&Location) -> NavigationResult) {
        let pending = std::mem::take(&mut self.state.borrow_mut().pending);
        for intent in pending {
            let result = outcome(&intent.location);
            debug_log!("Queued intent '{}': {:?}", intent.location, result);
            if intent.reply.send(result).is_err() {
                debug_log!("Queued intent '{}' was abandoned", intent.location);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Routing
    // ------------------------------------------------------------------------

    fn navigate_signed_out(&self, location: &Location) -> NavigationResult {
        let request = NavigationRequest::new(location.clone()).with_from(self.current_location().to_string());
        match self.auth.check(None, &request) {
            NavigationAction::Continue => {
                let stack = self.registry.borrow_mut().resolve(location.path());
                match stack {
                    Some(stack) => self.commit(location, stack),
                    None => NavigationResult::NotFound {
                        path: location.to_string(),
                    },
                }
            }
            NavigationAction::Deny { reason } => NavigationResult::Blocked { reason },
            NavigationAction::Redirect { reason, .. } => self.redirect_to_login(location, reason),
        }
    }

    fn navigate_ready(&self, location: &Location, depth: usize) -> NavigationResult {
        if depth > MAX_REDIRECT_DEPTH {
            error_log!(
                "Redirect loop detected at '{}' (depth {})",
                location,
                depth
            );
            return NavigationResult::Blocked {
                reason: format!("Too many redirects (max {MAX_REDIRECT_DEPTH})"),
            };
        }

        if self.config.is_auth_path(location.path()) {
            let inner = self.navigate_ready(&Location::new("/"), depth + 1);
            return redirected(location, inner, Some("Already signed in".to_string()));
        }

        let stack = self.registry.borrow_mut().resolve(location.path());
        let Some(stack) = stack else {
            warn_log!("No route for '{}'", location);
            return NavigationResult::NotFound {
                path: location.to_string(),
            };
        };

        if let Some(target) = stack.redirect() {
            if target != location.path() {
                let inner = self.navigate_ready(&Location::new(target), depth + 1);
                return redirected(location, inner, None);
            }
        }

        let identity = self.state.borrow().session.identity.clone();
        let request = NavigationRequest::new(location.clone())
            .with_from(self.current_location().to_string())
            .with_stack(Some(stack.clone()));

        match self.guards.check(identity.as_ref(), &request) {
            NavigationAction::Continue => self.commit(location, stack),
            NavigationAction::Deny { reason } => {
                debug_log!("Navigation to '{}' denied: {}", location, reason);
                NavigationResult::Blocked { reason }
            }
            NavigationAction::Redirect { to, reason } => {
                let inner = self.navigate_ready(&Location::parse(&to), depth + 1);
                redirected(location, inner, reason)
            }
        }
    }

    fn commit(&self, location: &Location, stack: MatchStack) -> NavigationResult {
        let event = self.router.borrow_mut().push(location.clone(), Some(stack));
        info_log!(
            "Navigation {:?}: '{}' → '{}'",
            event.direction,
            event.from.as_deref().unwrap_or("-"),
            event.to
        );
        NavigationResult::Success { path: event.to }
    }

    /// Send the user to the auth page, remembering `location` for replay.
    fn redirect_to_login(&self, location: &Location, reason: Option<String>) -> NavigationResult {
        let login = self.config.login_location(location);
        if !self.config.is_public(location.path()) {
            self.state.borrow_mut().return_to = Some(location.clone());
        }

        let stack = self.registry.borrow_mut().resolve(login.path());
        let event = self.router.borrow_mut().push(login, stack);
        debug_log!("Redirected '{}' → '{}'", location, event.to);

        NavigationResult::Redirected {
            requested: location.to_string(),
            path: event.to,
            reason,
        }
    }
}

fn cancelled(location: &Location) -> NavigationResult {
    NavigationResult::Cancelled {
        path: location.to_string(),
    }
}

/// Wrap the outcome of a followed redirect.
fn redirected(requested: &Location, inner: NavigationResult, reason: Option<String>) -> NavigationResult {
    match inner {
        NavigationResult::Success { path } => NavigationResult::Redirected {
            requested: requested.to_string(),
            path,
            reason,
        },
        NavigationResult::Redirected {
            path,
            reason: inner_reason,
            ..
        } => NavigationResult::Redirected {
            requested: requested.to_string(),
            path,
            reason: reason.or(inner_reason),
        },
        other => other,
    }
}
