//! Test utilities for gate and route tree tests
//!
//! Provides a scripted console backend whose fetches can be held open, a
//! registry that counts materializations, and menu fixtures.

#![allow(dead_code)]

use gpui::{div, AnyElement, App, IntoElement, ParentElement, Window};
use gpui_console_navigator::api::EventHandler;
use gpui_console_navigator::*;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use tokio::sync::Notify;

pub const ROOT_TOKEN: &str = "tok-root";
pub const OPS_TOKEN: &str = "tok-ops";

/// Console menu: a frame at `/` redirecting to the dashboard, with an
/// admin-only system page and a hidden order detail page.
pub const CONSOLE_MENU: &str = r#"{
    "menus": [{
        "path": "/",
        "name": "Layout",
        "component": "Layout",
        "redirect": "/dashboard",
        "children": [
            { "path": "dashboard", "name": "Dashboard", "component": "dashboard/index", "meta": { "title": "Home" } },
            { "path": "orders", "name": "Orders", "component": "views/order/list/index.vue", "meta": { "title": "Orders", "icon": "cart" } },
            { "path": "orders/:id", "name": "OrderDetail", "component": "order/detail", "meta": { "title": "Order", "hidden": true } },
            { "path": "system", "name": "System", "component": "system/index", "meta": { "title": "System", "roles": ["admin"] } }
        ]
    }]
}"#;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn placeholder(_window: &mut Window, _cx: &mut App, _params: &RouteParams) -> AnyElement {
    div().child("screen").into_any_element()
}

pub fn console_screens() -> ScreenRegistry {
    ScreenRegistry::new()
        .screen("dashboard", placeholder)
        .screen("order/list", placeholder)
        .screen("order/detail", placeholder)
        .screen("system", placeholder)
        .screen("login", placeholder)
}

// ============================================================================
// FakeApi
// ============================================================================

#[derive(Debug, Default)]
pub struct Calls {
    pub login: Cell<usize>,
    pub identity: Cell<usize>,
    pub menu: Cell<usize>,
    pub logout: Cell<usize>,
}

/// Scripted console backend with two accounts: `root` (admin) and `ops`
/// (staff). Unknown tokens are rejected as unauthorized.
pub struct FakeApi {
    pub calls: Calls,
    identities: RefCell<HashMap<String, Identity>>,
    menu: RefCell<String>,
    identity_failures: RefCell<VecDeque<NavError>>,
    menu_failures: RefCell<VecDeque<NavError>>,
    identity_hold: RefCell<Option<Rc<Notify>>>,
    menu_hold: RefCell<Option<Rc<Notify>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        let mut identities = HashMap::new();
        identities.insert(
            ROOT_TOKEN.to_string(),
            Identity::new(1, "root", "admin").with_permissions(["order:read", "user:add"]),
        );
        identities.insert(
            OPS_TOKEN.to_string(),
            Identity::new(2, "ops", "staff").with_permissions(["order:read"]),
        );

        Self {
            calls: Calls::default(),
            identities: RefCell::new(identities),
            menu: RefCell::new(CONSOLE_MENU.to_string()),
            identity_failures: RefCell::new(VecDeque::new()),
            menu_failures: RefCell::new(VecDeque::new()),
            identity_hold: RefCell::new(None),
            menu_hold: RefCell::new(None),
        }
    }

    /// Serve `json` as the menu from now on.
    pub fn set_menu(&self, json: &str) {
        *self.menu.borrow_mut() = json.to_string();
    }

    /// Change what a token resolves to, as after a role change.
    pub fn set_identity(&self, token: &str, identity: Identity) {
        self.identities
            .borrow_mut()
            .insert(token.to_string(), identity);
    }

    pub fn fail_identity_once(&self, err: NavError) {
        self.identity_failures.borrow_mut().push_back(err);
    }

    pub fn fail_menu_once(&self, err: NavError) {
        self.menu_failures.borrow_mut().push_back(err);
    }

    /// Hold the next identity fetch until `notify_one` on the returned handle.
    pub fn hold_identity(&self) -> Rc<Notify> {
        hold(&self.identity_hold)
    }

    /// Hold the next menu fetch until `notify_one` on the returned handle.
    pub fn hold_menu(&self) -> Rc<Notify> {
        hold(&self.menu_hold)
    }
}

fn hold(slot: &RefCell<Option<Rc<Notify>>>) -> Rc<Notify> {
    let notify = Rc::new(Notify::new());
    *slot.borrow_mut() = Some(Rc::clone(&notify));
    notify
}

async fn released(slot: &RefCell<Option<Rc<Notify>>>) {
    let held = slot.borrow_mut().take();
    if let Some(notify) = held {
        notify.notified().await;
    }
}

impl ConsoleApi for FakeApi {
    async fn login(&self, credentials: &Credentials) -> error::Result<Session> {
        self.calls.login.set(self.calls.login.get() + 1);
        match (credentials.account.as_str(), credentials.password.as_str()) {
            ("root", "secret") => Ok(Session::new(ROOT_TOKEN)),
            ("ops", "secret") => Ok(Session::new(OPS_TOKEN)),
            _ => Err(NavError::auth_rejected("wrong account or password")),
        }
    }

    async fn fetch_identity(&self, token: &str) -> error::Result<Identity> {
        self.calls.identity.set(self.calls.identity.get() + 1);
        released(&self.identity_hold).await;

        let failure = self.identity_failures.borrow_mut().pop_front();
        if let Some(err) = failure {
            return Err(err);
        }
        self.identities
            .borrow()
            .get(token)
            .cloned()
            .ok_or_else(|| NavError::unauthorized("token expired"))
    }

    async fn fetch_menu_tree(&self, token: &str) -> error::Result<MenuGraph> {
        self.calls.menu.set(self.calls.menu.get() + 1);
        released(&self.menu_hold).await;

        let failure = self.menu_failures.borrow_mut().pop_front();
        if let Some(err) = failure {
            return Err(err);
        }
        if !self.identities.borrow().contains_key(token) {
            return Err(NavError::unauthorized("token expired"));
        }
        Ok(MenuGraph::from_json(&self.menu.borrow())?)
    }

    async fn logout(&self, _token: &str) -> error::Result<()> {
        self.calls.logout.set(self.calls.logout.get() + 1);
        Ok(())
    }
}

// ============================================================================
// CountingRegistry
// ============================================================================

/// Route table that counts how often it is written.
pub struct CountingRegistry {
    pub table: RouteTable,
    pub materializations: usize,
    pub clears: usize,
}

impl CountingRegistry {
    pub fn new(config: &GateConfig, screens: &ScreenRegistry) -> Self {
        Self {
            table: RouteTable::new(&transform::static_routes(config, screens)),
            materializations: 0,
            clears: 0,
        }
    }
}

impl RouteRegistry for CountingRegistry {
    fn materialize(&mut self, forest: &[RouteNode]) -> Vec<String> {
        self.materializations += 1;
        self.table.materialize(forest)
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.table.clear();
    }

    fn mounted_names(&self) -> Vec<String> {
        self.table.mounted_names()
    }

    fn resolve(&mut self, path: &str) -> Option<MatchStack> {
        self.table.resolve(path)
    }

    fn conflicts(&self) -> &[NavError] {
        self.table.conflicts()
    }
}

// ============================================================================
// RecordingChannel
// ============================================================================

/// Event channel recording its lifecycle.
#[derive(Clone, Default)]
pub struct RecordingChannel {
    pub log: Rc<RefCell<Vec<String>>>,
    pub handlers: Rc<RefCell<Vec<(String, EventHandler)>>>,
}

impl RecordingChannel {
    /// Deliver an event to the handlers registered for its type.
    pub fn emit(&self, event: &PushEvent) {
        for (event_type, handler) in self.handlers.borrow().iter() {
            if *event_type == event.event_type {
                handler(event);
            }
        }
    }
}

impl EventChannel for RecordingChannel {
    fn connect(&mut self, token: &str) -> error::Result<()> {
        self.log.borrow_mut().push(format!("connect {token}"));
        Ok(())
    }

    fn on(&mut self, event_type: &str, handler: EventHandler) {
        self.handlers
            .borrow_mut()
            .push((event_type.to_string(), handler));
    }

    fn close(&mut self) {
        self.log.borrow_mut().push("close".to_string());
    }
}

// ============================================================================
// Gate helpers
// ============================================================================

pub fn gate() -> SessionGate<FakeApi> {
    init_logging();
    SessionGate::new(FakeApi::new(), console_screens(), GateConfig::default())
}

pub fn counting_gate(store: MemoryTokenStore) -> SessionGate<FakeApi, CountingRegistry> {
    init_logging();
    let config = GateConfig::default();
    let screens = console_screens();
    let registry = CountingRegistry::new(&config, &screens);
    SessionGate::with_registry(FakeApi::new(), screens, config, registry).with_store(store)
}

pub fn credentials(account: &str) -> Credentials {
    Credentials::new(account, "secret")
}
