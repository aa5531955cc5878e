//! Collaborator contracts the gate consumes.
//!
//! The console backend is reached through [`ConsoleApi`]; the push
//! notification channel through [`EventChannel`]. Both are injected, so the
//! gate never knows about HTTP, websockets, or retries.

use crate::error::Result;
use crate::menu::MenuGraph;
use crate::session::{Identity, Session};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Login form contents.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub account: String,
    pub password: String,
}

impl Credentials {
    pub fn new(account: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The console backend.
///
/// Errors must already be mapped to a [`NavError`](crate::NavError) kind:
/// rejected credentials are `AuthRejected`, a bad token is `Unauthorized`,
/// transport failures are `Unavailable`.
#[allow(async_fn_in_trait)]
pub trait ConsoleApi {
    /// Exchange credentials for a session.
    async fn login(&self, credentials: &Credentials) -> Result<Session>;

    /// Fetch the identity the token belongs to.
    async fn fetch_identity(&self, token: &str) -> Result<Identity>;

    /// Fetch the menu tree of the token's identity. An empty graph is valid.
    async fn fetch_menu_tree(&self, token: &str) -> Result<MenuGraph>;

    /// Invalidate the token server-side. Best-effort.
    async fn logout(&self, token: &str) -> Result<()>;
}

/// A message received on the push channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub content: serde_json::Value,
}

/// Callback registered for one event type.
pub type EventHandler = Box<dyn Fn(&PushEvent)>;

/// Fire-and-forget notification channel, connected while the gate is ready.
///
/// Failures are logged by the gate and never change its state.
pub trait EventChannel {
    fn connect(&mut self, token: &str) -> Result<()>;
    fn on(&mut self, event_type: &str, handler: EventHandler);
    fn close(&mut self);
}
