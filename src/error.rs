//! Error taxonomy and navigation outcomes.
//!
//! - [`NavError`]: every failure the engine hands to a caller, already mapped
//!   to one kind: structural (malformed menu), unauthorized (bad token),
//!   unavailable (transient transport failure), configuration (route name
//!   collision), and a few boundary kinds (rejected credentials, storage,
//!   invalid configuration).
//! - [`StructuralError`]: the specific way a menu tree is malformed.
//! - [`NavigationResult`]: the outcome of one navigation intent.
//!
//! # Examples
//!
//! ```
//! use gpui_console_navigator::error::{NavError, NavigationResult};
//!
//! let result = NavigationResult::Redirected {
//!     requested: "/orders".into(),
//!     path: "/login?redirect=%2Forders".into(),
//!     reason: Some("Authentication required".into()),
//! };
//! assert!(result.is_redirected());
//! assert_eq!(result.path(), Some("/login?redirect=%2Forders"));
//!
//! let err = NavError::unavailable("menu service timed out");
//! assert!(err.is_retryable());
//! ```

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, NavError>;

/// Ways a server-delivered menu tree can be malformed.
///
/// None of these are retried: the gate falls back to the landing page and
/// records the error as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// A node appears among its own descendants.
    #[error("menu node '{name}' ({path}) is its own ancestor")]
    Cycle { path: String, name: String },

    /// The menu is non-empty but has no anchor (`/`) node at the top level.
    #[error("menu has no root node")]
    MissingRoot,

    /// More than one top-level node claims the anchor path.
    #[error("menu has {count} root candidates")]
    MultipleRoots { count: usize },

    /// A child reference points outside the menu graph.
    #[error("menu references unknown node #{index}")]
    DanglingNode { index: usize },

    /// The payload could not be decoded as a menu at all.
    #[error("menu payload is not valid: {message}")]
    InvalidPayload { message: String },
}

/// Failure kinds surfaced by the navigation engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("malformed menu tree: {0}")]
    Structural(#[from] StructuralError),

    /// The session token was rejected; triggers teardown, never retried.
    #[error("session is no longer valid: {message}")]
    Unauthorized { message: String },

    /// Transient transport failure; the same intent may be re-issued.
    #[error("service unavailable: {message}")]
    Unavailable { message: String },

    /// A dynamic route could not be mounted because its name is taken.
    #[error("route '{name}' conflicts with an existing route: {message}")]
    Configuration { name: String, message: String },

    /// Login was refused by the server.
    #[error("credentials rejected: {message}")]
    AuthRejected { message: String },

    /// The token store could not be read or written.
    #[error("token storage failed: {message}")]
    Storage { message: String },

    /// Gate configuration could not be loaded.
    #[error("invalid gate configuration: {message}")]
    InvalidConfig { message: String },
}

impl NavError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn auth_rejected(message: impl Into<String>) -> Self {
        Self::AuthRejected {
            message: message.into(),
        }
    }

    pub fn configuration(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Check if the error means the session must be torn down.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Check if re-issuing the same intent may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Check if the error describes a malformed menu.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural(_))
    }
}

impl From<std::io::Error> for NavError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err.to_string())
    }
}

/// Outcome of a single navigation intent handed to the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationResult {
    /// The router now shows the requested location.
    Success { path: String },

    /// The router was sent somewhere else (login, forbidden, route redirect).
    Redirected {
        requested: String,
        path: String,
        reason: Option<String>,
    },

    /// No mounted route matches the destination; the router did not move.
    NotFound { path: String },

    /// A guard denied the navigation; the router did not move.
    Blocked { reason: String },

    /// The session changed while this intent was resolving; nothing applied.
    Cancelled { path: String },

    /// Resolution failed; see the error kind.
    Error(NavError),
}

impl NavigationResult {
    /// Check if navigation landed on the requested location
    pub fn is_success(&self) -> bool {
        matches!(self, NavigationResult::Success { .. })
    }

    /// Check if navigation was redirected
    pub fn is_redirected(&self) -> bool {
        matches!(self, NavigationResult::Redirected { .. })
    }

    /// Check if route was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationResult::NotFound { .. })
    }

    /// Check if navigation was blocked
    pub fn is_blocked(&self) -> bool {
        matches!(self, NavigationResult::Blocked { .. })
    }

    /// Check if the intent was discarded by a session change
    pub fn is_cancelled(&self) -> bool {
        matches!(self, NavigationResult::Cancelled { .. })
    }

    /// Check if there was an error
    pub fn is_error(&self) -> bool {
        matches!(self, NavigationResult::Error(_))
    }

    /// Location the router ended up at, if it moved.
    pub fn path(&self) -> Option<&str> {
        match self {
            NavigationResult::Success { path } | NavigationResult::Redirected { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }

    /// The error, if resolution failed.
    pub fn error(&self) -> Option<&NavError> {
        match self {
            NavigationResult::Error(err) => Some(err),
            _ => None,
        }
    }
}
