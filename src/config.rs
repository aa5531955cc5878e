//! Gate configuration.
//!
//! Every field has a default matching the console's stock setup, so an empty
//! JSON object is a valid configuration:
//!
//! ```
//! use gpui_console_navigator::GateConfig;
//!
//! let config = GateConfig::from_json_str(r#"{ "homePath": "/overview" }"#).unwrap();
//! assert_eq!(config.home_path, "/overview");
//! assert_eq!(config.auth_path, "/login");
//! assert!(config.is_public("/forgot-password"));
//! ```

use crate::error::{NavError, Result};
use crate::params::Location;
use crate::paths::normalize_path;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The page shown when the menu is malformed, and the home destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LandingPage {
    pub name: String,
    pub screen: String,
    pub title: Option<String>,
}

impl Default for LandingPage {
    fn default() -> Self {
        Self {
            name: "Dashboard".to_string(),
            screen: "dashboard".to_string(),
            title: Some("Home".to_string()),
        }
    }
}

/// A route that is mounted for every session and never unmounted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticRoute {
    pub path: String,
    pub name: String,
    pub screen: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl StaticRoute {
    pub fn new(path: &str, name: &str, screen: &str, title: &str) -> Self {
        Self {
            path: path.to_string(),
            name: name.to_string(),
            screen: screen.to_string(),
            title: Some(title.to_string()),
        }
    }
}

/// Configuration of the session-navigation gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GateConfig {
    /// Where anonymous users are sent.
    pub auth_path: String,
    /// Where users lacking a route's roles are sent.
    pub forbidden_path: String,
    /// Landing destination; sorted first in the menu.
    pub home_path: String,
    /// Destinations reachable without a session.
    pub public_paths: Vec<String>,
    /// Query key carrying the return destination through the auth page.
    pub return_query_key: String,
    /// Key the session token is persisted under.
    pub token_key: String,
    /// Appended to every page title.
    pub title_suffix: String,
    pub landing: LandingPage,
    pub static_routes: Vec<StaticRoute>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            auth_path: "/login".to_string(),
            forbidden_path: "/403".to_string(),
            home_path: "/dashboard".to_string(),
            public_paths: vec![
                "/login".to_string(),
                "/register".to_string(),
                "/forgot-password".to_string(),
            ],
            return_query_key: "redirect".to_string(),
            token_key: "token".to_string(),
            title_suffix: "Marketplace Console".to_string(),
            landing: LandingPage::default(),
            static_routes: vec![
                StaticRoute::new("/login", "Login", "login", "Sign in"),
                StaticRoute::new("/register", "Register", "register", "Register"),
                StaticRoute::new(
                    "/forgot-password",
                    "ForgotPassword",
                    "forgot-password",
                    "Reset password",
                ),
                StaticRoute::new("/403", "Forbidden", "error/403", "Access denied"),
            ],
        }
    }
}

impl GateConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| NavError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Load a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| NavError::InvalidConfig {
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_json_str(&json)
    }

    /// Check if `path` may be visited without a session.
    pub fn is_public(&self, path: &str) -> bool {
        let path = normalize_path(path);
        self.public_paths
            .iter()
            .any(|public| normalize_path(public) == path)
    }

    /// Check if `path` is the authentication page.
    pub fn is_auth_path(&self, path: &str) -> bool {
        normalize_path(path) == normalize_path(&self.auth_path)
    }

    /// The auth page carrying `destination` as its return target.
    pub fn login_location(&self, destination: &Location) -> Location {
        let login = Location::new(&self.auth_path);
        if destination.path() == "/" || self.is_auth_path(destination.path()) {
            return login;
        }
        login.with_query(self.return_query_key.clone(), destination.to_string())
    }

    /// Browser-style title for a page.
    pub fn page_title(&self, title: Option<&str>) -> String {
        match title.filter(|t| !t.is_empty()) {
            Some(title) => format!("{title} - {}", self.title_suffix),
            None => self.title_suffix.clone(),
        }
    }
}
