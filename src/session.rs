//! Session snapshot and token persistence.

use crate::debug_log;
use crate::error::{NavError, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

/// Immutable snapshot of the signed-in user.
///
/// Replaced wholesale whenever the identity is re-fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: u64,
    pub username: String,
    pub role: String,
    #[serde(default, alias = "rawPermissionSet")]
    pub permissions: Vec<String>,
}

impl Identity {
    pub fn new(id: u64, username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            role: role.into(),
            permissions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// Token plus (once resolved) the identity it belongs to.
///
/// An empty token means logged out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub identity: Option<Identity>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            identity: None,
        }
    }

    #[must_use]
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Key-value persistence for the session token.
pub trait TokenStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, token: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one token, as after a previous run.
    pub fn with_token(key: &str, token: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), token.to_string());
        store
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, token: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), token.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object in a single file.
///
/// A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) if json.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(json) => serde_json::from_str(&json).map_err(|e| {
                NavError::storage(format!("{}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| NavError::storage(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        debug_log!("Token store written to {}", self.path.display());
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&self, key: &str, token: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), token.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}
