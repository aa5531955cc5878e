//! Permission predicates over the identity snapshot.
//!
//! Screens use [`evaluate`] to decide whether to show an action; the gate uses
//! it through [`PermissionGuard`](crate::guards::PermissionGuard). Evaluation
//! is pure: no network, no session mutation.
//!
//! Requirements deserialize from the console's directive forms:
//!
//! | JSON                                          | Requirement                    |
//! |-----------------------------------------------|--------------------------------|
//! | `"order:write"`                               | that permission                |
//! | `["order:write", "order:audit"]`              | any of those permissions       |
//! | `{ "role": "admin" }`                         | that role                      |
//! | `{ "role": ["admin", "ops"] }`                | any of those roles             |
//! | `{ "allRoles": ["admin", "auditor"] }`        | every one of those roles       |
//! | `{ "permission": "user:add", "role": "admin" }` | both                         |
//!
//! Object keys combine: every key present must hold.
//!
//! ```
//! use gpui_console_navigator::permission::{evaluate, Requirement};
//! use gpui_console_navigator::Identity;
//!
//! let ops = Identity::new(1, "ops", "manager").with_permissions(["order:read"]);
//! let requirement: Requirement = serde_json::from_str(r#"{"role": ["admin", "manager"]}"#).unwrap();
//! assert!(evaluate(&requirement, &ops));
//! assert!(!evaluate(&Requirement::permission("order:write"), &ops));
//! ```

use crate::session::Identity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One value or an any-of set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Matcher {
    One(String),
    Any(Vec<String>),
}

impl Matcher {
    fn matches(&self, holds: impl Fn(&str) -> bool) -> bool {
        match self {
            Self::One(value) => holds(value),
            Self::Any(values) => values.iter().any(|value| holds(value)),
        }
    }
}

impl From<&str> for Matcher {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for Matcher {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl<S: Into<String>> From<Vec<S>> for Matcher {
    fn from(values: Vec<S>) -> Self {
        Self::Any(values.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(value) => write!(f, "{value}"),
            Self::Any(values) => write!(f, "any of [{}]", values.join(", ")),
        }
    }
}

/// What an identity must hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRequirement", into = "RawRequirement")]
pub enum Requirement {
    Permission(Matcher),
    Role(Matcher),
    /// Every listed role must be held.
    AllRoles(Vec<String>),
    /// Every present condition must hold. At least two are present.
    All {
        permission: Option<Matcher>,
        role: Option<Matcher>,
        all_roles: Option<Vec<String>>,
    },
}

impl Requirement {
    pub fn permission(matcher: impl Into<Matcher>) -> Self {
        Self::Permission(matcher.into())
    }

    pub fn role(matcher: impl Into<Matcher>) -> Self {
        Self::Role(matcher.into())
    }

    pub fn all_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AllRoles(roles.into_iter().map(Into::into).collect())
    }

    pub fn both(permission: impl Into<Matcher>, role: impl Into<Matcher>) -> Self {
        Self::All {
            permission: Some(permission.into()),
            role: Some(role.into()),
            all_roles: None,
        }
    }

    /// Collapse a set of object conditions into the narrowest variant.
    fn from_conditions(
        permission: Option<Matcher>,
        role: Option<Matcher>,
        all_roles: Option<Vec<String>>,
    ) -> Option<Self> {
        match (permission, role, all_roles) {
            (None, None, None) => None,
            (Some(permission), None, None) => Some(Self::Permission(permission)),
            (None, Some(role), None) => Some(Self::Role(role)),
            (None, None, Some(roles)) => Some(Self::AllRoles(roles)),
            (permission, role, all_roles) => Some(Self::All {
                permission,
                role,
                all_roles,
            }),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permission(m) => write!(f, "permission {m}"),
            Self::Role(m) => write!(f, "role {m}"),
            Self::AllRoles(roles) => write!(f, "all of roles [{}]", roles.join(", ")),
            Self::All {
                permission,
                role,
                all_roles,
            } => {
                let mut parts = Vec::new();
                if let Some(m) = permission {
                    parts.push(format!("permission {m}"));
                }
                if let Some(m) = role {
                    parts.push(format!("role {m}"));
                }
                if let Some(roles) = all_roles {
                    parts.push(format!("all of roles [{}]", roles.join(", ")));
                }
                write!(f, "{}", parts.join(" and "))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawRequirement {
    Single(String),
    AnyOf(Vec<String>),
    Object {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        permission: Option<Matcher>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<Matcher>,
        #[serde(default, rename = "allRoles", skip_serializing_if = "Option::is_none")]
        all_roles: Option<Vec<String>>,
    },
}

impl TryFrom<RawRequirement> for Requirement {
    type Error = String;

    fn try_from(raw: RawRequirement) -> Result<Self, Self::Error> {
        match raw {
            RawRequirement::Single(permission) => Ok(Self::Permission(Matcher::One(permission))),
            RawRequirement::AnyOf(permissions) => Ok(Self::Permission(Matcher::Any(permissions))),
            RawRequirement::Object {
                permission,
                role,
                all_roles,
            } => Self::from_conditions(permission, role, all_roles)
                .ok_or_else(|| "requirement needs a permission, a role or allRoles".to_string()),
        }
    }
}

impl From<Requirement> for RawRequirement {
    fn from(requirement: Requirement) -> Self {
        match requirement {
            Requirement::Permission(Matcher::One(permission)) => Self::Single(permission),
            Requirement::Permission(Matcher::Any(permissions)) => Self::AnyOf(permissions),
            Requirement::Role(role) => Self::Object {
                permission: None,
                role: Some(role),
                all_roles: None,
            },
            Requirement::AllRoles(roles) => Self::Object {
                permission: None,
                role: None,
                all_roles: Some(roles),
            },
            Requirement::All {
                permission,
                role,
                all_roles,
            } => Self::Object {
                permission,
                role,
                all_roles,
            },
        }
    }
}

/// Check `requirement` against an identity snapshot.
pub fn evaluate(requirement: &Requirement, identity: &Identity) -> bool {
    let permission = |m: &Matcher| m.matches(|p| identity.has_permission(p));
    let role = |m: &Matcher| m.matches(|r| identity.has_role(r));
    let all_roles = |roles: &[String]| roles.iter().all(|r| identity.has_role(r));

    match requirement {
        Requirement::Permission(m) => permission(m),
        Requirement::Role(m) => role(m),
        Requirement::AllRoles(roles) => all_roles(roles),
        Requirement::All {
            permission: p,
            role: r,
            all_roles: a,
        } => {
            p.as_ref().map_or(true, permission)
                && r.as_ref().map_or(true, role)
                && a.as_deref().map_or(true, all_roles)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Identity {
        Identity::new(1, "root", "admin").with_permissions(["user:add", "order:read"])
    }

    fn parse(json: &str) -> Requirement {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_single_and_any_permission() {
        let identity = admin();
        assert!(evaluate(&parse(r#""user:add""#), &identity));
        assert!(!evaluate(&parse(r#""user:delete""#), &identity));
        assert!(evaluate(&parse(r#"["user:delete", "order:read"]"#), &identity));
        assert!(!evaluate(&parse("[]"), &identity));
    }

    #[test]
    fn test_roles() {
        let identity = admin();
        assert!(evaluate(&parse(r#"{"role": "admin"}"#), &identity));
        assert!(evaluate(&parse(r#"{"role": ["ops", "admin"]}"#), &identity));
        assert!(!evaluate(&Requirement::role("ops"), &identity));
    }

    #[test]
    fn test_conjunction() {
        let identity = admin();
        assert!(evaluate(&parse(r#"{"permission": "user:add", "role": "admin"}"#), &identity));
        assert!(!evaluate(&Requirement::both("user:add", "ops"), &identity));
        assert!(!evaluate(&Requirement::both(vec!["user:delete"], "admin"), &identity));
    }

    #[test]
    fn test_all_roles() {
        let identity = admin();
        assert!(evaluate(&parse(r#"{"allRoles": ["admin"]}"#), &identity));
        assert!(!evaluate(&parse(r#"{"allRoles": ["admin", "auditor"]}"#), &identity));
        assert!(!evaluate(&Requirement::all_roles(["auditor"]), &identity));
        // Role any-of passes, but the all-of set does not.
        assert!(!evaluate(
            &parse(r#"{"role": ["admin", "auditor"], "allRoles": ["admin", "auditor"]}"#),
            &identity
        ));
        assert!(evaluate(
            &parse(r#"{"permission": "user:add", "allRoles": ["admin"]}"#),
            &identity
        ));
    }

    #[test]
    fn test_all_roles_round_trips_to_directive_form() {
        let requirement = parse(r#"{"allRoles": ["admin", "auditor"]}"#);
        assert_eq!(requirement, Requirement::all_roles(["admin", "auditor"]));
        assert_eq!(requirement.to_string(), "all of roles [admin, auditor]");
        assert_eq!(
            serde_json::to_string(&requirement).unwrap(),
            r#"{"allRoles":["admin","auditor"]}"#
        );
    }

    #[test]
    fn test_object_with_permission_only() {
        assert_eq!(
            parse(r#"{"permission": ["a", "b"]}"#),
            Requirement::permission(vec!["a", "b"])
        );
    }

    #[test]
    fn test_empty_object_is_rejected() {
        assert!(serde_json::from_str::<Requirement>("{}").is_err());
    }

    #[test]
    fn test_serializes_back_to_directive_form() {
        let json = serde_json::to_string(&Requirement::role(vec!["admin", "ops"])).unwrap();
        assert_eq!(json, r#"{"role":["admin","ops"]}"#);
        let json = serde_json::to_string(&Requirement::permission("user:add")).unwrap();
        assert_eq!(json, r#""user:add""#);
    }
}
