//! Document and object permissions.
//!
//! Permissions render in the hosted backend's wire form, e.g.
//! `read("any")` or `delete("user:abc")`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AppError;

/// An action a role may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionAction {
    /// Read the resource.
    Read,
    /// Create children (collections and buckets only).
    Create,
    /// Update the resource.
    Update,
    /// Delete the resource.
    Delete,
    /// Shorthand for create, update, and delete.
    Write,
}

impl PermissionAction {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Write => "write",
        }
    }
}

/// Who a permission is granted to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// Anyone, authenticated or not.
    Any,
    /// Any authenticated user.
    Users,
    /// A single user.
    User(String),
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Users => write!(f, "users"),
            Self::User(id) => write!(f, "user:{id}"),
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(Self::Any),
            "users" => Ok(Self::Users),
            other => other
                .strip_prefix("user:")
                .filter(|id| !id.is_empty())
                .map(|id| Self::User(id.to_string()))
                .ok_or_else(|| AppError::validation(format!("Unknown role '{other}'"))),
        }
    }
}

/// A single action granted to a role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permission {
    /// Granted action.
    pub action: PermissionAction,
    /// Grantee.
    pub role: Role,
}

impl Permission {
    /// Grant read access.
    pub fn read(role: Role) -> Self {
        Self {
            action: PermissionAction::Read,
            role,
        }
    }

    /// Grant write access.
    pub fn write(role: Role) -> Self {
        Self {
            action: PermissionAction::Write,
            role,
        }
    }

    /// Grant update access.
    pub fn update(role: Role) -> Self {
        Self {
            action: PermissionAction::Update,
            role,
        }
    }

    /// Grant delete access.
    pub fn delete(role: Role) -> Self {
        Self {
            action: PermissionAction::Delete,
            role,
        }
    }

    /// Grant create access.
    pub fn create(role: Role) -> Self {
        Self {
            action: PermissionAction::Create,
            role,
        }
    }

    /// Read, write, update, and delete for a role.
    pub fn full_access(role: Role) -> Vec<Self> {
        vec![
            Self::read(role.clone()),
            Self::write(role.clone()),
            Self::update(role.clone()),
            Self::delete(role),
        ]
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(\"{}\")", self.action.as_str(), self.role)
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::validation(format!("Invalid permission '{s}'"));
        let (action, rest) = s.split_once('(').ok_or_else(invalid)?;
        let role = rest
            .strip_suffix(')')
            .and_then(|r| r.strip_prefix('"'))
            .and_then(|r| r.strip_suffix('"'))
            .ok_or_else(invalid)?;
        let action = match action {
            "read" => PermissionAction::Read,
            "create" => PermissionAction::Create,
            "update" => PermissionAction::Update,
            "delete" => PermissionAction::Delete,
            "write" => PermissionAction::Write,
            _ => return Err(invalid()),
        };
        Ok(Self {
            action,
            role: role.parse()?,
        })
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        assert_eq!(Permission::read(Role::Any).to_string(), r#"read("any")"#);
        assert_eq!(
            Permission::delete(Role::User("u1".into())).to_string(),
            r#"delete("user:u1")"#
        );
    }

    #[test]
    fn test_parse_wire_format() {
        let p: Permission = r#"update("users")"#.parse().unwrap();
        assert_eq!(p, Permission::update(Role::Users));
        assert!("read(any)".parse::<Permission>().is_err());
        assert!(r#"admin("any")"#.parse::<Permission>().is_err());
    }

    #[test]
    fn test_full_access_grants_four_actions() {
        let perms = Permission::full_access(Role::Any);
        let rendered: Vec<String> = perms.iter().map(|p| p.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                r#"read("any")"#,
                r#"write("any")"#,
                r#"update("any")"#,
                r#"delete("any")"#
            ]
        );
    }
}
