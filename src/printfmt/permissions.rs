//! Permission checks.
//!
//! Operations ask a [`PermissionChecker`] whether a user may perform an action on
//! a document. [`RolePermissions`] grants actions per doctype and role, and lets
//! the administrator through unconditionally.

use crate::context::User;
use crate::error::Result;
use crate::model::Document;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

const PERMISSIONS_FILENAME: &str = "permissions.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
    Read,
    Print,
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionType::Read => write!(f, "read"),
            PermissionType::Print => write!(f, "print"),
        }
    }
}

pub trait PermissionChecker {
    fn has_permission(
        &self,
        user: &User,
        doctype: &str,
        ptype: PermissionType,
        doc: &Document,
    ) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRule {
    pub doctype: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<PermissionType>,
}

/// Role based grants, stored in `<home>/permissions.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissions {
    /// Roles held by each user
    #[serde(default)]
    pub users: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub rules: Vec<PermissionRule>,
}

impl RolePermissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(PERMISSIONS_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(PERMISSIONS_FILENAME), content)?;
        Ok(())
    }

    pub fn grant(mut self, doctype: &str, role: &str, permissions: &[PermissionType]) -> Self {
        self.rules.push(PermissionRule {
            doctype: doctype.to_string(),
            role: role.to_string(),
            permissions: permissions.to_vec(),
        });
        self
    }

    pub fn assign(mut self, user: &str, role: &str) -> Self {
        self.users
            .entry(user.to_string())
            .or_default()
            .push(role.to_string());
        self
    }

    /// Build a [`User`] carrying the roles assigned to `name`.
    pub fn user(&self, name: &str) -> User {
        User {
            name: name.to_string(),
            roles: self.users.get(name).cloned().unwrap_or_default(),
        }
    }
}

impl PermissionChecker for RolePermissions {
    fn has_permission(
        &self,
        user: &User,
        doctype: &str,
        ptype: PermissionType,
        _doc: &Document,
    ) -> bool {
        if user.is_administrator() {
            return true;
        }
        self.rules.iter().any(|rule| {
            rule.doctype == doctype && user.has_role(&rule.role) && rule.permissions.contains(&ptype)
        })
    }
}
