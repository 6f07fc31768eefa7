//! Request-scoped context.
//!
//! Everything an operation needs to know about *who* is asking and *how* the
//! system is configured travels in a [`RequestContext`] passed by reference.
//! Nothing in the library reads process-wide state.

use crate::config::PrintConfig;
use crate::model::PrintParams;
use serde::{Deserialize, Serialize};

/// The privileged account allowed to edit standard print formats.
pub const ADMINISTRATOR: &str = "Administrator";

/// Fallback identity for unauthenticated callers.
pub const GUEST: &str = "Guest";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roles: Vec::new(),
        }
    }

    pub fn administrator() -> Self {
        Self::new(ADMINISTRATOR)
    }

    pub fn guest() -> Self {
        Self::new(GUEST)
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    pub fn is_administrator(&self) -> bool {
        self.name == ADMINISTRATOR
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user: User,
    pub params: PrintParams,
    pub config: PrintConfig,
}

impl RequestContext {
    pub fn new(user: User, config: PrintConfig) -> Self {
        Self {
            user,
            params: PrintParams::default(),
            config,
        }
    }

    pub fn with_params(mut self, params: PrintParams) -> Self {
        self.params = params;
        self
    }
}
