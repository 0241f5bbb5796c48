//! Capability checks shared by view rendering and action handlers.
//!
//! The same [`can`] call decides whether an affordance is shown and whether
//! the handler behind it may run, so the two can never disagree. These checks
//! are a UX guard only; the backend has the final say.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Approve,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Approve => "approve",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Zones,
    Mehfils,
    NaatShareefs,
    Messages,
    KarkunJoinRequests,
    TarteebRequests,
    Tags,
    Categories,
    Khat,
}

impl ResourceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Zones => "zones",
            ResourceKind::Mehfils => "mehfils",
            ResourceKind::NaatShareefs => "naat_shareefs",
            ResourceKind::Messages => "messages",
            ResourceKind::KarkunJoinRequests => "karkun_join_requests",
            ResourceKind::TarteebRequests => "tarteeb_requests",
            ResourceKind::Tags => "tags",
            ResourceKind::Categories => "categories",
            ResourceKind::Khat => "khat",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission key checked for `action` on `resource`, e.g. `edit_zones`.
pub fn permission_key(action: Action, resource: ResourceKind) -> String {
    format!("{}_{}", action.as_str(), resource.as_str())
}

/// What the signed-in user may do.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    is_super_admin: bool,
    permissions: HashSet<String>,
}

impl Capabilities {
    pub fn new<I, S>(is_super_admin: bool, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            is_super_admin,
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Capabilities of an anonymous visitor: nothing is allowed.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn super_admin() -> Self {
        Self {
            is_super_admin: true,
            permissions: HashSet::new(),
        }
    }

    pub fn with_permission(mut self, key: impl Into<String>) -> Self {
        self.permissions.insert(key.into());
        self
    }

    /// Grants `action` on `resource`.
    pub fn allow(self, action: Action, resource: ResourceKind) -> Self {
        self.with_permission(permission_key(action, resource))
    }

    pub fn is_super_admin(&self) -> bool {
        self.is_super_admin
    }

    pub fn has_permission(&self, key: &str) -> bool {
        self.permissions.contains(key)
    }
}

/// Single source of truth for action gating.
pub fn can(capabilities: &Capabilities, action: Action, resource: ResourceKind) -> bool {
    capabilities.is_super_admin() || capabilities.has_permission(&permission_key(action, resource))
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("not allowed to {} {}", .action.as_str(), .resource)]
pub struct PermissionDenied {
    pub action: Action,
    pub resource: ResourceKind,
}

/// Like [`can`], but as a `Result` for handlers using `?`.
pub fn ensure(
    capabilities: &Capabilities,
    action: Action,
    resource: ResourceKind,
) -> Result<(), PermissionDenied> {
    if can(capabilities, action, resource) {
        Ok(())
    } else {
        Err(PermissionDenied { action, resource })
    }
}
