//! Access-control lists and the static permission catalog codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Level granted by a single access-control entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccessType {
    #[default]
    FullControl,
    ReadOnly,
}

/// One `{permissionId, accessType}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionGrant {
    pub permission_id: Uuid,
    #[serde(default)]
    pub access_type: AccessType,
}

/// Access-control list attached to a role, and snapshotted onto users created from it.
///
/// The snapshot is never live-joined back to the role: editing a role leaves
/// existing users' lists untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessControl {
    #[serde(default)]
    pub permissions: Vec<PermissionGrant>,
    #[serde(default)]
    pub has_all_permissions: bool,
}

impl AccessControl {
    /// Grant entry for `permission_id`, if any.
    pub fn grant_for(&self, permission_id: Uuid) -> Option<&PermissionGrant> {
        self.permissions
            .iter()
            .find(|grant| grant.permission_id == permission_id)
    }
}

/// Symbolic codes of the static permission catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionCode {
    ManagePermissions,
    ManageRoles,
    ManageUsers,
}

impl PermissionCode {
    pub const ALL: [PermissionCode; 3] = [
        PermissionCode::ManagePermissions,
        PermissionCode::ManageRoles,
        PermissionCode::ManageUsers,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ManagePermissions => "ManagePermissions",
            Self::ManageRoles => "ManageRoles",
            Self::ManageUsers => "ManageUsers",
        }
    }
}

impl fmt::Display for PermissionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown permission code: {0:?}")]
pub struct UnknownPermissionCode(pub String);

impl FromStr for PermissionCode {
    type Err = UnknownPermissionCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownPermissionCode(s.to_owned()))
    }
}
