//! Account class and activation status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed partition of the user namespace.
///
/// Wire format: `"Admin"` / `"Customer"`. Tokens carry the lowercase form
/// (see [`AccountType::scope`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Admin,
    Customer,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Customer => "Customer",
        }
    }

    /// Lowercase form embedded in bearer tokens and matched against required scopes.
    pub fn scope(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }

    pub fn from_scope(scope: &str) -> Option<Self> {
        match scope {
            "admin" => Some(Self::Admin),
            "customer" => Some(Self::Customer),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known [`AccountType`].
#[derive(Debug, Error)]
#[error("unknown account type: {0:?}")]
pub struct UnknownAccountType(pub String);

impl FromStr for AccountType {
    type Err = UnknownAccountType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Customer" => Ok(Self::Customer),
            other => Err(UnknownAccountType(other.to_owned())),
        }
    }
}

/// Activation state, orthogonal to verification and password state.
///
/// Starts `Inactive`, becomes `Active` on the first successful sign-in.
/// `Suspended` and `Banned` are set administratively and block every gated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActivationStatus {
    #[default]
    Inactive,
    Active,
    Suspended,
    Banned,
}

impl ActivationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inactive => "Inactive",
            Self::Active => "Active",
            Self::Suspended => "Suspended",
            Self::Banned => "Banned",
        }
    }

    pub fn is_blocked(self) -> bool {
        matches!(self, Self::Suspended | Self::Banned)
    }
}

impl fmt::Display for ActivationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known [`ActivationStatus`].
#[derive(Debug, Error)]
#[error("unknown activation status: {0:?}")]
pub struct UnknownActivationStatus(pub String);

impl FromStr for ActivationStatus {
    type Err = UnknownActivationStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Inactive" => Ok(Self::Inactive),
            "Active" => Ok(Self::Active),
            "Suspended" => Ok(Self::Suspended),
            "Banned" => Ok(Self::Banned),
            other => Err(UnknownActivationStatus(other.to_owned())),
        }
    }
}
