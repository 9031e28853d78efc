use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AuthError;

/// Role a user holds inside one organization.
///
/// The set is closed: every variant must have a rule-building function in the
/// permission table (see [`crate::permissions::definition_for`]).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Member,
    Billing,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Member, Role::Billing];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Member => "MEMBER",
            Role::Billing => "BILLING",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::Admin => "Organization administrator; manages everything except ownership-guarded actions",
            Role::Member => "Regular member; works on projects and reads membership listings",
            Role::Billing => "Billing contact; may only view billing information",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| AuthError::UnknownRole(s.to_string()))
    }
}
