use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AuthError;

/// Verb being authorized.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Wildcard: a rule on `manage` covers every action.
    Manage,
    Get,
    Create,
    Update,
    Delete,
    Invite,
    TransferOwnership,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Manage,
        Action::Get,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::Invite,
        Action::TransferOwnership,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Manage => "manage",
            Action::Get => "get",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Invite => "invite",
            Action::TransferOwnership => "transfer_ownership",
        }
    }

    /// Whether a rule declared on `self` applies to a query for `requested`.
    pub fn matches(&self, requested: Action) -> bool {
        *self == Action::Manage || *self == requested
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| AuthError::UnknownAction(s.to_string()))
    }
}
