use thiserror::Error;

use crate::Role;

/// Failures of the authorization core itself.
///
/// None of these is a permission denial: a denial is an ordinary `false` from
/// [`Ability::can`](crate::Ability::can). These indicate a broken permission
/// table or a caller bug and must fail the request loudly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The permission table has no rule-building function for a role.
    #[error("missing permission definitions for role '{0}'")]
    MissingRolePermissions(Role),

    /// A subject record carried no recognized `__typename` tag.
    #[error("unknown subject kind: {0}")]
    UnknownSubjectKind(String),

    /// A subject record was tagged correctly but its attributes did not decode.
    #[error("invalid subject: {0}")]
    InvalidSubject(String),

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("unknown action '{0}'")]
    UnknownAction(String),
}
