use saas_core::UserId;
use serde::{Deserialize, Serialize};

use crate::Role;

/// The acting user of a permission check.
///
/// `role` is the role resolved from the user's membership in the organization
/// the request targets, not a global attribute of the account.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub role: Role,
}

impl AuthUser {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}
