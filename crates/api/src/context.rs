use chrono::{DateTime, Utc};

use saas_auth::{AuthUser, PermissionTable, SessionClaims, define_ability_for, validate_claims};
use saas_core::UserId;

use crate::{ApiError, Membership, MembershipDirectory, OrgScope, Organization};

/// Authenticated identity of the current request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RequestContext {
    user_id: UserId,
}

impl RequestContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Accept already-verified token claims, checking their validity window.
    pub fn from_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<Self, ApiError> {
        validate_claims(claims, now).map_err(|e| {
            tracing::debug!(error = %e, "rejecting session claims");
            ApiError::unauthorized("Invalid token")
        })?;
        Ok(Self::new(claims.sub))
    }

    pub fn current_user_id(&self) -> UserId {
        self.user_id
    }

    /// The organization behind `slug` and the current user's membership in it.
    pub fn user_membership<D>(&self, directory: &D, slug: &str) -> Result<(Organization, Membership), ApiError>
    where
        D: MembershipDirectory + ?Sized,
    {
        directory
            .find_membership(self.user_id, slug)
            .ok_or_else(|| ApiError::unauthorized("You are not a member of this organization"))
    }

    /// Resolve membership in `slug` and build the ability for the resolved role.
    pub fn authorize_in<D>(&self, directory: &D, slug: &str) -> Result<OrgScope, ApiError>
    where
        D: MembershipDirectory + ?Sized,
    {
        let (organization, membership) = self.user_membership(directory, slug)?;
        let user = AuthUser::new(self.user_id, membership.role);
        let ability = define_ability_for(&user).inspect_err(|e| {
            tracing::error!(error = %e, organization = %organization.slug, "failed to build ability");
        })?;
        Ok(OrgScope::new(organization, membership, ability))
    }

    /// Like [`Self::authorize_in`], against a caller-supplied permission table.
    pub fn authorize_in_with<D>(
        &self,
        table: &PermissionTable,
        directory: &D,
        slug: &str,
    ) -> Result<OrgScope, ApiError>
    where
        D: MembershipDirectory + ?Sized,
    {
        let (organization, membership) = self.user_membership(directory, slug)?;
        let user = AuthUser::new(self.user_id, membership.role);
        let ability = table.define_ability_for(&user).inspect_err(|e| {
            tracing::error!(error = %e, organization = %organization.slug, "failed to build ability");
        })?;
        Ok(OrgScope::new(organization, membership, ability))
    }
}
