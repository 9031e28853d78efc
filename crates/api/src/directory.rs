use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use saas_core::{OrganizationId, UserId};

use crate::{Membership, Organization};

/// Lookup of a user's membership in an organization, keyed by organization slug.
pub trait MembershipDirectory: Send + Sync {
    fn find_membership(&self, user_id: UserId, slug: &str) -> Option<(Organization, Membership)>;
}

impl<D> MembershipDirectory for Arc<D>
where
    D: MembershipDirectory + ?Sized,
{
    fn find_membership(&self, user_id: UserId, slug: &str) -> Option<(Organization, Membership)> {
        (**self).find_membership(user_id, slug)
    }
}

#[derive(Debug, Default)]
struct DirectoryState {
    organizations: HashMap<OrganizationId, Organization>,
    memberships: Vec<Membership>,
}

/// In-memory membership directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    inner: RwLock<DirectoryState>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_organization(&self, organization: Organization) {
        if let Ok(mut state) = self.inner.write() {
            state.organizations.insert(organization.id, organization);
        }
    }

    /// Insert or replace the membership of `membership.user_id` in its organization.
    pub fn upsert_membership(&self, membership: Membership) {
        if let Ok(mut state) = self.inner.write() {
            state.memberships.retain(|m| {
                !(m.organization_id == membership.organization_id && m.user_id == membership.user_id)
            });
            state.memberships.push(membership);
        }
    }
}

impl MembershipDirectory for InMemoryDirectory {
    fn find_membership(&self, user_id: UserId, slug: &str) -> Option<(Organization, Membership)> {
        let state = self.inner.read().ok()?;
        let organization = state.organizations.values().find(|o| o.slug == slug)?;
        let membership = state
            .memberships
            .iter()
            .find(|m| m.organization_id == organization.id && m.user_id == user_id)?;
        Some((organization.clone(), membership.clone()))
    }
}
