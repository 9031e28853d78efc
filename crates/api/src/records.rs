//! Records loaded by handlers, reduced to what permission checks need.

use saas_auth::{BillingSubject, InviteSubject, OrganizationSubject, ProjectSubject, Role, SubjectInstance};
use saas_core::{InviteId, MemberId, OrganizationId, ProjectId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: OrganizationId,
    pub slug: String,
    pub name: String,
    pub owner_id: UserId,
}

impl Organization {
    pub fn to_subject(&self) -> SubjectInstance {
        SubjectInstance::Organization(OrganizationSubject {
            id: self.id,
            owner_id: self.owner_id,
        })
    }

    pub fn billing_subject(&self) -> SubjectInstance {
        SubjectInstance::Billing(BillingSubject {
            organization_id: self.id,
        })
    }
}

/// A user's membership in one organization; carries the effective role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: MemberId,
    pub organization_id: OrganizationId,
    pub user_id: UserId,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub organization_id: OrganizationId,
    pub owner_id: UserId,
    pub name: String,
}

impl Project {
    pub fn to_subject(&self) -> SubjectInstance {
        SubjectInstance::Project(ProjectSubject {
            id: self.id,
            owner_id: self.owner_id,
            organization_id: self.organization_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub id: InviteId,
    pub organization_id: OrganizationId,
    pub email: String,
    pub role: Role,
}

impl Invite {
    pub fn to_subject(&self) -> SubjectInstance {
        SubjectInstance::Invite(InviteSubject { id: self.id })
    }
}
