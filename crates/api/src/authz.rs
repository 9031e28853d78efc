//! Handler-side authorization guard.
//!
//! Every mutating or reading handler names its [`Operation`]; the guard maps it
//! to an `(action, subject)` query and turns a denial into
//! [`ApiError::Unauthorized`] carrying the message the caller sees.

use saas_auth::{Ability, Action, SubjectInstance, SubjectKind};

use crate::{ApiError, Invite, Membership, Organization, Project};

/// Operations guarded by a permission check.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation<'a> {
    CreateProject,
    GetProject,
    ListProjects,
    DeleteProject(&'a Project),
    UpdateOrganization,
    ShutdownOrganization,
    TransferOrganization,
    GetBilling,
    ListMembers,
    UpdateMember,
    RemoveMember,
    ListInvites,
    CreateInvite,
    RevokeInvite(&'a Invite),
}

enum Target<'a> {
    Kind(SubjectKind),
    Organization,
    Billing,
    Project(&'a Project),
    Invite(&'a Invite),
}

impl<'a> Operation<'a> {
    fn query(&self) -> (Action, Target<'a>) {
        match *self {
            Operation::CreateProject => (Action::Create, Target::Kind(SubjectKind::Project)),
            Operation::GetProject | Operation::ListProjects => {
                (Action::Get, Target::Kind(SubjectKind::Project))
            }
            Operation::DeleteProject(project) => (Action::Delete, Target::Project(project)),
            Operation::UpdateOrganization => (Action::Update, Target::Organization),
            Operation::ShutdownOrganization => (Action::Delete, Target::Organization),
            Operation::TransferOrganization => (Action::TransferOwnership, Target::Organization),
            Operation::GetBilling => (Action::Get, Target::Billing),
            Operation::ListMembers => (Action::Get, Target::Kind(SubjectKind::User)),
            Operation::UpdateMember => (Action::Update, Target::Kind(SubjectKind::User)),
            Operation::RemoveMember => (Action::Delete, Target::Kind(SubjectKind::User)),
            Operation::ListInvites => (Action::Get, Target::Kind(SubjectKind::Invite)),
            Operation::CreateInvite => (Action::Create, Target::Kind(SubjectKind::Invite)),
            Operation::RevokeInvite(invite) => (Action::Delete, Target::Invite(invite)),
        }
    }

    /// Message returned to the caller when the operation is denied.
    pub fn denial_message(&self) -> &'static str {
        match self {
            Operation::CreateProject => "You're not allowed to create new projects",
            Operation::GetProject => "You're not allowed to see this project",
            Operation::ListProjects => "You're not allowed to see organization projects",
            Operation::DeleteProject(_) => "You're not allowed to delete this project",
            Operation::UpdateOrganization => "You're not allowed to update this organization",
            Operation::ShutdownOrganization => "You're not allowed to shut down this organization",
            Operation::TransferOrganization => {
                "You're not allowed to transfer this organization ownership."
            }
            Operation::GetBilling => {
                "You don't have permission to view billing information on this organization"
            }
            Operation::ListMembers => "You're not allowed to see organization members",
            Operation::UpdateMember => "You're not allowed to update this member",
            Operation::RemoveMember => "You're not allowed to remove this member from the organization",
            Operation::ListInvites => "You're not allowed to get organization invites",
            Operation::CreateInvite => "You're not allowed to create new invites",
            Operation::RevokeInvite(_) => "You're not allowed to delete an invite",
        }
    }
}

/// The acting user's standing in one organization for one request.
#[derive(Debug, Clone)]
pub struct OrgScope {
    organization: Organization,
    membership: Membership,
    ability: Ability,
}

impl OrgScope {
    pub fn new(organization: Organization, membership: Membership, ability: Ability) -> Self {
        Self {
            organization,
            membership,
            ability,
        }
    }

    pub fn organization(&self) -> &Organization {
        &self.organization
    }

    pub fn membership(&self) -> &Membership {
        &self.membership
    }

    pub fn ability(&self) -> &Ability {
        &self.ability
    }

    /// Fail with the operation's denial message unless it is allowed.
    pub fn ensure(&self, operation: Operation<'_>) -> Result<(), ApiError> {
        let (action, target) = operation.query();

        let instance: SubjectInstance;
        let denied = match target {
            Target::Kind(kind) => self.ability.cannot(action, kind),
            Target::Organization => {
                instance = self.organization.to_subject();
                self.ability.cannot(action, &instance)
            }
            Target::Billing => {
                instance = self.organization.billing_subject();
                self.ability.cannot(action, &instance)
            }
            Target::Project(project) => {
                if project.organization_id != self.organization.id {
                    return Err(ApiError::bad_request("Project not found"));
                }
                instance = project.to_subject();
                self.ability.cannot(action, &instance)
            }
            Target::Invite(invite) => {
                if invite.organization_id != self.organization.id {
                    return Err(ApiError::bad_request("Invite not found"));
                }
                instance = invite.to_subject();
                self.ability.cannot(action, &instance)
            }
        };

        if denied {
            tracing::info!(
                user_id = %self.membership.user_id,
                organization = %self.organization.slug,
                role = %self.membership.role,
                ?operation,
                "operation denied"
            );
            return Err(ApiError::unauthorized(operation.denial_message()));
        }
        Ok(())
    }
}
