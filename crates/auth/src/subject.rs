//! Subject type registry.
//!
//! A subject is either a bare resource kind (`"Project"`) or a concrete record
//! carrying the attributes conditional rules look at. Records are always
//! tagged with their kind under [`TYPENAME_TAG`]; the kind is never inferred
//! from which fields happen to be present.

use core::str::FromStr;

use saas_core::{InviteId, OrganizationId, ProjectId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::AuthError;

/// Discriminator field carried by every subject record.
pub const TYPENAME_TAG: &str = "__typename";

/// Closed set of resource kinds rules can be declared on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectKind {
    User,
    Project,
    Organization,
    Invite,
    Billing,
    /// Wildcard: a rule on `all` covers every kind.
    #[serde(rename = "all")]
    All,
}

impl SubjectKind {
    pub const ALL: [SubjectKind; 6] = [
        SubjectKind::User,
        SubjectKind::Project,
        SubjectKind::Organization,
        SubjectKind::Invite,
        SubjectKind::Billing,
        SubjectKind::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::User => "User",
            SubjectKind::Project => "Project",
            SubjectKind::Organization => "Organization",
            SubjectKind::Invite => "Invite",
            SubjectKind::Billing => "Billing",
            SubjectKind::All => "all",
        }
    }

    /// Whether a rule declared on `self` applies to a query for `queried`.
    pub fn matches(&self, queried: SubjectKind) -> bool {
        *self == SubjectKind::All || *self == queried
    }
}

impl core::fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubjectKind {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubjectKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AuthError::UnknownSubjectKind(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSubject {
    pub id: OrganizationId,
    pub owner_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSubject {
    pub id: ProjectId,
    pub owner_id: UserId,
    pub organization_id: OrganizationId,
}

/// A user as the target of an action (e.g. the user behind a membership).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSubject {
    pub id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteSubject {
    pub id: InviteId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingSubject {
    pub organization_id: OrganizationId,
}

/// A concrete, tagged subject record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum SubjectInstance {
    User(UserSubject),
    Project(ProjectSubject),
    Organization(OrganizationSubject),
    Invite(InviteSubject),
    Billing(BillingSubject),
}

impl SubjectInstance {
    pub fn kind(&self) -> SubjectKind {
        match self {
            SubjectInstance::User(_) => SubjectKind::User,
            SubjectInstance::Project(_) => SubjectKind::Project,
            SubjectInstance::Organization(_) => SubjectKind::Organization,
            SubjectInstance::Invite(_) => SubjectKind::Invite,
            SubjectInstance::Billing(_) => SubjectKind::Billing,
        }
    }

    /// Owner of the record, for kinds that carry ownership.
    pub fn owner_id(&self) -> Option<UserId> {
        match self {
            SubjectInstance::Project(p) => Some(p.owner_id),
            SubjectInstance::Organization(o) => Some(o.owner_id),
            SubjectInstance::User(_) | SubjectInstance::Invite(_) | SubjectInstance::Billing(_) => {
                None
            }
        }
    }

    /// Decode an untyped record: resolve its kind from the tag, then its attributes.
    pub fn from_value(value: &Value) -> Result<Self, AuthError> {
        let kind = kind_of(value)?;
        SubjectInstance::deserialize(value)
            .map_err(|e| AuthError::InvalidSubject(format!("{kind}: {e}")))
    }
}

impl From<UserSubject> for SubjectInstance {
    fn from(value: UserSubject) -> Self {
        Self::User(value)
    }
}

impl From<ProjectSubject> for SubjectInstance {
    fn from(value: ProjectSubject) -> Self {
        Self::Project(value)
    }
}

impl From<OrganizationSubject> for SubjectInstance {
    fn from(value: OrganizationSubject) -> Self {
        Self::Organization(value)
    }
}

impl From<InviteSubject> for SubjectInstance {
    fn from(value: InviteSubject) -> Self {
        Self::Invite(value)
    }
}

impl From<BillingSubject> for SubjectInstance {
    fn from(value: BillingSubject) -> Self {
        Self::Billing(value)
    }
}

/// Resolve the kind of an untyped subject record from its `__typename` tag.
///
/// An absent, non-string or unregistered tag is a caller bug and yields
/// [`AuthError::UnknownSubjectKind`]; it is never treated as a denial.
pub fn kind_of(value: &Value) -> Result<SubjectKind, AuthError> {
    let tag = value
        .get(TYPENAME_TAG)
        .ok_or_else(|| AuthError::UnknownSubjectKind(format!("missing {TYPENAME_TAG} tag")))?;
    let name = tag
        .as_str()
        .ok_or_else(|| AuthError::UnknownSubjectKind(format!("non-string tag {tag}")))?;

    match name.parse::<SubjectKind>()? {
        SubjectKind::All => Err(AuthError::UnknownSubjectKind(
            "'all' is not a record kind".to_string(),
        )),
        kind => Ok(kind),
    }
}

/// What a permission query is asked about.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Subject<'a> {
    /// A bare kind; conditional rules cannot be evaluated and are skipped.
    Kind(SubjectKind),
    /// A concrete record; conditional rules are evaluated against it.
    Instance(&'a SubjectInstance),
}

impl<'a> Subject<'a> {
    pub fn kind(&self) -> SubjectKind {
        match self {
            Subject::Kind(kind) => *kind,
            Subject::Instance(instance) => instance.kind(),
        }
    }

    pub fn instance(&self) -> Option<&'a SubjectInstance> {
        match self {
            Subject::Kind(_) => None,
            Subject::Instance(instance) => Some(instance),
        }
    }
}

impl core::fmt::Display for Subject<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Subject::Kind(kind) => write!(f, "{kind}"),
            Subject::Instance(instance) => write!(f, "{} instance", instance.kind()),
        }
    }
}

impl From<SubjectKind> for Subject<'static> {
    fn from(value: SubjectKind) -> Self {
        Subject::Kind(value)
    }
}

impl<'a> From<&'a SubjectInstance> for Subject<'a> {
    fn from(value: &'a SubjectInstance) -> Self {
        Subject::Instance(value)
    }
}
