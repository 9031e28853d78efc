//! `saas-auth` — the authorization core (pure, no IO).
//!
//! Decides, for a `(user, action, subject)` triple, whether the action is
//! allowed. Each role declares an ordered list of allow/deny rules; the last
//! matching rule wins and the absence of a match is a denial.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod ability;
pub mod action;
pub mod claims;
pub mod error;
pub mod explain;
pub mod permissions;
pub mod roles;
pub mod rule;
pub mod subject;
pub mod user;

pub use ability::{Ability, AbilityBuilder, Actions};
pub use action::Action;
pub use claims::{SessionClaims, TokenValidationError, validate_claims};
pub use error::AuthError;
pub use explain::AuthorizationExplanation;
pub use permissions::{DefinePermissions, PermissionTable, RoleDefinition, define_ability_for};
pub use roles::Role;
pub use rule::{Condition, Effect, Rule};
pub use subject::{
    BillingSubject, InviteSubject, OrganizationSubject, ProjectSubject, Subject, SubjectInstance,
    SubjectKind, UserSubject, kind_of,
};
pub use user::AuthUser;
