//! `saas-core` — identifiers and error primitives shared by every crate.
//!
//! This crate contains no policy and no infrastructure concerns.

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::{InviteId, MemberId, OrganizationId, ProjectId, UserId};
