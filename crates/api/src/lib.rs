//! Request-side permission checks.
//!
//! Handlers resolve the acting user's membership in the targeted organization,
//! build an ability for the resolved role and query it before touching data.
//! HTTP routing and persistence live outside this crate.

pub mod authz;
pub mod context;
pub mod directory;
pub mod error;
pub mod records;

pub use authz::{OrgScope, Operation};
pub use context::RequestContext;
pub use directory::{InMemoryDirectory, MembershipDirectory};
pub use error::ApiError;
pub use records::{Invite, Membership, Organization, Project};
