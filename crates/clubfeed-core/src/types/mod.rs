//! Shared value types used by every layer.

pub mod id;
pub mod kind;
pub mod scope;
pub mod session;

pub use id::{GroupId, OrgId, RecordId, UserId};
pub use kind::SourceKind;
pub use scope::ScopeFilter;
pub use session::{MemberRole, Membership, SessionContext};
