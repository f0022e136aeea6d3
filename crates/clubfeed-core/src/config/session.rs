//! Session used when no interactive sign-in exists (daemon, CLI).

use serde::{Deserialize, Serialize};

use crate::types::id::UserId;
use crate::types::session::{Membership, SessionContext};

/// Statically configured identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// The user to aggregate for.
    #[serde(default)]
    pub user_id: Option<String>,
    /// The user's memberships.
    #[serde(default)]
    pub memberships: Vec<Membership>,
}

impl SessionConfig {
    /// Convert into a session context, if a user is configured.
    pub fn to_context(&self) -> Option<SessionContext> {
        self.user_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(|id| SessionContext {
                user_id: UserId::new(id),
                memberships: self.memberships.clone(),
            })
    }
}
