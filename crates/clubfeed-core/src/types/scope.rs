//! Query scope handed to the record store.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::id::{GroupId, OrgId, UserId};
use super::session::SessionContext;

/// Restricts a record query to what one user may possibly see.
///
/// The store filters by organization, group, and owner; readers still
/// apply the per-kind rules (own records, enable flags) on top.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeFilter {
    /// Organizations whose records are in scope.
    pub org_ids: BTreeSet<OrgId>,
    /// Groups whose records are in scope.
    pub group_ids: BTreeSet<GroupId>,
    /// Organizations where every group's records are in scope.
    #[serde(default)]
    pub all_groups_org_ids: BTreeSet<OrgId>,
    /// Owner of personal-scope records.
    pub owner_id: Option<UserId>,
}

impl ScopeFilter {
    /// Build the filter covering every membership of a session plus its
    /// personal space.
    pub fn for_session(ctx: &SessionContext) -> Self {
        Self {
            org_ids: ctx.memberships.iter().map(|m| m.org_id.clone()).collect(),
            group_ids: ctx
                .memberships
                .iter()
                .flat_map(|m| m.group_ids.iter().cloned())
                .collect(),
            all_groups_org_ids: ctx
                .memberships
                .iter()
                .filter(|m| m.role.is_elevated())
                .map(|m| m.org_id.clone())
                .collect(),
            owner_id: Some(ctx.user_id.clone()),
        }
    }

    /// Whether an organization is in scope.
    pub fn includes_org(&self, org_id: &OrgId) -> bool {
        self.org_ids.contains(org_id)
    }

    /// Whether a record scoped to `group_id` inside `org_id` is in scope.
    pub fn includes_group(&self, org_id: &OrgId, group_id: &GroupId) -> bool {
        self.includes_org(org_id)
            && (self.all_groups_org_ids.contains(org_id) || self.group_ids.contains(group_id))
    }
}
