//! The signed-in user and the organizations they belong to.

use serde::{Deserialize, Serialize};

use super::id::{GroupId, OrgId, UserId};

/// Role a user holds inside one organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// Runs the organization.
    Director,
    /// Leads groups.
    Teacher,
    /// Regular member.
    Student,
}

impl MemberRole {
    /// Elevated roles see group-scoped records of every group in the
    /// organization, not only their own groups.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::Director | Self::Teacher)
    }

    /// Return the role as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Director => "director",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }
}

/// Membership of the current user in one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// The organization.
    pub org_id: OrgId,
    /// Display name of the organization.
    pub org_name: String,
    /// Role within the organization.
    pub role: MemberRole,
    /// Groups of the organization the user belongs to.
    #[serde(default)]
    pub group_ids: Vec<GroupId>,
}

/// Identity of the signed-in user as supplied by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// The signed-in user.
    pub user_id: UserId,
    /// All organization memberships of the user.
    #[serde(default)]
    pub memberships: Vec<Membership>,
}

impl SessionContext {
    /// Creates a new session context.
    pub fn new(user_id: impl Into<UserId>, memberships: Vec<Membership>) -> Self {
        Self {
            user_id: user_id.into(),
            memberships,
        }
    }

    /// Membership for an organization, if the user belongs to it.
    pub fn membership(&self, org_id: &OrgId) -> Option<&Membership> {
        self.memberships.iter().find(|m| &m.org_id == org_id)
    }

    /// Display name of an organization the user belongs to.
    pub fn org_name(&self, org_id: &OrgId) -> Option<&str> {
        self.membership(org_id).map(|m| m.org_name.as_str())
    }

    /// Whether the user may see a record scoped to `group_id` in `org_id`.
    ///
    /// Members see their own groups; elevated roles see every group of
    /// the organization.
    pub fn can_see_group(&self, org_id: &OrgId, group_id: &GroupId) -> bool {
        match self.membership(org_id) {
            Some(m) => m.role.is_elevated() || m.group_ids.contains(group_id),
            None => false,
        }
    }
}
