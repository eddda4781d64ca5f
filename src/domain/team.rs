use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamRole {
    Owner,
    Manager,
    Member,
}

impl TeamRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Owner => "OWNER",
            TeamRole::Manager => "MANAGER",
            TeamRole::Member => "MEMBER",
        }
    }
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeamRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OWNER" => Ok(TeamRole::Owner),
            "MANAGER" => Ok(TeamRole::Manager),
            "MEMBER" => Ok(TeamRole::Member),
            other => Err(DomainError::Validation(format!(
                "role must be one of OWNER, MANAGER, MEMBER (got '{}')",
                other
            ))),
        }
    }
}

/// Roles allowed to manage a team's membership.
pub const MEMBERSHIP_MANAGERS: &[TeamRole] = &[TeamRole::Owner, TeamRole::Manager];

#[derive(Debug, Clone)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TeamMember {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
}

/// The public slice of a user shown next to a membership.
#[derive(Debug, Clone)]
pub struct MemberUser {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
}

#[derive(Debug, Clone)]
pub struct TeamMemberView {
    pub member: TeamMember,
    pub user: MemberUser,
}

#[derive(Debug, Clone)]
pub struct TeamDetail {
    pub team: Team,
    pub members: Vec<TeamMemberView>,
}

#[derive(Debug, Clone)]
pub struct WorkspaceItem {
    pub id: Uuid,
    pub team_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWorkspaceItem {
    pub team_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct WorkspaceItemChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}
