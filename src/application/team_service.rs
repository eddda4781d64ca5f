use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::{TeamRepository, UserRepository};
use crate::domain::team::{
    NewWorkspaceItem, Team, TeamDetail, TeamMember, TeamMemberView, TeamRole, WorkspaceItem,
    WorkspaceItemChanges, MEMBERSHIP_MANAGERS,
};

use super::run_blocking;

const NOT_A_MEMBER: &str = "You are not a member of this team";
const NO_PERMISSION: &str = "You do not have permission to perform this action";

pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
}

impl TeamService {
    pub fn new(teams: Arc<dyn TeamRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { teams, users }
    }

    /// Membership guard: the caller must belong to the team and, when
    /// `allowed` is given, hold one of those roles.
    pub async fn require_role(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        allowed: Option<&[TeamRole]>,
    ) -> Result<TeamMember, DomainError> {
        let teams = self.teams.clone();
        let membership = run_blocking(move || teams.find_membership(team_id, user_id))
            .await?
            .ok_or_else(|| DomainError::Forbidden(NOT_A_MEMBER.to_string()))?;

        match allowed {
            Some(roles) if !roles.contains(&membership.role) => {
                Err(DomainError::Forbidden(NO_PERMISSION.to_string()))
            }
            _ => Ok(membership),
        }
    }

    pub async fn create_team(&self, owner_id: Uuid, name: String) -> Result<Team, DomainError> {
        let teams = self.teams.clone();
        let team = run_blocking(move || teams.create_with_owner(name, owner_id)).await?;
        log::info!("Team {} created by {}", team.id, owner_id);
        Ok(team)
    }

    /// Teams the user belongs to, most recently joined first.
    pub async fn my_teams(&self, user_id: Uuid) -> Result<Vec<Team>, DomainError> {
        let teams = self.teams.clone();
        run_blocking(move || teams.teams_for_user(user_id)).await
    }

    pub async fn get_team(&self, team_id: Uuid, user_id: Uuid) -> Result<TeamDetail, DomainError> {
        let team = self.find_team(team_id).await?;
        let teams = self.teams.clone();
        let members = run_blocking(move || teams.list_members(team_id)).await?;
        if !members.iter().any(|m| m.member.user_id == user_id) {
            return Err(DomainError::Forbidden(NOT_A_MEMBER.to_string()));
        }
        Ok(TeamDetail { team, members })
    }

    pub async fn members(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<TeamMemberView>, DomainError> {
        self.require_role(team_id, user_id, None).await?;
        let teams = self.teams.clone();
        run_blocking(move || teams.list_members(team_id)).await
    }

    pub async fn add_member(
        &self,
        team_id: Uuid,
        actor_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> Result<TeamMemberView, DomainError> {
        self.require_role(team_id, actor_id, Some(MEMBERSHIP_MANAGERS))
            .await?;
        self.find_team(team_id).await?;

        let users = self.users.clone();
        if run_blocking(move || users.find_by_id(user_id)).await?.is_none() {
            return Err(DomainError::not_found("User", "User not found"));
        }

        let teams = self.teams.clone();
        run_blocking(move || {
            if teams.find_membership(team_id, user_id)?.is_some() {
                return Err(DomainError::Validation(
                    "User is already a member of this team".to_string(),
                ));
            }
            let member = teams.add_member(team_id, user_id, role)?;
            teams
                .member_view(member.id)?
                .ok_or_else(|| DomainError::not_found("TeamMember", "Team member not found"))
        })
        .await
    }

    pub async fn update_member_role(
        &self,
        team_id: Uuid,
        actor_id: Uuid,
        member_id: Uuid,
        role: TeamRole,
    ) -> Result<TeamMemberView, DomainError> {
        self.require_role(team_id, actor_id, Some(MEMBERSHIP_MANAGERS))
            .await?;

        let teams = self.teams.clone();
        run_blocking(move || {
            let member = member_of(teams.as_ref(), team_id, member_id)?;
            if member.role == TeamRole::Owner
                && role != TeamRole::Owner
                && teams.count_owners(team_id)? <= 1
            {
                return Err(DomainError::Validation(
                    "Cannot change the role of the last owner".to_string(),
                ));
            }
            teams.update_member_role(member_id, role)?;
            teams
                .member_view(member_id)?
                .ok_or_else(|| DomainError::not_found("TeamMember", "Team member not found"))
        })
        .await
    }

    pub async fn remove_member(
        &self,
        team_id: Uuid,
        actor_id: Uuid,
        member_id: Uuid,
    ) -> Result<(), DomainError> {
        self.require_role(team_id, actor_id, Some(MEMBERSHIP_MANAGERS))
            .await?;

        let teams = self.teams.clone();
        run_blocking(move || {
            let member = member_of(teams.as_ref(), team_id, member_id)?;
            if member.role == TeamRole::Owner && teams.count_owners(team_id)? <= 1 {
                return Err(DomainError::Validation(
                    "Cannot remove the last owner".to_string(),
                ));
            }
            teams.remove_member(member_id)
        })
        .await
    }

    pub async fn create_item(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        title: String,
        content: Option<String>,
    ) -> Result<WorkspaceItem, DomainError> {
        self.require_role(team_id, user_id, None).await?;
        let teams = self.teams.clone();
        run_blocking(move || {
            teams.create_item(NewWorkspaceItem {
                team_id,
                title,
                content,
                created_by: user_id,
            })
        })
        .await
    }

    /// Newest first.
    pub async fn list_items(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<WorkspaceItem>, DomainError> {
        self.require_role(team_id, user_id, None).await?;
        let teams = self.teams.clone();
        run_blocking(move || teams.list_items(team_id)).await
    }

    pub async fn get_item(
        &self,
        item_id: Uuid,
        user_id: Uuid,
    ) -> Result<WorkspaceItem, DomainError> {
        let item = self.find_item(item_id).await?;
        self.require_role(item.team_id, user_id, None).await?;
        Ok(item)
    }

    pub async fn update_item(
        &self,
        item_id: Uuid,
        user_id: Uuid,
        changes: WorkspaceItemChanges,
    ) -> Result<WorkspaceItem, DomainError> {
        self.get_item(item_id, user_id).await?;
        let teams = self.teams.clone();
        run_blocking(move || teams.update_item(item_id, changes)).await
    }

    pub async fn delete_item(&self, item_id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        self.get_item(item_id, user_id).await?;
        let teams = self.teams.clone();
        run_blocking(move || teams.delete_item(item_id)).await
    }

    async fn find_team(&self, team_id: Uuid) -> Result<Team, DomainError> {
        let teams = self.teams.clone();
        run_blocking(move || teams.find_by_id(team_id))
            .await?
            .ok_or_else(|| DomainError::not_found("Team", "Team not found"))
    }

    async fn find_item(&self, item_id: Uuid) -> Result<WorkspaceItem, DomainError> {
        let teams = self.teams.clone();
        run_blocking(move || teams.find_item(item_id))
            .await?
            .ok_or_else(|| DomainError::not_found("WorkspaceItem", "Workspace item not found"))
    }
}

/// The membership `member_id`, provided it belongs to `team_id`.
fn member_of(
    teams: &dyn TeamRepository,
    team_id: Uuid,
    member_id: Uuid,
) -> Result<TeamMember, DomainError> {
    teams
        .find_member(member_id)?
        .filter(|m| m.team_id == team_id)
        .ok_or_else(|| DomainError::not_found("TeamMember", "Team member not found"))
}
