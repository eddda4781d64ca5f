use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::TeamRepository;
use crate::domain::team::{
    MemberUser, NewWorkspaceItem, Team, TeamMember, TeamMemberView, TeamRole, WorkspaceItem,
    WorkspaceItemChanges,
};
use crate::schema::{team_members, teams, users, workspace_items};

use super::models::{
    NewTeamMemberRow, NewTeamRow, NewWorkspaceItemRow, TeamMemberRow, TeamRow,
    WorkspaceItemChangeset, WorkspaceItemRow,
};

pub struct DieselTeamRepository {
    pool: DbPool,
}

impl DieselTeamRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

type MemberWithUser = (TeamMemberRow, (Uuid, String, String));

fn to_view((member, (id, email, nickname)): MemberWithUser) -> Result<TeamMemberView, DomainError> {
    Ok(TeamMemberView {
        member: member.try_into()?,
        user: MemberUser {
            id,
            email,
            nickname,
        },
    })
}

impl TeamRepository for DieselTeamRepository {
    fn create_with_owner(&self, name: String, owner_id: Uuid) -> Result<Team, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let team = diesel::insert_into(teams::table)
                .values(&NewTeamRow {
                    id: Uuid::new_v4(),
                    name,
                })
                .returning(TeamRow::as_returning())
                .get_result(conn)?;

            diesel::insert_into(team_members::table)
                .values(&NewTeamMemberRow {
                    id: Uuid::new_v4(),
                    team_id: team.id,
                    user_id: owner_id,
                    role: TeamRole::Owner.as_str().to_string(),
                })
                .execute(conn)?;

            Ok(team.into())
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = teams::table
            .find(id)
            .select(TeamRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Team::from))
    }

    fn teams_for_user(&self, user_id: Uuid) -> Result<Vec<Team>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = teams::table
            .inner_join(team_members::table)
            .filter(team_members::user_id.eq(user_id))
            .select(TeamRow::as_select())
            .order(team_members::joined_at.desc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Team::from).collect())
    }

    fn find_membership(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TeamMember>, DomainError> {
        let mut conn = self.pool.get()?;

        team_members::table
            .filter(team_members::team_id.eq(team_id))
            .filter(team_members::user_id.eq(user_id))
            .select(TeamMemberRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(TeamMember::try_from)
            .transpose()
    }

    fn find_member(&self, member_id: Uuid) -> Result<Option<TeamMember>, DomainError> {
        let mut conn = self.pool.get()?;

        team_members::table
            .find(member_id)
            .select(TeamMemberRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(TeamMember::try_from)
            .transpose()
    }

    fn list_members(&self, team_id: Uuid) -> Result<Vec<TeamMemberView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<MemberWithUser> = team_members::table
            .inner_join(users::table)
            .filter(team_members::team_id.eq(team_id))
            .select((
                TeamMemberRow::as_select(),
                (users::id, users::email, users::nickname),
            ))
            .order(team_members::joined_at.asc())
            .load(&mut conn)?;
        rows.into_iter().map(to_view).collect()
    }

    fn member_view(&self, member_id: Uuid) -> Result<Option<TeamMemberView>, DomainError> {
        let mut conn = self.pool.get()?;

        let row: Option<MemberWithUser> = team_members::table
            .inner_join(users::table)
            .filter(team_members::id.eq(member_id))
            .select((
                TeamMemberRow::as_select(),
                (users::id, users::email, users::nickname),
            ))
            .first(&mut conn)
            .optional()?;
        row.map(to_view).transpose()
    }

    fn add_member(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> Result<TeamMember, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(team_members::table)
            .values(&NewTeamMemberRow {
                id: Uuid::new_v4(),
                team_id,
                user_id,
                role: role.as_str().to_string(),
            })
            .returning(TeamMemberRow::as_returning())
            .get_result(&mut conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    DomainError::Validation("User is already a member of this team".to_string())
                }
                other => other.into(),
            })?;
        row.try_into()
    }

    fn update_member_role(&self, member_id: Uuid, role: TeamRole) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(team_members::table.find(member_id))
            .set(team_members::role.eq(role.as_str()))
            .execute(&mut conn)?;
        Ok(())
    }

    fn remove_member(&self, member_id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::delete(team_members::table.find(member_id)).execute(&mut conn)?;
        Ok(())
    }

    fn count_owners(&self, team_id: Uuid) -> Result<i64, DomainError> {
        let mut conn = self.pool.get()?;

        let owners = team_members::table
            .filter(team_members::team_id.eq(team_id))
            .filter(team_members::role.eq(TeamRole::Owner.as_str()))
            .count()
            .get_result(&mut conn)?;
        Ok(owners)
    }

    fn create_item(&self, item: NewWorkspaceItem) -> Result<WorkspaceItem, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(workspace_items::table)
            .values(&NewWorkspaceItemRow {
                id: Uuid::new_v4(),
                team_id: item.team_id,
                title: item.title,
                content: item.content,
                created_by: item.created_by,
            })
            .returning(WorkspaceItemRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn list_items(&self, team_id: Uuid) -> Result<Vec<WorkspaceItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = workspace_items::table
            .filter(workspace_items::team_id.eq(team_id))
            .select(WorkspaceItemRow::as_select())
            .order(workspace_items::created_at.desc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(WorkspaceItem::from).collect())
    }

    fn find_item(&self, id: Uuid) -> Result<Option<WorkspaceItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = workspace_items::table
            .find(id)
            .select(WorkspaceItemRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(WorkspaceItem::from))
    }

    fn update_item(
        &self,
        id: Uuid,
        changes: WorkspaceItemChanges,
    ) -> Result<WorkspaceItem, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(workspace_items::table.find(id))
            .set(&WorkspaceItemChangeset {
                title: changes.title,
                content: changes.content,
                updated_at: Utc::now(),
            })
            .returning(WorkspaceItemRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn delete_item(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::delete(workspace_items::table.find(id)).execute(&mut conn)?;
        Ok(())
    }
}
