use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::application::team_service::TeamService;
use crate::auth::AuthenticatedUser;
use crate::domain::team::{
    Team, TeamDetail, TeamMemberView, TeamRole, WorkspaceItem, WorkspaceItemChanges,
};
use crate::errors::{AppError, ErrorResponse};

use super::{validated, MessageResponse};

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/teams", web::post().to(create_team))
        .route("/teams", web::get().to(my_teams))
        .route("/teams/{id}", web::get().to(get_team))
        .route("/teams/{id}/members", web::get().to(list_members))
        .route("/teams/{id}/members", web::post().to(add_member))
        .route(
            "/teams/{teamId}/members/{memberId}",
            web::patch().to(update_member_role),
        )
        .route(
            "/teams/{teamId}/members/{memberId}",
            web::delete().to(remove_member),
        )
        .route("/teams/{teamId}/items", web::post().to(create_item))
        .route("/teams/{teamId}/items", web::get().to(list_items))
        .route("/items/{id}", web::get().to(get_item))
        .route("/items/{id}", web::put().to(update_item))
        .route("/items/{id}", web::delete().to(delete_item));
}

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 100, message = "name should not be empty"))]
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub user_id: Uuid,
    /// OWNER, MANAGER or MEMBER; defaults to MEMBER.
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMemberRoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 200, message = "title should not be empty"))]
    pub title: String,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, max = 200, message = "title should not be empty"))]
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Team> for TeamResponse {
    fn from(t: Team) -> Self {
        TeamResponse {
            id: t.id,
            name: t.name,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberUserResponse {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,
    pub user: MemberUserResponse,
}

impl From<TeamMemberView> for MemberResponse {
    fn from(view: TeamMemberView) -> Self {
        MemberResponse {
            id: view.member.id,
            team_id: view.member.team_id,
            user_id: view.member.user_id,
            role: view.member.role.as_str().to_string(),
            joined_at: view.member.joined_at,
            user: MemberUserResponse {
                id: view.user.id,
                email: view.user.email,
                nickname: view.user.nickname,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetailResponse {
    #[serde(flatten)]
    pub team: TeamResponse,
    pub members: Vec<MemberResponse>,
}

impl From<TeamDetail> for TeamDetailResponse {
    fn from(detail: TeamDetail) -> Self {
        TeamDetailResponse {
            team: TeamResponse::from(detail.team),
            members: detail.members.into_iter().map(MemberResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: Uuid,
    pub team_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WorkspaceItem> for ItemResponse {
    fn from(i: WorkspaceItem) -> Self {
        ItemResponse {
            id: i.id,
            team_id: i.team_id,
            title: i.title,
            content: i.content,
            created_by: i.created_by,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

// ── Teams ────────────────────────────────────────────────────────────────────

/// POST /api/teams
///
/// The caller becomes the team's first OWNER.
#[utoipa::path(
    post,
    path = "/api/teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = TeamResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
    ),
    tag = "teams"
)]
pub async fn create_team(
    service: web::Data<TeamService>,
    caller: AuthenticatedUser,
    body: web::Json<CreateTeamRequest>,
) -> Result<HttpResponse, AppError> {
    let body = validated(body)?;
    let team = service.create_team(caller.user_id, body.name).await?;
    Ok(HttpResponse::Created().json(TeamResponse::from(team)))
}

/// GET /api/teams
#[utoipa::path(
    get,
    path = "/api/teams",
    responses((status = 200, description = "Teams the caller belongs to", body = [TeamResponse])),
    tag = "teams"
)]
pub async fn my_teams(
    service: web::Data<TeamService>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let teams: Vec<TeamResponse> = service
        .my_teams(caller.user_id)
        .await?
        .into_iter()
        .map(TeamResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(teams))
}

/// GET /api/teams/{id}
#[utoipa::path(
    get,
    path = "/api/teams/{id}",
    params(("id" = Uuid, Path, description = "Team UUID")),
    responses(
        (status = 200, description = "Team with its members", body = TeamDetailResponse),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
        (status = 404, description = "Team not found", body = ErrorResponse),
    ),
    tag = "teams"
)]
pub async fn get_team(
    service: web::Data<TeamService>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let detail = service.get_team(path.into_inner(), caller.user_id).await?;
    Ok(HttpResponse::Ok().json(TeamDetailResponse::from(detail)))
}

// ── Members ──────────────────────────────────────────────────────────────────

/// GET /api/teams/{id}/members
#[utoipa::path(
    get,
    path = "/api/teams/{id}/members",
    params(("id" = Uuid, Path, description = "Team UUID")),
    responses(
        (status = 200, description = "Members in join order", body = [MemberResponse]),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
    ),
    tag = "teams"
)]
pub async fn list_members(
    service: web::Data<TeamService>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let members: Vec<MemberResponse> = service
        .members(path.into_inner(), caller.user_id)
        .await?
        .into_iter()
        .map(MemberResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(members))
}

/// POST /api/teams/{id}/members
#[utoipa::path(
    post,
    path = "/api/teams/{id}/members",
    params(("id" = Uuid, Path, description = "Team UUID")),
    request_body = AddMemberRequest,
    responses(
        (status = 201, description = "Member added", body = MemberResponse),
        (status = 400, description = "Already a member or bad role", body = ErrorResponse),
        (status = 403, description = "Caller may not manage members", body = ErrorResponse),
        (status = 404, description = "Team or user not found", body = ErrorResponse),
    ),
    tag = "teams"
)]
pub async fn add_member(
    service: web::Data<TeamService>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<AddMemberRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let role = match body.role {
        Some(raw) => raw.parse::<TeamRole>()?,
        None => TeamRole::Member,
    };
    let member = service
        .add_member(path.into_inner(), caller.user_id, body.user_id, role)
        .await?;
    Ok(HttpResponse::Created().json(MemberResponse::from(member)))
}

/// PATCH /api/teams/{teamId}/members/{memberId}
#[utoipa::path(
    patch,
    path = "/api/teams/{teamId}/members/{memberId}",
    params(
        ("teamId" = Uuid, Path, description = "Team UUID"),
        ("memberId" = Uuid, Path, description = "Membership UUID"),
    ),
    request_body = UpdateMemberRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = MemberResponse),
        (status = 400, description = "Would demote the last owner", body = ErrorResponse),
        (status = 403, description = "Caller may not manage members", body = ErrorResponse),
        (status = 404, description = "Member not in this team", body = ErrorResponse),
    ),
    tag = "teams"
)]
pub async fn update_member_role(
    service: web::Data<TeamService>,
    caller: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<UpdateMemberRoleRequest>,
) -> Result<HttpResponse, AppError> {
    let (team_id, member_id) = path.into_inner();
    let role = body.into_inner().role.parse::<TeamRole>()?;
    let member = service
        .update_member_role(team_id, caller.user_id, member_id, role)
        .await?;
    Ok(HttpResponse::Ok().json(MemberResponse::from(member)))
}

/// DELETE /api/teams/{teamId}/members/{memberId}
#[utoipa::path(
    delete,
    path = "/api/teams/{teamId}/members/{memberId}",
    params(
        ("teamId" = Uuid, Path, description = "Team UUID"),
        ("memberId" = Uuid, Path, description = "Membership UUID"),
    ),
    responses(
        (status = 200, description = "Member removed", body = MessageResponse),
        (status = 400, description = "Would remove the last owner", body = ErrorResponse),
        (status = 403, description = "Caller may not manage members", body = ErrorResponse),
        (status = 404, description = "Member not in this team", body = ErrorResponse),
    ),
    tag = "teams"
)]
pub async fn remove_member(
    service: web::Data<TeamService>,
    caller: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (team_id, member_id) = path.into_inner();
    service
        .remove_member(team_id, caller.user_id, member_id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Member removed successfully")))
}

// ── Workspace items ──────────────────────────────────────────────────────────

/// POST /api/teams/{teamId}/items
#[utoipa::path(
    post,
    path = "/api/teams/{teamId}/items",
    params(("teamId" = Uuid, Path, description = "Team UUID")),
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
    ),
    tag = "teams"
)]
pub async fn create_item(
    service: web::Data<TeamService>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<CreateItemRequest>,
) -> Result<HttpResponse, AppError> {
    let body = validated(body)?;
    let item = service
        .create_item(path.into_inner(), caller.user_id, body.title, body.content)
        .await?;
    Ok(HttpResponse::Created().json(ItemResponse::from(item)))
}

/// GET /api/teams/{teamId}/items
#[utoipa::path(
    get,
    path = "/api/teams/{teamId}/items",
    params(("teamId" = Uuid, Path, description = "Team UUID")),
    responses(
        (status = 200, description = "Items, newest first", body = [ItemResponse]),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
    ),
    tag = "teams"
)]
pub async fn list_items(
    service: web::Data<TeamService>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let items: Vec<ItemResponse> = service
        .list_items(path.into_inner(), caller.user_id)
        .await?
        .into_iter()
        .map(ItemResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /api/items/{id}
#[utoipa::path(
    get,
    path = "/api/items/{id}",
    params(("id" = Uuid, Path, description = "Workspace item UUID")),
    responses(
        (status = 200, description = "Item found", body = ItemResponse),
        (status = 403, description = "Caller is not a member of the item's team", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
    ),
    tag = "teams"
)]
pub async fn get_item(
    service: web::Data<TeamService>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let item = service.get_item(path.into_inner(), caller.user_id).await?;
    Ok(HttpResponse::Ok().json(ItemResponse::from(item)))
}

/// PUT /api/items/{id}
#[utoipa::path(
    put,
    path = "/api/items/{id}",
    params(("id" = Uuid, Path, description = "Workspace item UUID")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 403, description = "Caller is not a member of the item's team", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
    ),
    tag = "teams"
)]
pub async fn update_item(
    service: web::Data<TeamService>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateItemRequest>,
) -> Result<HttpResponse, AppError> {
    let body = validated(body)?;
    let item = service
        .update_item(
            path.into_inner(),
            caller.user_id,
            WorkspaceItemChanges {
                title: body.title,
                content: body.content,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(ItemResponse::from(item)))
}

/// DELETE /api/items/{id}
#[utoipa::path(
    delete,
    path = "/api/items/{id}",
    params(("id" = Uuid, Path, description = "Workspace item UUID")),
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 403, description = "Caller is not a member of the item's team", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
    ),
    tag = "teams"
)]
pub async fn delete_item(
    service: web::Data<TeamService>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    service.delete_item(path.into_inner(), caller.user_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(
        "Workspace item deleted successfully",
    )))
}
