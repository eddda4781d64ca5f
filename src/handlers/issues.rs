use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::application::issue_service::IssueService;
use crate::auth::AuthenticatedUser;
use crate::domain::issue::{Issue, IssueChanges, IssuePage, IssueStatus, NewIssue};
use crate::errors::{AppError, ErrorResponse};

use super::{nullable, validated, MessageResponse};

pub fn routes(cfg: &mut web::ServiceConfig) {
    // `/issues/popular` must be registered ahead of `/issues/{id}`.
    cfg.route("/projects/{projectId}/issues", web::post().to(create_issue))
        .route("/projects/{projectId}/issues", web::get().to(list_issues))
        .route("/issues/popular", web::get().to(popular_issues))
        .route("/issues/{id}", web::get().to(get_issue))
        .route("/issues/{id}", web::put().to(update_issue))
        .route("/issues/{id}", web::delete().to(delete_issue));
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueRequest {
    #[validate(length(min = 1, max = 200, message = "title should not be empty"))]
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssueRequest {
    #[validate(length(min = 1, max = 200, message = "title should not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    /// One of OPEN, IN_PROGRESS, RESOLVED, CLOSED.
    pub status: Option<String>,
    /// `null` unassigns the issue.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub assignee_id: Option<Option<Uuid>>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IssueListQuery {
    /// Filter by status.
    pub status: Option<String>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must not be less than 1"))]
    pub page: i64,
    #[serde(default = "default_size")]
    #[validate(range(min = 1, max = 100, message = "size must be between 1 and 100"))]
    pub size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub reporter_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Issue> for IssueResponse {
    fn from(i: Issue) -> Self {
        IssueResponse {
            id: i.id,
            project_id: i.project_id,
            reporter_id: i.reporter_id,
            assignee_id: i.assignee_id,
            title: i.title,
            description: i.description,
            status: i.status.as_str().to_string(),
            view_count: i.view_count,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuePageResponse {
    pub items: Vec<IssueResponse>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
    pub total_pages: i64,
}

impl From<IssuePage> for IssuePageResponse {
    fn from(page: IssuePage) -> Self {
        let total_pages = page.total_pages();
        IssuePageResponse {
            items: page.items.into_iter().map(IssueResponse::from).collect(),
            total: page.total,
            page: page.page,
            size: page.size,
            total_pages,
        }
    }
}

fn parse_status(raw: Option<String>) -> Result<Option<IssueStatus>, AppError> {
    raw.map(|s| s.parse::<IssueStatus>())
        .transpose()
        .map_err(AppError::from)
}

/// POST /api/projects/{projectId}/issues
#[utoipa::path(
    post,
    path = "/api/projects/{projectId}/issues",
    params(("projectId" = Uuid, Path, description = "Project UUID")),
    request_body = CreateIssueRequest,
    responses(
        (status = 201, description = "Issue created", body = IssueResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Project or assignee not found", body = ErrorResponse),
    ),
    tag = "issues"
)]
pub async fn create_issue(
    service: web::Data<IssueService>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<CreateIssueRequest>,
) -> Result<HttpResponse, AppError> {
    let body = validated(body)?;
    let issue = service
        .create(NewIssue {
            project_id: path.into_inner(),
            reporter_id: caller.user_id,
            assignee_id: body.assignee_id,
            title: body.title,
            description: body.description,
        })
        .await?;
    Ok(HttpResponse::Created().json(IssueResponse::from(issue)))
}

/// GET /api/projects/{projectId}/issues
#[utoipa::path(
    get,
    path = "/api/projects/{projectId}/issues",
    params(("projectId" = Uuid, Path, description = "Project UUID"), IssueListQuery),
    responses(
        (status = 200, description = "One page of issues, newest first", body = IssuePageResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
    ),
    tag = "issues"
)]
pub async fn list_issues(
    service: web::Data<IssueService>,
    _caller: AuthenticatedUser,
    path: web::Path<Uuid>,
    query: web::Query<IssueListQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    query.validate()?;
    let status = parse_status(query.status)?;
    let page = service
        .list_by_project(path.into_inner(), status, query.page, query.size)
        .await?;
    Ok(HttpResponse::Ok().json(IssuePageResponse::from(page)))
}

/// GET /api/issues/popular
#[utoipa::path(
    get,
    path = "/api/issues/popular",
    responses(
        (status = 200, description = "Most viewed and discussed issues of the last week", body = [IssueResponse]),
    ),
    tag = "issues"
)]
pub async fn popular_issues(
    service: web::Data<IssueService>,
    _caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let issues: Vec<IssueResponse> = service
        .popular()
        .await?
        .into_iter()
        .map(IssueResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(issues))
}

/// GET /api/issues/{id}
///
/// Counts as a view.
#[utoipa::path(
    get,
    path = "/api/issues/{id}",
    params(("id" = Uuid, Path, description = "Issue UUID")),
    responses(
        (status = 200, description = "Issue found", body = IssueResponse),
        (status = 404, description = "Issue not found", body = ErrorResponse),
    ),
    tag = "issues"
)]
pub async fn get_issue(
    service: web::Data<IssueService>,
    _caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let issue = service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(IssueResponse::from(issue)))
}

/// PUT /api/issues/{id}
#[utoipa::path(
    put,
    path = "/api/issues/{id}",
    params(("id" = Uuid, Path, description = "Issue UUID")),
    request_body = UpdateIssueRequest,
    responses(
        (status = 200, description = "Issue updated", body = IssueResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Issue or assignee not found", body = ErrorResponse),
    ),
    tag = "issues"
)]
pub async fn update_issue(
    service: web::Data<IssueService>,
    _caller: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateIssueRequest>,
) -> Result<HttpResponse, AppError> {
    let body = validated(body)?;
    let changes = IssueChanges {
        title: body.title,
        description: body.description,
        status: parse_status(body.status)?,
        assignee_id: body.assignee_id,
    };
    let issue = service.update(path.into_inner(), changes).await?;
    Ok(HttpResponse::Ok().json(IssueResponse::from(issue)))
}

/// DELETE /api/issues/{id}
#[utoipa::path(
    delete,
    path = "/api/issues/{id}",
    params(("id" = Uuid, Path, description = "Issue UUID")),
    responses(
        (status = 200, description = "Issue deleted", body = MessageResponse),
        (status = 404, description = "Issue not found", body = ErrorResponse),
    ),
    tag = "issues"
)]
pub async fn delete_issue(
    service: web::Data<IssueService>,
    _caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    service.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Issue deleted successfully")))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::configure;
    use crate::testing::TestApp;

    #[actix_web::test]
    async fn create_in_unknown_project_is_not_found() {
        let app = TestApp::new();
        let (_, token) = app.user_with_token("dev@example.com");
        let srv = test::init_service(App::new().configure(|cfg| configure(cfg, &app.state))).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/projects/{}/issues", Uuid::new_v4()))
            .insert_header(("Authorization", token))
            .set_json(json!({ "title": "Crash on start" }))
            .to_request();
        let resp = test::call_service(&srv, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "PROJECT_NOT_FOUND");
    }

    #[actix_web::test]
    async fn reading_an_issue_counts_a_view() {
        let app = TestApp::new();
        let (user, token) = app.user_with_token("dev@example.com");
        let project = app.db.seed_project("Tracker");
        let srv = test::init_service(App::new().configure(|cfg| configure(cfg, &app.state))).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/projects/{}/issues", project.id))
            .insert_header(("Authorization", token.clone()))
            .set_json(json!({ "title": "Crash on start", "assigneeId": user.id }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&srv, req).await;
        assert_eq!(created["status"], "OPEN");
        assert_eq!(created["reporterId"], user.id.to_string());

        let uri = format!("/api/issues/{}", created["id"].as_str().unwrap());
        for expected in [1, 2] {
            let req = test::TestRequest::get()
                .uri(&uri)
                .insert_header(("Authorization", token.clone()))
                .to_request();
            let body: Value = test::call_and_read_body_json(&srv, req).await;
            assert_eq!(body["viewCount"], expected);
        }
    }

    #[actix_web::test]
    async fn list_reports_total_pages() {
        let app = TestApp::new();
        let (_, token) = app.user_with_token("dev@example.com");
        let project = app.db.seed_project("Tracker");
        let srv = test::init_service(App::new().configure(|cfg| configure(cfg, &app.state))).await;

        for n in 0..3 {
            let req = test::TestRequest::post()
                .uri(&format!("/api/projects/{}/issues", project.id))
                .insert_header(("Authorization", token.clone()))
                .set_json(json!({ "title": format!("issue {}", n) }))
                .to_request();
            test::call_service(&srv, req).await;
        }

        let req = test::TestRequest::get()
            .uri(&format!("/api/projects/{}/issues?page=1&size=2", project.id))
            .insert_header(("Authorization", token.clone()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&srv, req).await;
        assert_eq!(body["total"], 3);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["items"][0]["title"], "issue 2");

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/projects/{}/issues?page=9223372036854775807&size=100",
                project.id
            ))
            .insert_header(("Authorization", token))
            .to_request();
        let resp = test::call_service(&srv, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["total"], 3);
        assert!(body["items"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn oversized_page_is_rejected() {
        let app = TestApp::new();
        let (_, token) = app.user_with_token("dev@example.com");
        let srv = test::init_service(App::new().configure(|cfg| configure(cfg, &app.state))).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/projects/{}/issues?size=101", Uuid::new_v4()))
            .insert_header(("Authorization", token))
            .to_request();
        let resp = test::call_service(&srv, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn popular_is_not_captured_by_id_route() {
        let app = TestApp::new();
        let (_, token) = app.user_with_token("dev@example.com");
        let srv = test::init_service(App::new().configure(|cfg| configure(cfg, &app.state))).await;

        let req = test::TestRequest::get()
            .uri("/api/issues/popular")
            .insert_header(("Authorization", token))
            .to_request();
        let resp = test::call_service(&srv, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn update_rejects_unknown_status_and_can_unassign() {
        let app = TestApp::new();
        let (user, token) = app.user_with_token("dev@example.com");
        let project = app.db.seed_project("Tracker");
        let srv = test::init_service(App::new().configure(|cfg| configure(cfg, &app.state))).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/projects/{}/issues", project.id))
            .insert_header(("Authorization", token.clone()))
            .set_json(json!({ "title": "Crash", "assigneeId": user.id }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&srv, req).await;
        let uri = format!("/api/issues/{}", created["id"].as_str().unwrap());

        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(("Authorization", token.clone()))
            .set_json(json!({ "status": "DONE" }))
            .to_request();
        let resp = test::call_service(&srv, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(("Authorization", token.clone()))
            .set_json(json!({ "status": "RESOLVED", "assigneeId": null }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&srv, req).await;
        assert_eq!(body["status"], "RESOLVED");
        assert!(body["assigneeId"].is_null());
        assert_eq!(body["title"], "Crash");

        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(("Authorization", token.clone()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&srv, req).await;
        assert_eq!(body["message"], "Issue deleted successfully");

        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(("Authorization", token))
            .to_request();
        let resp = test::call_service(&srv, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
