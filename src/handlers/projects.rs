use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::application::project_service::ProjectService;
use crate::auth::AuthenticatedUser;
use crate::domain::project::{NewProject, Project};
use crate::errors::{AppError, ErrorResponse};

use super::validated;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/projects", web::post().to(create_project))
        .route("/projects", web::get().to(list_projects));
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "name should not be empty"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        ProjectResponse {
            id: p.id,
            name: p.name,
            description: p.description,
            created_at: p.created_at,
        }
    }
}

/// POST /api/projects
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    tag = "projects"
)]
pub async fn create_project(
    service: web::Data<ProjectService>,
    _caller: AuthenticatedUser,
    body: web::Json<CreateProjectRequest>,
) -> Result<HttpResponse, AppError> {
    let body = validated(body)?;
    let project = service
        .create(NewProject {
            name: body.name,
            description: body.description,
        })
        .await?;
    Ok(HttpResponse::Created().json(ProjectResponse::from(project)))
}

/// GET /api/projects
#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "Projects, newest first", body = [ProjectResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    tag = "projects"
)]
pub async fn list_projects(
    service: web::Data<ProjectService>,
    _caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let projects: Vec<ProjectResponse> = service
        .list()
        .await?
        .into_iter()
        .map(ProjectResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(projects))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    use crate::configure;
    use crate::testing::TestApp;

    #[actix_web::test]
    async fn create_and_list_projects() {
        let app = TestApp::new();
        let (_, token) = app.user_with_token("pm@example.com");
        let srv = test::init_service(App::new().configure(|cfg| configure(cfg, &app.state))).await;

        for name in ["Alpha", "Beta"] {
            let req = test::TestRequest::post()
                .uri("/api/projects")
                .insert_header(("Authorization", token.clone()))
                .set_json(json!({ "name": name }))
                .to_request();
            let resp = test::call_service(&srv, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get()
            .uri("/api/projects")
            .insert_header(("Authorization", token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&srv, req).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Beta", "Alpha"]);
    }

    #[actix_web::test]
    async fn empty_name_is_rejected() {
        let app = TestApp::new();
        let (_, token) = app.user_with_token("pm@example.com");
        let srv = test::init_service(App::new().configure(|cfg| configure(cfg, &app.state))).await;

        let req = test::TestRequest::post()
            .uri("/api/projects")
            .insert_header(("Authorization", token))
            .set_json(json!({ "name": "" }))
            .to_request();
        let resp = test::call_service(&srv, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
