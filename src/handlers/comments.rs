use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::application::comment_service::CommentService;
use crate::auth::AuthenticatedUser;
use crate::domain::comment::Comment;
use crate::errors::{AppError, ErrorResponse};

use super::validated;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/issues/{issueId}/comments", web::post().to(create_comment))
        .route("/issues/{issueId}/comments", web::get().to(list_comments));
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "content should not be empty"))]
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub issue_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(c: Comment) -> Self {
        CommentResponse {
            id: c.id,
            issue_id: c.issue_id,
            author_id: c.author_id,
            content: c.content,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// POST /api/issues/{issueId}/comments
#[utoipa::path(
    post,
    path = "/api/issues/{issueId}/comments",
    params(("issueId" = Uuid, Path, description = "Issue UUID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment added", body = CommentResponse),
        (status = 404, description = "Issue not found", body = ErrorResponse),
    ),
    tag = "comments"
)]
pub async fn create_comment(
    service: web::Data<CommentService>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, AppError> {
    let body = validated(body)?;
    let comment = service
        .create(path.into_inner(), caller.user_id, body.content)
        .await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

/// GET /api/issues/{issueId}/comments
#[utoipa::path(
    get,
    path = "/api/issues/{issueId}/comments",
    params(("issueId" = Uuid, Path, description = "Issue UUID")),
    responses(
        (status = 200, description = "Comments, oldest first", body = [CommentResponse]),
        (status = 404, description = "Issue not found", body = ErrorResponse),
    ),
    tag = "comments"
)]
pub async fn list_comments(
    service: web::Data<CommentService>,
    _caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let comments: Vec<CommentResponse> = service
        .list_by_issue(path.into_inner())
        .await?
        .into_iter()
        .map(CommentResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(comments))
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
    async fn comment_on_missing_issue_is_not_found() {
        let app = TestApp::new();
        let (_, token) = app.user_with_token("dev@example.com");
        let srv = test::init_service(App::new().configure(|cfg| configure(cfg, &app.state))).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/issues/{}/comments", Uuid::new_v4()))
            .insert_header(("Authorization", token))
            .set_json(json!({ "content": "me too" }))
            .to_request();
        let resp = test::call_service(&srv, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "ISSUE_NOT_FOUND");
    }

    #[actix_web::test]
    async fn comments_are_listed_oldest_first() {
        let app = TestApp::new();
        let (user, token) = app.user_with_token("dev@example.com");
        let project = app.db.seed_project("Tracker");
        let srv = test::init_service(App::new().configure(|cfg| configure(cfg, &app.state))).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/projects/{}/issues", project.id))
            .insert_header(("Authorization", token.clone()))
            .set_json(json!({ "title": "Crash" }))
            .to_request();
        let issue: Value = test::call_and_read_body_json(&srv, req).await;
        let uri = format!("/api/issues/{}/comments", issue["id"].as_str().unwrap());

        for content in ["first", "second"] {
            let req = test::TestRequest::post()
                .uri(&uri)
                .insert_header(("Authorization", token.clone()))
                .set_json(json!({ "content": content }))
                .to_request();
            let resp = test::call_service(&srv, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(("Authorization", token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&srv, req).await;
        assert_eq!(body[0]["content"], "first");
        assert_eq!(body[1]["content"], "second");
        assert_eq!(body[0]["authorId"], user.id.to_string());
    }
}
