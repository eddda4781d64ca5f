use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::application::user_service::{Registration, UserService};
use crate::auth::AuthenticatedUser;
use crate::domain::user::User;
use crate::errors::{AppError, ErrorResponse};

use super::validated;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/users", web::post().to(register))
        .route("/users/me", web::get().to(me));
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "email must be an email"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be longer than or equal to 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "nickname should not be empty"))]
    pub nickname: String,
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(u: &User) -> Self {
        UserResponse {
            id: u.id,
            email: u.email.clone(),
            nickname: u.nickname.clone(),
            created_at: u.created_at,
        }
    }
}

/// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn register(
    service: web::Data<UserService>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let body = validated(body)?;
    let user = service
        .register(Registration {
            email: body.email,
            password: body.password,
            nickname: body.nickname,
        })
        .await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn me(
    service: web::Data<UserService>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = service.get(caller.user_id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}
