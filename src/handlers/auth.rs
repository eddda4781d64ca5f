use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::user_service::UserService;
use crate::errors::{AppError, ErrorResponse};

use super::users::UserResponse;
use super::validated;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/login", web::post().to(login));
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "email must be an email"))]
    pub email: String,
    #[validate(length(min = 1, message = "password should not be empty"))]
    pub password: String,
}

/// The token is sent under both spellings for older clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token_camel: String,
    pub access_token: String,
    pub user: UserResponse,
}

/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn login(
    service: web::Data<UserService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let body = validated(body)?;
    let result = service.login(body.email, body.password).await?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token_camel: result.access_token.clone(),
        access_token: result.access_token,
        user: UserResponse::from(&result.user),
    }))
}
