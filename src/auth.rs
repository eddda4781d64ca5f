//! Bearer-token authentication for handlers.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::errors::AppError;
use crate::infrastructure::jwt::JwtService;

const INVALID_TOKEN: &str = "Invalid or missing authentication token";

/// The caller identified by a valid `Authorization: Bearer <token>` header.
/// Any handler taking this argument answers 401 without one.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let unauthorized = || AppError::Unauthorized(INVALID_TOKEN.to_string());

    let jwt = req
        .app_data::<web::Data<JwtService>>()
        .ok_or_else(|| AppError::Internal("JwtService is not configured".to_string()))?;

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(unauthorized)?;

    let claims = jwt.verify_token(token).map_err(|_| unauthorized())?;
    Ok(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
