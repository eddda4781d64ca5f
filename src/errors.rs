use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::domain::errors::DomainError;

/// Uniform error body returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },

    #[error("{message}")]
    NotFound {
        resource: &'static str,
        message: String,
    },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            details: None,
        }
    }

    pub fn code(&self) -> String {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR".to_string(),
            AppError::NotFound { resource, .. } => {
                format!("{}_NOT_FOUND", screaming_snake(resource))
            }
            AppError::Unauthorized(_) => "UNAUTHORIZED".to_string(),
            AppError::Forbidden(_) => "FORBIDDEN".to_string(),
            AppError::Conflict(_) => "CONFLICT".to_string(),
            AppError::Internal(_) => "INTERNAL_ERROR".to_string(),
        }
    }
}

/// `TeamMember` -> `TEAM_MEMBER`.
fn screaming_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() && i > 0 {
            out.push('_');
        }
        out.push(ch.to_ascii_uppercase());
    }
    out
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { resource, message } => AppError::NotFound { resource, message },
            DomainError::Validation(msg) => AppError::validation(msg),
            DomainError::Unauthorized(msg) => AppError::Unauthorized(msg),
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<(&str, Vec<String>)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| match &e.message {
                        Some(m) => m.to_string(),
                        None => format!("{} is invalid ({})", field, e.code),
                    })
                    .collect();
                (field, messages)
            })
            .collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));

        let message = fields
            .iter()
            .flat_map(|(_, messages)| messages.iter().cloned())
            .collect::<Vec<_>>()
            .join(", ");
        let details = fields
            .into_iter()
            .map(|(field, messages)| (field.to_string(), Value::from(messages)))
            .collect::<serde_json::Map<_, _>>();

        AppError::Validation {
            message: if message.is_empty() {
                "Validation failed".to_string()
            } else {
                message
            },
            details: Some(Value::Object(details)),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (message, details) = match self {
            AppError::Validation { message, details } => (message.clone(), details.clone()),
            AppError::Internal(_) => ("Internal server error".to_string(), None),
            other => (other.to_string(), None),
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            code: self.code(),
            message,
            details,
        })
    }
}

// ── Extractor error handlers ─────────────────────────────────────────────────

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(err.to_string()).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(err.to_string()).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(err.to_string()).into()
}
