use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{message}")]
    NotFound {
        resource: &'static str,
        message: String,
    },
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(resource: &'static str, message: impl Into<String>) -> Self {
        DomainError::NotFound {
            resource,
            message: message.into(),
        }
    }

    /// `"<Resource> with id <id> not found"`.
    pub fn not_found_id(resource: &'static str, id: impl std::fmt::Display) -> Self {
        DomainError::not_found(resource, format!("{} with id {} not found", resource, id))
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}
