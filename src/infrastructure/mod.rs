pub mod cache;
pub mod comment_repo;
pub mod events;
pub mod issue_repo;
pub mod jwt;
pub mod models;
pub mod notification_repo;
pub mod order_repo;
pub mod product_repo;
pub mod project_repo;
pub mod search;
pub mod stats_repo;
pub mod team_repo;
pub mod user_repo;

use crate::domain::errors::DomainError;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<reqwest::Error> for DomainError {
    fn from(e: reqwest::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<rdkafka::error::KafkaError> for DomainError {
    fn from(e: rdkafka::error::KafkaError) -> Self {
        DomainError::Internal(e.to_string())
    }
}
