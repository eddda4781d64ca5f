pub mod comment_service;
pub mod issue_service;
pub mod notification_service;
pub mod order_service;
pub mod product_service;
pub mod project_service;
pub mod stats_service;
pub mod team_service;
pub mod user_service;

use crate::domain::errors::DomainError;

/// Run a synchronous repository call on the blocking pool.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, DomainError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?
}
