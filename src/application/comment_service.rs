use std::sync::Arc;

use uuid::Uuid;

use crate::domain::comment::Comment;
use crate::domain::errors::DomainError;
use crate::domain::ports::{CommentRepository, IssueRepository};

use super::run_blocking;

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    issues: Arc<dyn IssueRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, issues: Arc<dyn IssueRepository>) -> Self {
        Self { comments, issues }
    }

    pub async fn create(
        &self,
        issue_id: Uuid,
        author_id: Uuid,
        content: String,
    ) -> Result<Comment, DomainError> {
        self.ensure_issue(issue_id).await?;
        let comments = self.comments.clone();
        run_blocking(move || comments.create(issue_id, author_id, content)).await
    }

    /// Oldest first.
    pub async fn list_by_issue(&self, issue_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        self.ensure_issue(issue_id).await?;
        let comments = self.comments.clone();
        run_blocking(move || comments.list_by_issue(issue_id)).await
    }

    async fn ensure_issue(&self, id: Uuid) -> Result<(), DomainError> {
        let issues = self.issues.clone();
        run_blocking(move || issues.find_by_id(id))
            .await?
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found_id("Issue", id))
    }
}
