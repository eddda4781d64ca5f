use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::issue::{
    rank_popular, Issue, IssueChanges, IssuePage, IssueStatus, NewIssue, POPULAR_LIMIT,
    POPULAR_WINDOW_DAYS,
};
use crate::domain::ports::{Cache, IssueRepository, ProjectRepository, UserRepository};

use super::run_blocking;

pub const POPULAR_CACHE_KEY: &str = "popular_issues:v1";

pub struct IssueService {
    issues: Arc<dyn IssueRepository>,
    projects: Arc<dyn ProjectRepository>,
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn Cache>,
    popular_ttl: Duration,
}

impl IssueService {
    pub fn new(
        issues: Arc<dyn IssueRepository>,
        projects: Arc<dyn ProjectRepository>,
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn Cache>,
        popular_ttl: Duration,
    ) -> Self {
        Self {
            issues,
            projects,
            users,
            cache,
            popular_ttl,
        }
    }

    pub async fn create(&self, issue: NewIssue) -> Result<Issue, DomainError> {
        self.ensure_project(issue.project_id).await?;
        if let Some(assignee) = issue.assignee_id {
            self.ensure_user(assignee).await?;
        }

        let issues = self.issues.clone();
        run_blocking(move || issues.create(issue)).await
    }

    pub async fn list_by_project(
        &self,
        project_id: Uuid,
        status: Option<IssueStatus>,
        page: i64,
        size: i64,
    ) -> Result<IssuePage, DomainError> {
        let issues = self.issues.clone();
        run_blocking(move || issues.list_by_project(project_id, status, page, size)).await
    }

    /// Every read counts as a view.
    pub async fn get(&self, id: Uuid) -> Result<Issue, DomainError> {
        let issues = self.issues.clone();
        run_blocking(move || {
            issues.increment_view_count(id)?;
            issues
                .find_by_id(id)?
                .ok_or_else(|| DomainError::not_found_id("Issue", id))
        })
        .await
    }

    pub async fn update(&self, id: Uuid, changes: IssueChanges) -> Result<Issue, DomainError> {
        let issues = self.issues.clone();
        if run_blocking(move || issues.find_by_id(id)).await?.is_none() {
            return Err(DomainError::not_found_id("Issue", id));
        }
        if let Some(Some(assignee)) = changes.assignee_id {
            self.ensure_user(assignee).await?;
        }
        let issues = self.issues.clone();
        run_blocking(move || issues.update(id, changes))
            .await?
            .ok_or_else(|| DomainError::not_found_id("Issue", id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let issues = self.issues.clone();
        if run_blocking(move || issues.delete(id)).await? {
            Ok(())
        } else {
            Err(DomainError::not_found_id("Issue", id))
        }
    }

    /// Top issues of the last week, served from the cache while the entry is
    /// fresh. Writes never invalidate it; it only ages out.
    pub async fn popular(&self) -> Result<Vec<Issue>, DomainError> {
        if let Some(cached) = self.cache.get(POPULAR_CACHE_KEY).await {
            match serde_json::from_str::<Vec<Issue>>(&cached) {
                Ok(issues) => return Ok(issues),
                Err(e) => log::warn!("Discarding unreadable popular issues entry: {}", e),
            }
        }

        let since = Utc::now() - chrono::Duration::days(POPULAR_WINDOW_DAYS);
        let issues = self.issues.clone();
        let candidates =
            run_blocking(move || issues.created_since_with_comment_counts(since)).await?;
        let ranked = rank_popular(candidates, POPULAR_LIMIT);

        self.cache
            .set(
                POPULAR_CACHE_KEY,
                serde_json::to_string(&ranked)?,
                self.popular_ttl,
            )
            .await;
        Ok(ranked)
    }

    async fn ensure_project(&self, id: Uuid) -> Result<(), DomainError> {
        let projects = self.projects.clone();
        run_blocking(move || projects.find_by_id(id))
            .await?
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found_id("Project", id))
    }

    async fn ensure_user(&self, id: Uuid) -> Result<(), DomainError> {
        let users = self.users.clone();
        run_blocking(move || users.find_by_id(id))
            .await?
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found_id("User", id))
    }
}
