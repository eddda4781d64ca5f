use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::ProjectRepository;
use crate::domain::project::{NewProject, Project};

use super::run_blocking;

pub struct ProjectService {
    repo: Arc<dyn ProjectRepository>,
}

impl ProjectService {
    pub fn new(repo: Arc<dyn ProjectRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, project: NewProject) -> Result<Project, DomainError> {
        let repo = self.repo.clone();
        run_blocking(move || repo.create(project)).await
    }

    pub async fn list(&self) -> Result<Vec<Project>, DomainError> {
        let repo = self.repo.clone();
        run_blocking(move || repo.list()).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Project, DomainError> {
        let repo = self.repo.clone();
        run_blocking(move || repo.find_by_id(id))
            .await?
            .ok_or_else(|| DomainError::not_found_id("Project", id))
    }
}
