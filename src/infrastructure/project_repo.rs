use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ProjectRepository;
use crate::domain::project::{NewProject, Project};
use crate::schema::projects;

use super::models::{NewProjectRow, ProjectRow};

pub struct DieselProjectRepository {
    pool: DbPool,
}

impl DieselProjectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProjectRepository for DieselProjectRepository {
    fn create(&self, project: NewProject) -> Result<Project, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(projects::table)
            .values(&NewProjectRow {
                id: Uuid::new_v4(),
                name: project.name,
                description: project.description,
            })
            .returning(ProjectRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn list(&self) -> Result<Vec<Project>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = projects::table
            .select(ProjectRow::as_select())
            .order(projects::created_at.desc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = projects::table
            .find(id)
            .select(ProjectRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Project::from))
    }
}
