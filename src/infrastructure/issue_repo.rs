use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::issue::{Issue, IssueChanges, IssuePage, IssueStatus, NewIssue};
use crate::domain::page_offset;
use crate::domain::ports::IssueRepository;
use crate::schema::{comments, issues};

use super::models::{IssueChangeset, IssueRow, NewIssueRow};

pub struct DieselIssueRepository {
    pool: DbPool,
}

impl DieselIssueRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl IssueRepository for DieselIssueRepository {
    fn create(&self, issue: NewIssue) -> Result<Issue, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(issues::table)
            .values(&NewIssueRow {
                id: Uuid::new_v4(),
                project_id: issue.project_id,
                reporter_id: issue.reporter_id,
                assignee_id: issue.assignee_id,
                title: issue.title,
                description: issue.description,
                status: IssueStatus::Open.as_str().to_string(),
            })
            .returning(IssueRow::as_returning())
            .get_result(&mut conn)?;
        row.try_into()
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Issue>, DomainError> {
        let mut conn = self.pool.get()?;

        issues::table
            .find(id)
            .select(IssueRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Issue::try_from)
            .transpose()
    }

    fn list_by_project(
        &self,
        project_id: Uuid,
        status: Option<IssueStatus>,
        page: i64,
        size: i64,
    ) -> Result<IssuePage, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = issues::table
            .filter(issues::project_id.eq(project_id))
            .into_boxed();
        let mut count_query = issues::table
            .filter(issues::project_id.eq(project_id))
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(issues::status.eq(status.as_str()));
            count_query = count_query.filter(issues::status.eq(status.as_str()));
        }

        let total: i64 = count_query.count().get_result(&mut conn)?;
        let rows = query
            .select(IssueRow::as_select())
            .order(issues::created_at.desc())
            .offset(page_offset(page, size))
            .limit(size)
            .load(&mut conn)?;

        Ok(IssuePage {
            items: rows
                .into_iter()
                .map(Issue::try_from)
                .collect::<Result<_, _>>()?,
            total,
            page,
            size,
        })
    }

    fn update(&self, id: Uuid, changes: IssueChanges) -> Result<Option<Issue>, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(issues::table.find(id))
            .set(&IssueChangeset {
                title: changes.title,
                description: changes.description,
                status: changes.status.map(|s| s.as_str().to_string()),
                assignee_id: changes.assignee_id,
                updated_at: Utc::now(),
            })
            .returning(IssueRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .map(Issue::try_from)
            .transpose()
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(issues::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }

    fn increment_view_count(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(issues::table.find(id))
            .set(issues::view_count.eq(issues::view_count + 1))
            .execute(&mut conn)?;
        Ok(())
    }

    fn created_since_with_comment_counts(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<(Issue, i64)>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = issues::table
            .filter(issues::created_at.ge(since))
            .select(IssueRow::as_select())
            .order(issues::created_at.desc())
            .load(&mut conn)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let counts: HashMap<Uuid, i64> = comments::table
            .filter(comments::issue_id.eq_any(&ids))
            .group_by(comments::issue_id)
            .select((comments::issue_id, count_star()))
            .load::<(Uuid, i64)>(&mut conn)?
            .into_iter()
            .collect();

        rows.into_iter()
            .map(|row| {
                let comments = counts.get(&row.id).copied().unwrap_or(0);
                Issue::try_from(row).map(|issue| (issue, comments))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::DieselIssueRepository;
    use crate::domain::issue::{IssueChanges, IssueStatus, NewIssue};
    use crate::domain::ports::{
        CommentRepository, IssueRepository, ProjectRepository, UserRepository,
    };
    use crate::domain::project::NewProject;
    use crate::domain::user::NewUser;
    use crate::infrastructure::comment_repo::DieselCommentRepository;
    use crate::infrastructure::project_repo::DieselProjectRepository;
    use crate::infrastructure::test_db::setup_db;
    use crate::infrastructure::user_repo::DieselUserRepository;

    fn seed(pool: &crate::db::DbPool) -> (Uuid, Uuid) {
        let user = DieselUserRepository::new(pool.clone())
            .create(NewUser {
                email: "reporter@example.com".to_string(),
                password_hash: "x".to_string(),
                nickname: "reporter".to_string(),
            })
            .expect("user");
        let project = DieselProjectRepository::new(pool.clone())
            .create(NewProject {
                name: "Tracker".to_string(),
                description: None,
            })
            .expect("project");
        (project.id, user.id)
    }

    fn new_issue(project_id: Uuid, reporter_id: Uuid, title: &str) -> NewIssue {
        NewIssue {
            project_id,
            reporter_id,
            assignee_id: None,
            title: title.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn list_by_project_filters_and_paginates() {
        let (_container, pool) = setup_db().await;
        let (project_id, user_id) = seed(&pool);
        let repo = DieselIssueRepository::new(pool);

        for n in 0..5 {
            let issue = repo
                .create(new_issue(project_id, user_id, &format!("issue {}", n)))
                .expect("create");
            if n % 2 == 0 {
                repo.update(
                    issue.id,
                    IssueChanges {
                        status: Some(IssueStatus::Resolved),
                        ..Default::default()
                    },
                )
                .expect("update");
            }
        }

        let page = repo
            .list_by_project(project_id, Some(IssueStatus::Resolved), 1, 2)
            .expect("list");
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages(), 2);

        let all = repo.list_by_project(project_id, None, 1, 10).expect("list");
        assert_eq!(all.total, 5);
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn comment_counts_and_views_are_reported() {
        let (_container, pool) = setup_db().await;
        let (project_id, user_id) = seed(&pool);
        let repo = DieselIssueRepository::new(pool.clone());
        let comments = DieselCommentRepository::new(pool);

        let quiet = repo
            .create(new_issue(project_id, user_id, "quiet"))
            .expect("create");
        let busy = repo
            .create(new_issue(project_id, user_id, "busy"))
            .expect("create");
        comments
            .create(busy.id, user_id, "first".to_string())
            .expect("comment");
        comments
            .create(busy.id, user_id, "second".to_string())
            .expect("comment");
        repo.increment_view_count(quiet.id).expect("view");

        let since = chrono::Utc::now() - chrono::Duration::days(7);
        let rows = repo.created_since_with_comment_counts(since).expect("query");

        let busy_row = rows.iter().find(|(i, _)| i.id == busy.id).expect("busy");
        let quiet_row = rows.iter().find(|(i, _)| i.id == quiet.id).expect("quiet");
        assert_eq!(busy_row.1, 2);
        assert_eq!(quiet_row.1, 0);
        assert_eq!(quiet_row.0.view_count, 1);
    }
}
