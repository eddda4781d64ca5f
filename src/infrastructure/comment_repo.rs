use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::comment::Comment;
use crate::domain::errors::DomainError;
use crate::domain::ports::CommentRepository;
use crate::schema::comments;

use super::models::{CommentRow, NewCommentRow};

pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CommentRepository for DieselCommentRepository {
    fn create(
        &self,
        issue_id: Uuid,
        author_id: Uuid,
        content: String,
    ) -> Result<Comment, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(comments::table)
            .values(&NewCommentRow {
                id: Uuid::new_v4(),
                issue_id,
                author_id,
                content,
            })
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn list_by_issue(&self, issue_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = comments::table
            .filter(comments::issue_id.eq(issue_id))
            .select(CommentRow::as_select())
            .order(comments::created_at.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }
}
