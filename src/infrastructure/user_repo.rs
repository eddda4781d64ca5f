use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{NewUser, User};
use crate::schema::users;

use super::models::{NewUserRow, UserRow};

pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for DieselUserRepository {
    fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::insert_into(users::table)
            .values(&NewUserRow {
                id: Uuid::new_v4(),
                email: user.email,
                password_hash: user.password_hash,
                nickname: user.nickname,
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .map(User::from)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    DomainError::Conflict("Email already exists".to_string())
                }
                other => other.into(),
            })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(User::from))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(User::from))
    }
}

#[cfg(test)]
mod tests {
    use super::DieselUserRepository;
    use crate::domain::errors::DomainError;
    use crate::domain::ports::UserRepository;
    use crate::domain::user::NewUser;
    use crate::infrastructure::test_db::setup_db;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            nickname: "nick".to_string(),
        }
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn find_by_email_returns_created_user() {
        let (_container, pool) = setup_db().await;
        let repo = DieselUserRepository::new(pool);

        let created = repo.create(new_user("a@example.com")).expect("create");
        let found = repo
            .find_by_email("a@example.com")
            .expect("query")
            .expect("user should exist");

        assert_eq!(found.id, created.id);
        assert!(repo.find_by_email("b@example.com").expect("query").is_none());
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn duplicate_email_is_a_conflict() {
        let (_container, pool) = setup_db().await;
        let repo = DieselUserRepository::new(pool);

        repo.create(new_user("dup@example.com")).expect("create");
        let err = repo.create(new_user("dup@example.com")).unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
