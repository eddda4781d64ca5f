use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{NewUser, User};
use crate::infrastructure::jwt::JwtService;

use super::run_blocking;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct Registration {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

pub struct LoginResult {
    pub access_token: String,
    pub user: User,
}

pub struct UserService {
    repo: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, jwt: Arc<JwtService>, bcrypt_cost: u32) -> Self {
        Self {
            repo,
            jwt,
            bcrypt_cost,
        }
    }

    pub async fn register(&self, registration: Registration) -> Result<User, DomainError> {
        let repo = self.repo.clone();
        let email = registration.email.clone();
        if run_blocking(move || repo.find_by_email(&email)).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".to_string()));
        }

        let cost = self.bcrypt_cost;
        let password = registration.password;
        let password_hash = run_blocking(move || {
            bcrypt::hash(password, cost).map_err(|e| DomainError::Internal(e.to_string()))
        })
        .await?;

        let repo = self.repo.clone();
        let user = run_blocking(move || {
            repo.create(NewUser {
                email: registration.email,
                password_hash,
                nickname: registration.nickname,
            })
        })
        .await?;

        log::info!("Registered user {}", user.id);
        Ok(user)
    }

    pub async fn login(&self, email: String, password: String) -> Result<LoginResult, DomainError> {
        let repo = self.repo.clone();
        let user = run_blocking(move || repo.find_by_email(&email))
            .await?
            .ok_or_else(|| DomainError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        let hash = user.password_hash.clone();
        let valid =
            run_blocking(move || Ok(bcrypt::verify(password, &hash).unwrap_or(false))).await?;
        if !valid {
            return Err(DomainError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let access_token = self.jwt.create_token(user.id, &user.email)?;
        Ok(LoginResult { access_token, user })
    }

    pub async fn get(&self, id: Uuid) -> Result<User, DomainError> {
        let repo = self.repo.clone();
        run_blocking(move || repo.find_by_id(id))
            .await?
            .ok_or_else(|| DomainError::not_found_id("User", id))
    }
}
