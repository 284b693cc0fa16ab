//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{
        CreateUser, LoginRequest, PasswordChange, TokenResponse, UpdateUser, User, UserClaims,
        UserQuery,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Verify credentials and issue a signed token
    pub async fn login(&self, request: &LoginRequest) -> AppResult<TokenResponse> {
        let user = self
            .repository
            .users_get_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !self.verify_password(&user, &request.password)? {
            return Err(AppError::Authentication(
                "Invalid username or password".to_string(),
            ));
        }
        if !user.is_active {
            return Err(AppError::Authorization("Account is disabled".to_string()));
        }

        let token = self.issue_token(&user)?;
        Ok(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
            user: user.into(),
        })
    }

    /// Register a new user; username and email must both be free
    pub async fn register(&self, data: &CreateUser) -> AppResult<User> {
        if self
            .repository
            .users_identity_exists(&data.username, &data.email)
            .await?
        {
            return Err(AppError::Conflict(
                "Username or email already registered".to_string(),
            ));
        }
        let password_hash = self.hash_password(&data.password)?;
        self.repository.users_create(data, &password_hash).await
    }

    pub async fn list_users(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        self.repository
            .users_list(query.skip.unwrap_or(0), query.limit.unwrap_or(100))
            .await
    }

    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repository.users_get_by_id(id).await
    }

    pub async fn update_user(&self, id: i32, data: &UpdateUser) -> AppResult<User> {
        self.repository.users_update(id, data).await
    }

    pub async fn delete_user(&self, id: i32, acting_user_id: i32) -> AppResult<()> {
        if id == acting_user_id {
            return Err(AppError::BadRequest(
                "Cannot delete your own account".to_string(),
            ));
        }
        self.repository.users_delete(id).await
    }

    /// Change the current user's password after verifying the old one
    pub async fn change_password(&self, user_id: i32, data: &PasswordChange) -> AppResult<()> {
        let user = self.repository.users_get_by_id(user_id).await?;
        if !self.verify_password(&user, &data.old_password)? {
            return Err(AppError::Authentication(
                "Current password is incorrect".to_string(),
            ));
        }
        let password_hash = self.hash_password(&data.new_password)?;
        self.repository
            .users_update_password(user_id, &password_hash)
            .await
    }

    fn issue_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let expires = now + Duration::minutes(self.config.jwt_expiration_minutes as i64);
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            exp: expires.timestamp(),
            iat: now.timestamp(),
        };
        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
