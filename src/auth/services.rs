use std::sync::Arc;

use tracing::{info, warn};

use super::{
    dto::LoginResponse,
    jwt::TokenService,
    password::{hash_password, verify_password},
    repo::UserRepository,
    repo_types::User,
};
use crate::error::{AppError, AppResult};

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<dyn TokenService>) -> Self {
        Self { users, tokens }
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login_admin(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let Some(user) = self.users.find_by_email(email).await? else {
            warn!(%email, "login unknown email");
            return Err(AppError::WrongCredentials);
        };

        if !verify_password(password, &user.password)? {
            warn!(%email, user_id = user.id, "login invalid password");
            return Err(AppError::WrongCredentials);
        }

        let (access_token, expired_at) = self.tokens.generate_token(user.id)?;
        info!(user_id = user.id, name = %user.name, "admin logged in");
        Ok(LoginResponse {
            access_token,
            expired_at,
        })
    }

    /// Creates the admin account if its email is not registered yet.
    pub async fn seed_admin(&self, name: &str, email: &str, password: &str) -> AppResult<User> {
        let hash = hash_password(password)?;
        let user = self.users.first_or_create(name, email, &hash).await?;
        info!(user_id = user.id, email = %user.email, name = %user.name, "admin user ready");
        Ok(user)
    }
}
