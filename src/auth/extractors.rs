use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::middleware::CurrentUser;
use crate::error::AppError;

/// Admin principal placed in the request by `require_token`.
pub struct AuthUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .map(|user| AuthUser(user.user_id))
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".into()))
    }
}
