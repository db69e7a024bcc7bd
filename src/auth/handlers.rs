use axum::{extract::State, routing::post, Router};
use tracing::instrument;

use super::dto::{LoginRequest, LoginResponse};
use crate::{error::AppResult, extractors::ValidJson, response::ApiResponse, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let email = payload.email.trim().to_lowercase();
    let resp = state.auth.login_admin(&email, &payload.password).await?;
    Ok(ApiResponse::ok("Success login", resp))
}
