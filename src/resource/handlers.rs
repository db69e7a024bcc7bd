use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use super::service::{ParentRef, ResourceService};
use crate::{
    auth::{extractors::AuthUser, middleware::require_token},
    error::{AppError, AppResult},
    extractors::{RecordId, ValidJson},
    response::ApiResponse,
    state::AppState,
};

/// Binds one content section to the generic admin endpoints.
pub trait Section: Send + Sync + 'static {
    type Record: Serialize + Send + Sync + 'static;
    type Input: DeserializeOwned + Validate + ParentRef + Send + Sync + 'static;

    /// Human label used in response messages, e.g. `"faq section"`.
    const LABEL: &'static str;

    fn service(state: &AppState) -> &ResourceService<Self::Record, Self::Input>;
}

/// `POST|GET /admin`, `GET|PUT|DELETE /admin/:id`, all behind the token gate.
pub fn admin_routes<S: Section>(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/admin", post(create::<S>).get(fetch_all::<S>))
        .route(
            "/admin/:id",
            get(fetch_by_id::<S>).put(edit::<S>).delete(delete::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_token,
        ))
}

/// Public `GET /`: every live row.
#[instrument(skip_all, fields(resource = S::LABEL))]
pub async fn public_list<S: Section>(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<S::Record>>> {
    let rows = S::service(&state).fetch_all().await?;
    Ok(ApiResponse::ok(format!("Success fetch all {}", S::LABEL), rows))
}

/// Public `GET /`: the most recently created live row.
#[instrument(skip_all, fields(resource = S::LABEL))]
pub async fn public_latest<S: Section>(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<S::Record>> {
    let latest = S::service(&state)
        .fetch_all()
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::ok(format!("Success fetch {}", S::LABEL), latest))
}

/// Public `GET /:id`: the newest live row belonging to parent `:id`.
#[instrument(skip_all, fields(resource = S::LABEL, parent_id))]
pub async fn public_by_parent<S: Section>(
    State(state): State<AppState>,
    RecordId(parent_id): RecordId,
) -> AppResult<ApiResponse<S::Record>> {
    tracing::Span::current().record("parent_id", parent_id);
    let row = S::service(&state)
        .fetch_by_parent(parent_id)
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::ok(format!("Success fetch {}", S::LABEL), row))
}

#[instrument(skip_all, fields(resource = S::LABEL, user_id))]
pub async fn create<S: Section>(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidJson(input): ValidJson<S::Input>,
) -> AppResult<ApiResponse<()>> {
    tracing::Span::current().record("user_id", user_id);
    S::service(&state).create(input).await?;
    info!("created");
    Ok(ApiResponse::created(format!("Success create {}", S::LABEL)))
}

#[instrument(skip_all, fields(resource = S::LABEL))]
pub async fn fetch_all<S: Section>(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> AppResult<ApiResponse<Vec<S::Record>>> {
    let rows = S::service(&state).fetch_all().await?;
    Ok(ApiResponse::ok(format!("Success fetch all {}", S::LABEL), rows))
}

#[instrument(skip_all, fields(resource = S::LABEL, id))]
pub async fn fetch_by_id<S: Section>(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    RecordId(id): RecordId,
) -> AppResult<ApiResponse<S::Record>> {
    tracing::Span::current().record("id", id);
    let row = S::service(&state).fetch_by_id(id).await?;
    Ok(ApiResponse::ok(format!("Success fetch {} by ID", S::LABEL), row))
}

#[instrument(skip_all, fields(resource = S::LABEL, id, user_id))]
pub async fn edit<S: Section>(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    RecordId(id): RecordId,
    ValidJson(input): ValidJson<S::Input>,
) -> AppResult<ApiResponse<()>> {
    let span = tracing::Span::current();
    span.record("id", id);
    span.record("user_id", user_id);
    S::service(&state).edit_by_id(id, input).await?;
    info!("edited");
    Ok(ApiResponse::done(format!("Success edit {}", S::LABEL)))
}

#[instrument(skip_all, fields(resource = S::LABEL, id, user_id))]
pub async fn delete<S: Section>(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    RecordId(id): RecordId,
) -> AppResult<ApiResponse<()>> {
    let span = tracing::Span::current();
    span.record("id", id);
    span.record("user_id", user_id);
    S::service(&state).delete_by_id(id).await?;
    info!("deleted");
    Ok(ApiResponse::done(format!("Success delete {}", S::LABEL)))
}
