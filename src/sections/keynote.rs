use async_trait::async_trait;
use axum::{extract::State, middleware, routing::get, Router};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use validator::Validate;

use crate::{
    auth::{extractors::AuthUser, middleware::require_token},
    error::AppResult,
    extractors::RecordId,
    resource::{admin_routes, pg, ParentRef, ResourceRepository, ResourceService, Section},
    response::ApiResponse,
    state::AppState,
};

const TABLE: &str = "about_company_keynotes";

const SELECT_JOINED: &str = r#"
    SELECT ack.id, ack.about_company_id, ack.keypoint, ack.path_image,
           ac.description AS about_company_description
    FROM about_company_keynotes AS ack
    INNER JOIN about_companies AS ac ON ac.id = ack.about_company_id
"#;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AboutCompanyKeynote {
    pub id: i64,
    pub about_company_id: i64,
    pub keypoint: String,
    pub path_image: Option<String>,
    pub about_company_description: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AboutCompanyKeynoteInput {
    #[validate(range(min = 1, message = "about_company_id is required"))]
    pub about_company_id: i64,
    #[validate(length(min = 1, message = "keypoint is required"))]
    pub keypoint: String,
    pub path_image: Option<String>,
}

impl ParentRef for AboutCompanyKeynoteInput {
    fn parent_id(&self) -> Option<i64> {
        Some(self.about_company_id)
    }
}

pub type KeynoteService = ResourceService<AboutCompanyKeynote, AboutCompanyKeynoteInput>;

pub struct PgKeynoteRepository {
    db: PgPool,
}

impl PgKeynoteRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceRepository for PgKeynoteRepository {
    type Record = AboutCompanyKeynote;
    type Input = AboutCompanyKeynoteInput;

    async fn create(&self, input: AboutCompanyKeynoteInput) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO about_company_keynotes (about_company_id, keypoint, path_image)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(input.about_company_id)
        .bind(input.keypoint)
        .bind(input.path_image)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn fetch_all(&self) -> AppResult<Vec<AboutCompanyKeynote>> {
        let sql = format!(
            "{SELECT_JOINED} WHERE ack.deleted_at IS NULL ORDER BY ack.created_at DESC"
        );
        let rows = sqlx::query_as::<_, AboutCompanyKeynote>(&sql)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<AboutCompanyKeynote> {
        let sql = format!("{SELECT_JOINED} WHERE ack.id = $1 AND ack.deleted_at IS NULL");
        let row = sqlx::query_as::<_, AboutCompanyKeynote>(&sql)
            .bind(id)
            .fetch_one(&self.db)
            .await?;
        Ok(row)
    }

    async fn edit_by_id(&self, id: i64, input: AboutCompanyKeynoteInput) -> AppResult<()> {
        let mut tx = pg::lock_live_row(&self.db, TABLE, id).await?;
        sqlx::query(
            r#"
            UPDATE about_company_keynotes
            SET about_company_id = $2, keypoint = $3, path_image = $4, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(input.about_company_id)
        .bind(input.keypoint)
        .bind(input.path_image)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        pg::soft_delete(&self.db, TABLE, id).await
    }

    async fn fetch_by_parent(&self, about_company_id: i64) -> AppResult<Vec<AboutCompanyKeynote>> {
        let sql = format!(
            "{SELECT_JOINED} WHERE ack.about_company_id = $1 AND ack.deleted_at IS NULL \
             ORDER BY ack.created_at DESC"
        );
        let rows = sqlx::query_as::<_, AboutCompanyKeynote>(&sql)
            .bind(about_company_id)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }
}

pub struct Keynotes;

impl Section for Keynotes {
    type Record = AboutCompanyKeynote;
    type Input = AboutCompanyKeynoteInput;
    const LABEL: &'static str = "about company keynote";

    fn service(state: &AppState) -> &KeynoteService {
        &state.sections.keynotes
    }
}

/// GET /admin/keynotes/:id, keynotes of one company.
#[instrument(skip(state))]
async fn by_company(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    RecordId(company_id): RecordId,
) -> AppResult<ApiResponse<Vec<AboutCompanyKeynote>>> {
    let rows = state.sections.keynotes.fetch_by_parent(company_id).await?;
    Ok(ApiResponse::ok("Success fetch about company keynote by company ID", rows))
}

pub fn routes(state: &AppState) -> Router<AppState> {
    let by_company = Router::new()
        .route("/admin/keynotes/:id", get(by_company))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_token,
        ));
    admin_routes::<Keynotes>(state).merge(by_company)
}

#[cfg(test)]
pub fn memory_repository(
) -> crate::resource::memory::MemoryRepository<AboutCompanyKeynote, AboutCompanyKeynoteInput> {
    crate::resource::memory::MemoryRepository::new(|id, i: &AboutCompanyKeynoteInput| {
        AboutCompanyKeynote {
            id,
            about_company_id: i.about_company_id,
            keypoint: i.keypoint.clone(),
            path_image: i.path_image.clone(),
            about_company_description: String::new(),
        }
    })
    .with_parent_key(|i| i.about_company_id)
}
