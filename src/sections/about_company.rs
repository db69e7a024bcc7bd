use async_trait::async_trait;
use axum::{extract::State, routing::get, Router};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use validator::Validate;

use super::keynote::AboutCompanyKeynote;
use crate::{
    error::{AppError, AppResult},
    resource::{
        admin_routes, pg, ParentRef, ResourceRepository, ResourceService, Section,
    },
    response::ApiResponse,
    state::AppState,
};

const TABLE: &str = "about_companies";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AboutCompany {
    pub id: i64,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AboutCompanyInput {
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
}

impl ParentRef for AboutCompanyInput {}

/// Home page view: the company blurb with its keynotes.
#[derive(Debug, Serialize)]
pub struct AboutCompanyHome {
    pub id: i64,
    pub description: String,
    pub company_keynotes: Vec<AboutCompanyKeynote>,
}

pub type AboutCompanyService = ResourceService<AboutCompany, AboutCompanyInput>;

pub struct PgAboutCompanyRepository {
    db: PgPool,
}

impl PgAboutCompanyRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceRepository for PgAboutCompanyRepository {
    type Record = AboutCompany;
    type Input = AboutCompanyInput;

    async fn create(&self, input: AboutCompanyInput) -> AppResult<()> {
        sqlx::query("INSERT INTO about_companies (description) VALUES ($1)")
            .bind(input.description)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn fetch_all(&self) -> AppResult<Vec<AboutCompany>> {
        let rows = sqlx::query_as::<_, AboutCompany>(
            r#"
            SELECT id, description
            FROM about_companies
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<AboutCompany> {
        let row = sqlx::query_as::<_, AboutCompany>(
            "SELECT id, description FROM about_companies WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn edit_by_id(&self, id: i64, input: AboutCompanyInput) -> AppResult<()> {
        let mut tx = pg::lock_live_row(&self.db, TABLE, id).await?;
        sqlx::query("UPDATE about_companies SET description = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(input.description)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        pg::soft_delete(&self.db, TABLE, id).await
    }
}

pub struct AboutCompanies;

impl Section for AboutCompanies {
    type Record = AboutCompany;
    type Input = AboutCompanyInput;
    const LABEL: &'static str = "about company";

    fn service(state: &AppState) -> &AboutCompanyService {
        &state.sections.about
    }
}

#[instrument(skip(state))]
async fn home(State(state): State<AppState>) -> AppResult<ApiResponse<AboutCompanyHome>> {
    let company = state
        .sections
        .about
        .fetch_all()
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::NotFound)?;
    let company_keynotes = state.sections.keynotes.fetch_by_parent(company.id).await?;

    Ok(ApiResponse::ok(
        "Success fetch about company",
        AboutCompanyHome {
            id: company.id,
            description: company.description,
            company_keynotes,
        },
    ))
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .merge(admin_routes::<AboutCompanies>(state))
}

#[cfg(test)]
pub fn memory_repository(
) -> crate::resource::memory::MemoryRepository<AboutCompany, AboutCompanyInput> {
    crate::resource::memory::MemoryRepository::new(|id, i: &AboutCompanyInput| AboutCompany {
        id,
        description: i.description.clone(),
    })
}
