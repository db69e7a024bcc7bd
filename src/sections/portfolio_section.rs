use async_trait::async_trait;
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use validator::Validate;

use crate::{
    error::AppResult,
    resource::{
        admin_routes, handlers::public_list, pg, ParentRef, ResourceRepository, ResourceService,
        Section,
    },
    state::AppState,
};

const TABLE: &str = "portfolio_sections";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PortfolioSection {
    pub id: i64,
    pub name: String,
    pub tagline: String,
    pub thumbnail: Option<String>,
}

/// Parent summary embedded in portfolio details and testimonials.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSectionRef {
    pub id: i64,
    pub name: String,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PortfolioSectionInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "tagline is required"))]
    pub tagline: String,
    pub thumbnail: Option<String>,
}

impl ParentRef for PortfolioSectionInput {}

pub type PortfolioSectionService = ResourceService<PortfolioSection, PortfolioSectionInput>;

pub struct PgPortfolioSectionRepository {
    db: PgPool,
}

impl PgPortfolioSectionRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceRepository for PgPortfolioSectionRepository {
    type Record = PortfolioSection;
    type Input = PortfolioSectionInput;

    async fn create(&self, input: PortfolioSectionInput) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO portfolio_sections (name, tagline, thumbnail) VALUES ($1, $2, $3)",
        )
        .bind(input.name)
        .bind(input.tagline)
        .bind(input.thumbnail)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn fetch_all(&self) -> AppResult<Vec<PortfolioSection>> {
        let rows = sqlx::query_as::<_, PortfolioSection>(
            r#"
            SELECT id, name, tagline, thumbnail
            FROM portfolio_sections
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<PortfolioSection> {
        let row = sqlx::query_as::<_, PortfolioSection>(
            r#"
            SELECT id, name, tagline, thumbnail
            FROM portfolio_sections
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn edit_by_id(&self, id: i64, input: PortfolioSectionInput) -> AppResult<()> {
        let mut tx = pg::lock_live_row(&self.db, TABLE, id).await?;
        sqlx::query(
            r#"
            UPDATE portfolio_sections
            SET name = $2, tagline = $3, thumbnail = $4, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(input.name)
        .bind(input.tagline)
        .bind(input.thumbnail)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        pg::soft_delete(&self.db, TABLE, id).await
    }
}

pub struct PortfolioSections;

impl Section for PortfolioSections {
    type Record = PortfolioSection;
    type Input = PortfolioSectionInput;
    const LABEL: &'static str = "portfolio section";

    fn service(state: &AppState) -> &PortfolioSectionService {
        &state.sections.portfolios
    }
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(public_list::<PortfolioSections>))
        .merge(admin_routes::<PortfolioSections>(state))
}

#[cfg(test)]
pub fn memory_repository(
) -> crate::resource::memory::MemoryRepository<PortfolioSection, PortfolioSectionInput> {
    crate::resource::memory::MemoryRepository::new(|id, i: &PortfolioSectionInput| {
        PortfolioSection {
            id,
            name: i.name.clone(),
            tagline: i.tagline.clone(),
            thumbnail: i.thumbnail.clone(),
        }
    })
}
