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

const TABLE: &str = "faq_sections";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FaqSection {
    pub id: i64,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FaqSectionInput {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
}

impl ParentRef for FaqSectionInput {}

pub type FaqService = ResourceService<FaqSection, FaqSectionInput>;

pub struct PgFaqSectionRepository {
    db: PgPool,
}

impl PgFaqSectionRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceRepository for PgFaqSectionRepository {
    type Record = FaqSection;
    type Input = FaqSectionInput;

    async fn create(&self, input: FaqSectionInput) -> AppResult<()> {
        sqlx::query("INSERT INTO faq_sections (title, description) VALUES ($1, $2)")
            .bind(input.title)
            .bind(input.description)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn fetch_all(&self) -> AppResult<Vec<FaqSection>> {
        let rows = sqlx::query_as::<_, FaqSection>(
            r#"
            SELECT id, title, description
            FROM faq_sections
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<FaqSection> {
        let row = sqlx::query_as::<_, FaqSection>(
            "SELECT id, title, description FROM faq_sections WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn edit_by_id(&self, id: i64, input: FaqSectionInput) -> AppResult<()> {
        let mut tx = pg::lock_live_row(&self.db, TABLE, id).await?;
        sqlx::query(
            "UPDATE faq_sections SET title = $2, description = $3, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(input.title)
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

pub struct FaqSections;

impl Section for FaqSections {
    type Record = FaqSection;
    type Input = FaqSectionInput;
    const LABEL: &'static str = "faq section";

    fn service(state: &AppState) -> &FaqService {
        &state.sections.faqs
    }
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(public_list::<FaqSections>))
        .merge(admin_routes::<FaqSections>(state))
}

#[cfg(test)]
pub fn memory_repository() -> crate::resource::memory::MemoryRepository<FaqSection, FaqSectionInput>
{
    crate::resource::memory::MemoryRepository::new(|id, i: &FaqSectionInput| FaqSection {
        id,
        title: i.title.clone(),
        description: i.description.clone(),
    })
}
