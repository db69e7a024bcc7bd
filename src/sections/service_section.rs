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

const TABLE: &str = "service_sections";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ServiceSection {
    pub id: i64,
    pub name: String,
    pub tagline: String,
    pub path_icon: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServiceSectionInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "tagline is required"))]
    pub tagline: String,
    pub path_icon: Option<String>,
}

impl ParentRef for ServiceSectionInput {}

pub type ServiceSectionService = ResourceService<ServiceSection, ServiceSectionInput>;

/// Parent of service details and appointments.
pub struct PgServiceSectionRepository {
    db: PgPool,
}

impl PgServiceSectionRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceRepository for PgServiceSectionRepository {
    type Record = ServiceSection;
    type Input = ServiceSectionInput;

    async fn create(&self, input: ServiceSectionInput) -> AppResult<()> {
        sqlx::query("INSERT INTO service_sections (name, tagline, path_icon) VALUES ($1, $2, $3)")
            .bind(input.name)
            .bind(input.tagline)
            .bind(input.path_icon)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn fetch_all(&self) -> AppResult<Vec<ServiceSection>> {
        let rows = sqlx::query_as::<_, ServiceSection>(
            r#"
            SELECT id, name, tagline, path_icon
            FROM service_sections
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<ServiceSection> {
        let row = sqlx::query_as::<_, ServiceSection>(
            r#"
            SELECT id, name, tagline, path_icon
            FROM service_sections
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn edit_by_id(&self, id: i64, input: ServiceSectionInput) -> AppResult<()> {
        let mut tx = pg::lock_live_row(&self.db, TABLE, id).await?;
        sqlx::query(
            r#"
            UPDATE service_sections
            SET name = $2, tagline = $3, path_icon = $4, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(input.name)
        .bind(input.tagline)
        .bind(input.path_icon)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        pg::soft_delete(&self.db, TABLE, id).await
    }
}

pub struct ServiceSections;

impl Section for ServiceSections {
    type Record = ServiceSection;
    type Input = ServiceSectionInput;
    const LABEL: &'static str = "service section";

    fn service(state: &AppState) -> &ServiceSectionService {
        &state.sections.services
    }
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(public_list::<ServiceSections>))
        .merge(admin_routes::<ServiceSections>(state))
}

#[cfg(test)]
pub fn memory_repository(
) -> crate::resource::memory::MemoryRepository<ServiceSection, ServiceSectionInput> {
    crate::resource::memory::MemoryRepository::new(|id, i: &ServiceSectionInput| ServiceSection {
        id,
        name: i.name.clone(),
        tagline: i.tagline.clone(),
        path_icon: i.path_icon.clone(),
    })
}
