use async_trait::async_trait;
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use validator::Validate;

use crate::{
    error::AppResult,
    resource::{
        admin_routes, handlers::public_by_parent, pg, ParentRef, ResourceRepository,
        ResourceService, Section,
    },
    state::AppState,
};

const TABLE: &str = "service_details";

const SELECT_JOINED: &str = r#"
    SELECT sd.id, sd.service_id, sd.path_image, sd.title, sd.description,
           sd.path_pdf, sd.path_docx, ss.name AS service_name
    FROM service_details AS sd
    INNER JOIN service_sections AS ss ON ss.id = sd.service_id
"#;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ServiceDetail {
    pub id: i64,
    pub service_id: i64,
    pub path_image: String,
    pub title: String,
    pub description: String,
    pub path_pdf: Option<String>,
    pub path_docx: Option<String>,
    pub service_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServiceDetailInput {
    #[validate(range(min = 1, message = "service_id is required"))]
    pub service_id: i64,
    #[validate(length(min = 1, message = "path_image is required"))]
    pub path_image: String,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    pub path_pdf: Option<String>,
    pub path_docx: Option<String>,
}

// The service section is only joined on read, writes do not check it.
impl ParentRef for ServiceDetailInput {}

pub type ServiceDetailService = ResourceService<ServiceDetail, ServiceDetailInput>;

pub struct PgServiceDetailRepository {
    db: PgPool,
}

impl PgServiceDetailRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceRepository for PgServiceDetailRepository {
    type Record = ServiceDetail;
    type Input = ServiceDetailInput;

    async fn create(&self, input: ServiceDetailInput) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO service_details
                (service_id, path_image, title, description, path_pdf, path_docx)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(input.service_id)
        .bind(input.path_image)
        .bind(input.title)
        .bind(input.description)
        .bind(input.path_pdf)
        .bind(input.path_docx)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn fetch_all(&self) -> AppResult<Vec<ServiceDetail>> {
        let sql = format!("{SELECT_JOINED} WHERE sd.deleted_at IS NULL ORDER BY sd.created_at DESC");
        let rows = sqlx::query_as::<_, ServiceDetail>(&sql)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<ServiceDetail> {
        let sql = format!("{SELECT_JOINED} WHERE sd.id = $1 AND sd.deleted_at IS NULL");
        let row = sqlx::query_as::<_, ServiceDetail>(&sql)
            .bind(id)
            .fetch_one(&self.db)
            .await?;
        Ok(row)
    }

    async fn edit_by_id(&self, id: i64, input: ServiceDetailInput) -> AppResult<()> {
        let mut tx = pg::lock_live_row(&self.db, TABLE, id).await?;
        sqlx::query(
            r#"
            UPDATE service_details
            SET service_id = $2, path_image = $3, title = $4, description = $5,
                path_pdf = $6, path_docx = $7, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(input.service_id)
        .bind(input.path_image)
        .bind(input.title)
        .bind(input.description)
        .bind(input.path_pdf)
        .bind(input.path_docx)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        pg::soft_delete(&self.db, TABLE, id).await
    }

    async fn fetch_by_parent(&self, service_id: i64) -> AppResult<Vec<ServiceDetail>> {
        let sql = format!(
            "{SELECT_JOINED} WHERE sd.service_id = $1 AND sd.deleted_at IS NULL \
             ORDER BY sd.created_at DESC"
        );
        let rows = sqlx::query_as::<_, ServiceDetail>(&sql)
            .bind(service_id)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }
}

pub struct ServiceDetails;

impl Section for ServiceDetails {
    type Record = ServiceDetail;
    type Input = ServiceDetailInput;
    const LABEL: &'static str = "service detail";

    fn service(state: &AppState) -> &ServiceDetailService {
        &state.sections.service_details
    }
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/:id", get(public_by_parent::<ServiceDetails>))
        .merge(admin_routes::<ServiceDetails>(state))
}

#[cfg(test)]
pub fn memory_repository(
) -> crate::resource::memory::MemoryRepository<ServiceDetail, ServiceDetailInput> {
    crate::resource::memory::MemoryRepository::new(|id, i: &ServiceDetailInput| ServiceDetail {
        id,
        service_id: i.service_id,
        path_image: i.path_image.clone(),
        title: i.title.clone(),
        description: i.description.clone(),
        path_pdf: i.path_pdf.clone(),
        path_docx: i.path_docx.clone(),
        service_name: format!("service #{}", i.service_id),
    })
    .with_parent_key(|i| i.service_id)
}
