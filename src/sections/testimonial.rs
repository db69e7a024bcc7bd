use async_trait::async_trait;
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use validator::Validate;

use super::portfolio_section::PortfolioSectionRef;
use crate::{
    error::{AppError, AppResult},
    resource::{
        admin_routes, handlers::public_list, pg, ParentRef, ResourceRepository, ResourceService,
        Section,
    },
    state::AppState,
};

const TABLE: &str = "portfolio_testimonials";

const SELECT_JOINED: &str = r#"
    SELECT pt.id, pt.thumbnail, pt.message, pt.client_name, pt.role,
           ps.id AS section_id, ps.name AS section_name, ps.thumbnail AS section_thumbnail
    FROM portfolio_testimonials AS pt
    INNER JOIN portfolio_sections AS ps ON ps.id = pt.portfolio_section_id
"#;

#[derive(Debug, FromRow)]
struct TestimonialRow {
    id: i64,
    thumbnail: String,
    message: String,
    client_name: String,
    role: String,
    section_id: i64,
    section_name: String,
    section_thumbnail: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioTestimonial {
    pub id: i64,
    pub thumbnail: String,
    pub message: String,
    pub client_name: String,
    pub role: String,
    pub portfolio_section: PortfolioSectionRef,
}

impl From<TestimonialRow> for PortfolioTestimonial {
    fn from(r: TestimonialRow) -> Self {
        Self {
            id: r.id,
            thumbnail: r.thumbnail,
            message: r.message,
            client_name: r.client_name,
            role: r.role,
            portfolio_section: PortfolioSectionRef {
                id: r.section_id,
                name: r.section_name,
                thumbnail: r.section_thumbnail,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PortfolioTestimonialInput {
    #[validate(range(min = 1, message = "portfolio_section_id is required"))]
    pub portfolio_section_id: i64,
    #[validate(length(min = 1, message = "thumbnail is required"))]
    pub thumbnail: String,
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
    #[validate(length(min = 1, message = "client_name is required"))]
    pub client_name: String,
    #[validate(length(min = 1, message = "role is required"))]
    pub role: String,
}

impl ParentRef for PortfolioTestimonialInput {
    fn parent_id(&self) -> Option<i64> {
        Some(self.portfolio_section_id)
    }
}

pub type TestimonialService = ResourceService<PortfolioTestimonial, PortfolioTestimonialInput>;

pub struct PgTestimonialRepository {
    db: PgPool,
}

impl PgTestimonialRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceRepository for PgTestimonialRepository {
    type Record = PortfolioTestimonial;
    type Input = PortfolioTestimonialInput;

    async fn create(&self, input: PortfolioTestimonialInput) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO portfolio_testimonials
                (portfolio_section_id, thumbnail, message, client_name, role)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(input.portfolio_section_id)
        .bind(input.thumbnail)
        .bind(input.message)
        .bind(input.client_name)
        .bind(input.role)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn fetch_all(&self) -> AppResult<Vec<PortfolioTestimonial>> {
        let sql = format!("{SELECT_JOINED} WHERE pt.deleted_at IS NULL ORDER BY pt.created_at DESC");
        let rows = sqlx::query_as::<_, TestimonialRow>(&sql)
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().map(PortfolioTestimonial::from).collect())
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<PortfolioTestimonial> {
        let sql = format!("{SELECT_JOINED} WHERE pt.id = $1 AND pt.deleted_at IS NULL");
        let row = sqlx::query_as::<_, TestimonialRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(row.into())
    }

    async fn edit_by_id(&self, id: i64, input: PortfolioTestimonialInput) -> AppResult<()> {
        let mut tx = pg::lock_live_row(&self.db, TABLE, id).await?;
        sqlx::query(
            r#"
            UPDATE portfolio_testimonials
            SET portfolio_section_id = $2, thumbnail = $3, message = $4,
                client_name = $5, role = $6, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(input.portfolio_section_id)
        .bind(input.thumbnail)
        .bind(input.message)
        .bind(input.client_name)
        .bind(input.role)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        pg::soft_delete(&self.db, TABLE, id).await
    }
}

pub struct Testimonials;

impl Section for Testimonials {
    type Record = PortfolioTestimonial;
    type Input = PortfolioTestimonialInput;
    const LABEL: &'static str = "portfolio testimonial";

    fn service(state: &AppState) -> &TestimonialService {
        &state.sections.testimonials
    }
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(public_list::<Testimonials>))
        .merge(admin_routes::<Testimonials>(state))
}

#[cfg(test)]
pub fn memory_repository(
) -> crate::resource::memory::MemoryRepository<PortfolioTestimonial, PortfolioTestimonialInput> {
    crate::resource::memory::MemoryRepository::new(|id, i: &PortfolioTestimonialInput| {
        PortfolioTestimonial {
            id,
            thumbnail: i.thumbnail.clone(),
            message: i.message.clone(),
            client_name: i.client_name.clone(),
            role: i.role.clone(),
            portfolio_section: PortfolioSectionRef {
                id: i.portfolio_section_id,
                name: String::new(),
                thumbnail: None,
            },
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::sections::portfolio_section::{self, PortfolioSectionInput};

    fn testimonial(section_id: i64) -> PortfolioTestimonialInput {
        PortfolioTestimonialInput {
            portfolio_section_id: section_id,
            thumbnail: "public/uploads/face.png".into(),
            message: "Shipped on time".into(),
            client_name: "Rina".into(),
            role: "CTO".into(),
        }
    }

    #[tokio::test]
    async fn testimonial_follows_its_portfolio_section() {
        let sections = Arc::new(portfolio_section::memory_repository());
        let service = TestimonialService::with_parent(Arc::new(memory_repository()), sections.clone());

        let err = service.create(testimonial(1)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));

        sections
            .create(PortfolioSectionInput {
                name: "Web".into(),
                tagline: "Sites".into(),
                thumbnail: None,
            })
            .await
            .unwrap();
        service.create(testimonial(1)).await.unwrap();

        let json = serde_json::to_value(service.fetch_all().await.unwrap()).unwrap();
        assert_eq!(json[0]["client_name"], "Rina");
        assert_eq!(json[0]["portfolio_section"]["id"], 1);
    }
}
