use async_trait::async_trait;
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::Date;
use validator::Validate;

use super::portfolio_section::PortfolioSectionRef;
use crate::{
    error::AppResult,
    resource::{
        admin_routes, handlers::public_by_parent, pg, ParentRef, ResourceRepository,
        ResourceService, Section,
    },
    state::AppState,
};

const TABLE: &str = "portfolio_details";

const SELECT_JOINED: &str = r#"
    SELECT pd.id, pd.category, pd.client_name, pd.project_date, pd.project_url,
           pd.title, pd.description,
           ps.id AS section_id, ps.name AS section_name, ps.thumbnail AS section_thumbnail
    FROM portfolio_details AS pd
    INNER JOIN portfolio_sections AS ps ON ps.id = pd.portfolio_section_id
"#;

time::serde::format_description!(ymd, Date, "[year]-[month]-[day]");
time::serde::format_description!(long_date, Date, "[day] [month repr:long] [year]");

#[derive(Debug, FromRow)]
struct PortfolioDetailRow {
    id: i64,
    category: String,
    client_name: String,
    project_date: Date,
    project_url: Option<String>,
    title: String,
    description: String,
    section_id: i64,
    section_name: String,
    section_thumbnail: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioDetail {
    pub id: i64,
    pub category: String,
    pub client_name: String,
    #[serde(with = "long_date")]
    pub project_date: Date,
    pub project_url: Option<String>,
    pub title: String,
    pub description: String,
    pub portfolio_section: PortfolioSectionRef,
}

impl From<PortfolioDetailRow> for PortfolioDetail {
    fn from(r: PortfolioDetailRow) -> Self {
        Self {
            id: r.id,
            category: r.category,
            client_name: r.client_name,
            project_date: r.project_date,
            project_url: r.project_url,
            title: r.title,
            description: r.description,
            portfolio_section: PortfolioSectionRef {
                id: r.section_id,
                name: r.section_name,
                thumbnail: r.section_thumbnail,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PortfolioDetailInput {
    #[validate(range(min = 1, message = "portfolio_section_id is required"))]
    pub portfolio_section_id: i64,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "client_name is required"))]
    pub client_name: String,
    #[serde(with = "ymd")]
    pub project_date: Date,
    #[validate(url(message = "project_url must be a URL"))]
    pub project_url: Option<String>,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
}

impl ParentRef for PortfolioDetailInput {
    fn parent_id(&self) -> Option<i64> {
        Some(self.portfolio_section_id)
    }
}

pub type PortfolioDetailService = ResourceService<PortfolioDetail, PortfolioDetailInput>;

pub struct PgPortfolioDetailRepository {
    db: PgPool,
}

impl PgPortfolioDetailRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn query_joined(&self, filter: &str, bind: Option<i64>) -> AppResult<Vec<PortfolioDetail>> {
        let sql = format!("{SELECT_JOINED} {filter}");
        let mut query = sqlx::query_as::<_, PortfolioDetailRow>(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.db).await?;
        Ok(rows.into_iter().map(PortfolioDetail::from).collect())
    }
}

#[async_trait]
impl ResourceRepository for PgPortfolioDetailRepository {
    type Record = PortfolioDetail;
    type Input = PortfolioDetailInput;

    async fn create(&self, input: PortfolioDetailInput) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO portfolio_details
                (portfolio_section_id, category, client_name, project_date,
                 project_url, title, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(input.portfolio_section_id)
        .bind(input.category)
        .bind(input.client_name)
        .bind(input.project_date)
        .bind(input.project_url)
        .bind(input.title)
        .bind(input.description)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn fetch_all(&self) -> AppResult<Vec<PortfolioDetail>> {
        self.query_joined("WHERE pd.deleted_at IS NULL ORDER BY pd.created_at DESC", None)
            .await
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<PortfolioDetail> {
        self.query_joined("WHERE pd.id = $1 AND pd.deleted_at IS NULL", Some(id))
            .await?
            .into_iter()
            .next()
            .ok_or(crate::error::AppError::NotFound)
    }

    async fn edit_by_id(&self, id: i64, input: PortfolioDetailInput) -> AppResult<()> {
        let mut tx = pg::lock_live_row(&self.db, TABLE, id).await?;
        sqlx::query(
            r#"
            UPDATE portfolio_details
            SET portfolio_section_id = $2, category = $3, client_name = $4,
                project_date = $5, project_url = $6, title = $7, description = $8,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(input.portfolio_section_id)
        .bind(input.category)
        .bind(input.client_name)
        .bind(input.project_date)
        .bind(input.project_url)
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

    async fn fetch_by_parent(&self, section_id: i64) -> AppResult<Vec<PortfolioDetail>> {
        self.query_joined(
            "WHERE pd.portfolio_section_id = $1 AND pd.deleted_at IS NULL \
             ORDER BY pd.created_at DESC",
            Some(section_id),
        )
        .await
    }
}

pub struct PortfolioDetails;

impl Section for PortfolioDetails {
    type Record = PortfolioDetail;
    type Input = PortfolioDetailInput;
    const LABEL: &'static str = "portfolio detail";

    fn service(state: &AppState) -> &PortfolioDetailService {
        &state.sections.portfolio_details
    }
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/:id", get(public_by_parent::<PortfolioDetails>))
        .merge(admin_routes::<PortfolioDetails>(state))
}

#[cfg(test)]
pub fn memory_repository(
) -> crate::resource::memory::MemoryRepository<PortfolioDetail, PortfolioDetailInput> {
    crate::resource::memory::MemoryRepository::new(|id, i: &PortfolioDetailInput| {
        PortfolioDetail {
            id,
            category: i.category.clone(),
            client_name: i.client_name.clone(),
            project_date: i.project_date,
            project_url: i.project_url.clone(),
            title: i.title.clone(),
            description: i.description.clone(),
            portfolio_section: PortfolioSectionRef {
                id: i.portfolio_section_id,
                name: String::new(),
                thumbnail: None,
            },
        }
    })
    .with_parent_key(|i| i.portfolio_section_id)
}
