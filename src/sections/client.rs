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

const TABLE: &str = "client_sections";

/// Client logo shown on the home page.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ClientSection {
    pub id: i64,
    pub name: String,
    pub path_icon: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClientSectionInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "path_icon is required"))]
    pub path_icon: String,
}

impl ParentRef for ClientSectionInput {}

pub type ClientService = ResourceService<ClientSection, ClientSectionInput>;

pub struct PgClientSectionRepository {
    db: PgPool,
}

impl PgClientSectionRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceRepository for PgClientSectionRepository {
    type Record = ClientSection;
    type Input = ClientSectionInput;

    async fn create(&self, input: ClientSectionInput) -> AppResult<()> {
        sqlx::query("INSERT INTO client_sections (name, path_icon) VALUES ($1, $2)")
            .bind(input.name)
            .bind(input.path_icon)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn fetch_all(&self) -> AppResult<Vec<ClientSection>> {
        let rows = sqlx::query_as::<_, ClientSection>(
            r#"
            SELECT id, name, path_icon
            FROM client_sections
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<ClientSection> {
        let row = sqlx::query_as::<_, ClientSection>(
            "SELECT id, name, path_icon FROM client_sections WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn edit_by_id(&self, id: i64, input: ClientSectionInput) -> AppResult<()> {
        let mut tx = pg::lock_live_row(&self.db, TABLE, id).await?;
        sqlx::query(
            "UPDATE client_sections SET name = $2, path_icon = $3, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(input.name)
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

pub struct ClientSections;

impl Section for ClientSections {
    type Record = ClientSection;
    type Input = ClientSectionInput;
    const LABEL: &'static str = "client section";

    fn service(state: &AppState) -> &ClientService {
        &state.sections.clients
    }
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(public_list::<ClientSections>))
        .merge(admin_routes::<ClientSections>(state))
}

#[cfg(test)]
pub fn memory_repository(
) -> crate::resource::memory::MemoryRepository<ClientSection, ClientSectionInput> {
    crate::resource::memory::MemoryRepository::new(|id, i: &ClientSectionInput| ClientSection {
        id,
        name: i.name.clone(),
        path_icon: i.path_icon.clone(),
    })
}
