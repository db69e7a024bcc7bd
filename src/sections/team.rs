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

const TABLE: &str = "our_teams";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OurTeam {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub tagline: String,
    pub path_photo: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OurTeamInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "role is required"))]
    pub role: String,
    #[validate(length(min = 1, message = "path_photo is required"))]
    pub path_photo: String,
    #[validate(length(min = 1, message = "tagline is required"))]
    pub tagline: String,
}

impl ParentRef for OurTeamInput {}

pub type TeamService = ResourceService<OurTeam, OurTeamInput>;

pub struct PgOurTeamRepository {
    db: PgPool,
}

impl PgOurTeamRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceRepository for PgOurTeamRepository {
    type Record = OurTeam;
    type Input = OurTeamInput;

    async fn create(&self, input: OurTeamInput) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO our_teams (name, role, path_photo, tagline)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(input.name)
        .bind(input.role)
        .bind(input.path_photo)
        .bind(input.tagline)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn fetch_all(&self) -> AppResult<Vec<OurTeam>> {
        let rows = sqlx::query_as::<_, OurTeam>(
            r#"
            SELECT id, name, role, tagline, path_photo
            FROM our_teams
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<OurTeam> {
        let row = sqlx::query_as::<_, OurTeam>(
            r#"
            SELECT id, name, role, tagline, path_photo
            FROM our_teams
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn edit_by_id(&self, id: i64, input: OurTeamInput) -> AppResult<()> {
        let mut tx = pg::lock_live_row(&self.db, TABLE, id).await?;
        sqlx::query(
            r#"
            UPDATE our_teams
            SET name = $2, role = $3, path_photo = $4, tagline = $5, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(input.name)
        .bind(input.role)
        .bind(input.path_photo)
        .bind(input.tagline)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        pg::soft_delete(&self.db, TABLE, id).await
    }
}

pub struct OurTeams;

impl Section for OurTeams {
    type Record = OurTeam;
    type Input = OurTeamInput;
    const LABEL: &'static str = "our team";

    fn service(state: &AppState) -> &TeamService {
        &state.sections.teams
    }
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(public_list::<OurTeams>))
        .merge(admin_routes::<OurTeams>(state))
}

#[cfg(test)]
pub fn memory_repository() -> crate::resource::memory::MemoryRepository<OurTeam, OurTeamInput> {
    crate::resource::memory::MemoryRepository::new(|id, i: &OurTeamInput| OurTeam {
        id,
        name: i.name.clone(),
        role: i.role.clone(),
        tagline: i.tagline.clone(),
        path_photo: i.path_photo.clone(),
    })
}
