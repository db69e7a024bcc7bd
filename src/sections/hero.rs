use async_trait::async_trait;
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use validator::Validate;

use crate::{
    error::AppResult,
    resource::{
        admin_routes, handlers::public_latest, pg, ParentRef, ResourceRepository,
        ResourceService, Section,
    },
    state::AppState,
};

const TABLE: &str = "hero_sections";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HeroSection {
    pub id: i64,
    pub heading: String,
    pub sub_heading: String,
    pub path_video: Option<String>,
    pub banner: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HeroSectionInput {
    #[validate(length(min = 1, message = "heading is required"))]
    pub heading: String,
    #[validate(length(min = 1, message = "sub_heading is required"))]
    pub sub_heading: String,
    pub path_video: Option<String>,
    #[validate(length(min = 1, message = "banner is required"))]
    pub banner: String,
}

impl ParentRef for HeroSectionInput {}

pub type HeroService = ResourceService<HeroSection, HeroSectionInput>;

pub struct PgHeroSectionRepository {
    db: PgPool,
}

impl PgHeroSectionRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceRepository for PgHeroSectionRepository {
    type Record = HeroSection;
    type Input = HeroSectionInput;

    async fn create(&self, input: HeroSectionInput) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO hero_sections (heading, sub_heading, path_video, banner)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(input.heading)
        .bind(input.sub_heading)
        .bind(input.path_video)
        .bind(input.banner)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn fetch_all(&self) -> AppResult<Vec<HeroSection>> {
        let rows = sqlx::query_as::<_, HeroSection>(
            r#"
            SELECT id, heading, sub_heading, path_video, banner
            FROM hero_sections
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<HeroSection> {
        let row = sqlx::query_as::<_, HeroSection>(
            r#"
            SELECT id, heading, sub_heading, path_video, banner
            FROM hero_sections
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn edit_by_id(&self, id: i64, input: HeroSectionInput) -> AppResult<()> {
        let mut tx = pg::lock_live_row(&self.db, TABLE, id).await?;
        sqlx::query(
            r#"
            UPDATE hero_sections
            SET heading = $2, sub_heading = $3, path_video = $4, banner = $5, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(input.heading)
        .bind(input.sub_heading)
        .bind(input.path_video)
        .bind(input.banner)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        pg::soft_delete(&self.db, TABLE, id).await
    }
}

pub struct HeroSections;

impl Section for HeroSections {
    type Record = HeroSection;
    type Input = HeroSectionInput;
    const LABEL: &'static str = "hero section";

    fn service(state: &AppState) -> &HeroService {
        &state.sections.hero
    }
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(public_latest::<HeroSections>))
        .merge(admin_routes::<HeroSections>(state))
}

#[cfg(test)]
pub fn memory_repository() -> crate::resource::memory::MemoryRepository<HeroSection, HeroSectionInput>
{
    crate::resource::memory::MemoryRepository::new(|id, i: &HeroSectionInput| HeroSection {
        id,
        heading: i.heading.clone(),
        sub_heading: i.sub_heading.clone(),
        path_video: i.path_video.clone(),
        banner: i.banner.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(heading: &str) -> HeroSectionInput {
        HeroSectionInput {
            heading: heading.into(),
            sub_heading: "We build things".into(),
            path_video: None,
            banner: "https://cdn.example.com/banner.png".into(),
        }
    }

    #[test]
    fn empty_heading_fails_validation() {
        assert!(input("").validate().is_err());
        assert!(input("Welcome").validate().is_ok());
    }

    async fn deleted_at(db: &PgPool, id: i64) -> Option<time::OffsetDateTime> {
        sqlx::query_scalar("SELECT deleted_at FROM hero_sections WHERE id = $1")
            .bind(id)
            .fetch_one(db)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a running Postgres (DATABASE_URL)"]
    async fn edit_and_delete_round(db: PgPool) {
        let repo = PgHeroSectionRepository::new(db.clone());
        repo.create(input("first")).await.unwrap();
        repo.create(input("second")).await.unwrap();

        let all = repo.fetch_all().await.unwrap();
        assert_eq!(all.len(), 2);
        let id = all[0].id;

        repo.edit_by_id(id, input("edited")).await.unwrap();
        assert_eq!(repo.fetch_by_id(id).await.unwrap().heading, "edited");

        repo.delete_by_id(id).await.unwrap();
        let stamped = deleted_at(&db, id).await;
        assert!(stamped.is_some());

        assert!(matches!(
            repo.delete_by_id(id).await.unwrap_err(),
            crate::error::AppError::NotFound
        ));
        assert!(matches!(
            repo.edit_by_id(id, input("again")).await.unwrap_err(),
            crate::error::AppError::NotFound
        ));
        assert_eq!(deleted_at(&db, id).await, stamped);
        assert_eq!(repo.fetch_all().await.unwrap().len(), 1);
    }
}
