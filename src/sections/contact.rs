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

const TABLE: &str = "contact_us";

/// Office address block in the site footer.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ContactUs {
    pub id: i64,
    pub company_name: String,
    pub location_name: String,
    pub address: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactUsInput {
    #[validate(length(min = 1, message = "company_name is required"))]
    pub company_name: String,
    #[validate(length(min = 1, message = "location_name is required"))]
    pub location_name: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[validate(regex(path = "crate::sections::PHONE_RE", message = "invalid phone number"))]
    pub phone_number: String,
}

impl ParentRef for ContactUsInput {}

pub type ContactService = ResourceService<ContactUs, ContactUsInput>;

pub struct PgContactUsRepository {
    db: PgPool,
}

impl PgContactUsRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceRepository for PgContactUsRepository {
    type Record = ContactUs;
    type Input = ContactUsInput;

    async fn create(&self, input: ContactUsInput) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO contact_us (company_name, location_name, address, phone_number)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(input.company_name)
        .bind(input.location_name)
        .bind(input.address)
        .bind(input.phone_number)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn fetch_all(&self) -> AppResult<Vec<ContactUs>> {
        let rows = sqlx::query_as::<_, ContactUs>(
            r#"
            SELECT id, company_name, location_name, address, phone_number
            FROM contact_us
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<ContactUs> {
        let row = sqlx::query_as::<_, ContactUs>(
            r#"
            SELECT id, company_name, location_name, address, phone_number
            FROM contact_us
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn edit_by_id(&self, id: i64, input: ContactUsInput) -> AppResult<()> {
        let mut tx = pg::lock_live_row(&self.db, TABLE, id).await?;
        sqlx::query(
            r#"
            UPDATE contact_us
            SET company_name = $2, location_name = $3, address = $4, phone_number = $5,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(input.company_name)
        .bind(input.location_name)
        .bind(input.address)
        .bind(input.phone_number)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        pg::soft_delete(&self.db, TABLE, id).await
    }
}

pub struct ContactSections;

impl Section for ContactSections {
    type Record = ContactUs;
    type Input = ContactUsInput;
    const LABEL: &'static str = "contact us";

    fn service(state: &AppState) -> &ContactService {
        &state.sections.contacts
    }
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(public_list::<ContactSections>))
        .merge(admin_routes::<ContactSections>(state))
}

#[cfg(test)]
pub fn memory_repository() -> crate::resource::memory::MemoryRepository<ContactUs, ContactUsInput> {
    crate::resource::memory::MemoryRepository::new(|id, i: &ContactUsInput| ContactUs {
        id,
        company_name: i.company_name.clone(),
        location_name: i.location_name.clone(),
        address: i.address.clone(),
        phone_number: i.phone_number.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(phone: &str) -> ContactUsInput {
        ContactUsInput {
            company_name: "Acme".into(),
            location_name: "HQ".into(),
            address: "Jl. Sudirman 1".into(),
            phone_number: phone.into(),
        }
    }

    #[test]
    fn phone_number_is_checked() {
        assert!(input("+62 812-3456-7890").validate().is_ok());
        assert!(input("021 555 0199").validate().is_ok());
        assert!(input("call me").validate().is_err());
        assert!(input("").validate().is_err());
    }
}
