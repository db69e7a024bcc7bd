use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::{auth::services::AuthService, config::AppConfig};

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;
    info!(max_connections = config.database_max_connections, "database pool ready");
    Ok(db)
}

pub async fn migrate(db: &PgPool) {
    if let Err(e) = sqlx::migrate!("./migrations").run(db).await {
        warn!(error = %e, "migration failed; continuing");
    }
}

/// Creates the admin account from `ADMIN_NAME`/`ADMIN_EMAIL`/`ADMIN_PASSWORD`.
pub async fn seed_admin(auth: &AuthService) -> anyhow::Result<()> {
    let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".into());
    let email = std::env::var("ADMIN_EMAIL")
        .context("ADMIN_EMAIL is required for seeding")?
        .trim()
        .to_lowercase();
    let password = std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD is required for seeding")?;

    auth.seed_admin(&name, &email, &password)
        .await
        .context("seed admin user")?;
    Ok(())
}
