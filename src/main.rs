mod app;
mod auth;
mod config;
mod db;
mod error;
mod extractors;
mod images;
mod mailer;
mod resource;
mod response;
mod sections;
mod state;
mod storage;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "company_profile=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init().await?;
    db::migrate(&app_state.db).await;

    if std::env::args().nth(1).as_deref() == Some("seed") {
        db::seed_admin(&app_state.auth).await?;
        tracing::info!("seeding finished");
        return Ok(());
    }

    let config = app_state.config.clone();
    app::serve(app::build_app(app_state), &config).await
}
