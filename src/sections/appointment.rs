use async_trait::async_trait;
use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::Date;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    auth::middleware::require_token,
    error::{AppError, AppResult},
    extractors::ValidJson,
    mailer::Mailer,
    resource::{handlers, pg, ParentRef, ResourceRepository, ResourceService, Section},
    response::ApiResponse,
    state::AppState,
};

const TABLE: &str = "appointments";

time::serde::format_description!(ymd, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Appointment {
    pub id: i64,
    pub service_id: i64,
    pub name: String,
    pub phone_number: String,
    pub email: String,
    pub brief: String,
    pub budget: f64,
    #[serde(with = "ymd")]
    pub meet_at: Date,
    pub service_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppointmentInput {
    #[validate(range(min = 1, message = "service_id is required"))]
    pub service_id: i64,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(regex(path = "crate::sections::PHONE_RE", message = "invalid phone number"))]
    pub phone_number: String,
    #[validate(email(message = "invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "brief is required"))]
    pub brief: String,
    #[validate(range(min = 0.0, message = "budget must not be negative"))]
    pub budget: f64,
    #[serde(with = "ymd")]
    pub meet_at: Date,
}

impl ParentRef for AppointmentInput {}

pub type AppointmentService = ResourceService<Appointment, AppointmentInput>;

pub struct PgAppointmentRepository {
    db: PgPool,
}

impl PgAppointmentRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceRepository for PgAppointmentRepository {
    type Record = Appointment;
    type Input = AppointmentInput;

    async fn create(&self, input: AppointmentInput) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO appointments
                (service_id, name, phone_number, email, brief, budget, meet_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(input.service_id)
        .bind(input.name)
        .bind(input.phone_number)
        .bind(input.email)
        .bind(input.brief)
        .bind(input.budget)
        .bind(input.meet_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn fetch_all(&self) -> AppResult<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT a.id, a.service_id, a.name, a.phone_number, a.email, a.brief,
                   a.budget, a.meet_at, ss.name AS service_name
            FROM appointments AS a
            INNER JOIN service_sections AS ss ON ss.id = a.service_id
            WHERE a.deleted_at IS NULL
            ORDER BY a.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn fetch_by_id(&self, _id: i64) -> AppResult<Appointment> {
        Err(AppError::Unimplemented("fetch appointment by id"))
    }

    async fn edit_by_id(&self, _id: i64, _input: AppointmentInput) -> AppResult<()> {
        Err(AppError::Unimplemented("edit appointment"))
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        pg::soft_delete(&self.db, TABLE, id).await
    }
}

pub struct Appointments;

impl Section for Appointments {
    type Record = Appointment;
    type Input = AppointmentInput;
    const LABEL: &'static str = "appointment";

    fn service(state: &AppState) -> &AppointmentService {
        &state.sections.appointments
    }
}

/// Stores the request, then notifies the site owner.
///
/// A mail failure is reported even though the row is already stored.
pub async fn book(
    service: &AppointmentService,
    mailer: &dyn Mailer,
    input: AppointmentInput,
) -> AppResult<()> {
    let from = input.email.clone();
    service.create(input).await?;

    let body = format!("You have received a new appointment request from {from}");
    mailer.notify(&from, "New Appointment", &body).await?;
    info!(%from, "appointment booked");
    Ok(())
}

#[instrument(skip_all)]
async fn create(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<AppointmentInput>,
) -> AppResult<ApiResponse<()>> {
    book(&state.sections.appointments, state.mailer.as_ref(), input).await?;
    Ok(ApiResponse::created("Success create appointment"))
}

/// Public booking plus admin list, by-id and delete.
pub fn routes(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/admin", get(handlers::fetch_all::<Appointments>))
        .route(
            "/admin/:id",
            get(handlers::fetch_by_id::<Appointments>).delete(handlers::delete::<Appointments>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_token,
        ));

    Router::new().route("/", post(create)).merge(admin)
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use crate::resource::memory::MemoryRepository;

    /// In-memory store with the same unsupported operations as Postgres.
    pub struct MemoryAppointments(MemoryRepository<Appointment, AppointmentInput>);

    impl MemoryAppointments {
        pub fn new() -> Self {
            Self(MemoryRepository::new(|id, i: &AppointmentInput| Appointment {
                id,
                service_id: i.service_id,
                name: i.name.clone(),
                phone_number: i.phone_number.clone(),
                email: i.email.clone(),
                brief: i.brief.clone(),
                budget: i.budget,
                meet_at: i.meet_at,
                service_name: format!("service #{}", i.service_id),
            }))
        }
    }

    #[async_trait]
    impl ResourceRepository for MemoryAppointments {
        type Record = Appointment;
        type Input = AppointmentInput;

        async fn create(&self, input: AppointmentInput) -> AppResult<()> {
            self.0.create(input).await
        }

        async fn fetch_all(&self) -> AppResult<Vec<Appointment>> {
            self.0.fetch_all().await
        }

        async fn fetch_by_id(&self, _id: i64) -> AppResult<Appointment> {
            Err(AppError::Unimplemented("fetch appointment by id"))
        }

        async fn edit_by_id(&self, _id: i64, _input: AppointmentInput) -> AppResult<()> {
            Err(AppError::Unimplemented("edit appointment"))
        }

        async fn delete_by_id(&self, id: i64) -> AppResult<()> {
            self.0.delete_by_id(id).await
        }
    }
}
