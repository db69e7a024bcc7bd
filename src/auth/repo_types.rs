use sqlx::FromRow;

/// Admin credential record.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String, // Argon2 hash
}
