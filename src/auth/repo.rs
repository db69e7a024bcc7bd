use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::User;
use crate::error::AppResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Inserts the user unless the email is already taken; returns the stored row.
    async fn first_or_create(&self, name: &str, email: &str, password_hash: &str)
        -> AppResult<User>;
}

pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn first_or_create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> AppResult<User> {
        sqlx::query(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .execute(&self.db)
        .await?;

        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, name, email, password FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::sync::Mutex;

    use super::*;

    /// In-memory credential store.
    #[derive(Default)]
    pub struct MemoryUserRepository {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UserRepository for MemoryUserRepository {
        async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.email == email).cloned())
        }

        async fn first_or_create(
            &self,
            name: &str,
            email: &str,
            password_hash: &str,
        ) -> AppResult<User> {
            let mut users = self.users.lock().unwrap();
            if let Some(existing) = users.iter().find(|u| u.email == email) {
                return Ok(existing.clone());
            }
            let user = User {
                id: users.len() as i64 + 1,
                name: name.into(),
                email: email.into(),
                password: password_hash.into(),
            };
            users.push(user.clone());
            Ok(user)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a running Postgres (DATABASE_URL)"]
    async fn first_or_create_is_idempotent(db: PgPool) {
        let repo = PgUserRepository::new(db);
        let first = repo.first_or_create("Admin", "admin@example.com", "hash-1").await.unwrap();
        let second = repo.first_or_create("Other", "admin@example.com", "hash-2").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.password, "hash-1");

        let found = repo.find_by_email("admin@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(first.id));
        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
    }
}
