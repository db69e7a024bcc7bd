use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Base URL the bucket is publicly served from, without trailing slash.
    pub public_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub receiver: String,
    pub is_tls: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub email: EmailConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET_KEY")?,
            issuer: env_or("JWT_ISSUER", "company-profile"),
        };
        let storage = StorageConfig {
            endpoint: std::env::var("STORAGE_ENDPOINT")?,
            bucket: std::env::var("STORAGE_BUCKET")?,
            access_key: std::env::var("STORAGE_ACCESS_KEY")?,
            secret_key: std::env::var("STORAGE_SECRET_KEY")?,
            region: env_or("STORAGE_REGION", "us-east-1"),
            public_url: std::env::var("STORAGE_PUBLIC_URL")?
                .trim_end_matches('/')
                .to_string(),
        };
        let email = EmailConfig {
            host: std::env::var("EMAIL_HOST")?,
            port: env_parse("EMAIL_PORT", 587),
            username: env_or("EMAIL_USERNAME", ""),
            password: env_or("EMAIL_PASSWORD", ""),
            receiver: std::env::var("EMAIL_RECEIVER")?,
            is_tls: env_parse("EMAIL_IS_TLS", true),
        };
        Ok(Self {
            host: env_or("APP_HOST", "0.0.0.0"),
            port: env_parse("APP_PORT", 8080),
            database_url,
            database_max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 10),
            jwt,
            storage,
            email,
        })
    }
}
