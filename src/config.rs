use std::env;

/// Where salon data lives. Chosen once at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageConfig {
    Postgres { database_url: String },
    /// In-process storage, used when no `DATABASE_URL` is set.
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub redis_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiry_seconds: u64,
    pub host: String,
    pub port: u16,
    pub super_admin_key: String,
    pub app_base_url: String,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let storage = match env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()) {
            Some(database_url) => StorageConfig::Postgres { database_url },
            None => StorageConfig::Memory,
        };

        Ok(Self {
            storage,
            redis_url: env::var("REDIS_URL").ok().filter(|s| !s.is_empty()),
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiry_seconds: env::var("JWT_EXPIRY_SECONDS")
                .unwrap_or_else(|_| "3600".into())
                .parse()?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            super_admin_key: env::var("SUPER_ADMIN_KEY")
                .unwrap_or_else(|_| "change_this_super_admin_key".into()),
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost".into()),
            max_body_bytes: env::var("MAX_BODY_BYTES")
                .unwrap_or_else(|_| (32 * 1024 * 1024).to_string())
                .parse()?,
        })
    }
}

impl Config {
    pub fn storage_label(&self) -> &'static str {
        match self.storage {
            StorageConfig::Postgres { .. } => "postgres",
            StorageConfig::Memory => "memory",
        }
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {}", key))
}
