use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::record::Record;
use crate::database::repository::Repository;
use crate::database::store::RecordStore;
use crate::filter::{FilterData, FilterError};

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owns the Postgres connection pool and serves typed reads through [`Repository`]
#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = config.url.as_deref().ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let parsed = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Connected to database: {}", Self::redact(&parsed));
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    /// Connection URL with the password masked, safe for logs
    fn redact(url: &url::Url) -> String {
        let mut redacted = url.clone();
        if redacted.password().is_some() {
            // Only fails for cannot-be-a-base URLs, which never carry a password
            let _ = redacted.set_password(Some("****"));
        }
        redacted.to_string()
    }
}

#[async_trait]
impl RecordStore for DatabaseManager {
    async fn select_any<T: Record>(&self, filter: FilterData) -> Result<Vec<T>, DatabaseError> {
        Repository::<T>::new(self.pool.clone()).select_any(filter).await
    }

    async fn count<T: Record>(&self, filter: FilterData) -> Result<i64, DatabaseError> {
        Repository::<T>::new(self.pool.clone()).count(filter).await
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
