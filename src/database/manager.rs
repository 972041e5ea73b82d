use sqlx::{postgres::PgPoolOptions, PgPool};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::config;

/// Errors from DatabaseManager and the table services built on it
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid tenant database name: {0}")]
    InvalidTenantName(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Centralized connection pool manager for the main and tenant databases
pub struct DatabaseManager {
    pools: Arc<RwLock<HashMap<String, PgPool>>>,
}

impl DatabaseManager {
    fn instance() -> &'static DatabaseManager {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<DatabaseManager> = OnceLock::new();
        INSTANCE.get_or_init(|| DatabaseManager {
            pools: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Name of the main database holding the tenant registry.
    pub fn main_database_name() -> &'static str {
        &config::config().database.main_database
    }

    /// Get main database pool
    pub async fn main_pool() -> Result<PgPool, DatabaseError> {
        Self::instance().get_pool(Self::main_database_name()).await
    }

    /// Get tenant database pool (validated name)
    pub async fn tenant_pool(database_name: &str) -> Result<PgPool, DatabaseError> {
        if !Self::is_valid_tenant_db_name(database_name) {
            return Err(DatabaseError::InvalidTenantName(database_name.to_string()));
        }
        Self::instance().get_pool(database_name).await
    }

    /// Get existing pool or create a new one lazily
    async fn get_pool(&self, database_name: &str) -> Result<PgPool, DatabaseError> {
        // Fast path: try read lock
        {
            let pools = self.pools.read().await;
            if let Some(pool) = pools.get(database_name) {
                return Ok(pool.clone());
            }
        }

        // Build connection string by swapping DB name in DATABASE_URL path
        let connection_string = Self::build_connection_string(database_name)?;

        let settings = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.connection_timeout))
            .connect(&connection_string)
            .await?;

        // Another request may have raced us here; keep whichever pool landed first
        let pool = {
            let mut pools = self.pools.write().await;
            pools.entry(database_name.to_string()).or_insert(pool).clone()
        };

        info!("Created database pool for: {}", database_name);
        Ok(pool)
    }

    fn build_connection_string(database_name: &str) -> Result<String, DatabaseError> {
        let base = std::env::var("DATABASE_URL")
            .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let mut url = url::Url::parse(&base).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        // Replace the path to the database name (ensure leading slash)
        url.set_path(&format!("/{}", database_name));
        Ok(url.into())
    }

    /// Pings the main pool to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::main_pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Create an empty tenant database
    pub async fn create_database(target_db: &str) -> Result<(), DatabaseError> {
        if !Self::is_valid_tenant_db_name(target_db) {
            return Err(DatabaseError::InvalidTenantName(target_db.to_string()));
        }

        // Connect to postgres database for administrative operations
        let admin_pool = Self::instance().get_pool("postgres").await?;

        let query = format!("CREATE DATABASE {}", Self::quote_identifier(target_db));
        sqlx::query(&query).execute(&admin_pool).await?;

        info!("Created database {}", target_db);
        Ok(())
    }

    /// Drop a tenant database, closing our own pool to it first
    pub async fn drop_database(target_db: &str) -> Result<(), DatabaseError> {
        if !Self::is_valid_tenant_db_name(target_db) {
            return Err(DatabaseError::InvalidTenantName(target_db.to_string()));
        }

        let cached = Self::instance().pools.write().await.remove(target_db);
        if let Some(pool) = cached {
            pool.close().await;
        }

        let admin_pool = Self::instance().get_pool("postgres").await?;
        let query = format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", Self::quote_identifier(target_db));
        sqlx::query(&query).execute(&admin_pool).await?;

        info!("Dropped database {}", target_db);
        Ok(())
    }

    pub async fn database_exists(name: &str) -> Result<bool, DatabaseError> {
        let admin_pool = Self::instance().get_pool("postgres").await?;
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(name)
            .fetch_one(&admin_pool)
            .await?;
        Ok(exists)
    }

    /// Quote SQL identifier to prevent injection
    fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Close and remove all pools (e.g., on shutdown)
    pub async fn close_all() {
        let manager = Self::instance();
        let mut pools = manager.pools.write().await;
        for (name, pool) in pools.drain() {
            pool.close().await;
            info!("Closed database pool: {}", name);
        }
    }

    /// Tenant databases are "tenant_" followed by [a-zA-Z0-9_]+
    fn is_valid_tenant_db_name(name: &str) -> bool {
        match name.strip_prefix("tenant_") {
            Some(rest) => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
            None => false,
        }
    }
}
