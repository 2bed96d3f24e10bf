use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tracing::info;

use super::error::StoreError;

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Process-wide connection pool. Created lazily on first use from
/// `DATABASE_URL`; every repository clones the same pool handle.
pub struct Db;

impl Db {
    pub async fn pool() -> Result<PgPool, StoreError> {
        let pool = POOL
            .get_or_try_init(|| async {
                let url = std::env::var("DATABASE_URL")
                    .map_err(|_| StoreError::ConfigMissing("DATABASE_URL"))?;
                let config = crate::config::config();
                let pool = PgPoolOptions::new()
                    .max_connections(config.database.max_connections)
                    .acquire_timeout(std::time::Duration::from_secs(
                        config.database.connection_timeout,
                    ))
                    .connect(&url)
                    .await
                    .map_err(|e| StoreError::Connection(e.to_string()))?;
                info!("Created database pool");
                Ok::<_, StoreError>(pool)
            })
            .await?;
        Ok(pool.clone())
    }

    /// Pings the pool to ensure connectivity.
    pub async fn health_check() -> Result<(), StoreError> {
        let pool = Self::pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }
}
