//! PostgreSQL connection pool.

use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

use crate::error::{Error, Result};

/// Connection pool handle.
///
/// Built once at startup; connections are established lazily, so the
/// gateway comes up even when the store is down and surfaces the failure
/// per request instead.
#[derive(Clone)]
pub struct StorePool {
    pool: Pool,
}

impl StorePool {
    /// Create a pool from the configured connection URI.
    pub fn new(config: &crate::config::DatabaseConfig) -> Result<Self> {
        tracing::info!(pool_size = config.pool_size, "creating store connection pool");

        let pg_config: tokio_postgres::Config = config
            .url
            .parse()
            .map_err(|e| Error::Config(format!("invalid database url: {}", e)))?;

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = Manager::from_config(pg_config, NoTls, manager_config);

        let pool = Pool::builder(manager)
            .max_size(config.pool_size)
            .build()
            .map_err(|e| Error::Pool(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Borrow a connection from the pool.
    pub async fn get(&self) -> Result<deadpool_postgres::Object> {
        self.pool.get().await.map_err(|e| Error::Pool(e.to_string()))
    }
}
