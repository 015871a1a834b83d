use sqlx::{PgPool, migrate::Migrator};
use tracing::debug;

use crate::model::error::DatabaseResult;

static MIGRATOR: Migrator = sqlx::migrate!();

#[derive(Debug, Clone)]
pub struct DbConnection {
    pool: PgPool, // cloning is cheap, pool is just a wrapper around Arc<>
}

impl DbConnection {
    /// Builds a lazy pool; nothing is dialed until the first query.
    pub fn connect(connection_str: &str) -> DatabaseResult<Self> {
        let pool = PgPool::connect_lazy(connection_str)?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> DatabaseResult<()> {
        debug!("applying migrations...");
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }
}
