// maskbot-core/src/db/mod.rs

pub mod migrations;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::info;

use crate::Error;
use migrations::{MigrationPolicy, MigrationRunner, PgSchemaStore};

/// Connection handle for the Postgres store.
#[derive(Clone)]
pub struct Database {
    pool: Pool<Postgres>,
}

impl Database {
    /// Create a new Database connection.
    pub async fn new(database_url: &str) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        info!("Connected to Postgres");
        Ok(Self { pool })
    }

    /// Brings the schema up to the latest embedded migration. Returns the
    /// number of scripts applied.
    pub async fn migrate(&self) -> Result<usize, Error> {
        self.migrate_with_policy(MigrationPolicy::Strict).await
    }

    pub async fn migrate_with_policy(&self, policy: MigrationPolicy) -> Result<usize, Error> {
        let store = PgSchemaStore::new(self.pool.clone());
        let runner = MigrationRunner::new(policy);
        let applied = runner.run(&store, &migrations::all()).await?;
        if applied != 0 {
            info!("Applied {applied} migration(s)");
        }
        Ok(applied)
    }

    /// Recreates the SQL helper functions (hid generation). Run after
    /// `migrate` on startup; the functions are dropped and rebuilt so
    /// redefinitions never conflict.
    pub async fn ensure_functions(&self) -> Result<(), Error> {
        sqlx::raw_sql(migrations::CLEAN_SQL)
            .execute(&self.pool)
            .await?;
        info!("Cleaned existing functions");

        sqlx::raw_sql(migrations::FUNCTIONS_SQL)
            .execute(&self.pool)
            .await?;
        info!("Created SQL functions");
        Ok(())
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    pub fn from_pool(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}
