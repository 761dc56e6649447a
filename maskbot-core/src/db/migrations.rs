// File: maskbot-core/src/db/migrations.rs
//
// Ordered schema migrations over a single version counter. The runner owns
// the counter: scripts only change schema, and `info.schema_version` is
// written once at the end of the batch, inside the same transaction.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row, Transaction};
use tracing::{debug, error, info};

use crate::Error;

/// One embedded migration script. `sql` may contain any number of
/// statements; it is executed as a single unit.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub name: &'static str,
    pub sql: &'static str,
}

pub const CLEAN_SQL: &str = include_str!("../../sql/clean.sql");
pub const FUNCTIONS_SQL: &str = include_str!("../../sql/functions.sql");

const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "0001_initial_schema",
        sql: include_str!("../../sql/migrations/0001_initial_schema.sql"),
    },
    Migration {
        name: "0002_member_keep_proxy",
        sql: include_str!("../../sql/migrations/0002_member_keep_proxy.sql"),
    },
    Migration {
        name: "0003_privacy",
        sql: include_str!("../../sql/migrations/0003_privacy.sql"),
    },
];

/// The embedded migration list, sorted by name so a new script slots in by
/// its zero-padded number.
pub fn all() -> Vec<Migration> {
    let mut list = MIGRATIONS.to_vec();
    list.sort_by(|a, b| a.name.cmp(b.name));
    list
}

/// What the runner does when a script fails mid-batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MigrationPolicy {
    /// Abort on the first failing script and roll the whole batch back.
    /// The version counter is left untouched.
    #[default]
    Strict,
    /// Log the failure and keep going with the remaining scripts. The
    /// counter only counts scripts that succeeded, so it can end up
    /// permanently behind the list. Opt-in; the hazard is on the operator.
    SkipAndLog,
}

/// The persistent store as the runner sees it: a version counter and a
/// transactional way to run scripts and move the counter together.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// The current counter, `None` when the store has never been migrated.
    async fn schema_version(&self) -> Result<Option<i64>, Error>;

    async fn begin<'a>(&'a self) -> Result<Box<dyn SchemaTx + 'a>, Error>;
}

/// One migration batch in flight. Dropping it without `commit` discards
/// every change staged so far.
#[async_trait]
pub trait SchemaTx: Send {
    /// Runs one script. On failure the batch stays usable so the runner can
    /// decide whether to continue.
    async fn execute(&mut self, script: &str) -> Result<(), Error>;

    async fn set_schema_version(&mut self, version: i64) -> Result<(), Error>;

    async fn commit(self: Box<Self>) -> Result<(), Error>;
}

/// Applies pending migrations to a store.
#[derive(Debug, Default)]
pub struct MigrationRunner {
    policy: MigrationPolicy,
}

impl MigrationRunner {
    pub fn new(policy: MigrationPolicy) -> Self {
        Self { policy }
    }

    /// Runs every migration past the store's current version, one
    /// transaction for the whole batch. Returns the number of scripts
    /// applied; 0 when the store is already up to date (no transaction is
    /// opened in that case). A repeat run with the same list is a no-op.
    pub async fn run(
        &self,
        store: &dyn SchemaStore,
        migrations: &[Migration],
    ) -> Result<usize, Error> {
        let mut current = match store.schema_version().await {
            Ok(Some(v)) => v.max(0) as usize,
            Ok(None) => 0,
            Err(e) => {
                debug!("No schema version readable ({e}); assuming fresh database");
                0
            }
        };

        if migrations.len() <= current {
            return Ok(0);
        }

        let mut applied = 0usize;
        let mut tx = store.begin().await?;
        for (number, migration) in migrations.iter().enumerate().skip(current) {
            match tx.execute(migration.sql).await {
                Ok(()) => {
                    info!("Executed migration {} ({})", number + 1, migration.name);
                    current += 1;
                    applied += 1;
                }
                Err(e) => match self.policy {
                    MigrationPolicy::Strict => {
                        error!(
                            "Error executing migration {} ({}): {e}",
                            number + 1,
                            migration.name
                        );
                        return Err(Error::Migration(format!(
                            "migration {} ({}) failed: {e}",
                            number + 1,
                            migration.name
                        )));
                    }
                    MigrationPolicy::SkipAndLog => {
                        error!(
                            "Error executing migration {} ({}), skipping: {e}",
                            number + 1,
                            migration.name
                        );
                    }
                },
            }
        }
        tx.set_schema_version(current as i64).await?;
        tx.commit().await?;

        Ok(applied)
    }
}

/// Postgres-backed store. `info.schema_version` is a single-row counter.
pub struct PgSchemaStore {
    pool: Pool<Postgres>,
}

impl PgSchemaStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchemaStore for PgSchemaStore {
    async fn schema_version(&self) -> Result<Option<i64>, Error> {
        let row = sqlx::query("select schema_version from info")
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(r) => {
                let version: i32 = r.try_get("schema_version")?;
                Ok(Some(version as i64))
            }
            None => Ok(None),
        }
    }

    async fn begin<'a>(&'a self) -> Result<Box<dyn SchemaTx + 'a>, Error> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgSchemaTx { tx }))
    }
}

struct PgSchemaTx<'a> {
    tx: Transaction<'a, Postgres>,
}

#[async_trait]
impl SchemaTx for PgSchemaTx<'_> {
    async fn execute(&mut self, script: &str) -> Result<(), Error> {
        // Each script runs under a savepoint: a failed script aborts the
        // Postgres transaction otherwise, which would doom every later
        // statement under the skip-and-log policy.
        sqlx::query("savepoint migration_script")
            .execute(&mut *self.tx)
            .await?;
        // `RawSql::execute` is an async-fn wrapper over this same call; invoking
        // the `Executor` method directly avoids a rustc "implementation is not
        // general enough" error (rust-lang/rust#102211) under async_trait.
        match sqlx::Executor::execute(&mut *self.tx, sqlx::raw_sql(script)).await {
            Ok(_) => {
                sqlx::query("release savepoint migration_script")
                    .execute(&mut *self.tx)
                    .await?;
                Ok(())
            }
            Err(e) => {
                sqlx::query("rollback to savepoint migration_script")
                    .execute(&mut *self.tx)
                    .await?;
                Err(e.into())
            }
        }
    }

    async fn set_schema_version(&mut self, version: i64) -> Result<(), Error> {
        sqlx::query("update info set schema_version = $1")
            .bind(version as i32)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), Error> {
        self.tx.commit().await?;
        Ok(())
    }
}
