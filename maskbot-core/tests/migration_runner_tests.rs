// File: maskbot-core/tests/migration_runner_tests.rs
//
// MigrationRunner semantics against an in-memory store: resume from the
// counter, strict rollback, skip-and-log, and idempotent reruns. The mock
// transaction stages work and only publishes it on commit, like a real one.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use maskbot_common::error::Error;
use maskbot_core::db::migrations::{
    Migration, MigrationPolicy, MigrationRunner, SchemaStore, SchemaTx, all,
};

const M1: Migration = Migration {
    name: "0001_one",
    sql: "create table one",
};
const M2: Migration = Migration {
    name: "0002_two",
    sql: "create table two",
};
const M3: Migration = Migration {
    name: "0003_three",
    sql: "create table three",
};

#[derive(Default)]
struct StoreState {
    version: Option<i64>,
    version_unreadable: bool,
    applied: Vec<String>,
    fail_scripts: Vec<&'static str>,
    begins: usize,
    commits: usize,
}

#[derive(Default)]
struct MockSchemaStore {
    state: Arc<Mutex<StoreState>>,
}

impl MockSchemaStore {
    fn at_version(version: i64) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().version = Some(version);
        store
    }

    fn failing_on(scripts: Vec<&'static str>) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().fail_scripts = scripts;
        store
    }

    fn unreadable() -> Self {
        let store = Self::default();
        store.state.lock().unwrap().version_unreadable = true;
        store
    }

    fn version(&self) -> Option<i64> {
        self.state.lock().unwrap().version
    }

    fn applied(&self) -> Vec<String> {
        self.state.lock().unwrap().applied.clone()
    }

    fn begins(&self) -> usize {
        self.state.lock().unwrap().begins
    }

    fn commits(&self) -> usize {
        self.state.lock().unwrap().commits
    }
}

#[async_trait]
impl SchemaStore for MockSchemaStore {
    async fn schema_version(&self) -> Result<Option<i64>, Error> {
        let state = self.state.lock().unwrap();
        if state.version_unreadable {
            return Err(Error::NotFound("no info table".to_string()));
        }
        Ok(state.version)
    }

    async fn begin<'a>(&'a self) -> Result<Box<dyn SchemaTx + 'a>, Error> {
        self.state.lock().unwrap().begins += 1;
        Ok(Box::new(MockSchemaTx {
            state: self.state.clone(),
            staged: Vec::new(),
            staged_version: None,
        }))
    }
}

// Changes stay local until commit; a dropped transaction publishes nothing.
struct MockSchemaTx {
    state: Arc<Mutex<StoreState>>,
    staged: Vec<String>,
    staged_version: Option<i64>,
}

#[async_trait]
impl SchemaTx for MockSchemaTx {
    async fn execute(&mut self, script: &str) -> Result<(), Error> {
        let fails = self
            .state
            .lock()
            .unwrap()
            .fail_scripts
            .iter()
            .any(|s| *s == script);
        if fails {
            return Err(format!("simulated failure in `{script}`").into());
        }
        self.staged.push(script.to_string());
        Ok(())
    }

    async fn set_schema_version(&mut self, version: i64) -> Result<(), Error> {
        self.staged_version = Some(version);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), Error> {
        let MockSchemaTx {
            state,
            staged,
            staged_version,
        } = *self;
        let mut state = state.lock().unwrap();
        state.applied.extend(staged);
        if let Some(version) = staged_version {
            state.version = Some(version);
        }
        state.commits += 1;
        Ok(())
    }
}

#[tokio::test]
async fn test_fresh_store_applies_everything() -> Result<(), Error> {
    let store = MockSchemaStore::default();
    let runner = MigrationRunner::default();

    let applied = runner.run(&store, &[M1, M2, M3]).await?;

    assert_eq!(applied, 3);
    assert_eq!(store.version(), Some(3));
    assert_eq!(store.applied(), vec![M1.sql, M2.sql, M3.sql]);
    assert_eq!(store.commits(), 1, "the whole batch is one transaction");
    Ok(())
}

#[tokio::test]
async fn test_rerun_is_a_noop() -> Result<(), Error> {
    let store = MockSchemaStore::default();
    let runner = MigrationRunner::default();

    runner.run(&store, &[M1, M2, M3]).await?;
    let applied = runner.run(&store, &[M1, M2, M3]).await?;

    assert_eq!(applied, 0);
    assert_eq!(store.version(), Some(3));
    assert_eq!(store.begins(), 1, "an up-to-date store opens no transaction");
    Ok(())
}

#[tokio::test]
async fn test_partial_store_resumes_from_counter() -> Result<(), Error> {
    let store = MockSchemaStore::at_version(1);
    let runner = MigrationRunner::default();

    let applied = runner.run(&store, &[M1, M2, M3]).await?;

    assert_eq!(applied, 2);
    assert_eq!(store.version(), Some(3));
    assert_eq!(store.applied(), vec![M2.sql, M3.sql], "the first script is skipped");
    Ok(())
}

#[tokio::test]
async fn test_unreadable_version_means_fresh() -> Result<(), Error> {
    let store = MockSchemaStore::unreadable();
    let runner = MigrationRunner::default();

    let applied = runner.run(&store, &[M1, M2]).await?;

    assert_eq!(applied, 2);
    assert_eq!(store.applied(), vec![M1.sql, M2.sql]);
    Ok(())
}

#[tokio::test]
async fn test_empty_list_is_a_noop() -> Result<(), Error> {
    let store = MockSchemaStore::default();
    let runner = MigrationRunner::default();

    assert_eq!(runner.run(&store, &[]).await?, 0);
    assert_eq!(store.begins(), 0);
    Ok(())
}

#[tokio::test]
async fn test_store_ahead_of_list_is_a_noop() -> Result<(), Error> {
    // A downgrade leaves the counter past the embedded list; nothing runs
    // and the counter is left alone.
    let store = MockSchemaStore::at_version(5);
    let runner = MigrationRunner::default();

    assert_eq!(runner.run(&store, &[M1, M2, M3]).await?, 0);
    assert_eq!(store.begins(), 0);
    assert_eq!(store.version(), Some(5));
    Ok(())
}

#[tokio::test]
async fn test_strict_failure_rolls_back_the_batch() {
    let store = MockSchemaStore::failing_on(vec![M2.sql]);
    let runner = MigrationRunner::new(MigrationPolicy::Strict);

    let err = runner.run(&store, &[M1, M2, M3]).await.unwrap_err();

    assert!(matches!(err, Error::Migration(_)));
    assert_eq!(store.commits(), 0, "nothing may be committed after a strict abort");
    assert!(store.applied().is_empty(), "the first script must be rolled back too");
    assert_eq!(store.version(), None, "the counter stays where it was");
}

#[tokio::test]
async fn test_skip_and_log_keeps_going() -> Result<(), Error> {
    let store = MockSchemaStore::failing_on(vec![M2.sql]);
    let runner = MigrationRunner::new(MigrationPolicy::SkipAndLog);

    let applied = runner.run(&store, &[M1, M2, M3]).await?;

    assert_eq!(applied, 2, "the failing script is skipped, the rest run");
    assert_eq!(store.applied(), vec![M1.sql, M3.sql]);
    assert_eq!(
        store.version(),
        Some(2),
        "the counter records successes only and falls behind the list"
    );
    Ok(())
}

#[tokio::test]
async fn test_skipped_scripts_shift_the_resume_point() -> Result<(), Error> {
    // The counter is positional. After a skip leaves it behind, the next run
    // resumes from position 2 and executes the third script a second time.
    let store = MockSchemaStore::failing_on(vec![M2.sql]);
    let runner = MigrationRunner::new(MigrationPolicy::SkipAndLog);

    runner.run(&store, &[M1, M2, M3]).await?;
    let applied = runner.run(&store, &[M1, M2, M3]).await?;

    assert_eq!(applied, 1);
    assert_eq!(store.version(), Some(3));
    assert_eq!(store.applied(), vec![M1.sql, M3.sql, M3.sql]);
    Ok(())
}

#[tokio::test]
async fn test_strict_is_the_default_policy() {
    let store = MockSchemaStore::failing_on(vec![M1.sql]);
    let runner = MigrationRunner::default();

    let result = runner.run(&store, &[M1]).await;
    assert!(matches!(result, Err(Error::Migration(_))));
}

#[test]
fn test_embedded_migrations_are_ordered() {
    let list = all();
    assert!(list.len() >= 3);
    for pair in list.windows(2) {
        assert!(pair[0].name < pair[1].name, "names must sort in apply order");
    }
    assert!(list[0].name.starts_with("0001"));
    for migration in &list {
        assert!(!migration.sql.trim().is_empty(), "{} is empty", migration.name);
    }
}
