// maskbot-core/src/repositories/postgres/systems.rs
//
// Postgres-backed SystemRepository. Rows come out of plain queries; the
// account list and member count ride along as subselects on the fetches
// that need them, so not every row carries every column.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use twilight_model::id::Id;
use twilight_model::id::marker::UserMarker;

use maskbot_common::error::Error;
use maskbot_common::limits::{DESCRIPTION_LIMIT, SYSTEM_NAME_LIMIT};
use maskbot_common::models::privacy::Privacy;
use maskbot_common::models::system::System;
use maskbot_common::traits::repository_traits::SystemRepository;

#[derive(Clone)]
pub struct PostgresSystemRepository {
    pool: Pool<Postgres>,
}

impl PostgresSystemRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

pub(crate) fn system_from_row(r: &PgRow) -> Result<System, Error> {
    // Absent on inserts and bare selects, present on the joined fetches.
    let accounts: Vec<Id<UserMarker>> = r
        .try_get::<Vec<i64>, _>("accounts")
        .unwrap_or_default()
        .into_iter()
        .map(|uid| Id::new(uid as u64))
        .collect();
    let member_count = r.try_get::<i64, _>("member_count").ok();

    let description_privacy: Option<String> = r.try_get("description_privacy")?;
    let list_privacy: Option<String> = r.try_get("list_privacy")?;

    Ok(System {
        id: r.try_get("id")?,
        hid: r.try_get("hid")?,
        name: r.try_get("name")?,
        description: r.try_get("description")?,
        tag: r.try_get("tag")?,
        avatar_url: r.try_get("avatar_url")?,
        created: r.try_get("created")?,
        description_privacy: Privacy::from_db(description_privacy.as_deref()),
        list_privacy: Privacy::from_db(list_privacy.as_deref()),
        accounts,
        member_count,
    })
}

#[async_trait]
impl SystemRepository for PostgresSystemRepository {
    async fn fetch_from_user(&self, user_id: Id<UserMarker>) -> Result<Option<System>, Error> {
        let q = r#"
            select systems.*,
                   array(select uid from accounts
                         where system = (select system from accounts where uid = $1)) as accounts,
                   (select count(*) from members
                    where system = (select system from accounts where uid = $1)) as member_count
            from systems
            where id = (select system from accounts where uid = $1)
        "#;
        let row_opt = sqlx::query(q)
            .bind(user_id.get() as i64)
            .fetch_optional(&self.pool)
            .await?;

        match row_opt {
            Some(r) => Ok(Some(system_from_row(&r)?)),
            None => Ok(None),
        }
    }

    async fn fetch_from_hid(&self, hid: &str) -> Result<Option<System>, Error> {
        let q = r#"
            select systems.*,
                   array(select uid from accounts where system = systems.id) as accounts,
                   (select count(*) from members where system = systems.id) as member_count
            from systems
            where hid = $1
        "#;
        let row_opt = sqlx::query(q)
            .bind(hid)
            .fetch_optional(&self.pool)
            .await?;

        match row_opt {
            Some(r) => Ok(Some(system_from_row(&r)?)),
            None => Ok(None),
        }
    }

    async fn has_system(&self, user_id: Id<UserMarker>) -> Result<bool, Error> {
        let row = sqlx::query("select exists(select * from accounts where uid = $1) as has")
            .bind(user_id.get() as i64)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("has")?)
    }

    async fn create_system(
        &self,
        user_id: Id<UserMarker>,
        name: Option<&str>,
    ) -> Result<System, Error> {
        if let Some(n) = name {
            let length = n.chars().count();
            if length > SYSTEM_NAME_LIMIT {
                return Err(Error::StringOverbound {
                    subject: "name".to_string(),
                    length,
                    limit: SYSTEM_NAME_LIMIT,
                });
            }
        }

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "insert into systems (hid, name) values (find_free_system_hid(), $1) returning *",
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;
        let mut system = system_from_row(&row)?;

        sqlx::query("insert into accounts (system, uid) values ($1, $2)")
            .bind(system.id)
            .bind(user_id.get() as i64)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!("Created system {} for user {user_id}", system.hid);
        system.accounts = vec![user_id];
        system.member_count = Some(0);
        Ok(system)
    }

    async fn update_description(
        &self,
        system_id: i32,
        description: Option<&str>,
    ) -> Result<(), Error> {
        if let Some(d) = description {
            let length = d.chars().count();
            if length > DESCRIPTION_LIMIT {
                return Err(Error::StringOverbound {
                    subject: "description".to_string(),
                    length,
                    limit: DESCRIPTION_LIMIT,
                });
            }
        }

        sqlx::query("update systems set description = $1 where id = $2")
            .bind(description)
            .bind(system_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
