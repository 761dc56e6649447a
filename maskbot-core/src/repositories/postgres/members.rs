// maskbot-core/src/repositories/postgres/members.rs
//
// Postgres-backed MemberRepository. Members are fetched through a join on
// the owning system so `system_hid` comes back populated; proxy tags live
// in a jsonb array on the member row.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use twilight_model::id::Id;
use twilight_model::id::marker::UserMarker;

use maskbot_common::error::Error;
use maskbot_common::limits::MEMBER_NAME_LIMIT;
use maskbot_common::models::member::{Member, ProxyTag};
use maskbot_common::models::privacy::Privacy;
use maskbot_common::traits::repository_traits::MemberRepository;

#[derive(Clone)]
pub struct PostgresMemberRepository {
    pool: Pool<Postgres>,
}

impl PostgresMemberRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

pub(crate) fn member_from_row(r: &PgRow) -> Result<Member, Error> {
    let proxy_tags: Json<Vec<ProxyTag>> = r.try_get("proxy_tags")?;
    let description_privacy: Option<String> = r.try_get("description_privacy")?;

    Ok(Member {
        id: r.try_get("id")?,
        hid: r.try_get("hid")?,
        // Only the joined queries return this.
        system_hid: r.try_get::<Option<String>, _>("system_hid").ok().flatten(),
        name: r.try_get("name")?,
        display_name: r.try_get("display_name")?,
        colour: r.try_get("colour")?,
        description: r.try_get("description")?,
        avatar_url: r.try_get("avatar_url")?,
        proxy_tags: proxy_tags.0,
        keep_proxy: r.try_get("keep_proxy")?,
        description_privacy: Privacy::from_db(description_privacy.as_deref()),
        created: r.try_get("created")?,
    })
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn create_member(&self, system_id: i32, name: &str) -> Result<Member, Error> {
        let length = name.chars().count();
        if length > MEMBER_NAME_LIMIT {
            return Err(Error::StringOverbound {
                subject: "name".to_string(),
                length,
                limit: MEMBER_NAME_LIMIT,
            });
        }

        let row = sqlx::query(
            "insert into members (hid, system, name) values (find_free_member_hid(), $1, $2) returning *",
        )
        .bind(system_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        let member = member_from_row(&row)?;
        debug!("Created member {} in system {system_id}", member.hid);
        Ok(member)
    }

    async fn fetch_own(
        &self,
        user_id: Id<UserMarker>,
        key: &str,
    ) -> Result<Option<Member>, Error> {
        let q = r#"
            select members.*, systems.hid as system_hid
            from members
            join systems on systems.id = members.system
            where members.system = (select system from accounts where uid = $1)
              and (members.hid = $2
                   or lower(members.name) = lower($2)
                   or lower(members.display_name) = lower($2))
            limit 1
        "#;
        let row_opt = sqlx::query(q)
            .bind(user_id.get() as i64)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row_opt {
            Some(r) => Ok(Some(member_from_row(&r)?)),
            None => Ok(None),
        }
    }

    async fn fetch_from_hid(&self, hid: &str) -> Result<Option<Member>, Error> {
        let q = r#"
            select members.*, systems.hid as system_hid
            from members
            join systems on systems.id = members.system
            where members.hid = $1
        "#;
        let row_opt = sqlx::query(q)
            .bind(hid)
            .fetch_optional(&self.pool)
            .await?;

        match row_opt {
            Some(r) => Ok(Some(member_from_row(&r)?)),
            None => Ok(None),
        }
    }

    async fn list_proxyable(&self, user_id: Id<UserMarker>) -> Result<Vec<Member>, Error> {
        let q = r#"
            select members.*, systems.hid as system_hid
            from members
            join systems on systems.id = members.system
            where members.system = (select system from accounts where uid = $1)
            order by members.id
        "#;
        let rows = sqlx::query(q)
            .bind(user_id.get() as i64)
            .fetch_all(&self.pool)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for r in rows {
            out.push(member_from_row(&r)?);
        }
        Ok(out)
    }

    async fn set_proxy_tags(&self, member_id: i32, tags: &[ProxyTag]) -> Result<(), Error> {
        sqlx::query("update members set proxy_tags = $1 where id = $2")
            .bind(Json(tags))
            .bind(member_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
