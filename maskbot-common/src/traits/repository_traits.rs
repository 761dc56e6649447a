// File: maskbot-common/src/traits/repository_traits.rs

use async_trait::async_trait;
use twilight_model::id::Id;
use twilight_model::id::marker::UserMarker;

use crate::error::Error;
use crate::models::member::{Member, ProxyTag};
use crate::models::system::System;

#[async_trait]
pub trait SystemRepository: Send + Sync {
    /// Fetches the system linked to a Discord account, with its linked
    /// accounts and member count attached.
    async fn fetch_from_user(&self, user_id: Id<UserMarker>) -> Result<Option<System>, Error>;

    /// Fetches a system by its public 5-letter id.
    async fn fetch_from_hid(&self, hid: &str) -> Result<Option<System>, Error>;

    /// Returns true if the account has a system.
    async fn has_system(&self, user_id: Id<UserMarker>) -> Result<bool, Error>;

    /// Creates a system and links the account to it, transactionally.
    async fn create_system(
        &self,
        user_id: Id<UserMarker>,
        name: Option<&str>,
    ) -> Result<System, Error>;

    /// Sets or clears the system description.
    async fn update_description(
        &self,
        system_id: i32,
        description: Option<&str>,
    ) -> Result<(), Error>;
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Creates a member in the given system.
    async fn create_member(&self, system_id: i32, name: &str) -> Result<Member, Error>;

    /// Fetches one of the caller's own members by hid, name, or display name
    /// (names case-insensitively).
    async fn fetch_own(&self, user_id: Id<UserMarker>, key: &str) -> Result<Option<Member>, Error>;

    /// Fetches a member by its public 5-letter id.
    async fn fetch_from_hid(&self, hid: &str) -> Result<Option<Member>, Error>;

    /// All members of the account's system in proxy-resolution order
    /// (ascending member id). Empty when the account has no system.
    async fn list_proxyable(&self, user_id: Id<UserMarker>) -> Result<Vec<Member>, Error>;

    /// Replaces the member's proxy tags.
    async fn set_proxy_tags(&self, member_id: i32, tags: &[ProxyTag]) -> Result<(), Error>;
}
