// File: maskbot-common/src/traits/platform_traits.rs

use async_trait::async_trait;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, MessageMarker};

use crate::error::Error;
use crate::models::discord::{BotIdentity, ChannelWebhook};

/// The platform surface the proxy engine needs: webhook acquisition for the
/// cache, webhook execution and message deletion for dispatch. Implemented
/// over twilight's REST client in maskbot-core; tests substitute mocks.
#[async_trait]
pub trait DiscordApi: Send + Sync {
    async fn current_user(&self) -> Result<BotIdentity, Error>;

    async fn channel_webhooks(
        &self,
        channel_id: Id<ChannelMarker>,
    ) -> Result<Vec<ChannelWebhook>, Error>;

    async fn create_webhook(
        &self,
        channel_id: Id<ChannelMarker>,
        name: &str,
    ) -> Result<ChannelWebhook, Error>;

    /// Posts through the webhook under the given identity.
    async fn execute_webhook(
        &self,
        webhook: &ChannelWebhook,
        username: &str,
        avatar_url: Option<&str>,
        content: &str,
    ) -> Result<(), Error>;

    async fn delete_message(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> Result<(), Error>;
}
