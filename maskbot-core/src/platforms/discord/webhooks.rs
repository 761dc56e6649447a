// File: src/platforms/discord/webhooks.rs

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use twilight_model::id::Id;
use twilight_model::id::marker::ChannelMarker;

use maskbot_common::error::Error;
use maskbot_common::models::discord::{BotIdentity, ChannelWebhook};
use maskbot_common::traits::platform_traits::DiscordApi;

/// A cache of the webhooks used for proxying, one per channel.
///
/// A miss runs the creation protocol exactly once per channel no matter how
/// many callers race for it: the per-channel `OnceCell` is the flight
/// guard, and a failed or cancelled attempt leaves the cell empty so the
/// next caller retries from scratch.
pub struct WebhookCache<A: DiscordApi> {
    api: Arc<A>,
    identity: OnceCell<BotIdentity>,
    channels: DashMap<Id<ChannelMarker>, Arc<OnceCell<ChannelWebhook>>>,
}

impl<A: DiscordApi> WebhookCache<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            identity: OnceCell::new(),
            channels: DashMap::new(),
        }
    }

    /// The cached webhook for the channel, if one is already resolved.
    /// Never touches the platform.
    pub fn get(&self, channel_id: Id<ChannelMarker>) -> Option<ChannelWebhook> {
        self.channels
            .get(&channel_id)
            .and_then(|cell| cell.get().cloned())
    }

    /// Gets the proxy webhook for the given channel, resolving it through
    /// the platform on first use.
    pub async fn get_or_create(
        &self,
        channel_id: Id<ChannelMarker>,
    ) -> Result<ChannelWebhook, Error> {
        // Clone the cell out before awaiting; holding a map guard across an
        // await would block every other caller on this shard.
        let cell = self.channels.entry(channel_id).or_default().clone();
        let webhook = cell
            .get_or_try_init(|| self.fetch_or_create(channel_id))
            .await?;
        Ok(webhook.clone())
    }

    /// The bot's own user, fetched from the platform once and shared by
    /// every channel. A failed fetch is not memoized.
    pub async fn identity(&self) -> Result<BotIdentity, Error> {
        let me = self
            .identity
            .get_or_try_init(|| self.api.current_user())
            .await?;
        Ok(me.clone())
    }

    async fn fetch_or_create(
        &self,
        channel_id: Id<ChannelMarker>,
    ) -> Result<ChannelWebhook, Error> {
        let me = self.identity().await?;

        // Adopt a webhook we created earlier (a restart leaves them behind)
        // rather than piling new ones onto the channel.
        let webhooks = self.api.channel_webhooks(channel_id).await?;
        for webhook in webhooks {
            if webhook.executable_by(me.user_id) {
                debug!(
                    "Adopting existing webhook {} in channel {channel_id}",
                    webhook.id
                );
                return Ok(webhook);
            }
        }

        info!("Creating proxy webhook in channel {channel_id}");
        self.api
            .create_webhook(channel_id, &format!("{} Webhook", me.username))
            .await
    }

    /// Drops the cached webhook for the given channel, e.g. after a
    /// webhook-update event says somebody deleted it out from under us.
    /// A later `get_or_create` resolves a fresh one.
    pub fn invalidate(&self, channel_id: Id<ChannelMarker>) {
        if self.channels.remove(&channel_id).is_some() {
            debug!("Invalidated webhook cache for channel {channel_id}");
        }
    }
}
