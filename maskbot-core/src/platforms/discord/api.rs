// File: src/platforms/discord/api.rs
//
// DiscordApi over twilight's REST client. Webhook acquisition failures map
// to Error::DeliveryChannel so the cache layer can report them uniformly;
// execution and deletion failures are plain platform errors.

use std::sync::Arc;

use async_trait::async_trait;
use twilight_http::Client as HttpClient;
use twilight_http::request::AuditLogReason;
use twilight_model::channel::webhook::{Webhook, WebhookType};
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, MessageMarker};

use maskbot_common::error::Error;
use maskbot_common::models::discord::{BotIdentity, ChannelWebhook};
use maskbot_common::traits::platform_traits::DiscordApi;

pub struct TwilightDiscordApi {
    http: Arc<HttpClient>,
}

impl TwilightDiscordApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    fn webhook_record(webhook: Webhook) -> ChannelWebhook {
        ChannelWebhook {
            id: webhook.id,
            channel_id: webhook.channel_id,
            name: webhook.name,
            token: webhook.token,
            creator_id: webhook.user.map(|u| u.id),
            incoming: webhook.kind == WebhookType::Incoming,
        }
    }
}

#[async_trait]
impl DiscordApi for TwilightDiscordApi {
    async fn current_user(&self) -> Result<BotIdentity, Error> {
        let user = self
            .http
            .current_user()
            .await
            .map_err(|e| Error::DeliveryChannel(format!("fetching current user: {e}")))?
            .model()
            .await
            .map_err(|e| Error::DeliveryChannel(format!("parsing current user: {e}")))?;

        Ok(BotIdentity {
            user_id: user.id,
            username: user.name,
        })
    }

    async fn channel_webhooks(
        &self,
        channel_id: Id<ChannelMarker>,
    ) -> Result<Vec<ChannelWebhook>, Error> {
        let webhooks = self
            .http
            .channel_webhooks(channel_id)
            .await
            .map_err(|e| Error::DeliveryChannel(format!("listing webhooks: {e}")))?
            .models()
            .await
            .map_err(|e| Error::DeliveryChannel(format!("parsing webhooks: {e}")))?;

        Ok(webhooks.into_iter().map(Self::webhook_record).collect())
    }

    async fn create_webhook(
        &self,
        channel_id: Id<ChannelMarker>,
        name: &str,
    ) -> Result<ChannelWebhook, Error> {
        let webhook = self
            .http
            .create_webhook(channel_id, name)
            .reason("Create proxy webhook")
            .await
            .map_err(|e| Error::DeliveryChannel(format!("creating webhook: {e}")))?
            .model()
            .await
            .map_err(|e| Error::DeliveryChannel(format!("parsing created webhook: {e}")))?;

        Ok(Self::webhook_record(webhook))
    }

    async fn execute_webhook(
        &self,
        webhook: &ChannelWebhook,
        username: &str,
        avatar_url: Option<&str>,
        content: &str,
    ) -> Result<(), Error> {
        let token = webhook
            .token
            .as_deref()
            .ok_or_else(|| Error::Platform(format!("webhook {} has no token", webhook.id)))?;

        let mut req = self
            .http
            .execute_webhook(webhook.id, token)
            .username(username)
            .content(content);
        if let Some(url) = avatar_url {
            req = req.avatar_url(url);
        }
        req.await
            .map_err(|e| Error::Platform(format!("executing webhook {}: {e}", webhook.id)))?;

        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> Result<(), Error> {
        self.http
            .delete_message(channel_id, message_id)
            .await
            .map_err(|e| Error::Platform(format!("deleting message {message_id}: {e}")))?;
        Ok(())
    }
}
