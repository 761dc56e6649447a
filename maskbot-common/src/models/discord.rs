// File: maskbot-common/src/models/discord.rs

use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, UserMarker, WebhookMarker};

/// The bot's own user, fetched once and shared by every channel.
#[derive(Debug, Clone)]
pub struct BotIdentity {
    pub user_id: Id<UserMarker>,
    pub username: String,
}

/// The delivery handle for one channel: an incoming webhook the bot can
/// execute. Only handles that still carry a token are worth caching.
#[derive(Debug, Clone)]
pub struct ChannelWebhook {
    pub id: Id<WebhookMarker>,
    pub channel_id: Id<ChannelMarker>,
    pub name: Option<String>,
    pub token: Option<String>,
    pub creator_id: Option<Id<UserMarker>>,
    pub incoming: bool,
}

impl ChannelWebhook {
    /// Whether this webhook can be executed by us: an incoming webhook we
    /// created ourselves, token still attached.
    pub fn executable_by(&self, user_id: Id<UserMarker>) -> bool {
        self.incoming && self.token.is_some() && self.creator_id == Some(user_id)
    }
}

/// What was actually delivered for one proxied message.
#[derive(Debug, Clone)]
pub struct ProxiedMessage {
    pub member_hid: String,
    pub channel_id: Id<ChannelMarker>,
    pub content: String,
}
