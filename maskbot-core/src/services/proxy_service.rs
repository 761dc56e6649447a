// File: src/services/proxy_service.rs

use std::sync::Arc;

use tracing::{debug, info, warn};
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, MessageMarker, UserMarker};

use maskbot_common::error::Error;
use maskbot_common::models::discord::ProxiedMessage;
use maskbot_common::models::member::Member;
use maskbot_common::traits::platform_traits::DiscordApi;
use maskbot_common::traits::repository_traits::{MemberRepository, SystemRepository};

use crate::platforms::discord::webhooks::WebhookCache;

/// A successful resolution: the member to deliver as, plus the message body
/// with the tags stripped (or intact when the member keeps proxies).
#[derive(Debug)]
pub struct ProxyMatch<'a> {
    pub member: &'a Member,
    pub content: String,
}

/// Resolves message content against members in order. The first member
/// whose tags match wins; at most one member is ever selected.
pub fn resolve_proxy<'a>(members: &'a [Member], content: &str) -> Option<ProxyMatch<'a>> {
    members.iter().find_map(|member| {
        member.match_proxy(content).map(|stripped| ProxyMatch {
            member,
            content: stripped,
        })
    })
}

/// The ProxyService is the dispatch pipeline for inbound messages:
/// membership lookup, tag resolution, webhook delivery, and cleanup of the
/// original. An embedding gateway runner calls `handle_message` for each
/// message-create event (bot authors already filtered out).
pub struct ProxyService<A: DiscordApi> {
    api: Arc<A>,
    webhooks: Arc<WebhookCache<A>>,
    systems: Arc<dyn SystemRepository + Send + Sync>,
    members: Arc<dyn MemberRepository + Send + Sync>,
}

impl<A: DiscordApi> ProxyService<A> {
    pub fn new(
        api: Arc<A>,
        webhooks: Arc<WebhookCache<A>>,
        systems: Arc<dyn SystemRepository + Send + Sync>,
        members: Arc<dyn MemberRepository + Send + Sync>,
    ) -> Self {
        debug!("ProxyService::new() called");
        Self {
            api,
            webhooks,
            systems,
            members,
        }
    }

    /// Processes one inbound message:
    ///  1. Loads the author's members (none => not our message).
    ///  2. Resolves the content against their tags, first match wins.
    ///  3. Acquires the channel webhook and posts under the member's name
    ///     (with the system tag appended when one is set).
    ///  4. Deletes the original message.
    ///
    /// Returns what was delivered, or `None` when the message was left
    /// alone.
    pub async fn handle_message(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
        author_id: Id<UserMarker>,
        content: &str,
    ) -> Result<Option<ProxiedMessage>, Error> {
        if content.is_empty() {
            return Ok(None);
        }

        let members = self.members.list_proxyable(author_id).await?;
        if members.is_empty() {
            return Ok(None);
        }

        let Some(hit) = resolve_proxy(&members, content) else {
            return Ok(None);
        };
        if hit.content.is_empty() {
            // Tags with nothing between them: nothing worth delivering, and
            // the original message stays where it is.
            debug!("Empty proxy body from {author_id} in channel {channel_id}; ignoring");
            return Ok(None);
        }

        let system = self.systems.fetch_from_user(author_id).await?;
        let username = match system.as_ref().and_then(|s| s.tag.as_deref()) {
            Some(tag) => format!("{} {tag}", hit.member.proxy_name()),
            None => hit.member.proxy_name().to_string(),
        };

        let webhook = self.webhooks.get_or_create(channel_id).await?;
        self.api
            .execute_webhook(
                &webhook,
                &username,
                hit.member.avatar_url.as_deref(),
                &hit.content,
            )
            .await?;

        // The proxied copy is already out; a failed cleanup is only worth a
        // warning.
        if let Err(e) = self.api.delete_message(channel_id, message_id).await {
            warn!("Could not delete original message {message_id}: {e}");
        }

        info!(
            "Proxied message for member {} in channel {channel_id}",
            hit.member.hid
        );
        Ok(Some(ProxiedMessage {
            member_hid: hit.member.hid.clone(),
            channel_id,
            content: hit.content,
        }))
    }

    /// Drops the cached webhook for a channel, for callers wired to
    /// webhook-update events.
    pub fn invalidate_webhook(&self, channel_id: Id<ChannelMarker>) {
        self.webhooks.invalidate(channel_id);
    }
}
