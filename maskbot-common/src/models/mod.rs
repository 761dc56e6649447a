// File: maskbot-common/src/models/mod.rs
pub mod discord;
pub mod member;
pub mod privacy;
pub mod system;

pub use discord::{BotIdentity, ChannelWebhook, ProxiedMessage};
pub use member::{Member, ProxyTag};
pub use privacy::Privacy;
pub use system::System;
