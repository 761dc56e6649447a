// File: src/platforms/discord/mod.rs

pub mod api;
pub mod webhooks;

pub use api::TwilightDiscordApi;
pub use webhooks::WebhookCache;
