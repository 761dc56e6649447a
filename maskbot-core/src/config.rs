// File: maskbot-core/src/config.rs

use tracing_subscriber::{EnvFilter, fmt};

use crate::Error;

/// Deployment settings for an embedding bot process. The engine itself only
/// needs `database_url`; the token and prefixes are handed to whatever
/// builds the platform client and command layer around it.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub prefixes: Vec<String>,
    pub database_url: String,
}

impl BotConfig {
    /// Reads configuration from the environment, loading a `.env` file first
    /// when one is present.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let token = std::env::var("DISCORD_TOKEN")
            .map_err(|_| Error::Parse("DISCORD_TOKEN is not set".to_string()))?;
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| Error::Parse("DATABASE_URL is not set".to_string()))?;

        let prefixes: Vec<String> = std::env::var("MASKBOT_PREFIXES")
            .unwrap_or_else(|_| "mb;".to_string())
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        Ok(Self {
            token,
            prefixes,
            database_url,
        })
    }
}

pub fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("maskbot=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}
