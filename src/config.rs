use anyhow::{anyhow, Result};
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/catalog.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub http_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        Ok(Config {
            telegram_bot_token: token,
            database_url: database_url_from_env(),
            http_port: http_port_from_env()?,
        })
    }
}

/// Database location on its own, for tools that never talk to Telegram.
pub fn database_url_from_env() -> String {
    match env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => DEFAULT_DATABASE_URL.to_string(),
    }
}

fn http_port_from_env() -> Result<u16> {
    let port_str = env::var("HTTP_PORT")
        .unwrap_or_else(|_| "3000".to_string());
    port_str.trim()
        .parse()
        .map_err(|_| anyhow!("Invalid HTTP_PORT"))
}
