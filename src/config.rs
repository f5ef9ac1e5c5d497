use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::conversation::Channels;
use crate::services::ChatId;

/// HTTP timeout for Bot API and Sheets calls
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime configuration, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub channels: Channels,
    pub credentials_path: PathBuf,
    pub spreadsheet_id: String,
    pub sheet_range: String,
    pub listen_addr: SocketAddr,
    pub webhook_url: Option<String>,
    pub webhook_secret: String,
    pub photo_dir: PathBuf,
}

impl Config {
    /// Load from the process environment (after `.env`, if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &str| get(name).with_context(|| format!("{name} must be set"));
        let or_default =
            |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        let host: IpAddr = or_default("HOST", "0.0.0.0")
            .parse()
            .context("HOST must be an IP address")?;
        let port: u16 = or_default("PORT", "10000")
            .parse()
            .context("PORT must be a number")?;

        Ok(Self {
            bot_token: required("BOT_TOKEN")?,
            channels: Channels {
                rent: ChatId::parse(&required("CHANNEL_ID")?),
                sale: ChatId::parse(&required("CHANNEL_ID2")?),
            },
            credentials_path: or_default("GOOGLE_CREDENTIALS_JSON", "credentials.json").into(),
            spreadsheet_id: required("SPREADSHEET_ID")?,
            sheet_range: or_default("SHEET_RANGE", "A:O"),
            listen_addr: SocketAddr::new(host, port),
            webhook_url: get("WEBHOOK_URL").map(|url| url.trim_end_matches('/').to_string()),
            webhook_secret: or_default("WEBHOOK_SECRET", "supersecret"),
            photo_dir: or_default("PHOTO_DIR", ".").into(),
        })
    }

    /// Full webhook URL to register, when a public base URL is configured
    pub fn webhook_endpoint(&self) -> Option<String> {
        self.webhook_url
            .as_ref()
            .map(|base| format!("{base}/webhook/{}", self.webhook_secret))
    }
}
