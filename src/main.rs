use std::sync::Arc;

use anyhow::Context;
use house_listing_bot::config::HTTP_TIMEOUT;
use house_listing_bot::models::HEADERS;
use house_listing_bot::services::{
    ListingStore, LocalPhotoStore, SheetsStore, TelegramClient,
};
use house_listing_bot::webhook::{self, AppState};
use house_listing_bot::{Committer, Config, Conversations};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "house_listing_bot=info,tower_http=info".into()),
        )
        .init();

    info!("🏠 House Listing Bot");

    let config = Config::from_env()?;

    let store = SheetsStore::from_key_file(
        &config.credentials_path,
        &config.spreadsheet_id,
        &config.sheet_range,
        HTTP_TIMEOUT,
    )?;
    store
        .ensure_header(&HEADERS)
        .await
        .context("Failed to initialize listings sheet")?;
    info!("📊 Listings sheet ready");

    let telegram = Arc::new(TelegramClient::new(&config.bot_token, HTTP_TIMEOUT)?);
    tokio::fs::create_dir_all(&config.photo_dir)
        .await
        .with_context(|| format!("Failed to create photo dir {}", config.photo_dir.display()))?;
    let photos = Arc::new(LocalPhotoStore::new(&config.photo_dir));

    let committer = Committer::new(
        telegram.clone(),
        Arc::new(store),
        photos.clone(),
        config.channels.clone(),
    );
    let conversations = Arc::new(Conversations::new(telegram.clone(), photos, committer));

    match config.webhook_endpoint() {
        Some(endpoint) => {
            telegram
                .set_webhook(&endpoint)
                .await
                .context("Failed to register webhook")?;
            info!("🔗 Webhook registered");
        }
        None => warn!("WEBHOOK_URL not set, expecting the webhook to be registered already"),
    }

    let app = webhook::router(AppState {
        conversations,
        secret: config.webhook_secret.as_str().into(),
    });

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("Bot is running with webhook on {}", config.listen_addr);
    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}
