use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::TransportError;
use crate::models::{PhotoRef, Poster};
use crate::services::retry::{retry, RetryPolicy};
use crate::services::traits::Transport;
use crate::services::types::{ChatId, Incoming, Input, Keyboard, OutgoingText};

const API_BASE: &str = "https://api.telegram.org";

/// Telegram Bot API client over plain HTTPS
pub struct TelegramClient {
    client: Client,
    api_base: String,
    token: String,
    retry: RetryPolicy,
}

impl TelegramClient {
    /// Create a client with the default retry policy (3 attempts, 2 s apart)
    pub fn new(token: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        Self::with_retry(token, timeout, RetryPolicy::default())
    }

    pub fn with_retry(
        token: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_base: API_BASE.to_string(),
            token: token.into(),
            retry,
        })
    }

    /// Point the client at another Bot API server
    pub fn with_base_url(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.token)
    }

    /// Calls a JSON method, retrying timeouts.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &Value,
    ) -> Result<T, TransportError> {
        retry(self.retry, TransportError::is_transient, || async move {
            debug!(method, "Calling Bot API");
            let response = self
                .client
                .post(self.method_url(method))
                .json(body)
                .send()
                .await?;
            parse_response(response).await
        })
        .await
    }

    /// Registers `url` as the webhook for this bot.
    pub async fn set_webhook(&self, url: &str) -> Result<(), TransportError> {
        let _: bool = self.call("setWebhook", &json!({ "url": url })).await?;
        Ok(())
    }
}

async fn parse_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, TransportError> {
    let envelope: ApiResponse<T> = response.json().await?;
    match envelope.result {
        Some(result) if envelope.ok => Ok(result),
        _ => Err(TransportError::Api {
            code: envelope.error_code.unwrap_or_default(),
            description: envelope.description.unwrap_or_default(),
        }),
    }
}

#[async_trait]
impl Transport for TelegramClient {
    async fn send_text(&self, message: &OutgoingText) -> Result<(), TransportError> {
        let mut body = json!({
            "chat_id": message.chat,
            "text": message.text,
        });
        if message.html {
            body["parse_mode"] = json!("HTML");
        }
        if let Some(keyboard) = &message.keyboard {
            body["reply_markup"] = reply_markup(keyboard);
        }

        let _: Value = self.call("sendMessage", &body).await?;
        Ok(())
    }

    async fn send_photo_group(
        &self,
        chat: &ChatId,
        photos: &[PhotoRef],
        caption: &str,
    ) -> Result<(), TransportError> {
        let mut files = Vec::with_capacity(photos.len());
        for photo in photos {
            files.push(tokio::fs::read(&photo.path).await?);
        }
        let media = &media_group(photos.len(), caption);
        let chat_id = &chat.to_string();
        let files = &files;

        retry(self.retry, TransportError::is_transient, || async move {
            // Multipart forms are consumed on send, so each attempt builds its own.
            let mut form = Form::new()
                .text("chat_id", chat_id.clone())
                .text("media", media.to_string());
            for (i, bytes) in files.iter().enumerate() {
                let part = Part::bytes(bytes.clone())
                    .file_name(format!("photo{i}.jpg"))
                    .mime_str("image/jpeg")?;
                form = form.part(format!("photo{i}"), part);
            }

            let response = self
                .client
                .post(self.method_url("sendMediaGroup"))
                .multipart(form)
                .send()
                .await?;
            let _: Value = parse_response(response).await?;
            Ok::<(), TransportError>(())
        })
        .await
    }

    async fn download_photo(&self, file_id: &str, dest: &Path) -> Result<(), TransportError> {
        let file: File = self.call("getFile", &json!({ "file_id": file_id })).await?;
        let file_path = file.file_path.ok_or_else(|| TransportError::Api {
            code: 0,
            description: format!("file {file_id} has no download path"),
        })?;
        let url = format!("{}/file/bot{}/{file_path}", self.api_base, self.token);

        let url = &url;
        let bytes = retry(self.retry, TransportError::is_transient, || async move {
            let response = self.client.get(url).send().await?;
            if !response.status().is_success() {
                return Err(TransportError::Http(format!(
                    "file download returned {}",
                    response.status()
                )));
            }
            Ok::<_, TransportError>(response.bytes().await?)
        })
        .await?;

        tokio::fs::write(dest, &bytes).await?;
        debug!(file_id, path = %dest.display(), size = bytes.len(), "Photo downloaded");
        Ok(())
    }
}

/// `sendMediaGroup` media array referencing multipart parts `photo0..photoN`
fn media_group(count: usize, caption: &str) -> Value {
    let items: Vec<Value> = (0..count)
        .map(|i| {
            let mut item = json!({
                "type": "photo",
                "media": format!("attach://photo{i}"),
            });
            if i == 0 {
                item["caption"] = json!(caption);
                item["parse_mode"] = json!("HTML");
            }
            item
        })
        .collect();
    Value::Array(items)
}

fn reply_markup(keyboard: &Keyboard) -> Value {
    match keyboard {
        Keyboard::Choices(rows) => {
            let rows: Vec<Vec<Value>> = rows
                .iter()
                .map(|row| row.iter().map(|label| json!({ "text": label })).collect())
                .collect();
            json!({
                "keyboard": rows,
                "one_time_keyboard": true,
                "resize_keyboard": true,
            })
        }
        Keyboard::RequestContact(label) => json!({
            "keyboard": [[{ "text": label, "request_contact": true }]],
            "one_time_keyboard": true,
            "resize_keyboard": true,
        }),
        Keyboard::Remove => json!({ "remove_keyboard": true }),
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct File {
    file_path: Option<String>,
}

/// Inbound update as delivered to the webhook
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Contact {
    pub phone_number: String,
}

impl Update {
    /// Messages without a sender (channel posts) are not conversations.
    pub fn into_incoming(self) -> Option<Incoming> {
        let message = self.message?;
        let user = message.from?;
        let sender = Poster {
            user_id: user.id,
            username: user.username,
        };
        let chat_id = message.chat.id;

        if let Some(contact) = message.contact {
            return Some(Incoming::new(
                chat_id,
                sender,
                Input::Contact {
                    phone_number: contact.phone_number,
                },
            ));
        }
        // Telegram lists sizes smallest first.
        if let Some(largest) = message.photo.into_iter().last() {
            return Some(Incoming::new(
                chat_id,
                sender,
                Input::Photo {
                    file_id: largest.file_id,
                },
            ));
        }
        match message.text {
            Some(text) => Some(Incoming::text(chat_id, sender, &text)),
            None => Some(Incoming::new(chat_id, sender, Input::Unsupported)),
        }
    }
}
