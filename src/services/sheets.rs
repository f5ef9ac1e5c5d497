use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::services::traits::ListingStore;

const SHEETS_BASE: &str = "https://sheets.googleapis.com";
const SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
/// Tokens are refreshed this long before Google says they expire
const TOKEN_SLACK: Duration = Duration::from_secs(60);

/// The fields of a service-account key file we need
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Google Sheets table appended through the REST API
pub struct SheetsStore {
    client: Client,
    base_url: String,
    account: ServiceAccount,
    spreadsheet_id: String,
    range: String,
    token: Mutex<Option<CachedToken>>,
}

impl SheetsStore {
    /// Load the service-account key file and build the store
    pub fn from_key_file(
        path: &Path,
        spreadsheet_id: impl Into<String>,
        range: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials file {}", path.display()))?;
        let account: ServiceAccount =
            serde_json::from_str(&raw).context("Failed to parse service-account credentials")?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: SHEETS_BASE.to_string(),
            account,
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
            token: Mutex::new(None),
        })
    }

    /// Point the store at another Sheets API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Cached OAuth token, exchanged again once it is about to expire.
    async fn access_token(&self) -> Result<String, StoreError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let assertion = self.signed_assertion()?;
        let response = self
            .client
            .post(&self.account.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Auth(format!("{status}: {body}")));
        }

        let token: TokenResponse = response.json().await?;
        debug!(expires_in = token.expires_in, "Obtained Sheets access token");
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_SLACK);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    fn signed_assertion(&self) -> Result<String, StoreError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: &self.account.client_email,
            scope: SCOPE,
            aud: &self.account.token_uri,
            iat: now,
            exp: now + 3600,
        };
        let key = EncodingKey::from_rsa_pem(self.account.private_key.as_bytes())
            .map_err(|e| StoreError::Credentials(e.to_string()))?;
        encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| StoreError::Credentials(e.to_string()))
    }

    fn values_url(&self, range: &str) -> Result<Url, StoreError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| StoreError::Credentials(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Credentials("invalid Sheets base URL".to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Api { status, body })
    }
}

#[async_trait]
impl ListingStore for SheetsStore {
    async fn ensure_header(&self, headers: &[&str]) -> Result<(), StoreError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .get(self.values_url("A1:O1")?)
            .bearer_auth(&token)
            .send()
            .await?;
        let existing: ValueRange = Self::check(response).await?.json().await?;

        if existing.values.is_empty() {
            info!("Listings sheet is empty, writing header row");
            let row: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
            self.append_row(&row).await?;
        }
        Ok(())
    }

    async fn append_row(&self, row: &[String]) -> Result<(), StoreError> {
        let token = self.access_token().await?;
        let mut url = self.values_url(&format!("{}:append", self.range))?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let response = self
            .client
            .post(url)
            .bearer_auth(&token)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        Self::check(response).await?;
        debug!(columns = row.len(), "Row appended to listings sheet");
        Ok(())
    }
}
