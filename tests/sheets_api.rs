use std::path::PathBuf;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use house_listing_bot::error::StoreError;
use house_listing_bot::models::HEADERS;
use house_listing_bot::services::{ListingStore, SheetsStore};

const APPEND_PATH: &str = "/v4/spreadsheets/sheet-1/values/A:O:append";
const HEADER_PATH: &str = "/v4/spreadsheets/sheet-1/values/A1:O1";

fn key_file(dir: &TempDir, token_uri: &str) -> PathBuf {
    let path = dir.path().join("credentials.json");
    let credentials = json!({
        "type": "service_account",
        "client_email": "listing-bot@project.iam.gserviceaccount.com",
        "private_key": include_str!("fixtures/service_account_key.pem"),
        "token_uri": token_uri,
    });
    std::fs::write(&path, credentials.to_string()).unwrap();
    path
}

fn store(server: &MockServer, dir: &TempDir) -> SheetsStore {
    let key = key_file(dir, &format!("{}/token", server.uri()));
    SheetsStore::from_key_file(&key, "sheet-1", "A:O", Duration::from_secs(5))
        .unwrap()
        .with_base_url(server.uri())
}

async fn mount_token(server: &MockServer, expires_in: u64, times: u64) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "expires_in": expires_in,
            "token_type": "Bearer",
        })))
        .expect(times)
        .mount(server)
        .await;
}

fn row(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn append_posts_raw_row_and_reuses_token() {
    let server = MockServer::start().await;
    mount_token(&server, 3600, 1).await;
    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .and(query_param("valueInputOption", "RAW"))
        .and(query_param("insertDataOption", "INSERT_ROWS"))
        .and(header("authorization", "Bearer tok-1"))
        .and(body_json(json!({ "values": [["AB12CD34", "Rent", " 0911223344"]] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = store(&server, &dir);
    let listing = row(&["AB12CD34", "Rent", " 0911223344"]);
    store.append_row(&listing).await.unwrap();
    store.append_row(&listing).await.unwrap();
}

#[tokio::test]
async fn token_close_to_expiry_is_exchanged_again() {
    let server = MockServer::start().await;
    // Shorter than the refresh slack, so it is stale as soon as it arrives.
    mount_token(&server, 30, 2).await;
    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = store(&server, &dir);
    store.append_row(&row(&["a"])).await.unwrap();
    store.append_row(&row(&["b"])).await.unwrap();
}

#[tokio::test]
async fn header_is_written_to_an_empty_sheet() {
    let server = MockServer::start().await;
    mount_token(&server, 3600, 1).await;
    Mock::given(method("GET"))
        .and(path(HEADER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "Sheet1!A1:O1",
            "majorDimension": "ROWS",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .and(body_json(json!({ "values": [HEADERS] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    store(&server, &dir).ensure_header(&HEADERS).await.unwrap();
}

#[tokio::test]
async fn existing_header_is_left_alone() {
    let server = MockServer::start().await;
    mount_token(&server, 3600, 1).await;
    Mock::given(method("GET"))
        .and(path(HEADER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "Sheet1!A1:O1",
            "majorDimension": "ROWS",
            "values": [HEADERS],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    store(&server, &dir).ensure_header(&HEADERS).await.unwrap();
}

#[tokio::test]
async fn sheets_refusal_carries_status_and_body() {
    let server = MockServer::start().await;
    mount_token(&server, 3600, 1).await;
    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            r#"{"error": {"code": 403, "status": "PERMISSION_DENIED"}}"#,
        ))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = store(&server, &dir)
        .append_row(&row(&["a"]))
        .await
        .unwrap_err();
    match err {
        StoreError::Api { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("PERMISSION_DENIED"));
        }
        other => panic!("expected a Sheets API error, got {other:?}"),
    }
}

#[tokio::test]
async fn rejected_token_exchange_is_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error": "invalid_grant"}"#))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = store(&server, &dir)
        .append_row(&row(&["a"]))
        .await
        .unwrap_err();
    assert!(
        matches!(&err, StoreError::Auth(detail) if detail.contains("invalid_grant")),
        "got {err:?}"
    );
}
