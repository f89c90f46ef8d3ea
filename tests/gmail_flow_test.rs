use anyhow::Result;
use chrono::{Duration, Utc};
use httpmock::prelude::*;
use news_relay::domain::model::Article;
use news_relay::gmail::client::DigestOptions;
use news_relay::gmail::GmailClient;
use news_relay::google::token_store::{InstalledAppAuth, StoredToken};
use tempfile::TempDir;

fn articles(count: usize) -> Vec<Article> {
    (1..=count)
        .map(|i| Article {
            title: Some(format!("标题 {}", i)),
            source: Some("新华社".to_string()),
            url: Some(format!("https://example.com/{}", i)),
            published_at: Some("2025-01-01 08:00".to_string()),
            summary: Some(format!("摘要 {}", i)),
        })
        .collect()
}

fn write_expired_token(dir: &TempDir, token_uri: String) -> std::path::PathBuf {
    let token = StoredToken {
        access_token: Some("stale".to_string()),
        refresh_token: Some("refresh-abc".to_string()),
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        token_uri,
        expiry: Some(Utc::now() - Duration::hours(2)),
        scopes: None,
    };
    let path = dir.path().join("gmail_token.json");
    std::fs::write(&path, serde_json::to_string_pretty(&token).unwrap()).unwrap();
    path
}

/// 完整寄信流程：過期 token 先刷新，再帶新 token 打 send endpoint。
#[tokio::test]
async fn test_send_digest_refreshes_token_then_sends() -> Result<()> {
    let server = MockServer::start();

    let refresh_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/oauth/token")
            .body_contains("grant_type=refresh_token")
            .body_contains("refresh_token=refresh-abc");
        then.status(200).json_body(serde_json::json!({
            "access_token": "fresh-gmail-token",
            "expires_in": 3600
        }));
    });

    let send_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/users/me/messages/send")
            .header("authorization", "Bearer fresh-gmail-token")
            .body_contains("\"raw\"");
        then.status(200).json_body(serde_json::json!({
            "id": "msg-42",
            "threadId": "thread-42"
        }));
    });

    let dir = TempDir::new()?;
    let token_path = write_expired_token(&dir, server.url("/oauth/token"));
    let auth = InstalledAppAuth::new(&token_path, dir.path().join("credentials.json"));
    let client = GmailClient::new(auth).with_api_base(server.url(""));

    let options = DigestOptions {
        to: Some("reader@example.com".to_string()),
        subject: None,
        time_window: Some("过去 24 小时".to_string()),
        sheet_url: Some("https://docs.google.com/spreadsheets/d/abc".to_string()),
    };
    let outcome = client.send_digest(&articles(12), &options).await;

    refresh_mock.assert();
    send_mock.assert();
    assert!(outcome.success);
    assert_eq!(outcome.message_id.as_deref(), Some("msg-42"));

    // 刷新後的 token 要寫回檔案，下次啟動直接用
    let persisted: StoredToken =
        serde_json::from_str(&std::fs::read_to_string(&token_path)?)?;
    assert_eq!(persisted.access_token.as_deref(), Some("fresh-gmail-token"));
    Ok(())
}

/// 沒有收件人時直接回失敗，連 token 都不會去刷。
#[tokio::test]
async fn test_missing_recipient_short_circuits() -> Result<()> {
    let server = MockServer::start();
    let refresh_mock = server.mock(|when, then| {
        when.method(POST).path("/oauth/token");
        then.status(200).json_body(serde_json::json!({
            "access_token": "x", "expires_in": 3600
        }));
    });

    let dir = TempDir::new()?;
    let token_path = write_expired_token(&dir, server.url("/oauth/token"));
    let auth = InstalledAppAuth::new(&token_path, dir.path().join("credentials.json"));
    let client = GmailClient::new(auth).with_api_base(server.url(""));

    let outcome = client
        .send_digest(&articles(1), &DigestOptions::default())
        .await;

    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("未设置收件人邮箱"));
    refresh_mock.assert_hits(0);
    Ok(())
}

/// send endpoint 出錯時收進 outcome，token 刷新的結果仍然保留。
#[tokio::test]
async fn test_send_failure_is_reported_in_outcome() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/oauth/token");
        then.status(200).json_body(serde_json::json!({
            "access_token": "fresh", "expires_in": 3600
        }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/users/me/messages/send");
        then.status(400).body("invalid raw payload");
    });

    let dir = TempDir::new()?;
    let token_path = write_expired_token(&dir, server.url("/oauth/token"));
    let auth = InstalledAppAuth::new(&token_path, dir.path().join("credentials.json"));
    let client = GmailClient::new(auth).with_api_base(server.url(""));

    let options = DigestOptions {
        to: Some("reader@example.com".to_string()),
        ..Default::default()
    };
    let outcome = client.send_digest(&articles(1), &options).await;

    assert!(!outcome.success);
    let error = outcome.error.unwrap();
    assert!(error.contains("400"));
    assert!(error.contains("invalid raw payload"));
    Ok(())
}
