use crate::config::GmailConfig;
use crate::domain::model::{Article, SendOutcome};
use crate::domain::ports::TokenProvider;
use crate::gmail::body::{build_html_body, build_text_body};
use crate::google::token_store::InstalledAppAuth;
use crate::utils::error::{RelayError, Result};
use base64::prelude::{BASE64_STANDARD, BASE64_URL_SAFE};
use base64::Engine;
use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";

// 兩個 part 都走 base64 編碼，內容不可能撞到這個分隔字串
const MIME_BOUNDARY: &str = "=_news_relay_alternative";

#[derive(Debug, Clone, Default)]
pub struct DigestOptions {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub time_window: Option<String>,
    pub sheet_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

/// Gmail API 的薄封裝：組 multipart 郵件、base64url 包起來、送出。
pub struct GmailClient<A: TokenProvider> {
    http: reqwest::Client,
    auth: A,
    api_base: String,
}

impl GmailClient<InstalledAppAuth> {
    pub fn from_env() -> Self {
        let config = GmailConfig::resolve();
        Self::new(InstalledAppAuth::new(
            config.token_file,
            config.credentials_file,
        ))
    }
}

impl<A: TokenProvider> GmailClient<A> {
    pub fn new(auth: A) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// 寄新聞匯總郵件。收件人沒設定就直接回失敗，不打任何網路。
    pub async fn send_digest(&self, articles: &[Article], options: &DigestOptions) -> SendOutcome {
        let to = match options.to.as_deref() {
            Some(to) if !to.trim().is_empty() => to.to_string(),
            _ => return SendOutcome::failure("未设置收件人邮箱（GMAIL_TO）"),
        };

        let subject = options
            .subject
            .clone()
            .unwrap_or_else(|| format!("📰 新闻日报 - {} 条新闻", articles.len()));

        let text = build_text_body(
            articles,
            options.time_window.as_deref(),
            options.sheet_url.as_deref(),
        );
        let html = build_html_body(
            articles,
            options.time_window.as_deref(),
            options.sheet_url.as_deref(),
        );

        match self.send_raw(&to, &subject, &text, &html).await {
            Ok(message_id) => {
                tracing::info!("Digest email sent, message id {}", message_id);
                SendOutcome {
                    success: true,
                    message_id: Some(message_id),
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!("Sending digest email failed: {}", e);
                SendOutcome::failure(e)
            }
        }
    }

    async fn send_raw(&self, to: &str, subject: &str, text: &str, html: &str) -> Result<String> {
        let message = build_mime_message(to, subject, text, html);
        let raw = BASE64_URL_SAFE.encode(message);

        let url = format!("{}/users/me/messages/send", self.api_base);
        tracing::debug!("Sending message to {} via {}", to, url);

        let token = self.auth.bearer_token(&self.http).await?;
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "raw": raw }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::GmailError {
                message: format!("Gmail API returned {}: {}", status, body),
            });
        }

        let sent: SendResponse = response.json().await?;
        Ok(sent.id)
    }
}

/// multipart/alternative：純文字在前，HTML 在後，收信端挑後面的顯示。
fn build_mime_message(to: &str, subject: &str, text: &str, html: &str) -> String {
    let mut message = String::new();
    message.push_str("MIME-Version: 1.0\r\n");
    message.push_str(&format!("To: {}\r\n", to));
    message.push_str("From: me\r\n");
    message.push_str(&format!("Subject: {}\r\n", encode_header_value(subject)));
    message.push_str(&format!(
        "Content-Type: multipart/alternative; boundary=\"{}\"\r\n\r\n",
        MIME_BOUNDARY
    ));

    for (content_type, content) in [("text/plain", text), ("text/html", html)] {
        message.push_str(&format!("--{}\r\n", MIME_BOUNDARY));
        message.push_str(&format!(
            "Content-Type: {}; charset=\"utf-8\"\r\n",
            content_type
        ));
        message.push_str("Content-Transfer-Encoding: base64\r\n\r\n");
        message.push_str(&encode_body(content));
        message.push_str("\r\n");
    }
    message.push_str(&format!("--{}--\r\n", MIME_BOUNDARY));
    message
}

/// 非 ASCII 的標頭值用 RFC 2047 的 base64 形式。
fn encode_header_value(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?utf-8?B?{}?=", BASE64_STANDARD.encode(value))
    }
}

/// base64 內容折成 76 字元一行。
fn encode_body(content: &str) -> String {
    let encoded = BASE64_STANDARD.encode(content);
    let mut wrapped = String::with_capacity(encoded.len() + encoded.len() / 76 * 2 + 2);
    for (i, ch) in encoded.chars().enumerate() {
        if i > 0 && i % 76 == 0 {
            wrapped.push_str("\r\n");
        }
        wrapped.push(ch);
    }
    wrapped
}

/// 便捷入口：client 與收件人都從環境組出。
pub async fn send_news_email(articles: &[Article], options: DigestOptions) -> SendOutcome {
    let config = GmailConfig::resolve();
    let mut options = options;
    if options.to.is_none() {
        options.to = config.default_to.clone();
    }

    let client = GmailClient::from_env();
    client.send_digest(articles, &options).await
}
