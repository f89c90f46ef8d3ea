use crate::domain::ports::TokenProvider;
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::Mutex;

pub const GMAIL_SEND_SCOPE: &str = "https://www.googleapis.com/auth/gmail.send";

const EXPIRY_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// 存在磁碟上的使用者 token 檔，相容 Google 的 authorized_user JSON。
/// 第一次的 token 要另外取得（瀏覽器授權一次），這裡只負責讀、刷新、寫回。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
}

impl StoredToken {
    fn is_fresh(&self) -> bool {
        match (&self.access_token, &self.expiry) {
            (Some(_), Some(expiry)) => {
                *expiry > Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS)
            }
            // 沒有到期時間就當作不可信，走刷新
            _ => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: i64,
}

/// Gmail 的 TokenProvider：讀取 token 檔，過期就用 refresh token 換新並寫回。
pub struct InstalledAppAuth {
    token_path: PathBuf,
    credentials_path: PathBuf,
    // 同一個 client 內避免重複刷新
    cached: Mutex<Option<StoredToken>>,
}

impl InstalledAppAuth {
    pub fn new(token_path: impl Into<PathBuf>, credentials_path: impl Into<PathBuf>) -> Self {
        Self {
            token_path: token_path.into(),
            credentials_path: credentials_path.into(),
            cached: Mutex::new(None),
        }
    }

    pub fn load(&self) -> Result<StoredToken> {
        let content =
            std::fs::read_to_string(&self.token_path).map_err(|e| RelayError::AuthError {
                message: format!(
                    "Cannot read Gmail token file {}: {}. Provision it once via the OAuth \
                     consent flow with the client secrets in {}",
                    self.token_path.display(),
                    e,
                    self.credentials_path.display()
                ),
            })?;
        let token: StoredToken = serde_json::from_str(&content)?;
        Ok(token)
    }

    fn persist(&self, token: &StoredToken) -> Result<()> {
        if let Some(parent) = self.token_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(token)?;
        std::fs::write(&self.token_path, content)?;
        Ok(())
    }

    async fn refresh(&self, http: &reqwest::Client, token: &mut StoredToken) -> Result<()> {
        let refresh_token =
            token
                .refresh_token
                .clone()
                .ok_or_else(|| RelayError::AuthError {
                    message: format!(
                        "Gmail token in {} is expired and has no refresh token; re-run the \
                         OAuth consent flow",
                        self.token_path.display()
                    ),
                })?;

        tracing::debug!("Refreshing Gmail token at {}", token.token_uri);
        let params = [
            ("client_id", token.client_id.as_str()),
            ("client_secret", token.client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];
        let response = http.post(&token.token_uri).form(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::AuthError {
                message: format!("Token refresh returned {}: {}", status, body),
            });
        }

        let refreshed: RefreshResponse = response.json().await?;
        token.access_token = Some(refreshed.access_token);
        token.expiry = Some(Utc::now() + Duration::seconds(refreshed.expires_in));

        // 寫回去，下次程序啟動直接用新 token
        self.persist(token)?;
        Ok(())
    }
}

#[async_trait]
impl TokenProvider for InstalledAppAuth {
    async fn bearer_token(&self, http: &reqwest::Client) -> Result<String> {
        let mut cached = self.cached.lock().await;

        let mut token = match cached.take() {
            Some(token) => token,
            None => self.load()?,
        };

        if !token.is_fresh() {
            self.refresh(http, &mut token).await?;
        }

        let bearer = token
            .access_token
            .clone()
            .ok_or_else(|| RelayError::AuthError {
                message: "Token refresh produced no access token".to_string(),
            })?;
        *cached = Some(token);
        Ok(bearer)
    }
}
