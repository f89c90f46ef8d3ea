use crate::utils::error::Result;
use async_trait::async_trait;

/// 提供 Google API 的 bearer token。
/// Sheets 走 service account，Gmail 走儲存的使用者 token，兩邊的
/// HTTP client 透過這個 port 拿 token，不關心憑證種類。
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self, http: &reqwest::Client) -> Result<String>;
}
