use crate::config::SheetsConfig;
use crate::domain::model::{Article, HeaderOutcome, SaveOutcome};
use crate::domain::ports::TokenProvider;
use crate::sheets::client::{SheetsClient, ValueInputOption};
use crate::utils::error::Result;
use serde_json::Value;

pub const SHEET_HEADER: [&str; 5] = ["发布时间", "标题", "来源", "链接", "摘要"];

/// 摘要欄太長會讓表格難讀，截到 500 字。
const SUMMARY_MAX_CHARS: usize = 500;

#[derive(Debug, Clone)]
pub struct SaveOptions {
    pub add_header: bool,
    pub add_timestamp: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            add_header: false,
            add_timestamp: true,
        }
    }
}

/// 把文章列表排成 sheet rows。表格裡缺欄位就留空白，
/// 預設文字只用在郵件正文。
fn build_rows(articles: &[Article], options: &SaveOptions) -> Vec<Vec<Value>> {
    let mut rows = Vec::new();

    if options.add_timestamp {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut separator = vec![Value::from(format!("=== 批次: {} ===", timestamp))];
        separator.resize(SHEET_HEADER.len(), Value::from(""));
        rows.push(separator);
    }

    if options.add_header {
        rows.push(SHEET_HEADER.iter().map(|cell| Value::from(*cell)).collect());
    }

    for article in articles {
        let summary: String = article
            .summary
            .as_deref()
            .unwrap_or("")
            .chars()
            .take(SUMMARY_MAX_CHARS)
            .collect();
        rows.push(vec![
            Value::from(article.published_at.as_deref().unwrap_or("")),
            Value::from(article.title.as_deref().unwrap_or("")),
            Value::from(article.source.as_deref().unwrap_or("")),
            Value::from(article.url.as_deref().unwrap_or("")),
            Value::from(summary),
        ]);
    }

    rows
}

async fn save_inner<A: TokenProvider>(
    client: &SheetsClient<A>,
    articles: &[Article],
    options: &SaveOptions,
) -> Result<SaveOutcome> {
    let rows = build_rows(articles, options);
    let range = format!("{}!A:Z", client.first_sheet_title().await?);
    let result = client
        .append_data(&rows, &range, ValueInputOption::Raw)
        .await?;

    let updates = result.updates.unwrap_or_else(|| {
        tracing::warn!("Append response carried no update summary");
        Default::default()
    });

    Ok(SaveOutcome {
        success: true,
        updated_cells: Some(updates.updated_cells.unwrap_or(0)),
        updated_range: Some(updates.updated_range.unwrap_or_default()),
        sheet_url: Some(client.sheet_url()),
        error: None,
    })
}

/// 把文章追加到表格，任何失敗都收進 {success: false, error} 形狀。
pub async fn save_articles_with<A: TokenProvider>(
    client: &SheetsClient<A>,
    articles: &[Article],
    options: &SaveOptions,
) -> SaveOutcome {
    match save_inner(client, articles, options).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Saving articles to sheet failed: {}", e);
            SaveOutcome::failure(e)
        }
    }
}

/// 從環境組出 client 再存。配置錯誤同樣收進 outcome。
pub async fn save_articles(articles: &[Article], options: &SaveOptions) -> SaveOutcome {
    let client = match SheetsClient::from_env(None, None) {
        Ok(client) => client,
        Err(e) => return SaveOutcome::failure(e),
    };
    save_articles_with(&client, articles, options).await
}

async fn header_inner<A: TokenProvider>(client: &SheetsClient<A>) -> Result<HeaderOutcome> {
    let header: Vec<Vec<Value>> =
        vec![SHEET_HEADER.iter().map(|cell| Value::from(*cell)).collect()];
    let range = format!("{}!A1", client.first_sheet_title().await?);
    client
        .write_data(&header, &range, ValueInputOption::Raw)
        .await?;

    Ok(HeaderOutcome {
        success: true,
        sheet_url: Some(client.sheet_url()),
        error: None,
    })
}

/// 在第一個工作表頂端寫表頭，通常只需要跑一次。
pub async fn create_header_with<A: TokenProvider>(client: &SheetsClient<A>) -> HeaderOutcome {
    match header_inner(client).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Creating sheet header failed: {}", e);
            HeaderOutcome::failure(e)
        }
    }
}

pub async fn create_header() -> HeaderOutcome {
    let client = match SheetsClient::from_env(None, None) {
        Ok(client) => client,
        Err(e) => return HeaderOutcome::failure(e),
    };
    create_header_with(&client).await
}

/// 表格網址，配置不完整時回 None。
pub fn get_sheet_url() -> Option<String> {
    SheetsConfig::resolve(None, None)
        .ok()
        .map(|config| config.sheet_url())
}
