use crate::config::SheetsConfig;
use crate::domain::ports::TokenProvider;
use crate::google::{ServiceAccountAuth, SPREADSHEETS_SCOPE};
use crate::utils::error::{RelayError, Result};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// 寫入時的 cell 解讀模式，對應 API 的 valueInputOption。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueInputOption {
    #[default]
    Raw,
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueInputOption::Raw => "RAW",
            ValueInputOption::UserEntered => "USER_ENTERED",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetInfo {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    pub title: String,
    #[serde(default)]
    pub sheet_id: i64,
    #[serde(default)]
    pub index: i64,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetInfo>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_rows: Option<u64>,
    #[serde(default)]
    pub updated_columns: Option<u64>,
    #[serde(default)]
    pub updated_cells: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendResult {
    #[serde(default)]
    pub table_range: Option<String>,
    #[serde(default)]
    pub updates: Option<UpdateResult>,
}

/// Google Sheets v4 的薄封裝：metadata、讀、寫、追加。
/// 工作表清單讀一次之後記住，force_refresh 可以重抓。
pub struct SheetsClient<A: TokenProvider> {
    http: reqwest::Client,
    auth: A,
    spreadsheet_id: String,
    api_base: String,
    sheets_cache: Mutex<Option<Vec<SheetInfo>>>,
}

impl SheetsClient<ServiceAccountAuth> {
    /// 從環境變數組出 client。明確傳入的參數優先於環境值。
    pub fn from_env(
        spreadsheet_id: Option<String>,
        service_account_file: Option<String>,
    ) -> Result<Self> {
        let config = SheetsConfig::resolve(spreadsheet_id, service_account_file)?;
        let auth = ServiceAccountAuth::from_file(&config.service_account_file, SPREADSHEETS_SCOPE)?;
        Ok(Self::new(auth, config.spreadsheet_id))
    }
}

impl<A: TokenProvider> SheetsClient<A> {
    pub fn new(auth: A, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth,
            spreadsheet_id: spreadsheet_id.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            sheets_cache: Mutex::new(None),
        }
    }

    /// 測試時把 client 指向 mock server 用。
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn sheet_url(&self) -> String {
        format!(
            "https://docs.google.com/spreadsheets/d/{}",
            self.spreadsheet_id
        )
    }

    pub async fn get_sheets(&self, force_refresh: bool) -> Result<Vec<SheetInfo>> {
        let mut cache = self.sheets_cache.lock().await;
        match cache.as_ref() {
            Some(sheets) if !force_refresh => Ok(sheets.clone()),
            _ => {
                let url = format!("{}/{}", self.api_base, self.spreadsheet_id);
                tracing::debug!("Fetching spreadsheet metadata from {}", url);

                let token = self.auth.bearer_token(&self.http).await?;
                let response = self.http.get(&url).bearer_auth(token).send().await?;
                let meta: SpreadsheetMeta = Self::decode(response).await?;
                *cache = Some(meta.sheets.clone());
                Ok(meta.sheets)
            }
        }
    }

    pub async fn first_sheet_title(&self) -> Result<String> {
        let sheets = self.get_sheets(false).await?;
        sheets
            .first()
            .map(|sheet| sheet.properties.title.clone())
            .ok_or_else(|| RelayError::SheetsError {
                message: format!(
                    "Spreadsheet {} contains no worksheets",
                    self.spreadsheet_id
                ),
            })
    }

    /// 讀取範圍內的資料，空範圍回空 list。
    pub async fn read_data(&self, range: &str) -> Result<Vec<Vec<Value>>> {
        let url = format!("{}/{}/values/{}", self.api_base, self.spreadsheet_id, range);
        tracing::debug!("Reading range {} from spreadsheet", range);

        let token = self.auth.bearer_token(&self.http).await?;
        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let value_range: ValueRange = Self::decode(response).await?;
        Ok(value_range.values)
    }

    /// 覆寫範圍內的資料。
    pub async fn write_data(
        &self,
        rows: &[Vec<Value>],
        range: &str,
        option: ValueInputOption,
    ) -> Result<UpdateResult> {
        let url = format!("{}/{}/values/{}", self.api_base, self.spreadsheet_id, range);
        tracing::debug!("Writing {} rows to range {}", rows.len(), range);

        let token = self.auth.bearer_token(&self.http).await?;
        let response = self
            .http
            .put(&url)
            .bearer_auth(token)
            .query(&[("valueInputOption", option.as_str())])
            .json(&serde_json::json!({ "values": rows }))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// 追加到範圍尾端，不覆蓋既有資料。
    pub async fn append_data(
        &self,
        rows: &[Vec<Value>],
        range: &str,
        option: ValueInputOption,
    ) -> Result<AppendResult> {
        let url = format!(
            "{}/{}/values/{}:append",
            self.api_base, self.spreadsheet_id, range
        );
        tracing::debug!("Appending {} rows to range {}", rows.len(), range);

        let token = self.auth.bearer_token(&self.http).await?;
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .query(&[
                ("valueInputOption", option.as_str()),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&serde_json::json!({ "values": rows }))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::SheetsError {
                message: format!("Sheets API returned {}: {}", status, body),
            });
        }
        let decoded = response.json().await?;
        Ok(decoded)
    }
}

// ============ 便捷函數：一次性操作，client 從環境組出 ============

pub async fn read_from_sheets(range: &str) -> Result<Vec<Vec<Value>>> {
    let client = SheetsClient::from_env(None, None)?;
    client.read_data(range).await
}

pub async fn write_to_sheets(
    rows: &[Vec<Value>],
    range: Option<&str>,
    sheet_title: Option<&str>,
) -> Result<UpdateResult> {
    let client = SheetsClient::from_env(None, None)?;
    let range = match range {
        Some(range) => range.to_string(),
        None => {
            let title = match sheet_title {
                Some(title) => title.to_string(),
                None => client.first_sheet_title().await?,
            };
            format!("{}!A1", title)
        }
    };
    client.write_data(rows, &range, ValueInputOption::Raw).await
}

pub async fn append_to_sheets(
    rows: &[Vec<Value>],
    range: Option<&str>,
    sheet_title: Option<&str>,
) -> Result<AppendResult> {
    let client = SheetsClient::from_env(None, None)?;
    let range = match range {
        Some(range) => range.to_string(),
        None => {
            let title = match sheet_title {
                Some(title) => title.to_string(),
                None => client.first_sheet_title().await?,
            };
            format!("{}!A:Z", title)
        }
    };
    client
        .append_data(rows, &range, ValueInputOption::Raw)
        .await
}
