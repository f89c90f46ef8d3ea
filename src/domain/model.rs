use serde::{Deserialize, Serialize};

/// 新聞文章記錄。上游 pipeline 給的 JSON 物件欄位都可能缺，
/// 格式化時才補預設文字。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Article {
    pub title: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<String>,
    #[serde(alias = "raw_summary")]
    pub summary: Option<String>,
}

impl Article {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("无标题")
    }

    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or("未知来源")
    }

    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or("#")
    }

    pub fn published_at(&self) -> &str {
        self.published_at.as_deref().unwrap_or("N/A")
    }

    pub fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or("暂无摘要")
    }
}

/// 寫入 Sheets 的結果形狀：{success, updated_cells, updated_range, sheet_url, error?}
#[derive(Debug, Clone, Serialize)]
pub struct SaveOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_cells: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveOutcome {
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            updated_cells: None,
            updated_range: None,
            sheet_url: None,
            error: Some(error.to_string()),
        }
    }
}

/// 建表頭的結果形狀：{success, sheet_url, error?}
#[derive(Debug, Clone, Serialize)]
pub struct HeaderOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HeaderOutcome {
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            sheet_url: None,
            error: Some(error.to_string()),
        }
    }
}

/// 寄信的結果形狀：{success, message_id, error?}
#[derive(Debug, Clone, Serialize)]
pub struct SendOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendOutcome {
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.to_string()),
        }
    }
}
