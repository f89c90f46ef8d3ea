pub mod cli;

use crate::utils::error::{RelayError, Result};
use std::sync::Once;

pub const ENV_SPREADSHEET_ID: &str = "GOOGLE_SPREADSHEET_ID";
pub const ENV_SERVICE_ACCOUNT_FILE: &str = "GOOGLE_SERVICE_ACCOUNT_FILE";
pub const ENV_GMAIL_TOKEN_FILE: &str = "GMAIL_TOKEN_FILE";
pub const ENV_GMAIL_CREDENTIALS_FILE: &str = "GMAIL_CREDENTIALS_FILE";
pub const ENV_GMAIL_TO: &str = "GMAIL_TO";

const DEFAULT_GMAIL_TOKEN_FILE: &str = "./gmail_token.json";
const DEFAULT_GMAIL_CREDENTIALS_FILE: &str = "./gmail_credentials.json";

static LOAD_DOTENV: Once = Once::new();

/// .env 只載一次，檔案不存在也沒關係。
fn load_dotenv() {
    LOAD_DOTENV.call_once(|| {
        let _ = dotenv::dotenv();
    });
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Sheets 端需要的配置。兩個值都是必填，缺了就是確定性的配置錯誤。
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub service_account_file: String,
}

impl SheetsConfig {
    /// 明確傳入的參數優先，否則讀環境變數。
    pub fn resolve(
        spreadsheet_id: Option<String>,
        service_account_file: Option<String>,
    ) -> Result<Self> {
        load_dotenv();

        let spreadsheet_id = spreadsheet_id
            .or_else(|| env_var(ENV_SPREADSHEET_ID))
            .ok_or_else(|| RelayError::ConfigError {
                message: format!(
                    "{} is not set; configure it in .env or pass it explicitly",
                    ENV_SPREADSHEET_ID
                ),
            })?;

        let service_account_file = service_account_file
            .or_else(|| env_var(ENV_SERVICE_ACCOUNT_FILE))
            .ok_or_else(|| RelayError::ConfigError {
                message: format!(
                    "{} is not set; configure it in .env or pass it explicitly",
                    ENV_SERVICE_ACCOUNT_FILE
                ),
            })?;

        Ok(Self {
            spreadsheet_id,
            service_account_file,
        })
    }

    pub fn sheet_url(&self) -> String {
        format!(
            "https://docs.google.com/spreadsheets/d/{}",
            self.spreadsheet_id
        )
    }
}

/// Gmail 端的配置。token 與 credentials 路徑有預設值，收件人可以缺
/// （缺的話寄信時回 {success: false}）。
#[derive(Debug, Clone)]
pub struct GmailConfig {
    pub token_file: String,
    pub credentials_file: String,
    pub default_to: Option<String>,
}

impl GmailConfig {
    pub fn resolve() -> Self {
        load_dotenv();

        Self {
            token_file: env_var(ENV_GMAIL_TOKEN_FILE)
                .unwrap_or_else(|| DEFAULT_GMAIL_TOKEN_FILE.to_string()),
            credentials_file: env_var(ENV_GMAIL_CREDENTIALS_FILE)
                .unwrap_or_else(|| DEFAULT_GMAIL_CREDENTIALS_FILE.to_string()),
            default_to: env_var(ENV_GMAIL_TO),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // 環境變數是行程級共享的，這裡的測試串起來跑
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for name in [
            ENV_SPREADSHEET_ID,
            ENV_SERVICE_ACCOUNT_FILE,
            ENV_GMAIL_TOKEN_FILE,
            ENV_GMAIL_CREDENTIALS_FILE,
            ENV_GMAIL_TO,
        ] {
            std::env::remove_var(name);
        }
    }

    #[test]
    fn test_missing_spreadsheet_id_is_a_config_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        let err = SheetsConfig::resolve(None, None).unwrap_err();
        assert!(matches!(err, RelayError::ConfigError { .. }));
        assert!(err.to_string().contains(ENV_SPREADSHEET_ID));
    }

    #[test]
    fn test_explicit_values_win_over_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var(ENV_SPREADSHEET_ID, "env-id");
        std::env::set_var(ENV_SERVICE_ACCOUNT_FILE, "/env/sa.json");

        let config =
            SheetsConfig::resolve(Some("explicit-id".to_string()), None).unwrap();
        assert_eq!(config.spreadsheet_id, "explicit-id");
        assert_eq!(config.service_account_file, "/env/sa.json");
        assert_eq!(
            config.sheet_url(),
            "https://docs.google.com/spreadsheets/d/explicit-id"
        );
        clear_env();
    }

    #[test]
    fn test_blank_env_value_counts_as_missing() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var(ENV_SPREADSHEET_ID, "   ");

        assert!(SheetsConfig::resolve(None, None).is_err());
        clear_env();
    }

    #[test]
    fn test_gmail_config_has_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        let config = GmailConfig::resolve();
        assert_eq!(config.token_file, DEFAULT_GMAIL_TOKEN_FILE);
        assert_eq!(config.credentials_file, DEFAULT_GMAIL_CREDENTIALS_FILE);
        assert!(config.default_to.is_none());
    }
}
