pub mod config;
pub mod domain;
pub mod gmail;
pub mod google;
pub mod sheets;
pub mod utils;

pub use config::{GmailConfig, SheetsConfig};
pub use domain::model::{Article, HeaderOutcome, SaveOutcome, SendOutcome};
pub use gmail::client::{send_news_email, DigestOptions, GmailClient};
pub use sheets::client::{append_to_sheets, read_from_sheets, write_to_sheets, SheetsClient};
pub use sheets::helper::{create_header, get_sheet_url, save_articles, SaveOptions};
pub use utils::error::{RelayError, Result};
