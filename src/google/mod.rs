// Google 憑證層：service account（Sheets 用）與儲存的使用者 token（Gmail 用）。

pub mod service_account;
pub mod token_store;

pub use service_account::{ServiceAccountAuth, ServiceAccountKey, SPREADSHEETS_SCOPE};
pub use token_store::{InstalledAppAuth, StoredToken, GMAIL_SEND_SCOPE};
