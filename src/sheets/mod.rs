pub mod client;
pub mod helper;

pub use client::{SheetsClient, ValueInputOption};
pub use helper::{create_header, get_sheet_url, save_articles, SaveOptions};
