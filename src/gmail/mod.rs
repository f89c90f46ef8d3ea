pub mod body;
pub mod client;

pub use body::{build_html_body, build_text_body, MAX_INLINE_ARTICLES};
pub use client::{send_news_email, DigestOptions, GmailClient};
