use crate::domain::model::Article;
use std::fmt::Write;

/// 郵件裡最多放幾條，其餘請讀者去表格看。
pub const MAX_INLINE_ARTICLES: usize = 10;

/// HTML 正文：標題、摘要框、可選的表格連結、逐條新聞。
pub fn build_html_body(
    articles: &[Article],
    time_window: Option<&str>,
    sheet_url: Option<&str>,
) -> String {
    let mut html = String::from(
        r#"<html>
  <head>
    <style>
      body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
      h1 { color: #2c3e50; border-bottom: 3px solid #3498db; padding-bottom: 10px; }
      .summary { background-color: #f8f9fa; padding: 15px; margin: 20px 0; border-radius: 5px; border-left: 4px solid #3498db; }
      .article { margin: 20px 0; padding: 15px; border-left: 3px solid #3498db; background-color: #f9f9f9; }
      .article h3 { margin: 0 0 8px 0; color: #2c3e50; }
      .meta { color: #7f8c8d; font-size: 0.9em; margin: 5px 0; }
      .summary-text { color: #555; margin: 10px 0; }
      a { color: #3498db; text-decoration: none; }
      a:hover { text-decoration: underline; }
      .button { display: inline-block; padding: 10px 20px; background-color: #3498db; color: white; text-decoration: none; border-radius: 5px; margin: 10px 0; }
    </style>
  </head>
  <body>
    <h1>📰 新闻日报</h1>

    <div class="summary">
      <strong>📊 本期摘要</strong><br>
"#,
    );

    let _ = writeln!(
        html,
        "      • 新闻总数: <strong>{}</strong><br>",
        articles.len()
    );
    if let Some(time_window) = time_window {
        let _ = writeln!(html, "      • 时间范围: {}<br>", time_window);
    }
    html.push_str("    </div>\n");

    if let Some(sheet_url) = sheet_url {
        let _ = writeln!(
            html,
            r#"    <p><a href="{}" class="button">📊 查看完整报告（Google Sheets）</a></p>"#,
            sheet_url
        );
    }

    html.push_str("    <h2>📑 今日头条</h2>\n");

    for (i, article) in articles.iter().take(MAX_INLINE_ARTICLES).enumerate() {
        let _ = write!(
            html,
            r#"
    <div class="article">
      <h3>{index}. {title}</h3>
      <div class="meta">
        📍 来源: <strong>{source}</strong> | 🕐 发布时间: {published_at}
      </div>
      <div class="summary-text">{summary}</div>
      <a href="{url}">阅读全文 →</a>
    </div>
"#,
            index = i + 1,
            title = article.title(),
            source = article.source(),
            published_at = article.published_at(),
            summary = article.summary(),
            url = article.url(),
        );
    }

    if articles.len() > MAX_INLINE_ARTICLES {
        let _ = write!(
            html,
            r#"
    <div class="summary">
      <strong>📌 注意:</strong> 为了邮件简洁，仅显示前 {} 条新闻。
      完整的 {} 条新闻请查看 Google Sheets。
    </div>
"#,
            MAX_INLINE_ARTICLES,
            articles.len()
        );
    }

    html.push_str("  </body>\n</html>\n");
    html
}

/// 純文字正文，內容跟 HTML 版一致。
pub fn build_text_body(
    articles: &[Article],
    time_window: Option<&str>,
    sheet_url: Option<&str>,
) -> String {
    let rule = "=".repeat(60);
    let mut text = String::new();

    let _ = writeln!(text, "{}", rule);
    let _ = writeln!(text, "📰 新闻日报");
    let _ = writeln!(text, "{}\n", rule);

    let _ = writeln!(text, "新闻总数: {}", articles.len());
    if let Some(time_window) = time_window {
        let _ = writeln!(text, "时间范围: {}", time_window);
    }
    if let Some(sheet_url) = sheet_url {
        let _ = writeln!(text, "\n📊 查看完整报告: {}", sheet_url);
    }

    let _ = writeln!(text, "\n{}", rule);
    let _ = writeln!(text, "📑 今日头条");
    let _ = writeln!(text, "{}\n", rule);

    for (i, article) in articles.iter().take(MAX_INLINE_ARTICLES).enumerate() {
        let _ = writeln!(text, "{}. {}", i + 1, article.title());
        let _ = writeln!(text, "   来源: {}", article.source());
        let _ = writeln!(text, "   时间: {}", article.published_at());
        let _ = writeln!(text, "   摘要: {}", article.summary());
        let _ = writeln!(text, "   链接: {}", article.url());
        text.push('\n');
    }

    if articles.len() > MAX_INLINE_ARTICLES {
        let _ = writeln!(
            text,
            "\n注意: 仅显示前 {} 条新闻，完整的 {} 条新闻请查看 Google Sheets。",
            MAX_INLINE_ARTICLES,
            articles.len()
        );
    }

    let _ = writeln!(text, "{}", rule);
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn articles(count: usize) -> Vec<Article> {
        (1..=count)
            .map(|i| Article {
                title: Some(format!("标题 {}", i)),
                source: Some("Reuters".to_string()),
                url: Some(format!("https://example.com/{}", i)),
                published_at: Some("2025-01-01".to_string()),
                summary: Some(format!("摘要 {}", i)),
            })
            .collect()
    }

    #[test]
    fn test_html_body_caps_inline_articles_at_ten() {
        let html = build_html_body(&articles(12), None, None);
        assert!(html.contains("标题 10"));
        assert!(!html.contains("标题 11"));
        assert!(html.contains("仅显示前 10 条新闻"));
        assert!(html.contains("完整的 12 条新闻"));
    }

    #[test]
    fn test_html_body_has_no_overflow_notice_at_ten_or_fewer() {
        let html = build_html_body(&articles(10), None, None);
        assert!(html.contains("标题 10"));
        assert!(!html.contains("仅显示前"));
    }

    #[test]
    fn test_text_body_caps_inline_articles_at_ten() {
        let text = build_text_body(&articles(11), None, None);
        assert!(text.contains("10. 标题 10"));
        assert!(!text.contains("标题 11"));
        assert!(text.contains("完整的 11 条新闻"));
    }

    #[test]
    fn test_missing_fields_use_placeholders() {
        let html = build_html_body(&[Article::default()], None, None);
        assert!(html.contains("无标题"));
        assert!(html.contains("未知来源"));
        assert!(html.contains("N/A"));
        assert!(html.contains(r##"href="#""##));
        assert!(html.contains("暂无摘要"));

        let text = build_text_body(&[Article::default()], None, None);
        assert!(text.contains("1. 无标题"));
        assert!(text.contains("来源: 未知来源"));
        assert!(text.contains("摘要: 暂无摘要"));
    }

    #[test]
    fn test_optional_sections_appear_when_supplied() {
        let html = build_html_body(
            &articles(1),
            Some("过去 24 小时"),
            Some("https://docs.google.com/spreadsheets/d/abc"),
        );
        assert!(html.contains("时间范围: 过去 24 小时"));
        assert!(html.contains(r#"href="https://docs.google.com/spreadsheets/d/abc""#));

        let text = build_text_body(&articles(1), Some("过去 24 小时"), Some("https://x"));
        assert!(text.contains("时间范围: 过去 24 小时"));
        assert!(text.contains("查看完整报告: https://x"));

        // 沒給就不出現
        let bare = build_text_body(&articles(1), None, None);
        assert!(!bare.contains("时间范围"));
        assert!(!bare.contains("查看完整报告"));
    }

    #[test]
    fn test_article_count_is_reported() {
        let html = build_html_body(&articles(3), None, None);
        assert!(html.contains("新闻总数: <strong>3</strong>"));
        let text = build_text_body(&articles(3), None, None);
        assert!(text.contains("新闻总数: 3"));
    }
}
