use clap::Parser;
use news_relay::config::cli::{Cli, Command};
use news_relay::utils::{logger, validation::Validate};
use news_relay::{gmail, sheets, Article, DigestOptions, SaveOptions};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting news-relay CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證參數
    if let Err(e) = cli.validate() {
        tracing::error!("❌ Argument validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    match cli.command {
        Command::InitHeader => {
            let outcome = sheets::helper::create_header().await;
            if !outcome.success {
                fail(outcome.error);
            }
            println!("✅ Sheet header created");
            if let Some(url) = outcome.sheet_url {
                println!("📊 {}", url);
            }
        }

        Command::Save {
            input,
            header,
            no_timestamp,
        } => {
            let articles = load_articles(&input);
            let options = SaveOptions {
                add_header: header,
                add_timestamp: !no_timestamp,
            };
            let outcome = sheets::helper::save_articles(&articles, &options).await;
            if !outcome.success {
                fail(outcome.error);
            }
            println!(
                "✅ Saved {} articles ({} cells, range {})",
                articles.len(),
                outcome.updated_cells.unwrap_or(0),
                outcome.updated_range.as_deref().unwrap_or("-")
            );
            if let Some(url) = outcome.sheet_url {
                println!("📊 {}", url);
            }
        }

        Command::Send {
            input,
            to,
            subject,
            time_window,
        } => {
            let articles = load_articles(&input);
            let options = DigestOptions {
                to,
                subject,
                time_window,
                sheet_url: sheets::helper::get_sheet_url(),
            };
            let outcome = gmail::client::send_news_email(&articles, options).await;
            if !outcome.success {
                fail(outcome.error);
            }
            println!(
                "✅ Digest sent ({} articles), message id {}",
                articles.len(),
                outcome.message_id.as_deref().unwrap_or("-")
            );
        }

        Command::Run {
            input,
            to,
            subject,
            time_window,
            header,
            no_timestamp,
        } => {
            let articles = load_articles(&input);

            let options = SaveOptions {
                add_header: header,
                add_timestamp: !no_timestamp,
            };
            let saved = sheets::helper::save_articles(&articles, &options).await;
            if !saved.success {
                fail(saved.error);
            }
            println!(
                "✅ Saved {} articles ({} cells)",
                articles.len(),
                saved.updated_cells.unwrap_or(0)
            );

            let options = DigestOptions {
                to,
                subject,
                time_window,
                sheet_url: saved.sheet_url,
            };
            let outcome = gmail::client::send_news_email(&articles, options).await;
            if !outcome.success {
                fail(outcome.error);
            }
            println!(
                "✅ Digest sent, message id {}",
                outcome.message_id.as_deref().unwrap_or("-")
            );
        }
    }
}

fn load_articles(path: &str) -> Vec<Article> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("❌ Cannot read {}: {}", path, e);
            std::process::exit(1);
        }
    };
    match serde_json::from_str(&content) {
        Ok(articles) => articles,
        Err(e) => {
            eprintln!("❌ {} is not a JSON array of articles: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn fail(error: Option<String>) -> ! {
    let message = error.unwrap_or_else(|| "unknown error".to_string());
    tracing::error!("❌ {}", message);
    eprintln!("❌ {}", message);
    std::process::exit(1);
}
