use crate::utils::error::Result;
use crate::utils::validation::{validate_email, validate_path, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "news-relay")]
#[command(about = "Relay article records to Google Sheets and a Gmail digest")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 在第一個工作表頂端建表頭（跑一次就好）
    InitHeader,

    /// 把 JSON 檔裡的文章追加到表格
    Save {
        #[arg(long, help = "Path to a JSON array of article records")]
        input: String,

        #[arg(long, help = "Also write a header row above this batch")]
        header: bool,

        #[arg(long, help = "Skip the batch timestamp separator row")]
        no_timestamp: bool,
    },

    /// 寄新聞匯總郵件
    Send {
        #[arg(long, help = "Path to a JSON array of article records")]
        input: String,

        #[arg(long, help = "Recipient address (defaults to GMAIL_TO)")]
        to: Option<String>,

        #[arg(long, help = "Subject line (defaults to an auto-generated one)")]
        subject: Option<String>,

        #[arg(long, help = "Time window description shown in the digest")]
        time_window: Option<String>,
    },

    /// 先存表格再寄郵件
    Run {
        #[arg(long, help = "Path to a JSON array of article records")]
        input: String,

        #[arg(long, help = "Recipient address (defaults to GMAIL_TO)")]
        to: Option<String>,

        #[arg(long, help = "Subject line (defaults to an auto-generated one)")]
        subject: Option<String>,

        #[arg(long, help = "Time window description shown in the digest")]
        time_window: Option<String>,

        #[arg(long, help = "Also write a header row above this batch")]
        header: bool,

        #[arg(long, help = "Skip the batch timestamp separator row")]
        no_timestamp: bool,
    },
}

impl Validate for Cli {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Command::InitHeader => Ok(()),
            Command::Save { input, .. } => validate_path("input", input),
            Command::Send { input, to, .. } | Command::Run { input, to, .. } => {
                validate_path("input", input)?;
                if let Some(to) = to {
                    validate_email("to", to)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_save_flags() {
        let cli = Cli::parse_from([
            "news-relay",
            "save",
            "--input",
            "articles.json",
            "--header",
            "--no-timestamp",
        ]);
        match cli.command {
            Command::Save {
                input,
                header,
                no_timestamp,
            } => {
                assert_eq!(input, "articles.json");
                assert!(header);
                assert!(no_timestamp);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_bad_recipient() {
        let cli = Cli::parse_from([
            "news-relay",
            "send",
            "--input",
            "articles.json",
            "--to",
            "not-an-email",
        ]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_cli_accepts_run_without_optional_flags() {
        let cli = Cli::parse_from(["news-relay", "run", "--input", "articles.json"]);
        assert!(cli.validate().is_ok());
    }
}
