// Command-line parsing. Everything here only adjusts configuration and picks
// what `ScannerApp::run` does; no network work happens in this module.

use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::{
    config::{parse_base_url, AppConfig, ConfigError},
    domain::Label,
};

/// Inbox Shield - check messages for spam against a classification service
#[derive(Parser, Debug)]
#[command(name = "inbox-shield")]
#[command(version)]
#[command(about = "Check messages for spam against an Inbox Shield classification service", long_about = None)]
pub struct Cli {
    /// Classification service base address (overrides API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in milliseconds, 0 for none (overrides SCAN_TIMEOUT_MS)
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Scan TEXT once and print the verdict (reads stdin when TEXT is omitted)
    Scan {
        text: Vec<String>,
    },
    /// Tell the service how TEXT should have been classified
    Report {
        #[arg(long, value_parser = parse_label)]
        label: Label,
        text: Vec<String>,
    },
    /// Send a sample message and print exactly what came back
    Check,
    /// Ask the service whether it is up
    Status,
}

impl Cli {
    pub fn apply_overrides(&self, config: &mut AppConfig) -> Result<(), ConfigError> {
        if let Some(raw) = &self.api_url {
            config.classifier.base_url = parse_base_url(raw)?;
        }
        if let Some(millis) = self.timeout_ms {
            config.classifier.request_timeout = (millis > 0).then(|| Duration::from_millis(millis));
        }
        Ok(())
    }
}

fn parse_label(raw: &str) -> Result<Label, String> {
    Label::parse(raw).ok_or_else(|| format!("expected `spam` or `ham`, got `{raw}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig::from_lookup(|_| None).unwrap()
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["inbox-shield"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn scan_collects_words() {
        let cli = Cli::try_parse_from(["inbox-shield", "scan", "WIN", "FREE", "MONEY"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Scan {
                text: vec!["WIN".into(), "FREE".into(), "MONEY".into()]
            })
        );
    }

    #[test]
    fn report_validates_label() {
        let cli =
            Cli::try_parse_from(["inbox-shield", "report", "--label", "Ham", "see you"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Report {
                label: Label::Ham,
                text: vec!["see you".into()]
            })
        );

        assert!(Cli::try_parse_from(["inbox-shield", "report", "--label", "eggs", "x"]).is_err());
    }

    #[test]
    fn overrides_replace_env_values() {
        let cli = Cli::try_parse_from([
            "inbox-shield",
            "check",
            "--api-url",
            "https://shield.example.com",
            "--timeout-ms",
            "0",
        ])
        .unwrap();
        let mut config = base_config();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!(
            config.classifier.base_url.as_str(),
            "https://shield.example.com/"
        );
        assert_eq!(config.classifier.request_timeout, None);
    }

    #[test]
    fn bad_api_url_override_is_rejected() {
        let cli = Cli::try_parse_from(["inbox-shield", "--api-url", "localhost"]).unwrap();
        let mut config = base_config();
        assert!(cli.apply_overrides(&mut config).is_err());
    }
}
