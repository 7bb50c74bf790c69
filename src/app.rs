use std::{
    io::{self, Read},
    process::ExitCode,
    sync::Arc,
};

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};

use crate::{
    classifier::{ClassifierClient, ClassifyError},
    cli::Commands,
    config::AppConfig,
    domain::Label,
    infrastructure::shutdown::Shutdown,
    scan::{is_blank, present, InputStaging, ScanController, ScanOutcome, GENERIC_FAILURE},
    ui::{spawn_stdin_reader, terminal::write_plan, InteractiveSession},
};

/// Sample posted by `check`; it should come back as spam from a healthy service.
pub const CHECK_SAMPLE: &str = "Congratulations! You have won a free lottery ticket.";

const EXIT_FAILED: u8 = 1;
const EXIT_NOTHING_TO_SEND: u8 = 2;
const EXIT_INTERRUPTED: u8 = 130;

pub struct ScannerApp {
    config: Arc<AppConfig>,
    client: Arc<ClassifierClient>,
    shutdown: Shutdown,
}

impl ScannerApp {
    pub fn initialize(config: AppConfig, shutdown: Shutdown) -> Result<Self> {
        let config = Arc::new(config);
        let http_client = Client::builder()
            .user_agent(format!("inbox-shield/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        let client = Arc::new(ClassifierClient::new(
            http_client,
            config.classifier.clone(),
        ));

        Ok(Self {
            config,
            client,
            shutdown,
        })
    }

    pub async fn run(self, command: Option<Commands>) -> Result<ExitCode> {
        tracing::info!(
            api = %self.config.classifier.base_url,
            timeout_ms = self.config.classifier.request_timeout.map(|t| t.as_millis() as u64),
            "inbox shield starting"
        );

        match command {
            None => self.interactive().await,
            Some(Commands::Scan { text }) => self.scan_once(text).await,
            Some(Commands::Report { label, text }) => self.report(label, text).await,
            Some(Commands::Check) => self.check().await,
            Some(Commands::Status) => self.status().await,
        }
    }

    async fn interactive(&self) -> Result<ExitCode> {
        let session = InteractiveSession::new(self.client.clone(), io::stdout());
        spawn_stdin_reader(session.sender());
        session.run(self.shutdown.subscribe("session")).await?;
        Ok(ExitCode::SUCCESS)
    }

    async fn scan_once(&self, words: Vec<String>) -> Result<ExitCode> {
        let mut staging = InputStaging::new();
        staging.set_text(text_or_stdin(words)?);

        let mut controller = ScanController::new();
        let mut shutdown = self.shutdown.subscribe("scan");
        let scanned = tokio::select! {
            state = controller.scan(&staging, self.client.as_ref()) => Some(state.is_some()),
            _ = shutdown.notified() => None,
        };
        let Some(scanned) = scanned else {
            controller.cancel();
            return Ok(ExitCode::from(EXIT_INTERRUPTED));
        };
        if !scanned {
            eprintln!("Nothing to scan: the text is empty.");
            return Ok(ExitCode::from(EXIT_NOTHING_TO_SEND));
        }

        let mut stdout = io::stdout().lock();
        write_plan(&mut stdout, &present(controller.state(), &staging))?;

        Ok(match controller.state() {
            ScanOutcome::Succeeded(_) => ExitCode::SUCCESS,
            _ => ExitCode::from(EXIT_FAILED),
        })
    }

    async fn report(&self, label: Label, words: Vec<String>) -> Result<ExitCode> {
        let text = text_or_stdin(words)?;
        if is_blank(&text) {
            eprintln!("Nothing to report: the text is empty.");
            return Ok(ExitCode::from(EXIT_NOTHING_TO_SEND));
        }

        match self.client.report(&text, label).await {
            Ok(message) => {
                println!("{message}");
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                tracing::warn!(kind = err.kind(), error = %err, "report failed");
                println!("[!] {GENERIC_FAILURE}");
                Ok(ExitCode::from(EXIT_FAILED))
            }
        }
    }

    /// Unlike a scan, this shows the underlying cause of a failure.
    async fn check(&self) -> Result<ExitCode> {
        let answer = self.client.predict_raw(CHECK_SAMPLE).await;
        if let Err(err) = &answer {
            tracing::warn!(kind = err.kind(), error = %err, "connectivity check failed");
        }
        let (lines, reachable) = check_lines(&answer);
        for line in lines {
            println!("{line}");
        }
        Ok(if reachable {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(EXIT_FAILED)
        })
    }

    async fn status(&self) -> Result<ExitCode> {
        match self.client.status().await {
            Ok(message) => {
                println!("{message}");
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                println!("Service unavailable at {} ({err})", self.client.base_url());
                Ok(ExitCode::from(EXIT_FAILED))
            }
        }
    }
}

/// Lines printed by `check`, and whether the service answered with a 2xx.
/// A successful body is echoed verbatim, whatever its shape.
pub fn check_lines(answer: &Result<(StatusCode, String), ClassifyError>) -> (Vec<String>, bool) {
    match answer {
        Ok((status, body)) if status.is_success() => (
            vec![
                "Backend Connection: SUCCESS".to_string(),
                format!("Response: {body}"),
            ],
            true,
        ),
        Ok((status, _)) => (
            vec![format!(
                "Backend Connection: FAILED (Status {})",
                status.as_u16()
            )],
            false,
        ),
        Err(err) => (vec![format!("Backend Connection: FAILED ({err})")], false),
    }
}

fn text_or_stdin(words: Vec<String>) -> Result<String> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("failed to read text from stdin")?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_echoes_any_success_body() {
        let (lines, reachable) = check_lines(&Ok((StatusCode::OK, r#"{"foo":1}"#.to_string())));
        assert!(reachable);
        assert_eq!(
            lines,
            ["Backend Connection: SUCCESS", r#"Response: {"foo":1}"#]
        );

        let (lines, reachable) = check_lines(&Ok((StatusCode::CREATED, String::new())));
        assert!(reachable);
        assert_eq!(lines[1], "Response: ");
    }

    #[test]
    fn check_failure_shows_status_code() {
        let (lines, reachable) = check_lines(&Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            "boom".to_string(),
        )));
        assert!(!reachable);
        assert_eq!(lines, ["Backend Connection: FAILED (Status 500)"]);

        let (lines, reachable) = check_lines(&Err(ClassifyError::Timeout));
        assert!(!reachable);
        assert_eq!(lines, ["Backend Connection: FAILED (request timed out)"]);
    }

    #[test]
    fn words_are_joined_with_spaces() {
        let text = text_or_stdin(vec!["WIN".into(), "FREE".into(), "MONEY".into()]).unwrap();
        assert_eq!(text, "WIN FREE MONEY");
    }
}
