mod client;
pub mod contract;

use futures::future::BoxFuture;
use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::{Label, ScanResult};

pub use client::ClassifierClient;

/// The remote classification service as seen by the scan workflow.
pub trait Classifier: Send + Sync {
    fn classify<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<ScanResult, ClassifyError>>;

    /// Feedback on a verdict the user believes is wrong. Returns the service's acknowledgement.
    fn report<'a>(
        &'a self,
        text: &'a str,
        label: Label,
    ) -> BoxFuture<'a, Result<String, ClassifyError>>;

    /// Liveness message from the service root.
    fn status(&self) -> BoxFuture<'_, Result<String, ClassifyError>>;
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("request timed out")]
    Timeout,
    #[error("could not reach classification service: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("classification service answered {0}")]
    Status(StatusCode),
    #[error("unexpected response body: {0}")]
    Malformed(String),
    #[error("invalid service endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

impl ClassifyError {
    /// Short tag for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifyError::Timeout => "timeout",
            ClassifyError::Transport(err) if err.is_connect() => "connect",
            ClassifyError::Transport(_) => "transport",
            ClassifyError::Status(_) => "status",
            ClassifyError::Malformed(_) => "malformed",
            ClassifyError::Endpoint(_) => "endpoint",
        }
    }
}

impl From<reqwest::Error> for ClassifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClassifyError::Timeout
        } else if let Some(status) = err.status() {
            ClassifyError::Status(status)
        } else if err.is_decode() {
            ClassifyError::Malformed(err.to_string())
        } else {
            ClassifyError::Transport(err)
        }
    }
}

impl From<serde_json::Error> for ClassifyError {
    fn from(err: serde_json::Error) -> Self {
        ClassifyError::Malformed(err.to_string())
    }
}
