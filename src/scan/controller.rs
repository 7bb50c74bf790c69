use chrono::Utc;

use crate::{
    classifier::{Classifier, ClassifyError},
    domain::{AttemptId, ScanAttempt, ScanResult},
};

use super::staging::InputStaging;

/// Shown for every failed scan, whatever went wrong underneath.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please check your connection.";

#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    Idle,
    Pending(AttemptId),
    Succeeded(ScanResult),
    Failed(String),
}

impl ScanOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, ScanOutcome::Pending(_))
    }
}

/// Drives one scan attempt at a time: `Idle -> Pending -> Succeeded | Failed`.
#[derive(Debug)]
pub struct ScanController {
    state: ScanOutcome,
    last_attempt: u64,
}

impl Default for ScanController {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanController {
    pub fn new() -> Self {
        Self {
            state: ScanOutcome::Idle,
            last_attempt: 0,
        }
    }

    pub fn state(&self) -> &ScanOutcome {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// Enters `Pending` and snapshots the draft. Returns `None` (and changes nothing)
    /// when the draft is blank or an attempt is already in flight.
    pub fn submit(&mut self, staging: &InputStaging) -> Option<ScanAttempt> {
        if !staging.can_submit(&self.state) {
            tracing::debug!(
                target: "scan",
                pending = self.is_pending(),
                "submit ignored"
            );
            return None;
        }

        self.last_attempt += 1;
        let attempt = ScanAttempt {
            id: AttemptId(self.last_attempt),
            text: staging.text().to_string(),
            submitted_at: Utc::now(),
        };
        self.state = ScanOutcome::Pending(attempt.id);
        tracing::info!(
            target: "scan",
            attempt = %attempt.id,
            chars = attempt.text.chars().count(),
            "scan dispatched"
        );
        Some(attempt)
    }

    /// Applies the outcome of `attempt`. Outcomes for anything but the pending
    /// attempt are dropped and `false` is returned.
    pub fn resolve(
        &mut self,
        attempt: AttemptId,
        outcome: Result<ScanResult, ClassifyError>,
    ) -> bool {
        if self.state != ScanOutcome::Pending(attempt) {
            tracing::debug!(target: "scan", attempt = %attempt, "stale resolution dropped");
            return false;
        }

        self.state = match outcome {
            Ok(result) => {
                tracing::info!(
                    target: "scan",
                    attempt = %attempt,
                    label = %result.label,
                    confidence = result.confidence,
                    "scan succeeded"
                );
                ScanOutcome::Succeeded(result)
            }
            Err(err) => {
                tracing::warn!(
                    target: "scan",
                    attempt = %attempt,
                    kind = err.kind(),
                    error = %err,
                    "scan failed"
                );
                ScanOutcome::Failed(GENERIC_FAILURE.to_string())
            }
        };
        true
    }

    /// Abandons the pending attempt. Its outcome, if it ever arrives, is ignored.
    pub fn cancel(&mut self) -> bool {
        let ScanOutcome::Pending(attempt) = self.state else {
            return false;
        };
        tracing::info!(target: "scan", attempt = %attempt, "scan cancelled");
        self.state = ScanOutcome::Failed(GENERIC_FAILURE.to_string());
        true
    }

    /// Submit, classify and resolve in one go. `None` when the submit was not eligible.
    pub async fn scan(
        &mut self,
        staging: &InputStaging,
        classifier: &dyn Classifier,
    ) -> Option<&ScanOutcome> {
        let attempt = self.submit(staging)?;
        let outcome = classifier.classify(&attempt.text).await;
        log_latency(&attempt);
        self.resolve(attempt.id, outcome);
        Some(&self.state)
    }
}

pub(crate) fn log_latency(attempt: &ScanAttempt) {
    let elapsed = Utc::now() - attempt.submitted_at;
    tracing::debug!(
        target: "scan",
        attempt = %attempt.id,
        elapsed_ms = elapsed.num_milliseconds(),
        "round trip finished"
    );
}
