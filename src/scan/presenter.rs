//! Turns scan state into what the user sees. No I/O here.

use crate::domain::{Label, ScanResult};

use super::{controller::ScanOutcome, staging::InputStaging};

pub const SPAM_EXPLANATION: &str =
    "This message shows strong patterns associated with spam, phishing, or unsolicited marketing.";
pub const HAM_EXPLANATION: &str =
    "This message appears safe and does not exhibit common spam characteristics.";

pub const SUBMIT_CAPTION: &str = "Analyze Text";
pub const BUSY_CAPTION: &str = "Analyzing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Alert,
    Check,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitAffordance {
    pub enabled: bool,
    pub busy: bool,
    pub caption: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerdictView {
    pub badge: String,
    pub polarity: Polarity,
    /// Filled share of the meter, in percent.
    pub meter_percent: f64,
    pub confidence_text: String,
    pub explanation: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Empty,
    Verdict(VerdictView),
    Error { message: String, polarity: Polarity },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub submit: SubmitAffordance,
    pub result: ResultView,
}

pub fn present(state: &ScanOutcome, staging: &InputStaging) -> RenderPlan {
    RenderPlan {
        submit: submit_affordance(state, staging),
        result: result_view(state),
    }
}

pub fn submit_affordance(state: &ScanOutcome, staging: &InputStaging) -> SubmitAffordance {
    let busy = state.is_pending();
    SubmitAffordance {
        enabled: staging.can_submit(state),
        busy,
        caption: if busy { BUSY_CAPTION } else { SUBMIT_CAPTION },
    }
}

pub fn result_view(state: &ScanOutcome) -> ResultView {
    match state {
        ScanOutcome::Idle | ScanOutcome::Pending(_) => ResultView::Empty,
        ScanOutcome::Succeeded(result) => ResultView::Verdict(verdict_view(result)),
        ScanOutcome::Failed(message) => ResultView::Error {
            message: message.clone(),
            polarity: Polarity::Alert,
        },
    }
}

pub fn verdict_view(result: &ScanResult) -> VerdictView {
    let spam = result.label.is_spam();
    VerdictView {
        badge: result.label.as_str().to_uppercase(),
        polarity: if spam { Polarity::Alert } else { Polarity::Check },
        meter_percent: result.confidence,
        confidence_text: format_confidence(result.confidence),
        explanation: explanation(result.label),
    }
}

pub fn explanation(label: Label) -> &'static str {
    match label {
        Label::Spam => SPAM_EXPLANATION,
        Label::Ham => HAM_EXPLANATION,
    }
}

/// The service's number as-is plus a percent sign: `87` -> `87%`, `87.53` -> `87.53%`.
pub fn format_confidence(confidence: f64) -> String {
    format!("{confidence}%")
}
