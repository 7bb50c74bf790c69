use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Spam,
    Ham,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Spam => "spam",
            Label::Ham => "ham",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "spam" => Some(Label::Spam),
            "ham" => Some(Label::Ham),
            _ => None,
        }
    }

    pub fn is_spam(&self) -> bool {
        matches!(self, Label::Spam)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verdict accepted from the classification service.
///
/// `confidence` is a percentage in `[0, 100]`, kept exactly as the service sent it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanResult {
    pub label: Label,
    pub confidence: f64,
}

impl ScanResult {
    /// Returns `None` when the confidence is not a finite percentage.
    pub fn new(label: Label, confidence: f64) -> Option<Self> {
        if confidence.is_finite() && (0.0..=100.0).contains(&confidence) {
            Some(Self { label, confidence })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_parse_is_case_insensitive() {
        assert_eq!(Label::parse("SPAM"), Some(Label::Spam));
        assert_eq!(Label::parse(" ham "), Some(Label::Ham));
        assert_eq!(Label::parse("eggs"), None);
    }

    #[test]
    fn confidence_must_be_a_percentage() {
        assert!(ScanResult::new(Label::Spam, 0.0).is_some());
        assert!(ScanResult::new(Label::Spam, 100.0).is_some());
        assert!(ScanResult::new(Label::Ham, 87.53).is_some());
        assert!(ScanResult::new(Label::Ham, -1.0).is_none());
        assert!(ScanResult::new(Label::Ham, 100.01).is_none());
        assert!(ScanResult::new(Label::Ham, f64::NAN).is_none());
    }
}
