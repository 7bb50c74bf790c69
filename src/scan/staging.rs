use super::controller::ScanOutcome;

/// True when `text` holds nothing but whitespace. A byte-order mark left over
/// from a pasted or piped file counts as whitespace too.
pub fn is_blank(text: &str) -> bool {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .is_empty()
}

/// Owns the draft text the user is editing.
///
/// The draft is never cleared by a scan, so a failed or finished attempt can be
/// resubmitted as-is or after a small edit.
#[derive(Debug, Default, Clone)]
pub struct InputStaging {
    draft: String,
}

impl InputStaging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Appends a typed line, newline-separated from what is already there.
    pub fn append_line(&mut self, line: &str) {
        let next = if self.draft.is_empty() {
            line.to_string()
        } else {
            format!("{}\n{}", self.draft, line)
        };
        self.set_text(next);
    }

    pub fn clear(&mut self) {
        self.set_text(String::new());
    }

    pub fn text(&self) -> &str {
        &self.draft
    }

    pub fn has_content(&self) -> bool {
        !is_blank(&self.draft)
    }

    pub fn can_submit(&self, state: &ScanOutcome) -> bool {
        self.has_content() && !state.is_pending()
    }
}
