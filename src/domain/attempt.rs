use std::fmt;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptId(pub u64);

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One snapshot-and-dispatch cycle. `text` is a copy of the draft at submit time.
#[derive(Debug, Clone)]
pub struct ScanAttempt {
    pub id: AttemptId,
    pub text: String,
    pub submitted_at: DateTime<Utc>,
}
