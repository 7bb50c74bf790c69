pub mod attempt;
pub mod types;

pub use attempt::{AttemptId, ScanAttempt};
pub use types::{Label, ScanResult};
