pub mod controller;
pub mod presenter;
pub mod staging;

pub use controller::{ScanController, ScanOutcome, GENERIC_FAILURE};
pub use presenter::{present, Polarity, RenderPlan, ResultView, SubmitAffordance, VerdictView};
pub use staging::{is_blank, InputStaging};
