pub mod config;
pub mod confirm;
pub mod engine;
pub mod error;
pub mod models;
pub mod progress;
pub mod reconcile;
pub mod report;
pub mod scanner;

pub use config::SweepConfig;
pub use confirm::Confirm;
pub use engine::{ScanResult, SweepEngine};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
pub use reconcile::{ReconcileOutcome, ReconcileSummary};
