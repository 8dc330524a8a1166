pub mod report;
pub mod webhook;

pub use report::{BatchReport, FailureKind, OrderFailure, SplitSummary};
pub use webhook::ResourceNotification;
