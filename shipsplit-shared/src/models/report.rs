use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why a single order in a batch could not be processed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MalformedOrder,
    PreconditionViolation,
    Upstream,
}

/// One order that was skipped because of an error
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderFailure {
    /// Position of the order in the fetched batch
    pub index: usize,
    /// Missing when the order was too malformed to read its number
    pub order_number: Option<String>,
    pub kind: FailureKind,
    pub message: String,
}

/// One order that was split and submitted upstream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SplitSummary {
    pub source_order_number: String,
    pub primary_order_number: String,
    pub secondary_order_number: String,
    pub primary_items: usize,
    pub secondary_items: usize,
}

/// Outcome of processing one fetched batch of orders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub received_at: DateTime<Utc>,
    pub analyzed: usize,
    /// Orders that needed no split and were left untouched
    pub forwarded: usize,
    pub split: Vec<SplitSummary>,
    pub failures: Vec<OrderFailure>,
}

impl BatchReport {
    pub fn new(analyzed: usize) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            received_at: Utc::now(),
            analyzed,
            forwarded: 0,
            split: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
