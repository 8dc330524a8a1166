use std::sync::Arc;

use serde_json::Value;
use shipsplit_core::{CoreError, CoreResult, OrderSink, OrderSource};
use shipsplit_shared::models::{BatchReport, FailureKind, OrderFailure, SplitSummary};
use tracing::{info, warn};

use crate::classifier::{Classifier, SourceMix};
use crate::models::{order_number_hint, Order};
use crate::rules::SplitRules;
use crate::splitter::{SplitError, Splitter};

/// Everything a webhook caller gets back for one notification
#[derive(Debug, Clone)]
pub struct NotificationOutcome {
    /// The batch exactly as fetched from upstream
    pub orders: Vec<Value>,
    pub report: BatchReport,
}

enum Processed {
    Forwarded(SourceMix),
    Split(SplitSummary),
}

#[derive(Debug, thiserror::Error)]
enum ProcessError {
    #[error(transparent)]
    Split(#[from] SplitError),
    #[error(transparent)]
    Upstream(#[from] CoreError),
}

impl ProcessError {
    fn kind(&self) -> FailureKind {
        match self {
            ProcessError::Split(SplitError::PreconditionViolation { .. }) => FailureKind::PreconditionViolation,
            ProcessError::Split(_) => FailureKind::MalformedOrder,
            ProcessError::Upstream(_) => FailureKind::Upstream,
        }
    }
}

/// Drives classification and splitting over fetched batches and hands
/// derived orders to the sink.
pub struct SplitOrchestrator {
    source: Arc<dyn OrderSource>,
    sink: Arc<dyn OrderSink>,
    rules: SplitRules,
}

impl SplitOrchestrator {
    pub fn new(source: Arc<dyn OrderSource>, sink: Arc<dyn OrderSink>, rules: SplitRules) -> Self {
        Self { source, sink, rules }
    }

    pub fn rules(&self) -> &SplitRules {
        &self.rules
    }

    /// Fetch the batch a notification points at, then process it.
    ///
    /// A failed fetch fails the whole notification; failures after that are per order.
    pub async fn handle_notification(&self, resource_url: &str) -> CoreResult<NotificationOutcome> {
        let orders = self.source.fetch_orders(resource_url).await?;
        info!("Fetched {} order(s) from {}", orders.len(), resource_url);

        let report = self.process_batch(&orders).await;
        Ok(NotificationOutcome { orders, report })
    }

    /// Process every order independently. One bad order never stops the rest.
    pub async fn process_batch(&self, orders: &[Value]) -> BatchReport {
        let mut report = BatchReport::new(orders.len());

        for (index, raw) in orders.iter().enumerate() {
            match self.process_one(raw).await {
                Ok(Processed::Forwarded(mix)) => {
                    report.forwarded += 1;
                    tracing::debug!("Order {:?} left as-is ({:?})", order_number_hint(raw), mix);
                }
                Ok(Processed::Split(summary)) => {
                    report.split.push(summary);
                }
                Err(e) => {
                    let order_number = order_number_hint(raw);
                    warn!(
                        batch_id = %report.batch_id,
                        index,
                        order_number = order_number.as_deref().unwrap_or("<unknown>"),
                        "Skipping order: {}", e
                    );
                    report.failures.push(OrderFailure {
                        index,
                        order_number,
                        kind: e.kind(),
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            batch_id = %report.batch_id,
            analyzed = report.analyzed,
            forwarded = report.forwarded,
            split = report.split.len(),
            failed = report.failures.len(),
            "Batch processed"
        );
        report
    }

    async fn process_one(&self, raw: &Value) -> Result<Processed, ProcessError> {
        let order = Order::from_value(raw.clone())?;

        let mix = Classifier::classify(&order, &self.rules);
        if mix != SourceMix::Mixed {
            return Ok(Processed::Forwarded(mix));
        }

        let pair = Splitter::split(&order, &self.rules)?;
        let summary = SplitSummary {
            source_order_number: order.order_number.clone(),
            primary_order_number: pair.primary.order_number.clone(),
            secondary_order_number: pair.secondary.order_number.clone(),
            primary_items: pair.primary.items.len(),
            secondary_items: pair.secondary.items.len(),
        };

        let payload = pair
            .into_vec()
            .iter()
            .map(Order::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        self.sink.create_orders(payload).await?;

        info!(
            "Split order {} into {} ({} item(s)) and {} ({} item(s))",
            summary.source_order_number,
            summary.primary_order_number,
            summary.primary_items,
            summary.secondary_order_number,
            summary.secondary_items
        );
        Ok(Processed::Split(summary))
    }
}
