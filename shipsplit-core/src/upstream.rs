use async_trait::async_trait;
use serde_json::Value;

use crate::CoreResult;

/// Resolves a webhook notification into the batch of orders it refers to.
///
/// Orders are returned as raw upstream records so that one malformed order
/// cannot spoil decoding of the whole batch.
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn fetch_orders(&self, resource_url: &str) -> CoreResult<Vec<Value>>;
}

/// Persists derived orders upstream as new orders.
#[async_trait]
pub trait OrderSink: Send + Sync {
    /// Submit orders in a single bulk-create call, preserving their order.
    async fn create_orders(&self, orders: Vec<Value>) -> CoreResult<Value>;
}
