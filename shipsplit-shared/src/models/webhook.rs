use serde::{Deserialize, Serialize};

/// Resource type ShipStation sends when new orders are available.
pub const ORDER_NOTIFY: &str = "ORDER_NOTIFY";

/// Body of a ShipStation webhook POST.
///
/// The notification carries no order data itself, only a URL to pull the batch from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceNotification {
    pub resource_url: String,
    #[serde(default)]
    pub resource_type: Option<String>,
}

impl ResourceNotification {
    pub fn is_order_notify(&self) -> bool {
        self.resource_type.as_deref().map_or(true, |t| t == ORDER_NOTIFY)
    }
}
