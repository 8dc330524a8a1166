use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use serde_json::Value;
use shipsplit_shared::models::{BatchReport, ResourceNotification};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub message: String,
    pub data: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<BatchReport>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/webhooks/shipstation", post(handle_shipstation_webhook))
}

/// POST /webhooks/shipstation
/// Pull the new orders a ShipStation notification points at and split the mixed ones
pub async fn handle_shipstation_webhook(
    State(state): State<AppState>,
    Json(payload): Json<ResourceNotification>,
) -> Result<Json<WebhookResponse>, AppError> {
    if payload.resource_url.trim().is_empty() {
        return Err(AppError::BadRequest("resource_url is required".to_string()));
    }

    if !payload.is_order_notify() {
        let resource_type = payload.resource_type.unwrap_or_default();
        tracing::info!("Ignoring {} notification", resource_type);
        return Ok(Json(WebhookResponse {
            message: format!("Ignored {} notification.", resource_type),
            data: Vec::new(),
            report: None,
        }));
    }

    tracing::info!("Received order notification for {}", payload.resource_url);

    let outcome = state.orchestrator.handle_notification(&payload.resource_url).await?;

    Ok(Json(WebhookResponse {
        message: format!("Analyzed {} new order(s).", outcome.orders.len()),
        data: outcome.orders,
        report: Some(outcome.report),
    }))
}
