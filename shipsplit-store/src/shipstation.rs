//! ShipStation REST client: pulls order batches named by webhooks and
//! bulk-creates split orders.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use shipsplit_core::{CoreError, CoreResult, OrderSink, OrderSource};
use shipsplit_shared::Masked;
use tracing::{debug, error, warn};

use crate::app_config::ShipStationConfig;

const USER_AGENT: &str = concat!("shipsplit/", env!("CARGO_PKG_VERSION"));

/// Upstream error bodies are cut to this many characters before logging.
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, thiserror::Error)]
pub enum ShipStationError {
    #[error("Invalid ShipStation base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("ShipStation API key is not configured")]
    MissingApiKey,

    #[error("Invalid resource URL '{0}'")]
    InvalidResourceUrl(String),

    #[error("Resource URL '{0}' is not on the configured ShipStation host")]
    ForeignResourceUrl(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ShipStation returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("ShipStation response has no orders list")]
    MissingOrders,
}

impl From<ShipStationError> for CoreError {
    fn from(err: ShipStationError) -> Self {
        let message = err.to_string();
        match err {
            ShipStationError::InvalidBaseUrl(_)
            | ShipStationError::MissingApiKey
            | ShipStationError::InvalidResourceUrl(_)
            | ShipStationError::ForeignResourceUrl(_) => CoreError::ValidationError(message),
            ShipStationError::Http(e) if e.is_decode() => CoreError::InvalidResponse(e.to_string()),
            ShipStationError::Http(_) => CoreError::TransportError(message),
            ShipStationError::Status { status, body } => CoreError::UpstreamError { status, message: body },
            ShipStationError::MissingOrders => CoreError::InvalidResponse(message),
        }
    }
}

/// Upper bound on pages followed for one batch.
const MAX_PAGES: u32 = 100;

#[derive(Deserialize)]
struct OrdersPage {
    orders: Option<Vec<Value>>,
    #[serde(default)]
    pages: Option<u32>,
}

/// Same URL with its `page` query parameter set to `page`.
fn with_page(url: &Url, page: u32) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "page")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut next = url.clone();
    next.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("page", &page.to_string());
    next
}

/// NOTE: `api_key` is `Masked`, so deriving Debug here is safe.
#[derive(Debug, Clone)]
pub struct ShipStationClient {
    http: Client,
    base_url: Url,
    api_key: Masked<String>,
}

impl ShipStationClient {
    pub fn new(config: &ShipStationConfig) -> Result<Self, ShipStationError> {
        if config.api_key.expose().trim().is_empty() {
            return Err(ShipStationError::MissingApiKey);
        }

        let mut base_url = Url::parse(&config.base_url)
            .map_err(|_| ShipStationError::InvalidBaseUrl(config.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(ShipStationError::InvalidBaseUrl(config.base_url.clone()));
        }
        // Url::join drops the last path segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Only URLs under the configured base get our credentials attached.
    pub fn check_resource_url(&self, resource_url: &str) -> Result<Url, ShipStationError> {
        let url = Url::parse(resource_url)
            .map_err(|_| ShipStationError::InvalidResourceUrl(resource_url.to_string()))?;

        if url.origin() != self.base_url.origin() || !url.path().starts_with(self.base_url.path()) {
            return Err(ShipStationError::ForeignResourceUrl(resource_url.to_string()));
        }
        Ok(url)
    }

    /// Fetch every page of the batch at `resource_url`, in page order.
    pub async fn list_orders(&self, resource_url: &str) -> Result<Vec<Value>, ShipStationError> {
        let url = self.check_resource_url(resource_url)?;

        let first = self.get_page(&url).await?;
        let pages = first.pages.unwrap_or(1);
        let mut orders = first.orders.ok_or(ShipStationError::MissingOrders)?;

        if pages > MAX_PAGES {
            warn!("Batch {} reports {} pages, fetching the first {}", url, pages, MAX_PAGES);
        }

        for page in 2..=pages.min(MAX_PAGES) {
            let next = self.get_page(&with_page(&url, page)).await?;
            orders.extend(next.orders.ok_or(ShipStationError::MissingOrders)?);
        }

        Ok(orders)
    }

    async fn get_page(&self, url: &Url) -> Result<OrdersPage, ShipStationError> {
        debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .header(AUTHORIZATION, self.api_key.expose())
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        Ok(response.json().await?)
    }

    pub async fn submit_orders(&self, orders: &[Value]) -> Result<Value, ShipStationError> {
        let url = self
            .base_url
            .join("orders/createorders")
            .map_err(|_| ShipStationError::InvalidBaseUrl(self.base_url.to_string()))?;
        debug!("POST {} ({} order(s))", url, orders.len());

        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.api_key.expose())
            .json(orders)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        Ok(response.json().await?)
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ShipStationError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        error!("ShipStation request failed with {}: {}", status, body);
        Err(ShipStationError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl OrderSource for ShipStationClient {
    async fn fetch_orders(&self, resource_url: &str) -> CoreResult<Vec<Value>> {
        Ok(self.list_orders(resource_url).await?)
    }
}

#[async_trait]
impl OrderSink for ShipStationClient {
    async fn create_orders(&self, orders: Vec<Value>) -> CoreResult<Value> {
        Ok(self.submit_orders(&orders).await?)
    }
}
