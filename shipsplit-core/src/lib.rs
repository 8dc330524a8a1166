pub mod upstream;

pub use upstream::{OrderSink, OrderSource};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Upstream returned {status}: {message}")]
    UpstreamError { status: u16, message: String },
    #[error("Upstream unreachable: {0}")]
    TransportError(String),
    #[error("Unexpected upstream response: {0}")]
    InvalidResponse(String),
}

impl CoreError {
    /// Errors worth surfacing to the webhook caller as a bad gateway rather than a bad request.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            CoreError::UpstreamError { .. } | CoreError::TransportError(_) | CoreError::InvalidResponse(_)
        )
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
