use std::time::Duration;
use thiserror::Error;

/// Errors raised by the RPC layer.
///
/// Application-level errors (a well-formed response carrying an `error`
/// object) are not represented here: they come back as data, see
/// [`crate::rpc::RpcReply::Error`].
#[derive(Error, Debug)]
pub enum RpcError {
    /// The endpoint answered with a non-success HTTP status.
    #[error("network response was not ok (status {status})")]
    Network { status: u16 },

    /// The cancellation signal bound to the request fired.
    #[error("request was cancelled")]
    Cancelled,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Any other failure underneath the orchestrator, propagated unchanged.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed rpc response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl RpcError {
    /// HTTP status carried by a `Network` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            RpcError::Network { status } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RpcError::Cancelled)
    }
}

/// Convenience alias
pub type Result<T> = std::result::Result<T, RpcError>;
