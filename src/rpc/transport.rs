use crate::rpc::envelope::{RpcEnvelope, RpcResponse};
use crate::utils::errors::{Result, RpcError, TransportError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::warn;

/// Carries one envelope to the endpoint and brings back the decoded response.
/// Timeout and cancellation are applied by the caller around this future;
/// dropping it must abort the request.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn post(&self, envelope: &RpcEnvelope) -> Result<RpcResponse>;
}

/// JSON-RPC over HTTP POST to a single endpoint.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().build().map_err(TransportError::Http)?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into() }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, envelope: &RpcEnvelope) -> Result<RpcResponse> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(envelope)
            .send()
            .await
            .map_err(TransportError::Http)?;

        let status = resp.status();
        if !status.is_success() {
            warn!(method = %envelope.method, status = status.as_u16(), "rpc endpoint returned non-success status");
            return Err(RpcError::Network { status: status.as_u16() });
        }

        let body = resp.bytes().await.map_err(TransportError::Http)?;
        let decoded = serde_json::from_slice::<RpcResponse>(&body).map_err(TransportError::Decode)?;
        Ok(decoded)
    }
}
