//! JSON-RPC 2.0 wire types.
//!
//! - `RpcEnvelope`: request body `{jsonrpc, id, method, params}`
//! - `RpcResponse`: raw response body as decoded off the wire
//! - `RpcReply`: what the caller gets back, either a result or an application error

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcEnvelope {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Vec<Value>,
}

impl RpcEnvelope {
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self { jsonrpc: JSONRPC_VERSION.into(), id, method: method.into(), params }
    }
}

/// Request id source: monotonic counter seeded from wall-clock millis, so ids
/// stay distinct across restarts in practice.
#[derive(Debug)]
pub struct RequestIds {
    next: AtomicU64,
}

impl RequestIds {
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(1);
        Self::starting_at(seed)
    }

    pub fn starting_at(seed: u64) -> Self {
        Self { next: AtomicU64::new(seed) }
    }

    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for RequestIds {
    fn default() -> Self {
        Self::new()
    }
}

/// Error code as sent by the server: JSON-RPC uses integers, this backend
/// also sends string codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(i64),
    Text(String),
}

impl Default for ErrorCode {
    fn default() -> Self {
        ErrorCode::Number(0)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Number(n) => write!(f, "{}", n),
            ErrorCode::Text(s) => f.write_str(s),
        }
    }
}

/// Error object carried by a well-formed response. Returned as data, never raised
/// by the client itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Error)]
#[error("rpc error {code}: {message}")]
pub struct ApplicationError {
    #[serde(default)]
    pub code: ErrorCode,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApplicationError {
    /// Build from whatever the server put in `error`. Non-object payloads end
    /// up in `message`.
    pub fn from_value(v: Value) -> Self {
        match v {
            Value::Object(_) => serde_json::from_value::<ApplicationError>(v.clone()).unwrap_or_else(|_| {
                ApplicationError { message: v.to_string(), ..Default::default() }
            }),
            Value::String(message) => ApplicationError { message, ..Default::default() },
            other => ApplicationError { message: other.to_string(), ..Default::default() },
        }
    }
}

/// JSON-RPC 2.0 response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl RpcResponse {
    pub fn success(id: u64, result: Value) -> Self {
        Self { jsonrpc: Some(JSONRPC_VERSION.into()), id: Value::from(id), result: Some(result), error: None }
    }

    pub fn failure(id: u64, error: ApplicationError) -> Self {
        let error = serde_json::to_value(error).unwrap_or(Value::Null);
        Self { jsonrpc: Some(JSONRPC_VERSION.into()), id: Value::from(id), result: None, error: Some(error) }
    }

    /// A present, truthy `error` wins; otherwise the result (`null` if missing).
    pub fn into_reply(self) -> RpcReply {
        match self.error {
            Some(err) if is_truthy(&err) => RpcReply::Error(ApplicationError::from_value(err)),
            _ => RpcReply::Result(self.result.unwrap_or(Value::Null)),
        }
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Outcome of a completed call: never both a result and an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RpcReply {
    Result(Value),
    Error(ApplicationError),
}

impl RpcReply {
    pub fn is_error(&self) -> bool {
        matches!(self, RpcReply::Error(_))
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            RpcReply::Result(v) => Some(v),
            RpcReply::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ApplicationError> {
        match self {
            RpcReply::Error(e) => Some(e),
            RpcReply::Result(_) => None,
        }
    }

    pub fn into_result(self) -> Result<Value, ApplicationError> {
        match self {
            RpcReply::Result(v) => Ok(v),
            RpcReply::Error(e) => Err(e),
        }
    }

    /// Decode the result into `T`. An application error and a shape mismatch
    /// both come back as `Err`.
    pub fn decode<T: DeserializeOwned>(self) -> anyhow::Result<T> {
        let v = self.into_result()?;
        Ok(serde_json::from_value(v)?)
    }
}
