//! RPC module
//!
//! - JSON-RPC 2.0 over HTTP POST to a single endpoint
//! - `RpcClient`: cache, shared cancellation and per-site debounce in front of the transport
//! - method catalog (`get_trade`, `get_tokens`, ...) as thin fixed bindings on `RpcClient`
//!
//! To plug in another transport (tests, proxies), implement `Transport` and
//! pass it to `RpcClient::new()`.

pub mod envelope;
pub mod transport;
pub mod client;
pub mod methods;


pub use envelope::{ApplicationError, ErrorCode, RpcEnvelope, RpcReply, RpcResponse};
pub use transport::{HttpTransport, Transport};
pub use client::{ClientSettings, RpcClient, SendOptions};
pub use methods::{DepositWindow, OrderQuery, TokenPage};
