//! Client layer for the bonding-curve token launchpad's JSON-RPC endpoint.
//!
//! - `rpc`: `RpcClient::send` / `call` plus the fixed method bindings
//! - `cache`: TTL response cache and its background sweep
//! - `control`: shared cancellation and per-call-site debounce
//! - `curve`, `market`: pure helpers for the numbers the endpoint returns
//! - `app`: config, chain presets and the CLI

pub mod app;
pub mod cache;
pub mod control;
pub mod curve;
pub mod market;
pub mod rpc;
pub mod utils;

#[cfg(test)]
mod tests;

pub use control::{CallSite, CancelSignal};
pub use rpc::{RpcClient, RpcReply, SendOptions};
pub use utils::{Result, RpcError};
