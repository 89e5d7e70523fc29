//! Response cache for cacheable RPC calls.
//!
//! - `CacheKey`: deterministic key from method + canonical params
//! - `CacheStore`: concurrent key -> (value, stored_at, ttl) map
//! - `spawn_sweeper`: fixed-cadence background sweep, stopped via the shutdown channel

pub mod key;
pub mod store;
pub mod sweeper;

pub use key::CacheKey;
pub use store::{CacheStore, DEFAULT_TTL};
pub use sweeper::{spawn_sweeper, SweepConfig, SWEEP_INTERVAL};
