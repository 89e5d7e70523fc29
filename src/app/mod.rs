//! Application layer: configuration, chain presets, background task
//! lifecycle and the `launchpad-rpc` command line.

pub mod chains;
pub mod cli;
pub mod config;
pub mod service_handle;

pub use chains::Chain;
pub use cli::run_cli;
pub use config::ClientConfig;
pub use service_handle::ServiceHandle;
