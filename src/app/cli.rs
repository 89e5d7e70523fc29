use crate::app::chains::CHAINS;
use crate::app::{ClientConfig, ServiceHandle};
use crate::curve::{
    decode_sqrt_price_x96, format_magnitude, price_from_reserve, round_to, supply_from_reserve, DISPLAY_DECIMALS,
};
use crate::market::MarketFeeds;
use crate::rpc::{RpcClient, SendOptions, TokenPage};
use crate::utils::init_logging;
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// CLI for the launchpad RPC endpoint.
#[derive(Parser, Debug)]
#[clap(name = "launchpad-rpc", version)]
pub struct Cli {
    /// Path to a TOML config file
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// RPC endpoint URL (overrides config and chain preset)
    #[clap(long)]
    pub endpoint: Option<String>,

    /// Chain preset, by short name or id
    #[clap(long)]
    pub chain: Option<String>,

    /// Request timeout in milliseconds
    #[clap(long)]
    pub timeout_ms: Option<u64>,

    /// Log filter, e.g. "launchpad_rpc=debug"
    #[clap(long)]
    pub log: Option<String>,

    #[clap(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Cmd {
    /// Send an arbitrary method
    Call {
        method: String,
        /// JSON array of positional params; a non-array value is sent as the only param
        params: Option<String>,
        /// Serve from / store in the response cache
        #[clap(long)]
        cache: bool,
        /// Cache TTL in milliseconds (implies --cache)
        #[clap(long)]
        ttl_ms: Option<u64>,
        #[clap(long, default_value_t = 0)]
        debounce_ms: u64,
    },
    /// Fetch a trade by index
    Trade { index: u64 },
    /// List a page of tokens
    Tokens {
        #[clap(long, default_value_t = 1)]
        page: u32,
        #[clap(long, default_value_t = 11)]
        size: u32,
        #[clap(long, default_value_t = 3)]
        sort: u32,
    },
    /// Platform statistics
    Stats,
    /// Bonding-curve price and supply for a reserve amount
    Price {
        #[clap(long)]
        reserve: f64,
    },
    /// Decode a Q64.96 sqrt price (decimal or 0x hex)
    DecodeSqrtPrice { raw: String },
    /// Abbreviate a number with K/M/B/T
    Format { number: f64 },
    /// List known chain presets
    Chains,
    /// Pool price from GeckoTerminal (the XDC/USD pool unless one is given)
    MarketPrice { pool: Option<String> },
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<ClientConfig> {
        let mut cfg = match &self.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };
        if let Some(endpoint) = &self.endpoint {
            cfg.endpoint = Some(endpoint.clone());
        }
        if let Some(chain) = &self.chain {
            cfg.chain = chain.clone();
        }
        if let Some(ms) = self.timeout_ms {
            if ms == 0 {
                return Err(anyhow!("--timeout-ms must be positive"));
            }
            cfg.timeout_ms = ms;
        }
        if let Some(filter) = &self.log {
            cfg.log_filter = filter.clone();
        }
        Ok(cfg)
    }
}

/// Positional params from the command line: an array is taken as-is, anything
/// else becomes the single param.
pub fn parse_params(raw: Option<&str>) -> Result<Vec<Value>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(other) => Ok(vec![other]),
        Err(e) => Err(anyhow!("params must be JSON: {}", e)),
    }
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let cfg = cli.resolve_config()?;
    init_logging(Some(&cfg.log_filter));

    let out = match offline(&cli.cmd) {
        Some(v) => v,
        None => match cli.cmd {
            Cmd::MarketPrice { pool } => market_price(pool.as_deref()).await?,
            cmd => run_remote(&cfg, cmd).await?,
        },
    };
    print_json(&out)
}

/// Commands answered locally, without the endpoint.
fn offline(cmd: &Cmd) -> Option<Value> {
    let v = match cmd {
        Cmd::Price { reserve } => {
            let price = price_from_reserve(*reserve);
            json!({
                "reserve": reserve,
                "supply": supply_from_reserve(*reserve),
                "price": price,
                "price_display": round_to(price, DISPLAY_DECIMALS),
            })
        }
        Cmd::DecodeSqrtPrice { raw } => json!(decode_sqrt_price_x96(raw)),
        Cmd::Format { number } => json!(format_magnitude(*number)),
        Cmd::Chains => json!(CHAINS),
        _ => return None,
    };
    Some(v)
}

async fn run_remote(cfg: &ClientConfig, cmd: Cmd) -> Result<Value> {
    let endpoint = cfg.resolve_endpoint()?;
    debug!(%endpoint, "connecting");
    let client = RpcClient::http(endpoint)?.with_settings(cfg.settings());

    let mut svc = ServiceHandle::new();
    client.spawn_sweeper(&mut svc);

    let work = execute(&client, cmd);
    tokio::pin!(work);
    let interrupted = tokio::select! {
        res = &mut work => Some(res),
        _ = tokio::signal::ctrl_c() => None,
    };
    let res = match interrupted {
        Some(res) => res,
        None => {
            warn!("interrupt received, cancelling in-flight requests");
            client.cancel_all();
            work.await
        }
    };

    svc.shutdown().await?;
    res
}

async fn market_price(pool: Option<&str>) -> Result<Value> {
    let feeds = MarketFeeds::new()?;
    let price = match pool {
        Some(pool) => feeds.get_price(pool).await,
        None => feeds.get_xdc_price().await,
    };
    Ok(serde_json::to_value(price)?)
}

async fn execute(client: &RpcClient, cmd: Cmd) -> Result<Value> {
    let reply = match cmd {
        Cmd::Call { method, params, cache, ttl_ms, debounce_ms } => {
            let params = parse_params(params.as_deref())?;
            let mut opts = SendOptions::default().with_debounce(Duration::from_millis(debounce_ms));
            if cache {
                opts = opts.cached();
            }
            if let Some(ms) = ttl_ms {
                opts = opts.with_cache_ttl(Duration::from_millis(ms));
            }
            match client.send(method, params, opts).await? {
                Some(reply) => reply,
                None => return Ok(json!({ "superseded": true })),
            }
        }
        Cmd::Trade { index } => client.get_trade(index).await?,
        Cmd::Tokens { page, size, sort } => {
            client.get_tokens(&TokenPage { sort, page, size, query: None }).await?
        }
        Cmd::Stats => client.get_stats().await?,
        other => return Err(anyhow!("{:?} does not talk to the endpoint", other)),
    };
    Ok(serde_json::to_value(&reply)?)
}

fn print_json<T: Serialize>(v: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(v)?);
    Ok(())
}
