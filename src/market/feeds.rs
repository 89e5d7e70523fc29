//! Third-party market data: GeckoTerminal pools, prices and klines, XDCScan
//! token lists and IceCreamSwap quotes.
//!
//! These are display helpers. Every getter degrades to an empty or zeroed
//! value on failure and logs a warning; only [`MarketFeeds::fetch`] returns
//! errors.

use crate::market::candles::Candle;
use crate::rpc::client::DEFAULT_TIMEOUT;
use crate::utils::errors::{Result, RpcError, TransportError};
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

pub const GECKOTERMINAL: &str = "https://api.geckoterminal.com/api/v2";
pub const XDCSCAN: &str = "https://api.xdcscan.io";
pub const ICECREAMSWAP: &str = "https://aggregator.icecreamswap.com/50";

/// Versioned media type GeckoTerminal answers to.
pub const ACCEPT_JSON: &str = "application/json;version=20230302";

/// WXDC/USDT pool used as the XDC reference price.
pub const XDC_USD_POOL: &str = "0xfcabba53dac7b6b19714c7d741a46f6dad260107";
pub const BBB_POOL: &str = "0x2340cd5ec3e6c51c217212f5092d56d594f0bd0e";
pub const CONVENIENCE_FEE_RECIPIENT: &str = "0x2475dcd4fe333be814ef7c8f8ce8a1e9b5fcdea0";

const KLINE_LIMIT: &str = "1000";
const QUOTE_SLIPPAGE: &str = "99";

/// Base URLs of the three providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEndpoints {
    pub geckoterminal: String,
    pub xdcscan: String,
    pub icecreamswap: String,
}

impl Default for FeedEndpoints {
    fn default() -> Self {
        Self {
            geckoterminal: GECKOTERMINAL.to_string(),
            xdcscan: XDCSCAN.to_string(),
            icecreamswap: ICECREAMSWAP.to_string(),
        }
    }
}

/// Pool price summary. All zero when the pool is unknown or the request failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PoolPrice {
    /// Base token price in USD.
    pub price: f64,
    /// Base token price in the native currency.
    pub base_price: f64,
    /// 24h change as a fraction (`-0.125` for -12.5%).
    pub price_change_24h: f64,
    pub cap: f64,
    pub volume_h24: f64,
}

#[derive(Clone)]
pub struct MarketFeeds {
    client: reqwest::Client,
    endpoints: FeedEndpoints,
}

impl MarketFeeds {
    pub fn new() -> Result<Self> {
        Self::with_endpoints(FeedEndpoints::default())
    }

    pub fn with_endpoints(endpoints: FeedEndpoints) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(TransportError::Http)?;
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &FeedEndpoints {
        &self.endpoints
    }

    /// GET `url` with the versioned `Accept` header and decode the JSON body.
    pub async fn fetch(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_JSON)
            .query(query)
            .send()
            .await
            .map_err(TransportError::Http)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RpcError::Network { status: status.as_u16() });
        }
        let body = resp.bytes().await.map_err(TransportError::Http)?;
        Ok(serde_json::from_slice(&body).map_err(TransportError::Decode)?)
    }

    async fn fetch_logged(&self, what: &'static str, url: &str, query: &[(&str, &str)]) -> Option<Value> {
        match self.fetch(url, query).await {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(what, url, "market feed request failed: {}", e);
                None
            }
        }
    }

    /// Attributes of the token's top pool, `{}` if there is none.
    pub async fn get_pool(&self, token: &str) -> Value {
        if token.is_empty() {
            return empty_object();
        }
        let url = format!("{}/networks/xdc/tokens/{}/pools", self.endpoints.geckoterminal, token);
        self.fetch_logged("pool", &url, &[("page", "1")])
            .await
            .and_then(|v| v.pointer("/data/0/attributes").cloned())
            .filter(|v| !v.is_null())
            .unwrap_or_else(empty_object)
    }

    /// ERC-20 holdings of `address` as XDCScan reports them, `{}` on failure.
    pub async fn get_erc20_list(&self, address: &str) -> Value {
        if address.is_empty() {
            return empty_object();
        }
        let url = format!("{}/addresses/{}/tokens", self.endpoints.xdcscan, address);
        self.fetch_logged("erc20 list", &url, &[("type", "ERC-20")])
            .await
            .unwrap_or_else(empty_object)
    }

    /// Swap quote for `amount` (base units, as a decimal string) of `src` into `dst`.
    pub async fn get_quote_from_pool(&self, src: &str, dst: &str, amount: &str, address: &str) -> Value {
        if src.is_empty() || dst.is_empty() || amount.is_empty() || amount == "0" {
            return empty_object();
        }
        let query = [
            ("src", src),
            ("dst", dst),
            ("amount", amount),
            ("slippage", QUOTE_SLIPPAGE),
            ("from", address),
            ("convenienceFee", "1"),
            ("convenienceFeeRecipient", CONVENIENCE_FEE_RECIPIENT),
        ];
        self.fetch_logged("quote", &self.endpoints.icecreamswap, &query)
            .await
            .unwrap_or_else(empty_object)
    }

    /// Daily candles of `pool`, in the order the provider returns them.
    /// Rows that are not `[time, open, high, low, close, volume?]` are skipped.
    pub async fn get_kline(&self, pool: &str) -> Vec<Candle> {
        if pool.is_empty() {
            return Vec::new();
        }
        let url = format!("{}/networks/xdc/pools/{}/ohlcv/day", self.endpoints.geckoterminal, pool);
        let Some(v) = self
            .fetch_logged("kline", &url, &[("aggregate", "1"), ("limit", KLINE_LIMIT)])
            .await
        else {
            return Vec::new();
        };
        v.pointer("/data/attributes/ohlcv_list")
            .and_then(Value::as_array)
            .map(|rows| rows.iter().filter_map(ohlcv_row).collect())
            .unwrap_or_default()
    }

    pub async fn get_price(&self, pool: &str) -> PoolPrice {
        if pool.is_empty() {
            return PoolPrice::default();
        }
        let url = format!("{}/networks/xdc/pools/{}", self.endpoints.geckoterminal, pool);
        let Some(v) = self.fetch_logged("price", &url, &[("include", "dex")]).await else {
            return PoolPrice::default();
        };
        let attrs = v.pointer("/data/attributes");
        let field = |path: &str| number(attrs.and_then(|a| a.pointer(path)));
        PoolPrice {
            price: field("/base_token_price_usd"),
            base_price: field("/base_token_price_native_currency"),
            price_change_24h: field("/price_change_percentage/h24") / 100.0,
            cap: field("/market_cap_usd"),
            volume_h24: field("/volume_usd/h24"),
        }
    }

    pub async fn get_xdc_price(&self) -> PoolPrice {
        self.get_price(XDC_USD_POOL).await
    }

    pub async fn get_bbb_price(&self) -> PoolPrice {
        self.get_price(BBB_POOL).await
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Number or numeric string; anything else (including null) is 0.
fn number(v: Option<&Value>) -> f64 {
    let n = match v {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

fn ohlcv_row(row: &Value) -> Option<Candle> {
    let cells = row.as_array().filter(|c| c.len() >= 5)?;
    let time = number(cells.first());
    if time <= 0.0 {
        return None;
    }
    Some(Candle {
        time: Some(time as u64),
        open: Some(number(cells.get(1))),
        high: Some(number(cells.get(2))),
        low: Some(number(cells.get(3))),
        close: Some(number(cells.get(4))),
        volume: cells.get(5).map(|c| number(Some(c))),
    })
}
