//! `MarketFeeds` against a local stand-in for the three market data providers.

use super::serve;
use crate::market::{FeedEndpoints, MarketFeeds, PoolPrice};
use crate::utils::errors::RpcError;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Seen {
    accept: Arc<Mutex<Vec<String>>>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl Seen {
    fn record(&self, headers: &HeaderMap, query: HashMap<String, String>) {
        let accept = headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.accept.lock().push(accept);
        self.queries.lock().push(query);
    }

    fn last_query(&self) -> HashMap<String, String> {
        self.queries.lock().last().cloned().unwrap()
    }
}

async fn token_pools(
    State(seen): State<Seen>,
    Path(token): Path<String>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> Json<Value> {
    seen.record(&headers, q);
    if token == "0xnopools" {
        return Json(json!({ "data": [] }));
    }
    Json(json!({
        "data": [{ "attributes": { "address": "0xpool", "name": format!("{} / WXDC", token) } }]
    }))
}

async fn pool(
    State(seen): State<Seen>,
    Path(pool): Path<String>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    seen.record(&headers, q);
    if pool == "0xbad" {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "errors": ["boom"] })));
    }
    let body = json!({
        "data": { "attributes": {
            "base_token_price_usd": "0.0425",
            "base_token_price_native_currency": "1.0",
            "price_change_percentage": { "h24": "-12.5" },
            "market_cap_usd": null,
            "volume_usd": { "h24": "1500.75" },
        }}
    });
    (StatusCode::OK, Json(body))
}

async fn ohlcv(
    State(seen): State<Seen>,
    Path(_pool): Path<String>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> Json<Value> {
    seen.record(&headers, q);
    Json(json!({
        "data": { "attributes": { "ohlcv_list": [
            [1_700_086_400, "1.1", "1.4", "1.0", "1.3", "900"],
            ["not", "a", "row"],
            [1_700_000_000, 1.0, 1.2, 0.9, 1.1],
        ]}}
    }))
}

async fn address_tokens(
    State(seen): State<Seen>,
    Path(address): Path<String>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> Json<Value> {
    seen.record(&headers, q);
    Json(json!({ "items": [{ "token": { "symbol": "BBB" }, "value": "1000" }], "owner": address }))
}

async fn quote(State(seen): State<Seen>, headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    seen.record(&headers, q.clone());
    Json(json!({ "dstAmount": "42", "echo": q }))
}

async fn start() -> (MarketFeeds, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/networks/xdc/tokens/:token/pools", get(token_pools))
        .route("/networks/xdc/pools/:pool", get(pool))
        .route("/networks/xdc/pools/:pool/ohlcv/day", get(ohlcv))
        .route("/addresses/:address/tokens", get(address_tokens))
        .route("/quote", get(quote))
        .with_state(seen.clone());
    let base = serve(app).await;
    let feeds = MarketFeeds::with_endpoints(FeedEndpoints {
        geckoterminal: base.clone(),
        xdcscan: base.clone(),
        icecreamswap: format!("{}/quote", base),
    })
    .unwrap();
    (feeds, seen)
}

#[tokio::test]
async fn test_price_fields_and_accept_header() {
    let (feeds, seen) = start().await;

    let price = feeds.get_price("0xpool").await;
    assert_eq!(price.price, 0.0425);
    assert_eq!(price.base_price, 1.0);
    assert_eq!(price.price_change_24h, -0.125);
    assert_eq!(price.cap, 0.0);
    assert_eq!(price.volume_h24, 1500.75);

    assert_eq!(seen.accept.lock().last().map(String::as_str), Some("application/json;version=20230302"));
    assert_eq!(seen.last_query().get("include").map(String::as_str), Some("dex"));

    // the fixed reference pools go through the same path
    assert_eq!(feeds.get_xdc_price().await, price);
    assert_eq!(feeds.get_bbb_price().await, price);
}

#[tokio::test]
async fn test_pool_and_token_list() {
    let (feeds, seen) = start().await;

    let pool = feeds.get_pool("0xtoken").await;
    assert_eq!(pool, json!({ "address": "0xpool", "name": "0xtoken / WXDC" }));
    assert_eq!(seen.last_query().get("page").map(String::as_str), Some("1"));

    assert_eq!(feeds.get_pool("0xnopools").await, json!({}));

    let list = feeds.get_erc20_list("0xme").await;
    assert_eq!(list["owner"], "0xme");
    assert_eq!(list["items"][0]["token"]["symbol"], "BBB");
    assert_eq!(seen.last_query().get("type").map(String::as_str), Some("ERC-20"));
}

#[tokio::test]
async fn test_kline_skips_malformed_rows() {
    let (feeds, seen) = start().await;

    let candles = feeds.get_kline("0xpool").await;
    assert_eq!(candles.len(), 2);
    assert_eq!(candles[0].time, Some(1_700_086_400));
    assert_eq!(candles[0].close, Some(1.3));
    assert_eq!(candles[0].volume, Some(900.0));
    assert_eq!(candles[1].time, Some(1_700_000_000));
    assert_eq!(candles[1].volume, None);

    let q = seen.last_query();
    assert_eq!(q.get("aggregate").map(String::as_str), Some("1"));
    assert_eq!(q.get("limit").map(String::as_str), Some("1000"));
}

#[tokio::test]
async fn test_quote_query() {
    let (feeds, seen) = start().await;

    let reply = feeds.get_quote_from_pool("0xsrc", "0xdst", "1000000", "0xme").await;
    assert_eq!(reply["dstAmount"], "42");

    let q = seen.last_query();
    assert_eq!(q.get("src").map(String::as_str), Some("0xsrc"));
    assert_eq!(q.get("dst").map(String::as_str), Some("0xdst"));
    assert_eq!(q.get("amount").map(String::as_str), Some("1000000"));
    assert_eq!(q.get("slippage").map(String::as_str), Some("99"));
    assert_eq!(q.get("from").map(String::as_str), Some("0xme"));
    assert_eq!(q.get("convenienceFee").map(String::as_str), Some("1"));
    assert_eq!(
        q.get("convenienceFeeRecipient").map(String::as_str),
        Some("0x2475dcd4fe333be814ef7c8f8ce8a1e9b5fcdea0")
    );
}

#[tokio::test]
async fn test_failures_fall_back_to_defaults() {
    let (feeds, _) = start().await;

    assert_eq!(feeds.get_price("0xbad").await, PoolPrice::default());
    let err = feeds.fetch(&format!("{}/networks/xdc/pools/0xbad", feeds.endpoints().geckoterminal), &[]).await;
    assert!(matches!(err, Err(RpcError::Network { status: 500 })));

    // bind then drop to get a port nothing listens on
    let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
    let base = format!("http://{}", addr);
    let dead = MarketFeeds::with_endpoints(FeedEndpoints {
        geckoterminal: base.clone(),
        xdcscan: base.clone(),
        icecreamswap: base,
    })
    .unwrap();
    assert_eq!(dead.get_price("0xpool").await, PoolPrice::default());
    assert_eq!(dead.get_pool("0xtoken").await, json!({}));
    assert_eq!(dead.get_erc20_list("0xme").await, json!({}));
    assert!(dead.get_kline("0xpool").await.is_empty());
    assert_eq!(dead.get_quote_from_pool("0xsrc", "0xdst", "5", "0xme").await, json!({}));
}
