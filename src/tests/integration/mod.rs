//! Integration tests: `RpcClient` over the real `HttpTransport`, talking to a
//! local axum endpoint bound on `127.0.0.1:0`.

mod feeds;

use crate::control::CancelSignal;
use crate::rpc::{ErrorCode, RpcClient, RpcReply, SendOptions};
use crate::utils::errors::{RpcError, TransportError};
use crate::utils::metrics::MetricsRegistry;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::time::{sleep, timeout, Duration};

/// Serve `app` on an ephemeral local port; returns `http://127.0.0.1:<port>`.
pub(super) async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });
    format!("http://{}", addr)
}

type Handler = fn(&Value) -> (StatusCode, String);

#[derive(Clone)]
struct EndpointState {
    handler: Handler,
    delay: Duration,
    hits: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

async fn rpc(State(st): State<EndpointState>, Json(body): Json<Value>) -> impl IntoResponse {
    st.hits.fetch_add(1, Ordering::SeqCst);
    let (status, reply) = (st.handler)(&body);
    st.bodies.lock().push(body);
    if !st.delay.is_zero() {
        sleep(st.delay).await;
    }
    (status, [(header::CONTENT_TYPE, "application/json")], reply)
}

/// JSON-RPC endpoint: every request body is recorded, answered by `handler`
/// after `delay`.
struct Endpoint {
    url: String,
    hits: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

impl Endpoint {
    async fn start(handler: Handler, delay: Duration) -> Self {
        let state = EndpointState {
            handler,
            delay,
            hits: Arc::new(AtomicUsize::new(0)),
            bodies: Arc::new(Mutex::new(Vec::new())),
        };
        let (hits, bodies) = (state.hits.clone(), state.bodies.clone());
        let app = Router::new().route("/", post(rpc)).with_state(state);
        let url = format!("{}/", serve(app).await);
        Self { url, hits, bodies }
    }

    fn client(&self) -> RpcClient {
        RpcClient::http(self.url.clone()).unwrap().with_metrics(MetricsRegistry::new())
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn last_body(&self) -> Value {
        self.bodies.lock().last().cloned().unwrap()
    }
}

fn echo_result(req: &Value) -> (StatusCode, String) {
    let reply = json!({
        "jsonrpc": "2.0",
        "id": req["id"],
        "result": { "method": req["method"], "params": req["params"] },
    });
    (StatusCode::OK, reply.to_string())
}

fn app_error(req: &Value) -> (StatusCode, String) {
    let reply = json!({
        "jsonrpc": "2.0",
        "id": req["id"],
        "error": { "code": -32000, "message": "token not found" },
    });
    (StatusCode::OK, reply.to_string())
}

fn server_error(_: &Value) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
}

fn garbage(_: &Value) -> (StatusCode, String) {
    (StatusCode::OK, "<html>not json</html>".to_string())
}

#[tokio::test]
async fn test_http_roundtrip_and_cache() {
    let ep = Endpoint::start(echo_result, Duration::ZERO).await;
    let client = ep.client();

    let first = client.get_trade(7).await.unwrap();
    let second = client.get_trade(7).await.unwrap();
    assert_eq!(ep.hits(), 1);
    assert_eq!(first, second);
    assert_eq!(first.result(), Some(&json!({"method": "getTrade", "params": [7]})));

    let req = ep.last_body();
    assert_eq!(req["jsonrpc"], "2.0");
    assert_eq!(req["method"], "getTrade");
    assert_eq!(req["params"], json!([7]));
    assert!(req["id"].is_u64());

    // different params, different entry
    client.get_trade(8).await.unwrap();
    assert_eq!(ep.hits(), 2);
}

#[tokio::test]
async fn test_request_ids_increase() {
    let ep = Endpoint::start(echo_result, Duration::ZERO).await;
    let client = ep.client();

    client.get_earn("0xabc").await.unwrap();
    let a = ep.last_body()["id"].as_u64().unwrap();
    client.get_earn("0xabc").await.unwrap();
    let b = ep.last_body()["id"].as_u64().unwrap();
    assert!(b > a);
    assert_eq!(ep.hits(), 2);
}

#[tokio::test]
async fn test_application_error_is_data_and_not_cached() {
    let ep = Endpoint::start(app_error, Duration::ZERO).await;
    let client = ep.client();

    for _ in 0..2 {
        match client.get_holders("0xtoken").await.unwrap() {
            RpcReply::Error(err) => {
                assert_eq!(err.code, ErrorCode::Number(-32000));
                assert_eq!(err.message, "token not found");
            }
            other => panic!("expected application error, got {:?}", other),
        }
    }
    assert_eq!(ep.hits(), 2);
    assert!(client.cache().is_empty());
}

#[tokio::test]
async fn test_non_success_status_is_network_error() {
    let ep = Endpoint::start(server_error, Duration::ZERO).await;
    let client = ep.client();

    let err = client.get_stats().await.unwrap_err();
    assert!(matches!(err, RpcError::Network { status: 500 }));
    assert_eq!(err.status(), Some(500));
    assert!(client.cache().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_transport_error() {
    let ep = Endpoint::start(garbage, Duration::ZERO).await;
    let client = ep.client();

    let err = client.call("getStats", vec![], SendOptions::default()).await.unwrap_err();
    assert!(matches!(err, RpcError::Transport(TransportError::Decode(_))));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    // bind then drop to get a port nothing listens on
    let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
    let client = RpcClient::http(format!("http://{}/", addr)).unwrap().with_metrics(MetricsRegistry::new());

    let err = client.call("getStats", vec![], SendOptions::default()).await.unwrap_err();
    assert!(matches!(err, RpcError::Transport(TransportError::Http(_))));
}

#[tokio::test]
async fn test_cancel_all_aborts_in_flight_request() {
    let ep = Endpoint::start(echo_result, Duration::from_secs(5)).await;
    let client = ep.client();

    let c = client.clone();
    let pending = tokio::spawn(async move { c.call("getTokens", vec![], SendOptions::default()).await });
    // wait until the endpoint has the request
    while ep.hits() == 0 {
        sleep(Duration::from_millis(5)).await;
    }
    client.cancel_all();

    let res = timeout(Duration::from_secs(1), pending).await.unwrap().unwrap();
    assert!(res.unwrap_err().is_cancelled());

    // the shared signal stays fired
    let err = client.call("getTokens", vec![], SendOptions::default()).await.unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(ep.hits(), 1);
}

#[tokio::test]
async fn test_own_signal_survives_cancel_all() {
    let ep = Endpoint::start(echo_result, Duration::from_millis(50)).await;
    let client = ep.client();
    client.cancel_all();

    let own = CancelSignal::new();
    let reply = client
        .call("getStats", vec![], SendOptions::default().with_cancel(own))
        .await
        .unwrap();
    assert_eq!(reply.result(), Some(&json!({"method": "getStats", "params": []})));
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let ep = Endpoint::start(echo_result, Duration::from_secs(5)).await;
    let client = ep.client();

    let opts = SendOptions::default().with_timeout(Duration::from_millis(100));
    let err = timeout(Duration::from_secs(2), client.call("getStats", vec![], opts))
        .await
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, RpcError::Transport(TransportError::Timeout(d)) if d == Duration::from_millis(100)));
}
