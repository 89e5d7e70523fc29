//! Request orchestrator: the single `send(method, params, options)` entry point.
//!
//! Per call:
//! 1. cacheable calls are answered from the cache while fresh
//! 2. otherwise the envelope goes to the transport under the timeout and the
//!    call's cancellation signal (the client-wide shared one by default)
//! 3. a fired signal yields `RpcError::Cancelled`; other transport failures
//!    propagate unchanged
//! 4. an application error comes back as `RpcReply::Error`, never cached
//! 5. a successful result is cached (when cacheable) and returned
//!
//! With a non-zero debounce the whole sequence is deferred until the call
//! site has been quiet for that long; superseded calls resolve to `None`.

use crate::app::ServiceHandle;
use crate::cache::{self, CacheKey, CacheStore, SweepConfig, DEFAULT_TTL};
use crate::control::{CallSite, CancelSignal, DebounceGate};
use crate::rpc::envelope::{RequestIds, RpcEnvelope, RpcReply};
use crate::rpc::transport::{HttpTransport, Transport};
use crate::utils::errors::{Result, RpcError, TransportError};
use crate::utils::metrics::{
    MetricsRegistry, METRICS, RPC_APP_ERRORS, RPC_CACHE_HITS, RPC_CACHE_MISSES, RPC_CANCELLED,
    RPC_DEBOUNCE_SUPERSEDED, RPC_REQUESTS,
};
use serde_json::Value;
use std::future::Future;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RETRY_COUNT: u32 = 3;

/// Client-wide defaults, applied where a call leaves an option unset.
#[derive(Debug, Clone, Copy)]
pub struct ClientSettings {
    pub timeout: Duration,
    pub cache_ttl: Duration,
    pub sweep: SweepConfig,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self { timeout: DEFAULT_TIMEOUT, cache_ttl: DEFAULT_TTL, sweep: SweepConfig::default() }
    }
}

/// Per-call options.
#[derive(Debug, Clone)]
pub struct SendOptions {
    /// Falls back to the client timeout (30s by default).
    pub timeout: Option<Duration>,
    /// Accepted for compatibility; the client does not retry.
    pub retry_count: u32,
    pub use_cache: bool,
    /// Falls back to the client cache TTL (5 min by default).
    pub cache_ttl: Option<Duration>,
    /// Falls back to the client-wide shared signal.
    pub cancel: Option<CancelSignal>,
    pub debounce: Duration,
    /// Debounce slot; defaults to the source location of the `send` call.
    pub site: Option<CallSite>,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            retry_count: DEFAULT_RETRY_COUNT,
            use_cache: false,
            cache_ttl: None,
            cancel: None,
            debounce: Duration::ZERO,
            site: None,
        }
    }
}

impl SendOptions {
    pub fn cached(mut self) -> Self {
        self.use_cache = true;
        self
    }

    /// Cache with a TTL other than the client default. Implies `cached()`.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.use_cache = true;
        self.cache_ttl = Some(ttl);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_retries(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn with_cancel(mut self, signal: CancelSignal) -> Self {
        self.cancel = Some(signal);
        self
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }

    pub fn at_site(mut self, site: CallSite) -> Self {
        self.site = Some(site);
        self
    }
}

/// JSON-RPC client: cache, shared cancellation, debounce and transport behind one entry point.
/// Clones share all state.
#[derive(Clone)]
pub struct RpcClient {
    transport: Arc<dyn Transport>,
    cache: CacheStore,
    debounce: DebounceGate,
    signal: CancelSignal,
    ids: Arc<RequestIds>,
    settings: ClientSettings,
    metrics: MetricsRegistry,
}

impl RpcClient {
    /// Composition root: the client owns the shared cancellation signal that
    /// every call uses unless it brings its own.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cache: CacheStore::new(),
            debounce: DebounceGate::new(),
            signal: CancelSignal::new(),
            ids: Arc::new(RequestIds::new()),
            settings: ClientSettings::default(),
            metrics: METRICS.clone(),
        }
    }

    pub fn http(endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(endpoint)?)))
    }

    pub fn with_settings(mut self, settings: ClientSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsRegistry) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_cancel_signal(mut self, signal: CancelSignal) -> Self {
        self.signal = signal;
        self
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    pub fn cancel_signal(&self) -> &CancelSignal {
        &self.signal
    }

    /// Fire the shared signal. Every in-flight and future call that did not
    /// bring its own signal fails with `Cancelled`; there is no undo.
    pub fn cancel_all(&self) {
        self.signal.cancel();
    }

    /// Run the cache sweep in the background until `svc` shuts down.
    pub fn spawn_sweeper(&self, svc: &mut ServiceHandle) {
        let h = cache::spawn_sweeper(self.cache.clone(), self.settings.sweep, self.metrics.clone(), svc.shutdown_rx());
        svc.attach("cache-sweeper", h);
    }

    /// Send `method` with positional `params`.
    ///
    /// Resolves to `Ok(None)` only for a debounced call that a later call at
    /// the same site superseded. The debounce slot is claimed when `send` is
    /// called, not when the future is first polled.
    #[track_caller]
    pub fn send(
        &self,
        method: impl Into<String>,
        params: Vec<Value>,
        opts: SendOptions,
    ) -> impl Future<Output = Result<Option<RpcReply>>> + Send + '_ {
        // must be read here: closures and async blocks do not inherit #[track_caller]
        let caller = Location::caller();
        let method = method.into();
        let ticket = if opts.debounce.is_zero() {
            None
        } else {
            let site = opts.site.clone().unwrap_or(CallSite::Location(caller));
            Some(self.debounce.schedule(site))
        };

        async move {
            if let Some(ticket) = ticket {
                let site = ticket.site().clone();
                if !self.debounce.settle(ticket, opts.debounce).await {
                    self.metrics.inc_counter(RPC_DEBOUNCE_SUPERSEDED);
                    debug!(method = %method, site = %site, "debounced call superseded");
                    return Ok(None);
                }
            }
            self.call(&method, params, opts).await.map(Some)
        }
    }

    /// The undebounced path of [`send`](Self::send): runs immediately and
    /// always produces a reply or an error. `opts.debounce` is ignored.
    pub async fn call(&self, method: &str, params: Vec<Value>, opts: SendOptions) -> Result<RpcReply> {
        let key = opts.use_cache.then(|| CacheKey::derive(method, &params));
        if let Some(key) = &key {
            if let Some(hit) = self.cache.get(key) {
                self.metrics.inc_counter(RPC_CACHE_HITS);
                debug!(%key, "rpc cache hit");
                return Ok(RpcReply::Result(hit));
            }
            self.metrics.inc_counter(RPC_CACHE_MISSES);
        }

        let envelope = RpcEnvelope::new(self.ids.next_id(), method, params);
        let timeout = opts.timeout.unwrap_or(self.settings.timeout);
        let signal = opts.cancel.as_ref().unwrap_or(&self.signal);
        self.metrics.inc_counter(RPC_REQUESTS);
        debug!(id = envelope.id, method, "dispatching rpc request");

        let response = tokio::select! {
            biased;
            _ = signal.cancelled() => {
                self.metrics.inc_counter(RPC_CANCELLED);
                debug!(id = envelope.id, method, "rpc request cancelled");
                return Err(RpcError::Cancelled);
            }
            res = tokio::time::timeout(timeout, self.transport.post(&envelope)) => match res {
                Ok(r) => r?,
                Err(_) => return Err(TransportError::Timeout(timeout).into()),
            },
        };

        match response.into_reply() {
            RpcReply::Error(err) => {
                self.metrics.inc_counter(RPC_APP_ERRORS);
                debug!(id = envelope.id, method, code = %err.code, "rpc application error");
                Ok(RpcReply::Error(err))
            }
            RpcReply::Result(value) => {
                if let Some(key) = key {
                    let ttl = opts.cache_ttl.unwrap_or(self.settings.cache_ttl);
                    self.cache.put(key, value.clone(), ttl);
                }
                Ok(RpcReply::Result(value))
            }
        }
    }
}
