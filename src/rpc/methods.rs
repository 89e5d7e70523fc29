//! Method catalog: fixed bindings of method name, positional params and cache
//! policy. No logic beyond building the params list.
//!
//! Cacheable: `getTrade`, `getHolders`, `getKline`, `getStats` (default TTL)
//! and `getTokens` (60s). Everything else always goes to the endpoint.

use crate::rpc::client::{RpcClient, SendOptions};
use crate::rpc::envelope::RpcReply;
use crate::utils::errors::Result;
use serde_json::{json, Value};
use std::time::Duration;

/// Token listings change faster than other cacheable data.
pub const TOKEN_PAGE_TTL: Duration = Duration::from_secs(60);

/// The earn leaderboard is fetched in one page.
pub const EARN_LEADERBOARD_PAGE_SIZE: u32 = 9999;

/// `getTokens` page request.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPage {
    pub sort: u32,
    pub page: u32,
    pub size: u32,
    /// Free-form filter object, sent as `null` when absent.
    pub query: Option<Value>,
}

impl Default for TokenPage {
    fn default() -> Self {
        Self { sort: 3, page: 1, size: 11, query: None }
    }
}

/// `getOrders` filter.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderQuery {
    pub sort: u32,
    pub page: u32,
    pub size: u32,
    pub kind: Option<String>,
    pub account: Option<String>,
    pub token: Option<String>,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self { sort: 1, page: 1, size: 10, kind: None, account: None, token: None }
    }
}

/// `getUSDBDepositLeaderboard` window; timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositWindow {
    pub page: u32,
    pub size: u32,
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl Default for DepositWindow {
    fn default() -> Self {
        Self { page: 1, size: 10, start: None, end: None }
    }
}

fn cached() -> SendOptions {
    SendOptions::default().cached()
}

fn plain() -> SendOptions {
    SendOptions::default()
}

impl RpcClient {
    pub async fn get_trade(&self, index: u64) -> Result<RpcReply> {
        self.call("getTrade", vec![json!(index)], cached()).await
    }

    pub async fn get_holders(&self, token: &str) -> Result<RpcReply> {
        self.call("getHolders", vec![json!(token)], cached()).await
    }

    pub async fn get_msg(&self, chain_id: &str, index: u64) -> Result<RpcReply> {
        self.call("getMsg", vec![json!(chain_id), json!(index)], plain()).await
    }

    pub async fn get_kline(&self, token: &str, kind: &str) -> Result<RpcReply> {
        self.call("getKline", vec![json!(token), json!(kind)], cached()).await
    }

    pub async fn send_msg(&self, chain_id: &str, index: u64, msg: &str, address: &str) -> Result<RpcReply> {
        self.call("sendMsg", vec![json!(chain_id), json!(index), json!(msg), json!(address)], plain())
            .await
    }

    pub async fn get_tokens(&self, page: &TokenPage) -> Result<RpcReply> {
        let params = vec![json!(page.sort), json!(page.page), json!(page.size), json!(page.query)];
        self.call("getTokens", params, SendOptions::default().with_cache_ttl(TOKEN_PAGE_TTL)).await
    }

    pub async fn get_referral_info(&self, account: &str) -> Result<RpcReply> {
        self.call("getReferralInfo", vec![json!(account)], plain()).await
    }

    pub async fn get_orders(&self, q: &OrderQuery) -> Result<RpcReply> {
        let params = vec![
            json!(q.sort),
            json!(q.page),
            json!(q.size),
            json!(q.kind),
            json!(q.account),
            json!(q.token),
        ];
        self.call("getOrders", params, plain()).await
    }

    pub async fn get_stats(&self) -> Result<RpcReply> {
        self.call("getStats", vec![], cached()).await
    }

    pub async fn get_trade_event(&self, account: &str) -> Result<RpcReply> {
        self.call("getTradeEvent", vec![json!(account)], plain()).await
    }

    pub async fn add_trade_event(&self, account: &str) -> Result<RpcReply> {
        self.call("addTradeEvent", vec![json!(account)], plain()).await
    }

    pub async fn get_earn(&self, account: &str) -> Result<RpcReply> {
        self.call("getEarn", vec![json!(account)], plain()).await
    }

    pub async fn finish_twitter_tasks(&self, account: &str, index: u64) -> Result<RpcReply> {
        self.call("finishTwitterTasks", vec![json!(account), json!(index)], plain()).await
    }

    pub async fn get_earn_leaderboard(&self, page: u32, size: u32) -> Result<RpcReply> {
        self.call("getEarnLeaderboard", vec![json!(page), json!(size)], plain()).await
    }

    pub async fn get_deposit_leaderboard(&self, w: &DepositWindow) -> Result<RpcReply> {
        let params = vec![json!(w.page), json!(w.size), json!(w.start), json!(w.end)];
        self.call("getUSDBDepositLeaderboard", params, plain()).await
    }

    pub async fn register(&self, leader: &str, signature: &str) -> Result<RpcReply> {
        self.call("register", vec![json!(leader), json!(signature)], plain()).await
    }

    pub async fn update_share_fee(&self, share_fee: u64, signature: &str) -> Result<RpcReply> {
        self.call("updateShareFee", vec![json!(share_fee), json!(signature)], plain()).await
    }

    pub async fn get_referrals(&self, account: &str) -> Result<RpcReply> {
        self.call("getReferrals", vec![json!(account)], plain()).await
    }

    pub async fn get_graduate_tokens(&self) -> Result<RpcReply> {
        self.call("getGraduateTokens", vec![], plain()).await
    }

    pub async fn get_address(&self, id: impl Into<Value>) -> Result<RpcReply> {
        self.call("getAddress", vec![id.into()], plain()).await
    }
}
