//! Market data around the RPC endpoint: kline merging, timestamp display and
//! the third-party price feeds.

pub mod candles;
pub mod feeds;
pub mod time;

pub use candles::{merge_candles, Candle};
pub use feeds::{FeedEndpoints, MarketFeeds, PoolPrice};
pub use time::{format_date_time, format_short_date};
