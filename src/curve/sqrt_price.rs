//! Decoding of Q64.96 square-root prices (`sqrtPriceX96`) as reported by
//! concentrated-liquidity pools.
//!
//! price = 1 / (sqrtPriceX96 / 2^96)^2
//!
//! The raw value is a uint160 on chain, so it usually arrives as a decimal
//! (or `0x` hex) string. Anything undecodable yields 0 rather than an error.

use tracing::debug;

/// 2^96
pub const Q96: f64 = 79_228_162_514_264_337_593_543_950_336.0;

/// Decode a string-encoded sqrt price. Empty, zero or malformed input gives 0.
pub fn decode_sqrt_price_x96(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.0;
    }
    match parse_big(raw) {
        Some(v) => decode_f64(v),
        None => {
            debug!(raw, "undecodable sqrtPriceX96");
            0.0
        }
    }
}

pub fn decode_sqrt_price_x96_u128(raw: u128) -> f64 {
    decode_f64(raw as f64)
}

fn decode_f64(sqrt_price_x96: f64) -> f64 {
    if !(sqrt_price_x96.is_finite() && sqrt_price_x96 > 0.0) {
        return 0.0;
    }
    let ratio = sqrt_price_x96 / Q96;
    let price = 1.0 / (ratio * ratio);
    if price.is_finite() {
        price
    } else {
        0.0
    }
}

/// `0x` hex folded digit by digit (width is unbounded), anything else parsed
/// as a decimal float, which also takes exponent forms like `1e30`. Sign and
/// non-finite values are rejected later, in `decode_f64`.
fn parse_big(s: &str) -> Option<f64> {
    let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) else {
        return s.parse::<f64>().ok();
    };
    if hex.is_empty() {
        return None;
    }
    let mut acc = 0f64;
    for c in hex.chars() {
        acc = acc * 16.0 + c.to_digit(16)? as f64;
    }
    Some(acc)
}
