//! Bonding curve conversions between reserve (native amount paid in), supply
//! and spot price.
//!
//! supply  = sqrt(reserve * BASE)
//! reserve = supply^2 / BASE
//! price   = 2 * sqrt(reserve / BASE) / PRECISION
//!
//! All functions return 0 outside their domain (zero, negative, NaN or infinite input).

/// Curve base constant shared by every conversion.
pub const CURVE_BASE: f64 = 2e7;

/// Scale applied to prices.
pub const PRICE_PRECISION: f64 = 1e9;

/// Decimal places prices and amounts are displayed with.
pub const DISPLAY_DECIMALS: u32 = 6;

fn in_domain(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

/// Spot price for a given reserve. Strictly increasing for positive input.
pub fn price_from_reserve(reserve: f64) -> f64 {
    if !in_domain(reserve) {
        return 0.0;
    }
    (reserve / CURVE_BASE).sqrt() / PRICE_PRECISION * 2.0
}

/// Reserve needed to reach `supply`.
pub fn reserve_from_supply(supply: f64) -> f64 {
    if !in_domain(supply) {
        return 0.0;
    }
    supply * supply / CURVE_BASE
}

/// Supply minted for `reserve`.
pub fn supply_from_reserve(reserve: f64) -> f64 {
    if !in_domain(reserve) {
        return 0.0;
    }
    (reserve * CURVE_BASE).sqrt()
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
