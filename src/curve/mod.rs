//! Pure numeric transforms used next to RPC data: bonding-curve conversions,
//! sqrt-price decoding and magnitude formatting.

pub mod bonding;
pub mod sqrt_price;
pub mod format;

pub use bonding::{
    price_from_reserve, reserve_from_supply, round_to, supply_from_reserve, CURVE_BASE, DISPLAY_DECIMALS,
    PRICE_PRECISION,
};
pub use sqrt_price::{decode_sqrt_price_x96, decode_sqrt_price_x96_u128};
pub use format::format_magnitude;
