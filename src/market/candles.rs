use crate::utils::serde_helpers::{lenient_opt_f64, lenient_opt_u64};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One kline point as served by `getKline`. Every field is optional and may
/// arrive as a number or a numeric string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(default, deserialize_with = "lenient_opt_u64", skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,
    #[serde(default, deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub close: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Candle {
    /// Overlay `later` on top of `self`: fields it carries win, `close` is always taken from it.
    fn absorb(&mut self, later: Candle) {
        self.open = later.open.or(self.open);
        self.high = later.high.or(self.high);
        self.low = later.low.or(self.low);
        self.volume = later.volume.or(self.volume);
        self.close = later.close;
    }
}

/// Collapse points sharing a timestamp into one, in time order.
/// Points without a (non-zero) timestamp are dropped.
pub fn merge_candles(points: impl IntoIterator<Item = Candle>) -> Vec<Candle> {
    let mut by_time: BTreeMap<u64, Candle> = BTreeMap::new();
    for point in points {
        let time = match point.time {
            Some(t) if t > 0 => t,
            _ => continue,
        };
        match by_time.get_mut(&time) {
            Some(existing) => existing.absorb(point),
            None => {
                by_time.insert(time, point);
            }
        }
    }
    by_time.into_values().collect()
}
