use crate::curve::bonding::round_to;

/// Suffix thresholds, largest first.
const MAGNITUDES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Render `num` with two decimals and the largest applicable T/B/M/K suffix.
/// Absent, zero and NaN input render as `"0.00"`. Thresholds compare the
/// absolute value, so negatives keep their sign: `-1500` -> `"-1.50K"`.
/// Ties round away from zero (`1125` -> `"1.13K"`), not to even.
pub fn format_magnitude(num: impl Into<Option<f64>>) -> String {
    let num = match num.into() {
        Some(n) if !n.is_nan() && n != 0.0 => n,
        _ => return "0.00".to_string(),
    };
    let abs = num.abs();
    for (threshold, suffix) in MAGNITUDES {
        if abs >= threshold {
            return format!("{:.2}{}", round_to(num / threshold, 2), suffix);
        }
    }
    format!("{:.2}", round_to(num, 2))
}
