use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an f64 that the server may send either as a JSON number or as
/// a numeric string (`"1.25"`).
pub fn lenient_f64<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(d)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom("number out of f64 range")),
        Value::String(s) => s.trim().parse::<f64>().map_err(D::Error::custom),
        other => Err(D::Error::custom(format!("expected number, got {}", other))),
    }
}

/// Same as [`lenient_f64`] for optional fields; `null` and missing map to `None`.
pub fn lenient_opt_f64<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s.trim().parse::<f64>().map(Some).map_err(D::Error::custom),
        other => Err(D::Error::custom(format!("expected number, got {}", other))),
    }
}

/// Optional unsigned integer from a number or numeric string; fractional parts are truncated.
pub fn lenient_opt_u64<'de, D>(d: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = lenient_opt_f64(d)?;
    match v {
        None => Ok(None),
        Some(f) if f.is_finite() && f >= 0.0 => Ok(Some(f as u64)),
        Some(f) => Err(D::Error::custom(format!("expected unsigned integer, got {}", f))),
    }
}
