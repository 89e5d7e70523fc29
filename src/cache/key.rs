use serde_json::Value;
use std::fmt;

/// Cache key derived from `(method, params)`.
///
/// Params are rendered as canonical JSON: object keys sorted at every depth,
/// no insignificant whitespace. Two calls whose params are structurally equal
/// land on the same key regardless of the key order they were built with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn derive(method: &str, params: &[Value]) -> Self {
        let mut out = String::with_capacity(method.len() + 16);
        out.push_str(method);
        out.push(':');
        out.push('[');
        for (i, p) in params.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_canonical(p, &mut out);
        }
        out.push(']');
        CacheKey(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn write_canonical(v: &Value, out: &mut String) {
    match v {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, k) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(k.clone()).to_string());
                out.push(':');
                write_canonical(&map[k.as_str()], out);
            }
            out.push('}');
        }
        // scalars: serde_json already renders these canonically (strings escaped)
        scalar => out.push_str(&scalar.to_string()),
    }
}
