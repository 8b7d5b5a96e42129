//! Coercion Module
//!
//! Best-effort conversion of stored values into primitives for the typed
//! accessors. Nothing here fails: an unusable value becomes the zero value.

use crate::cache::Value;

// == Bool ==
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Int(n) => *n != 0,
        Value::Float(x) => *x != 0.0,
        Value::Str(s) => parse_bool(s).unwrap_or(false),
        Value::Json(j) => json_to_bool(j),
        Value::Opaque(_) => false,
    }
}

fn json_to_bool(j: &serde_json::Value) -> bool {
    match j {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        serde_json::Value::String(s) => parse_bool(s).unwrap_or(false),
        _ => false,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

// == Integers ==
pub fn to_i64(value: &Value) -> i64 {
    match value {
        Value::Bool(b) => i64::from(*b),
        Value::Int(n) => *n,
        Value::Float(x) => float_to_i64(*x),
        Value::Str(s) => parse_i64(s).unwrap_or(0),
        Value::Json(j) => json_to_i64(j),
        Value::Opaque(_) => 0,
    }
}

/// Same as [`to_i64`], but zero when the result does not fit the platform
/// word.
pub fn to_isize(value: &Value) -> isize {
    isize::try_from(to_i64(value)).unwrap_or(0)
}

fn json_to_i64(j: &serde_json::Value) -> i64 {
    match j {
        serde_json::Value::Bool(b) => i64::from(*b),
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(float_to_i64))
            .unwrap_or(0),
        serde_json::Value::String(s) => parse_i64(s).unwrap_or(0),
        _ => 0,
    }
}

fn float_to_i64(x: f64) -> i64 {
    if x.is_finite() {
        // `as` saturates out-of-range floats
        x.trunc() as i64
    } else {
        0
    }
}

/// Integer literal with the base taken from its prefix: `0x` hex, `0b`
/// binary, `0o` or a bare leading zero octal, decimal otherwise. `_` may
/// separate digits.
fn parse_i64(s: &str) -> Option<i64> {
    let s = trim_zero_fraction(s.trim());
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let (radix, digits) = split_radix(body);
    let digits = digits.replace('_', "");
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    let magnitude = u64::from_str_radix(&digits, radix).ok()?;
    if negative {
        if magnitude > i64::MIN.unsigned_abs() {
            return None;
        }
        Some((magnitude as i64).wrapping_neg())
    } else {
        i64::try_from(magnitude).ok()
    }
}

fn split_radix(body: &str) -> (u32, &str) {
    let bytes = body.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return (16, &body[2..]),
            b'b' | b'B' => return (2, &body[2..]),
            b'o' | b'O' => return (8, &body[2..]),
            _ => return (8, &body[1..]),
        }
    }
    (10, body)
}

/// "12.000" parses as 12; "12.5" stays unparsable.
fn trim_zero_fraction(s: &str) -> &str {
    match s.split_once('.') {
        Some((whole, fraction)) if !whole.is_empty() && fraction.bytes().all(|b| b == b'0') => {
            whole
        }
        _ => s,
    }
}

// == String ==
pub fn to_string(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(x) => x.to_string(),
        Value::Str(s) => s.clone(),
        Value::Json(serde_json::Value::String(s)) => s.clone(),
        Value::Json(serde_json::Value::Null) => String::new(),
        Value::Json(j) => j.to_string(),
        Value::Opaque(_) => String::new(),
    }
}
