//! Conversion of free-text or loosely typed input into well-typed defaults.
//!
//! Both the form page (text boxes) and the record decoder (servers that send
//! `"16"` or `null` where a number belongs) funnel through these helpers, so a
//! value that cannot be read as a number always ends up as `0`, never as a
//! missing field.

use serde_json::Value;

/// Reads the leading run of decimal digits of `text`.
///
/// Empty input, input without leading digits, a leading minus sign, or a value
/// that does not fit in `u64` all coerce to `0`.
pub fn coerce_uint(text: &str) -> u64 {
    let text = text.trim();
    let text = text.strip_prefix('+').unwrap_or(text);
    let digits_len = text
        .bytes()
        .take_while(|byte| byte.is_ascii_digit())
        .count();
    if digits_len == 0 {
        return 0;
    }
    text[..digits_len].parse().unwrap_or(0)
}

/// Reads the longest leading decimal prefix of `text`.
///
/// Empty, unparseable, negative, or non-finite values coerce to `0.0`.
pub fn coerce_decimal(text: &str) -> f64 {
    let text = text.trim();
    let prefix = &text[..decimal_prefix_len(text)];
    let prefix = prefix.strip_suffix('.').unwrap_or(prefix);
    match prefix.parse::<f64>() {
        Ok(value) => non_negative(value),
        Err(_) => 0.0,
    }
}

/// Strict boolean view of a loosely typed JSON value.
///
/// Strings count as true only for `true`, `yes`, `1` (any case); numbers
/// count as true when non-zero.
pub fn coerce_flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "1"
        ),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Numeric JSON value or numeric text as a non-negative decimal.
pub fn decimal_from_value(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().map(non_negative).unwrap_or(0.0),
        Value::String(text) => coerce_decimal(text),
        _ => 0.0,
    }
}

/// Numeric JSON value or numeric text as a non-negative integer.
///
/// Fractional numbers are truncated.
pub fn uint_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(number) => {
            if let Some(n) = number.as_u64() {
                n
            } else if let Some(n) = number.as_f64() {
                let n = non_negative(n).trunc();
                if n < u64::MAX as f64 {
                    n as u64
                } else {
                    0
                }
            } else {
                0
            }
        }
        Value::String(text) => coerce_uint(text),
        _ => 0,
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn decimal_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if has_digits || frac_end > frac_start {
            has_digits = true;
            end = frac_end;
        }
    }

    if !has_digits {
        return 0;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    end
}
