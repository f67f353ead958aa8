// SPDX-License-Identifier: MIT

//! Explicit value coercion
//!
//! Form values arrive loosely typed: a number input yields `"18"`, a
//! template literal says `18`. Equality stringifies both sides, ordered
//! comparisons parse both sides to numbers, following the conversions a
//! browser applies to form data (`String(x)` and `Number(x)`).

use serde_json::Value;

/// True for an absent value or an explicit `null`
pub fn is_nullish(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Stringify a value. Absent values render as `"undefined"`.
pub fn to_display_string(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(v) => stringify(v),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => i.to_string(),
            (_, Some(u)) => u.to_string(),
            _ => format_number(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => s.clone(),
        // Array join renders null members as empty strings
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => stringify(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Render a number the way `String(n)` does: plain decimal while the
/// decimal exponent is in [-6, 21), exponent notation outside it.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    // Shortest round-trip digits, e.g. "1.2345e3"
    let sci = format!("{:e}", n.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the first digit
    let point = exponent.parse::<i32>().unwrap_or(0) + 1;

    let body = if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}.{}", int, frac)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat(-point as usize), digits)
    } else {
        let e = point - 1;
        let sign = if e < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, sign, e.abs())
        } else {
            format!("{}.{}e{}{}", first, rest, sign, e.abs())
        }
    };

    if n < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

/// Coerce a value to a number. Absent values and objects become NaN.
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_number(s),
        Some(array @ Value::Array(_)) => parse_number(&stringify(array)),
        Some(Value::Object(_)) => f64::NAN,
    }
}

/// Parse numeric text. Blank text is zero, anything malformed is NaN.
pub fn parse_number(text: &str) -> f64 {
    let s = text.trim();
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&s[2..], radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }

    // Rust's float parser also accepts "inf" and "nan"; reject those here
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return f64::NAN;
    }

    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Loose equality: absent/null matches only null, everything else compares
/// by stringified form.
pub fn loose_equals(actual: Option<&Value>, expected: &Value) -> bool {
    if is_nullish(actual) {
        return expected.is_null();
    }
    if expected.is_null() {
        return false;
    }
    to_display_string(actual) == stringify(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stringify_scalars() {
        assert_eq!(to_display_string(None), "undefined");
        assert_eq!(to_display_string(Some(&json!(null))), "null");
        assert_eq!(to_display_string(Some(&json!(true))), "true");
        assert_eq!(to_display_string(Some(&json!(18))), "18");
        assert_eq!(to_display_string(Some(&json!(18.0))), "18");
        assert_eq!(to_display_string(Some(&json!(1.5))), "1.5");
        assert_eq!(to_display_string(Some(&json!(1e21))), "1e+21");
        assert_eq!(to_display_string(Some(&json!(1e-7))), "1e-7");
        assert_eq!(to_display_string(Some(&json!("abc"))), "abc");
    }

    #[test]
    fn test_stringify_compound() {
        assert_eq!(to_display_string(Some(&json!(["a", "b"]))), "a,b");
        assert_eq!(to_display_string(Some(&json!([1, null, 3]))), "1,,3");
        assert_eq!(to_display_string(Some(&json!([]))), "");
        assert_eq!(
            to_display_string(Some(&json!({"name": "cv.pdf"}))),
            "[object Object]"
        );
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(Some(&json!("18"))), 18.0);
        assert_eq!(to_number(Some(&json!(" 2.5 "))), 2.5);
        assert_eq!(to_number(Some(&json!(""))), 0.0);
        assert_eq!(to_number(Some(&json!(null))), 0.0);
        assert_eq!(to_number(Some(&json!(true))), 1.0);
        assert_eq!(to_number(Some(&json!(false))), 0.0);
        assert_eq!(to_number(Some(&json!("0x10"))), 16.0);
        assert_eq!(to_number(Some(&json!([7]))), 7.0);
        assert_eq!(to_number(Some(&json!([]))), 0.0);
        assert_eq!(to_number(Some(&json!("-Infinity"))), f64::NEG_INFINITY);
    }

    #[test]
    fn test_to_number_nan_cases() {
        assert!(to_number(None).is_nan());
        assert!(to_number(Some(&json!("abc"))).is_nan());
        assert!(to_number(Some(&json!("inf"))).is_nan());
        assert!(to_number(Some(&json!("nan"))).is_nan());
        assert!(to_number(Some(&json!("12px"))).is_nan());
        assert!(to_number(Some(&json!([1, 2]))).is_nan());
        assert!(to_number(Some(&json!({}))).is_nan());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(123.456), "123.456");
        assert_eq!(format_number(-42.0), "-42");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(-2.5e30), "-2.5e+30");
    }

    #[test]
    fn test_loose_equals() {
        assert!(loose_equals(Some(&json!("18")), &json!(18)));
        assert!(loose_equals(Some(&json!(18.0)), &json!("18")));
        assert!(loose_equals(Some(&json!(true)), &json!("true")));
        assert!(!loose_equals(Some(&json!("18")), &json!(19)));
        assert!(loose_equals(None, &json!(null)));
        assert!(loose_equals(Some(&json!(null)), &json!(null)));
        assert!(!loose_equals(None, &json!("undefined")));
        assert!(!loose_equals(Some(&json!("null")), &json!(null)));
        assert!(loose_equals(Some(&json!("1e-7")), &json!(1e-7)));
        assert!(loose_equals(Some(&json!("1e+21")), &json!(1e21)));
    }
}
