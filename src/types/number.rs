// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.
//! Float formatting and float/integer conversions shared by the kernels.

/// Shortest round-trip digits in plain positional notation. `single` selects
/// the digits of the 32-bit value, used for FLOAT columns.
pub fn format_float(value: f64, single: bool) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() { "-Inf" } else { "+Inf" }.to_string();
    }
    let mut buf = ryu::Buffer::new();
    let formatted = if single {
        buf.format_finite(value as f32)
    } else {
        buf.format_finite(value)
    };
    expand_exponent(formatted)
}

/// Rewrites ryu output such as `1.5e-7` or `1e21` without an exponent.
fn expand_exponent(formatted: &str) -> String {
    let stripped = formatted.strip_suffix(".0").unwrap_or(formatted);
    let Some(exp_pos) = stripped.find('e') else {
        return stripped.to_string();
    };
    let exp: i64 = stripped[exp_pos + 1..].parse().unwrap_or(0);
    let mantissa = &stripped[..exp_pos];
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(m) => ("-", m),
        None => ("", mantissa),
    };
    let (int_digits, frac_digits) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{int_digits}{frac_digits}");
    let point = int_digits.len() as i64 + exp;
    let body = if point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else if point as usize >= digits.len() {
        format!("{digits}{}", "0".repeat(point as usize - digits.len()))
    } else {
        let point = point as usize;
        format!("{}.{}", &digits[..point], &digits[point..])
    };
    format!("{sign}{body}")
}

/// JSON rendering of a double: positional, switching to an exponent below
/// 1e-6 and from 1e21 on.
pub fn format_json_double(value: f64) -> String {
    let abs = value.abs();
    if abs == 0.0 || (1e-6..1e21).contains(&abs) || !value.is_finite() {
        return format_float(value, false);
    }
    let mut buf = ryu::Buffer::new();
    let formatted = buf.format_finite(value);
    let stripped = formatted.strip_suffix(".0").unwrap_or(formatted);
    match stripped.find('e') {
        Some(exp_pos) if !matches!(stripped.as_bytes().get(exp_pos + 1), Some(b'-') | Some(b'+')) => {
            format!("{}+{}", &stripped[..=exp_pos], &stripped[exp_pos + 1..])
        }
        _ => stripped.to_string(),
    }
}

/// Rounds to the nearest integer, ties to even, like MySQL's `rint`.
pub fn round_float(value: f64) -> f64 {
    value.round_ties_even()
}

/// Rounds and saturates to i64. The flag reports overflow.
pub fn convert_float_to_int(value: f64) -> (i64, bool) {
    let rounded = round_float(value);
    if rounded.is_nan() {
        return (0, true);
    }
    if rounded < i64::MIN as f64 {
        return (i64::MIN, true);
    }
    if rounded >= i64::MAX as f64 {
        return (i64::MAX, true);
    }
    (rounded as i64, false)
}

/// Rounds and converts to u64. Negative values wrap through i64 and are
/// reported as overflow, values past the range saturate.
pub fn convert_float_to_uint(value: f64) -> (u64, bool) {
    let rounded = round_float(value);
    if rounded.is_nan() {
        return (0, true);
    }
    if rounded < 0.0 {
        return ((rounded as i64) as u64, true);
    }
    if rounded >= u64::MAX as f64 {
        return (u64::MAX, true);
    }
    (rounded as u64, false)
}

/// Rounds `value` to `decimal` digits and clamps it to FLOAT(flen, decimal).
pub fn truncate_float(value: f64, flen: i32, decimal: i32) -> (f64, bool) {
    if value.is_nan() {
        return (0.0, false);
    }
    let shift = 10f64.powi(decimal);
    let max = 10f64.powi(flen - decimal) - 1.0 / shift;
    let mut out = value;
    if value.is_finite() {
        let scaled = value * shift;
        if scaled.is_finite() {
            out = round_float(scaled) / shift;
        }
    }
    if out > max {
        (max, true)
    } else if out < -max {
        (-max, true)
    } else {
        (out, false)
    }
}

/// Longest leading `[+-]digits` run. Empty when `s` does not start with one.
pub fn valid_int_prefix(s: &str) -> &str {
    let mut end = 0;
    for (i, c) in s.bytes().enumerate() {
        if i == 0 && (c == b'+' || c == b'-') {
            continue;
        }
        if !c.is_ascii_digit() {
            break;
        }
        end = i + 1;
    }
    &s[..end]
}

/// Longest leading float numeral: sign, digits, one point, one exponent.
pub fn valid_float_prefix(s: &str) -> &str {
    let (mut saw_dot, mut saw_digit) = (false, false);
    let mut exp_pos: Option<usize> = None;
    let mut end = 0;
    for (i, c) in s.bytes().enumerate() {
        match c {
            b'+' | b'-' => {
                let after_exp = exp_pos.is_some_and(|e| e + 1 == i);
                if i != 0 && !after_exp {
                    break;
                }
            }
            b'.' => {
                if saw_dot || exp_pos.is_some() {
                    break;
                }
                saw_dot = true;
                if saw_digit {
                    end = i + 1;
                }
            }
            b'e' | b'E' => {
                if !saw_digit || exp_pos.is_some() {
                    break;
                }
                exp_pos = Some(i);
            }
            b'0'..=b'9' => {
                saw_digit = true;
                end = i + 1;
            }
            _ => break,
        }
    }
    &s[..end]
}

/// Float value of the leading numeral of `s`, 0 when there is none.
pub fn parse_float_prefix(s: &str) -> f64 {
    valid_float_prefix(s.trim()).parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float_positional() {
        assert_eq!(format_float(1.5, false), "1.5");
        assert_eq!(format_float(100.0, false), "100");
        assert_eq!(format_float(1e21, false), "1000000000000000000000");
        assert_eq!(format_float(1.5e-7, false), "0.00000015");
        assert_eq!(format_float(-2.5e3, false), "-2500");
        assert_eq!(format_float(0.1f32 as f64, true), "0.1");
        assert_eq!(format_float(0.1f32 as f64, false), "0.10000000149011612");
    }

    #[test]
    fn test_format_json_double() {
        assert_eq!(format_json_double(1.5), "1.5");
        assert_eq!(format_json_double(1e21), "1e+21");
        assert_eq!(format_json_double(1.5e-7), "1.5e-7");
        assert_eq!(format_json_double(0.0), "0");
    }

    #[test]
    fn test_float_to_int_rounding() {
        assert_eq!(convert_float_to_int(2.5), (2, false));
        assert_eq!(convert_float_to_int(3.5), (4, false));
        assert_eq!(convert_float_to_int(-2.6), (-3, false));
        assert_eq!(convert_float_to_int(1e30), (i64::MAX, true));
        assert_eq!(convert_float_to_uint(-1.0), (u64::MAX, true));
        assert_eq!(convert_float_to_uint(1e30), (u64::MAX, true));
    }

    #[test]
    fn test_truncate_float() {
        assert_eq!(truncate_float(123.456, 5, 2), (123.46, false));
        assert_eq!(truncate_float(12345.6, 5, 2), (999.99, true));
        assert_eq!(truncate_float(-12345.6, 5, 2), (-999.99, true));
    }

    #[test]
    fn test_valid_prefixes() {
        assert_eq!(valid_int_prefix("-12ab"), "-12");
        assert_eq!(valid_int_prefix("12.5"), "12");
        assert_eq!(valid_int_prefix("abc"), "");
        assert_eq!(valid_float_prefix("1.5e+3xyz"), "1.5e+3");
        assert_eq!(valid_float_prefix("1e"), "1");
        assert_eq!(valid_float_prefix("1.2.3"), "1.2");
        assert_eq!(valid_float_prefix("-.5"), "-.5");
        assert_eq!(valid_float_prefix("+.e"), "");
        assert_eq!(parse_float_prefix(" 3.25 apples"), 3.25);
        assert_eq!(parse_float_prefix("apples"), 0.0);
    }
}
