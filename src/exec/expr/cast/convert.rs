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
//! Range and length adjustments shared by the kernels. Each helper reports
//! lost information through the context's strictness policy.

use crate::common::error::{CastError, Result};
use crate::exec::context::EvalContext;
use crate::types::field_type::{NOT_FIXED_DEC, UNSPECIFIED_LENGTH};
use crate::types::number::{truncate_float, valid_float_prefix, valid_int_prefix};
use crate::types::{Charset, Decimal, DecimalStatus, FieldKind, FieldType};

/// Integer prefix of a trimmed numeral; the rest of the text is a truncation.
fn int_prefix<'a>(ctx: &mut EvalContext, s: &'a str) -> Result<&'a str> {
    let prefix = valid_int_prefix(s);
    let digits = prefix.trim_start_matches(['+', '-']);
    if digits.is_empty() || prefix.len() != s.len() {
        ctx.handle_truncate(CastError::truncated_wrong_value("INTEGER", s))?;
    }
    Ok(if digits.is_empty() { "0" } else { prefix })
}

/// Signed value of a numeral. The flag reports overflow; the value is then
/// the parse error's endpoint.
pub(crate) fn str_to_int(ctx: &mut EvalContext, s: &str) -> Result<(i64, bool)> {
    let s = s.trim();
    let prefix = int_prefix(ctx, s)?;
    Ok(match prefix.parse::<i64>() {
        Ok(v) => (v, false),
        Err(_) if prefix.starts_with('-') => (i64::MIN, true),
        Err(_) => (i64::MAX, true),
    })
}

pub(crate) fn str_to_uint(ctx: &mut EvalContext, s: &str) -> Result<(u64, bool)> {
    let s = s.trim();
    let prefix = int_prefix(ctx, s)?;
    let prefix = prefix.strip_prefix('+').unwrap_or(prefix);
    Ok(match prefix.parse::<u64>() {
        Ok(v) => (v, false),
        Err(_) => (u64::MAX, true),
    })
}

/// Float value of a numeral, clamped to the finite range.
pub(crate) fn str_to_float(ctx: &mut EvalContext, s: &str) -> Result<f64> {
    let s = s.trim();
    let prefix = valid_float_prefix(s);
    if prefix.is_empty() || prefix.len() != s.len() {
        ctx.handle_truncate(CastError::truncated_wrong_value("DOUBLE", s))?;
    }
    let value: f64 = if prefix.is_empty() {
        0.0
    } else {
        prefix.parse().unwrap_or(0.0)
    };
    if value.is_infinite() {
        ctx.handle_truncate(CastError::truncated_wrong_value("DOUBLE", s))?;
        return Ok(if value > 0.0 { f64::MAX } else { -f64::MAX });
    }
    Ok(value)
}

/// Decimal value of a numeral. Unparseable text reads as zero, extra
/// fraction digits are dropped.
pub(crate) fn str_to_decimal(ctx: &mut EvalContext, s: &str) -> Result<Decimal> {
    let (value, status) = Decimal::parse(s.trim());
    match status {
        DecimalStatus::Exact => {}
        DecimalStatus::Truncated | DecimalStatus::BadNumber => {
            ctx.handle_truncate(CastError::truncated_wrong_value("DECIMAL", s))?;
        }
        DecimalStatus::Overflow => {
            ctx.handle_overflow(CastError::overflow("DECIMAL", s))?;
        }
    }
    Ok(value)
}

/// Cuts `s` to the target length: bytes for binary strings, characters
/// otherwise. Dropping only trailing spaces from a CHAR or VARCHAR is a
/// warning; dropping anything else goes through the truncation policy.
pub(crate) fn produce_str_with_specified_tp(
    ctx: &mut EvalContext,
    s: Vec<u8>,
    tp: &FieldType,
) -> Result<Vec<u8>> {
    if tp.flen < 0 {
        return Ok(s);
    }
    let flen = tp.flen as usize;
    let byte_based = tp.charset == Charset::Binary || tp.is_binary_str();
    let (char_len, cut) = if byte_based {
        (s.len(), flen.min(s.len()))
    } else {
        (tp.charset.char_len(&s), tp.charset.char_boundary(&s, flen))
    };
    if char_len <= flen {
        return Ok(s);
    }
    let mut s = s;
    let overflowed = s.split_off(cut);
    let only_spaces = overflowed
        .iter()
        .all(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
    if only_spaces && !tp.is_binary_str() && tp.kind.is_char() {
        if tp.kind == FieldKind::Varchar {
            ctx.append_warning(CastError::data_truncated(flen, char_len));
        }
    } else {
        ctx.handle_truncate(CastError::data_too_long(flen, char_len))?;
    }
    Ok(s)
}

/// Zero-pads a fixed-length BINARY(n) result. `None` when n exceeds the
/// statement's max-allowed-packet.
pub(crate) fn pad_zero_for_binary_type(
    ctx: &mut EvalContext,
    s: Vec<u8>,
    tp: &FieldType,
) -> Result<Option<Vec<u8>>> {
    if tp.kind != FieldKind::String || !tp.is_binary_str() || tp.flen < 0 {
        return Ok(Some(s));
    }
    let flen = tp.flen as usize;
    if s.len() >= flen {
        return Ok(Some(s));
    }
    let max = ctx.max_allowed_packet();
    if flen as u64 > max {
        ctx.handle_overflow(CastError::allowed_packet_overflowed("cast_as_binary", max))?;
        return Ok(None);
    }
    let mut s = s;
    s.resize(flen, 0);
    Ok(Some(s))
}

/// Fits a decimal into DECIMAL(flen, decimal): out-of-range values become
/// the largest value of that shape, extra fraction digits are rounded half
/// up with a warning. Negative values become zero for unsigned targets.
pub(crate) fn produce_dec_with_specified_tp(
    ctx: &mut EvalContext,
    dec: Decimal,
    tp: &FieldType,
) -> Result<Decimal> {
    let (flen, decimal) = (tp.flen, tp.decimal);
    let mut dec = dec;
    if flen != UNSPECIFIED_LENGTH && decimal != UNSPECIFIED_LENGTH {
        if flen < decimal {
            return Err(CastError::m_bigger_than_d(flen, decimal));
        }
        let (precision, frac) = dec.precision_and_frac();
        let (precision, frac) = (precision as i32, frac as i32);
        if !dec.is_zero() && precision - frac > flen - decimal {
            let clamped = Decimal::max_or_min(dec.is_negative(), flen as u8, decimal as u8);
            ctx.handle_overflow(CastError::overflow(
                "DECIMAL",
                format!("({flen}, {decimal})"),
            ))?;
            dec = clamped;
        } else if frac != decimal {
            let old = dec;
            dec = match dec.round(decimal as u8) {
                Ok(rounded) => rounded,
                Err(_) => {
                    ctx.handle_overflow(CastError::overflow(
                        "DECIMAL",
                        format!("({flen}, {decimal})"),
                    ))?;
                    Decimal::max_or_min(old.is_negative(), flen as u8, decimal as u8)
                }
            };
            if !dec.is_zero() && frac > decimal && dec != old {
                ctx.append_warning(CastError::truncated_wrong_value("DECIMAL", old));
            }
        }
    }
    if tp.is_unsigned() && dec.is_negative() {
        dec = Decimal::ZERO;
    }
    Ok(dec)
}

/// Fits a double into FLOAT/DOUBLE(flen, decimal) and the unsigned and
/// single-precision ranges.
pub(crate) fn produce_float_with_specified_tp(
    ctx: &mut EvalContext,
    f: f64,
    tp: &FieldType,
) -> Result<f64> {
    let overflow = |v: f64| CastError::overflow(&tp.sql_name(), v);
    if f.is_nan() {
        ctx.handle_overflow(overflow(f))?;
        return Ok(0.0);
    }
    if f.is_infinite() {
        ctx.handle_overflow(overflow(f))?;
        return Ok(if f > 0.0 { f64::MAX } else { -f64::MAX });
    }
    let mut f = f;
    if tp.flen != UNSPECIFIED_LENGTH && (0..NOT_FIXED_DEC).contains(&tp.decimal) {
        let (truncated, overflowed) = truncate_float(f, tp.flen, tp.decimal);
        if overflowed {
            ctx.handle_overflow(overflow(f))?;
        }
        f = truncated;
    }
    if tp.is_unsigned() && f < 0.0 {
        ctx.handle_overflow(overflow(f))?;
        return Ok(0.0);
    }
    if tp.kind == FieldKind::Float && f.abs() > f32::MAX as f64 {
        ctx.handle_overflow(overflow(f))?;
        return Ok(f32::MAX as f64 * f.signum());
    }
    Ok(f)
}
