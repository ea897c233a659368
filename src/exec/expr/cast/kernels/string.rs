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
use crate::common::error::{CastError, Result};
use crate::exec::context::EvalContext;
use crate::exec::expr::cast::CastSignature;
use crate::exec::expr::cast::convert::{
    produce_dec_with_specified_tp, produce_float_with_specified_tp, str_to_decimal,
    str_to_float, str_to_int, str_to_uint,
};
use crate::types::{Datum, Decimal, Duration, EvalType, FieldFlags, Json, ScalarValue, Time};

use super::{finish_str, finish_time, invalid_time, time_kind};

pub(super) fn eval(sig: &CastSignature, value: ScalarValue, ctx: &mut EvalContext) -> Result<Datum> {
    // children evaluated numerically already hold the target's domain
    let bytes = match (value, sig.code().target()) {
        (ScalarValue::Int(v), EvalType::Int) => return Ok(Some(ScalarValue::Int(v))),
        (ScalarValue::Real(f), EvalType::Real) => return Ok(Some(ScalarValue::Real(f))),
        (value, _) => value.into_bytes()?,
    };
    let target = sig.target();
    match sig.code().target() {
        EvalType::Int => cast_string_as_int(sig, &String::from_utf8_lossy(&bytes), ctx),
        EvalType::Real => {
            let mut f = str_to_float(ctx, &String::from_utf8_lossy(&bytes))?;
            if sig.in_union() && target.is_unsigned() && f < 0.0 {
                f = 0.0;
            }
            let f = produce_float_with_specified_tp(ctx, f, target)?;
            Ok(Some(ScalarValue::Real(f)))
        }
        EvalType::Decimal => {
            let text = String::from_utf8_lossy(&bytes);
            let text = text.trim();
            let dec = if sig.in_union() && target.is_unsigned() && text.starts_with('-') {
                Decimal::ZERO
            } else {
                str_to_decimal(ctx, text)?
            };
            let dec = produce_dec_with_specified_tp(ctx, dec, target)?;
            Ok(Some(ScalarValue::Decimal(dec)))
        }
        EvalType::String => finish_str(ctx, bytes, target),
        EvalType::Time => {
            let kind = time_kind(target)?;
            let text = String::from_utf8_lossy(&bytes);
            let t = match Time::parse(&text, kind, target.fsp(), ctx.time_zone()) {
                Ok(t) => t,
                Err(err) => return invalid_time(ctx, err),
            };
            if t.is_zero() && ctx.no_zero_date() {
                return invalid_time(ctx, CastError::wrong_value("datetime", t));
            }
            Ok(finish_time(t, target))
        }
        EvalType::Duration => {
            match Duration::parse(&String::from_utf8_lossy(&bytes), target.fsp()) {
                Ok(d) => Ok(Some(ScalarValue::Duration(d))),
                Err(err) => {
                    ctx.handle_truncate(err.error)?;
                    if err.fallback.is_zero() {
                        Ok(None)
                    } else {
                        Ok(Some(ScalarValue::Duration(err.fallback)))
                    }
                }
            }
        }
        EvalType::Json => {
            let json = if target.has_flag(FieldFlags::PARSE_TO_JSON) {
                let text = std::str::from_utf8(&bytes).map_err(CastError::invalid_json_text)?;
                Json::parse(text)?
            } else {
                Json::String(String::from_utf8_lossy(&bytes).into_owned())
            };
            Ok(Some(ScalarValue::Json(json)))
        }
    }
}

fn cast_string_as_int(sig: &CastSignature, text: &str, ctx: &mut EvalContext) -> Result<Datum> {
    let target_unsigned = sig.target().is_unsigned();
    let text = text.trim();
    let negative = text.len() > 1 && text.starts_with('-');
    let (v, overflowed) = if !negative {
        let (u, overflowed) = str_to_uint(ctx, text)?;
        if !overflowed && !target_unsigned && u > i64::MAX as u64 {
            ctx.append_warning(CastError::cast_as_signed_overflow());
        }
        (u as i64, overflowed)
    } else if sig.in_union() && target_unsigned {
        (0, false)
    } else {
        let (v, overflowed) = str_to_int(ctx, text)?;
        if !overflowed && target_unsigned {
            ctx.append_warning(CastError::cast_neg_int_as_unsigned());
        }
        (v, overflowed)
    };
    if !overflowed {
        return Ok(Some(ScalarValue::Int(v)));
    }
    let clamped = if negative { i64::MIN } else { u64::MAX as i64 };
    ctx.handle_overflow(CastError::overflow(&sig.target().sql_name(), text))?;
    Ok(Some(ScalarValue::Int(clamped)))
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{lax, run, sig, strict, union_sig};
    use super::*;
    use crate::exec::expr::cast::ScalarFuncSig;
    use crate::types::{FieldKind, FieldType, TimeKind};

    fn text() -> FieldType {
        FieldType::new(FieldKind::VarString)
    }

    fn int() -> FieldType {
        FieldType::new(FieldKind::LongLong)
    }

    fn uint() -> FieldType {
        FieldType::new(FieldKind::LongLong).unsigned()
    }

    #[test]
    fn test_string_as_int() {
        let mut ctx = strict();
        assert_eq!(
            run(&sig(text(), int()), ScalarValue::str("  -42 "), &mut ctx),
            Some(ScalarValue::Int(-42))
        );
        assert_eq!(
            run(&sig(text(), uint()), ScalarValue::str("18446744073709551615"), &mut ctx),
            Some(ScalarValue::uint(u64::MAX))
        );
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_string_as_unsigned_overflow() {
        let mut ctx = lax();
        assert_eq!(
            run(&sig(text(), uint()), ScalarValue::str("99999999999999999999"), &mut ctx),
            Some(ScalarValue::uint(u64::MAX))
        );
        assert_eq!(
            ctx.warnings(),
            &[CastError::overflow("BIGINT UNSIGNED", "99999999999999999999")]
        );

        let mut strict = strict();
        assert!(
            super::super::eval(&sig(text(), uint()), ScalarValue::str("99999999999999999999"), &mut strict)
                .is_err()
        );
    }

    #[test]
    fn test_string_as_int_sign_complement_warnings() {
        let mut ctx = strict();
        assert_eq!(
            run(&sig(text(), int()), ScalarValue::str("18446744073709551615"), &mut ctx),
            Some(ScalarValue::Int(-1))
        );
        assert_eq!(run(&sig(text(), uint()), ScalarValue::str("-1"), &mut ctx), Some(ScalarValue::Int(-1)));
        assert_eq!(
            ctx.take_warnings(),
            vec![CastError::cast_as_signed_overflow(), CastError::cast_neg_int_as_unsigned()]
        );

        assert_eq!(
            run(&union_sig(text(), uint()), ScalarValue::str("-1"), &mut ctx),
            Some(ScalarValue::Int(0))
        );
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_string_as_int_truncates_to_prefix() {
        let mut ctx = lax();
        assert_eq!(
            run(&sig(text(), int()), ScalarValue::str("12abc"), &mut ctx),
            Some(ScalarValue::Int(12))
        );
        assert_eq!(
            ctx.warnings(),
            &[CastError::truncated_wrong_value("INTEGER", "12abc")]
        );
        let mut strict = strict();
        assert!(super::super::eval(&sig(text(), int()), ScalarValue::str("12abc"), &mut strict).is_err());
    }

    #[test]
    fn test_numeric_input_passes_through() {
        let mut ctx = strict();
        let code = ScalarFuncSig::CastStringAsInt;
        let implicit = CastSignature::new(code, text(), int(), EvalType::Int, false);
        assert_eq!(
            run(&implicit, ScalarValue::Int(4), &mut ctx),
            Some(ScalarValue::Int(4))
        );
    }

    #[test]
    fn test_string_as_real() {
        let mut ctx = lax();
        let double = FieldType::new(FieldKind::Double);
        assert_eq!(
            run(&sig(text(), double.clone()), ScalarValue::str("1.5e3"), &mut ctx),
            Some(ScalarValue::Real(1500.0))
        );
        let shaped = FieldType::new(FieldKind::Double).with_flen(4).with_decimal(1);
        assert_eq!(
            run(&sig(text(), shaped), ScalarValue::str("3.14159"), &mut ctx),
            Some(ScalarValue::Real(3.1))
        );
        assert_eq!(
            run(&union_sig(text(), double.unsigned()), ScalarValue::str("-2"), &mut ctx),
            Some(ScalarValue::Real(0.0))
        );
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_string_as_decimal() {
        let mut ctx = lax();
        let target = FieldType::new(FieldKind::NewDecimal).with_flen(6).with_decimal(2);
        assert_eq!(
            run(&sig(text(), target.clone()), ScalarValue::str(" 12.345 "), &mut ctx),
            Some(ScalarValue::Decimal("12.35".parse().unwrap()))
        );
        assert_eq!(
            run(&sig(text(), target), ScalarValue::str("7x"), &mut ctx),
            Some(ScalarValue::Decimal("7.00".parse().unwrap()))
        );
        assert_eq!(ctx.warnings().len(), 2);
    }

    #[test]
    fn test_string_as_string_truncates() {
        let mut ctx = lax();
        let short = FieldType::new(FieldKind::VarString).with_flen(3);
        assert_eq!(
            run(&sig(text(), short), ScalarValue::str("abcdef"), &mut ctx),
            Some(ScalarValue::str("abc"))
        );
        assert_eq!(ctx.warnings(), &[CastError::data_too_long(3, 6)]);
    }

    #[test]
    fn test_string_as_time() {
        let mut ctx = lax();
        let date = FieldType::new(FieldKind::Date);
        let Some(ScalarValue::Time(t)) = run(&sig(text(), date.clone()), ScalarValue::str("2023-04-01 10:20:30"), &mut ctx)
        else {
            panic!("expected a date");
        };
        assert_eq!(t.kind(), TimeKind::Date);
        assert_eq!(t.to_string(), "2023-04-01");
        assert_eq!(run(&sig(text(), date.clone()), ScalarValue::str("not a date"), &mut ctx), None);
        assert_eq!(ctx.warnings().len(), 1);

        let mut no_zero = lax().with_no_zero_date(true);
        assert_eq!(
            run(&sig(text(), date), ScalarValue::str("0000-00-00"), &mut no_zero),
            None
        );
        assert_eq!(no_zero.warnings().len(), 1);
    }

    #[test]
    fn test_string_as_duration() {
        let mut ctx = lax();
        let time = FieldType::new(FieldKind::Duration);
        let Some(ScalarValue::Duration(d)) = run(&sig(text(), time.clone()), ScalarValue::str("-1 02:03:04"), &mut ctx)
        else {
            panic!("expected a duration");
        };
        assert_eq!(d.to_string(), "-26:03:04");
        assert_eq!(run(&sig(text(), time.clone()), ScalarValue::str("garbage"), &mut ctx), None);
        let Some(ScalarValue::Duration(max)) = run(&sig(text(), time), ScalarValue::str("900:00:00"), &mut ctx)
        else {
            panic!("expected the clamped duration");
        };
        assert_eq!(max.to_string(), "838:59:59");
        assert_eq!(ctx.warnings().len(), 2);
    }

    #[test]
    fn test_string_as_json() {
        let mut ctx = strict();
        let plain = FieldType::new(FieldKind::Json);
        assert_eq!(
            run(&sig(text(), plain.clone()), ScalarValue::str("[1]"), &mut ctx),
            Some(ScalarValue::Json(Json::String("[1]".to_string())))
        );
        let parse = plain.with_flags(FieldFlags::PARSE_TO_JSON);
        assert_eq!(
            run(&sig(text(), parse.clone()), ScalarValue::str("[1]"), &mut ctx),
            Some(ScalarValue::Json(Json::Array(vec![Json::Int(1)])))
        );
        let mut lax = lax();
        assert!(super::super::eval(&sig(text(), parse), ScalarValue::str("{"), &mut lax).is_err());
        assert!(lax.warnings().is_empty());
    }
}
