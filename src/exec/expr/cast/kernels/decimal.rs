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
use crate::exec::expr::cast::convert::produce_dec_with_specified_tp;
use crate::types::{Datum, Decimal, Duration, EvalType, Json, ScalarValue, Time};

use super::{finish_str, finish_time, invalid_time, time_kind};

pub(super) fn eval(sig: &CastSignature, v: Decimal, ctx: &mut EvalContext) -> Result<Datum> {
    let target = sig.target();
    let clamp_negative = sig.in_union() && target.is_unsigned() && v.is_negative();
    match sig.code().target() {
        EvalType::Int => {
            let Ok(rounded) = v.round(0) else {
                return Err(CastError::overflow("DECIMAL", v));
            };
            let (out, overflowed) = if !target.is_unsigned() {
                rounded.to_i64()
            } else if clamp_negative {
                (0, false)
            } else {
                let (u, overflowed) = rounded.to_u64();
                (u as i64, overflowed)
            };
            if overflowed {
                ctx.handle_overflow(CastError::overflow(&target.sql_name(), v))?;
            }
            Ok(Some(ScalarValue::Int(out)))
        }
        EvalType::Real => {
            let f = if clamp_negative { 0.0 } else { v.to_f64() };
            Ok(Some(ScalarValue::Real(f)))
        }
        EvalType::Decimal => {
            let v = if clamp_negative { Decimal::ZERO } else { v };
            let dec = produce_dec_with_specified_tp(ctx, v, target)?;
            Ok(Some(ScalarValue::Decimal(dec)))
        }
        EvalType::String => finish_str(ctx, v.to_string().into_bytes(), target),
        EvalType::Time => {
            let kind = time_kind(target)?;
            match Time::from_float_str(&v.to_string(), kind, target.fsp(), ctx.time_zone()) {
                Ok(t) => Ok(finish_time(t, target)),
                Err(err) => invalid_time(ctx, err),
            }
        }
        EvalType::Duration => match Duration::parse(&v.to_string(), target.fsp()) {
            Ok(d) => Ok(Some(ScalarValue::Duration(d))),
            Err(err) => {
                ctx.handle_truncate(err.error)?;
                Ok(None)
            }
        },
        EvalType::Json => Ok(Some(ScalarValue::Json(Json::Double(v.to_f64())))),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{lax, run, sig, strict, union_sig};
    use super::*;
    use crate::types::{FieldKind, FieldType};

    fn dec(s: &str) -> ScalarValue {
        ScalarValue::Decimal(s.parse().unwrap())
    }

    fn decimal_type() -> FieldType {
        FieldType::new(FieldKind::NewDecimal).with_flen(20).with_decimal(4)
    }

    #[test]
    fn test_decimal_as_int_rounds_half_up() {
        let mut ctx = strict();
        let int = FieldType::new(FieldKind::LongLong);
        for (input, expected) in [("2.5", 3), ("-2.5", -3), ("2.4999", 2), ("0.5", 1)] {
            assert_eq!(
                run(&sig(decimal_type(), int.clone()), dec(input), &mut ctx),
                Some(ScalarValue::Int(expected)),
                "{input}"
            );
        }
    }

    #[test]
    fn test_decimal_as_int_overflow_saturates() {
        let mut ctx = lax();
        let int = FieldType::new(FieldKind::LongLong);
        assert_eq!(
            run(&sig(decimal_type(), int), dec("99999999999999999999"), &mut ctx),
            Some(ScalarValue::Int(i64::MAX))
        );
        assert_eq!(ctx.warnings().len(), 1);

        let uint = FieldType::new(FieldKind::LongLong).unsigned();
        assert_eq!(
            run(&sig(decimal_type(), uint.clone()), dec("-1"), &mut ctx),
            Some(ScalarValue::Int(0))
        );
        assert_eq!(ctx.warnings().len(), 2);
        assert_eq!(
            run(&union_sig(decimal_type(), uint), dec("-7.5"), &mut ctx),
            Some(ScalarValue::Int(0))
        );
        assert_eq!(ctx.warnings().len(), 2);
    }

    #[test]
    fn test_decimal_as_int_rounding_overflow_is_an_error() {
        use arrow_buffer::i256;

        let mut ctx = lax();
        let int = FieldType::new(FieldKind::LongLong);
        let unscaled = i256::from_string(&format!("{}5", "9".repeat(65))).unwrap();
        let wide = ScalarValue::Decimal(Decimal::new(unscaled, 1));
        assert!(super::super::eval(&sig(decimal_type(), int), wide, &mut ctx).is_err());
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_decimal_as_real() {
        let mut ctx = strict();
        let double = FieldType::new(FieldKind::Double);
        assert_eq!(
            run(&sig(decimal_type(), double.clone()), dec("-1.25"), &mut ctx),
            Some(ScalarValue::Real(-1.25))
        );
        assert_eq!(
            run(&union_sig(decimal_type(), double.unsigned()), dec("-1.25"), &mut ctx),
            Some(ScalarValue::Real(0.0))
        );
    }

    #[test]
    fn test_decimal_as_decimal_reshapes() {
        let mut ctx = strict();
        let target = FieldType::new(FieldKind::NewDecimal).with_flen(5).with_decimal(1);
        assert_eq!(
            run(&sig(decimal_type(), target), dec("12.35"), &mut ctx),
            Some(dec("12.4"))
        );
        assert_eq!(
            ctx.warnings(),
            &[CastError::truncated_wrong_value("DECIMAL", "12.35")]
        );
    }

    #[test]
    fn test_decimal_as_string_and_json() {
        let mut ctx = strict();
        assert_eq!(
            run(&sig(decimal_type(), FieldType::new(FieldKind::VarString)), dec("-0.050"), &mut ctx),
            Some(ScalarValue::str("-0.050"))
        );
        assert_eq!(
            run(&sig(decimal_type(), FieldType::new(FieldKind::Json)), dec("2.50"), &mut ctx),
            Some(ScalarValue::Json(Json::Double(2.5)))
        );
    }

    #[test]
    fn test_decimal_as_temporal() {
        let mut ctx = lax();
        let datetime = FieldType::new(FieldKind::Datetime).with_decimal(2);
        let Some(ScalarValue::Time(t)) = run(&sig(decimal_type(), datetime), dec("20230401102030.125"), &mut ctx)
        else {
            panic!("expected a datetime");
        };
        assert_eq!(t.to_string(), "2023-04-01 10:20:30.13");

        let time = FieldType::new(FieldKind::Duration);
        let Some(ScalarValue::Duration(d)) = run(&sig(decimal_type(), time.clone()), dec("1020.4"), &mut ctx)
        else {
            panic!("expected a duration");
        };
        assert_eq!(d.to_string(), "00:10:20");
        assert_eq!(run(&sig(decimal_type(), time), dec("1070"), &mut ctx), None);
        assert_eq!(ctx.warnings().len(), 1);
    }
}
