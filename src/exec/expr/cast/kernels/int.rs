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
use crate::types::{
    Datum, Decimal, Duration, EvalType, FieldFlags, FieldKind, Json, ScalarValue, Time,
};

use super::{finish_str, finish_time, invalid_time, time_kind};

pub(super) fn eval(sig: &CastSignature, v: i64, ctx: &mut EvalContext) -> Result<Datum> {
    let source_unsigned = sig.source().is_unsigned();
    let target = sig.target();
    // union statements clamp negative signed values read into unsigned targets
    let clamp_negative = sig.in_union() && !source_unsigned && v < 0;
    match sig.code().target() {
        EvalType::Int => {
            let v = if clamp_negative && target.is_unsigned() { 0 } else { v };
            Ok(Some(ScalarValue::Int(v)))
        }
        EvalType::Real => {
            let f = if !target.is_unsigned() && !source_unsigned {
                v as f64
            } else if clamp_negative {
                0.0
            } else {
                v as u64 as f64
            };
            Ok(Some(ScalarValue::Real(f)))
        }
        EvalType::Decimal => {
            let dec = if !target.is_unsigned() && !source_unsigned {
                Decimal::from_i64(v)
            } else if clamp_negative {
                Decimal::ZERO
            } else {
                Decimal::from_u64(v as u64)
            };
            let dec = produce_dec_with_specified_tp(ctx, dec, target)?;
            Ok(Some(ScalarValue::Decimal(dec)))
        }
        EvalType::String => {
            let mut s = if source_unsigned {
                (v as u64).to_string()
            } else {
                v.to_string()
            };
            if sig.source().kind == FieldKind::Year && s == "0" {
                s = "0000".to_string();
            }
            finish_str(ctx, s.into_bytes(), target)
        }
        EvalType::Time => {
            let kind = time_kind(target)?;
            let tz = ctx.time_zone();
            let parsed = if sig.source().kind == FieldKind::Year {
                Time::from_year(v).and_then(|t| t.convert(kind, tz))
            } else {
                Time::from_num(v, kind, target.fsp(), tz)
            };
            match parsed {
                Ok(t) => Ok(finish_time(t, target)),
                Err(err) => invalid_time(ctx, err),
            }
        }
        EvalType::Duration => match Duration::from_num(v, target.fsp()) {
            Ok(d) => Ok(Some(ScalarValue::Duration(d))),
            Err(err @ CastError::Overflow(_)) => {
                ctx.handle_overflow(err)?;
                Ok(None)
            }
            Err(err) => {
                ctx.handle_truncate(err)?;
                Ok(None)
            }
        },
        EvalType::Json => {
            let json = if sig.source().has_flag(FieldFlags::IS_BOOLEAN) {
                Json::Bool(v != 0)
            } else if source_unsigned {
                Json::Uint(v as u64)
            } else {
                Json::Int(v)
            };
            Ok(Some(ScalarValue::Json(json)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{lax, run, sig, strict, union_sig};
    use super::*;
    use crate::types::{FieldType, TimeKind};

    fn int() -> FieldType {
        FieldType::new(FieldKind::LongLong)
    }

    fn uint() -> FieldType {
        FieldType::new(FieldKind::LongLong).unsigned()
    }

    #[test]
    fn test_int_as_int_union_clamps_negatives() {
        let mut ctx = strict();
        let plain = sig(int(), uint());
        assert_eq!(
            run(&plain, ScalarValue::Int(-1), &mut ctx),
            Some(ScalarValue::Int(-1))
        );
        let union = union_sig(int(), uint());
        assert_eq!(
            run(&union, ScalarValue::Int(-1), &mut ctx),
            Some(ScalarValue::Int(0))
        );
        let unsigned_source = union_sig(uint(), uint());
        assert_eq!(
            run(&unsigned_source, ScalarValue::uint(u64::MAX), &mut ctx),
            Some(ScalarValue::uint(u64::MAX))
        );
    }

    #[test]
    fn test_int_as_real_respects_signedness() {
        let mut ctx = strict();
        let double = FieldType::new(FieldKind::Double);
        assert_eq!(
            run(&sig(int(), double.clone()), ScalarValue::Int(-3), &mut ctx),
            Some(ScalarValue::Real(-3.0))
        );
        assert_eq!(
            run(&sig(uint(), double.clone()), ScalarValue::uint(u64::MAX), &mut ctx),
            Some(ScalarValue::Real(u64::MAX as f64))
        );
        assert_eq!(
            run(&union_sig(int(), double.unsigned()), ScalarValue::Int(-3), &mut ctx),
            Some(ScalarValue::Real(0.0))
        );
    }

    #[test]
    fn test_int_as_decimal_applies_target_shape() {
        let mut ctx = lax();
        let target = FieldType::new(FieldKind::NewDecimal).with_flen(3).with_decimal(1);
        assert_eq!(
            run(&sig(int(), target.clone()), ScalarValue::Int(12), &mut ctx),
            Some(ScalarValue::Decimal("12.0".parse().unwrap()))
        );
        assert_eq!(
            run(&sig(int(), target), ScalarValue::Int(1234), &mut ctx),
            Some(ScalarValue::Decimal("99.9".parse().unwrap()))
        );
        assert_eq!(ctx.warnings().len(), 1);
    }

    #[test]
    fn test_int_as_string() {
        let mut ctx = strict();
        let text = FieldType::new(FieldKind::VarString);
        assert_eq!(
            run(&sig(uint(), text.clone()), ScalarValue::uint(u64::MAX), &mut ctx),
            Some(ScalarValue::str("18446744073709551615"))
        );
        let year = FieldType::new(FieldKind::Year);
        assert_eq!(
            run(&sig(year, text), ScalarValue::Int(0), &mut ctx),
            Some(ScalarValue::str("0000"))
        );
    }

    #[test]
    fn test_int_as_fixed_binary_pads_with_zeros() {
        let mut ctx = strict();
        let mut binary = FieldType::new(FieldKind::String).with_flen(4);
        binary.set_binary_charset();
        assert_eq!(
            run(&sig(int(), binary), ScalarValue::Int(7), &mut ctx),
            Some(ScalarValue::Str(b"7\0\0\0".to_vec()))
        );
    }

    #[test]
    fn test_int_as_time() {
        let mut ctx = lax();
        let date = FieldType::new(FieldKind::Date);
        let Some(ScalarValue::Time(t)) = run(&sig(int(), date.clone()), ScalarValue::Int(20230401), &mut ctx)
        else {
            panic!("expected a time");
        };
        assert_eq!(t.to_string(), "2023-04-01");
        assert_eq!(t.kind(), TimeKind::Date);

        let Some(ScalarValue::Time(zero)) = run(&sig(int(), date.clone()), ScalarValue::Int(0), &mut ctx)
        else {
            panic!("expected the zero date");
        };
        assert!(zero.is_zero());

        assert_eq!(run(&sig(int(), date), ScalarValue::Int(20231399), &mut ctx), None);
        assert_eq!(ctx.warnings().len(), 1);
    }

    #[test]
    fn test_year_as_datetime() {
        let mut ctx = strict();
        let Some(ScalarValue::Time(t)) = run(
            &sig(FieldType::new(FieldKind::Year), FieldType::new(FieldKind::Datetime)),
            ScalarValue::Int(2024),
            &mut ctx,
        ) else {
            panic!("expected a time");
        };
        assert_eq!(t.year(), 2024);
        assert_eq!(t.month(), 0);
    }

    #[test]
    fn test_int_as_duration() {
        let mut ctx = lax();
        let time = FieldType::new(FieldKind::Duration);
        let Some(ScalarValue::Duration(d)) = run(&sig(int(), time.clone()), ScalarValue::Int(-102030), &mut ctx)
        else {
            panic!("expected a duration");
        };
        assert_eq!(d.to_string(), "-10:20:30");
        assert_eq!(run(&sig(int(), time.clone()), ScalarValue::Int(8390000), &mut ctx), None);
        assert_eq!(run(&sig(int(), time), ScalarValue::Int(1261), &mut ctx), None);
        assert_eq!(ctx.warnings().len(), 2);
    }

    #[test]
    fn test_int_as_json() {
        let mut ctx = strict();
        let json = FieldType::new(FieldKind::Json);
        let boolean = int().with_flags(FieldFlags::IS_BOOLEAN);
        assert_eq!(
            run(&sig(boolean, json.clone()), ScalarValue::Int(5), &mut ctx),
            Some(ScalarValue::Json(Json::Bool(true)))
        );
        assert_eq!(
            run(&sig(uint(), json.clone()), ScalarValue::uint(u64::MAX), &mut ctx),
            Some(ScalarValue::Json(Json::Uint(u64::MAX)))
        );
        assert_eq!(
            run(&sig(int(), json), ScalarValue::Int(-9), &mut ctx),
            Some(ScalarValue::Json(Json::Int(-9)))
        );
    }
}
