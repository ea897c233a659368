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
    produce_dec_with_specified_tp, str_to_decimal, str_to_float, str_to_int, str_to_uint,
};
use crate::types::number::{convert_float_to_int, convert_float_to_uint, valid_int_prefix};
use crate::types::{Datum, Decimal, DecimalStatus, Duration, EvalType, Json, ScalarValue, Time};

use super::{finish_str, finish_time, invalid_time, time_kind};

pub(super) fn eval(sig: &CastSignature, j: Json, ctx: &mut EvalContext) -> Result<Datum> {
    let target = sig.target();
    match sig.code().target() {
        EvalType::Int => json_to_int(&j, target.is_unsigned(), &target.sql_name(), ctx)
            .map(|v| Some(ScalarValue::Int(v))),
        EvalType::Real => json_to_float(&j, ctx).map(|f| Some(ScalarValue::Real(f))),
        EvalType::Decimal => {
            let dec = match &j {
                Json::String(s) => str_to_decimal(ctx, s)?,
                other => {
                    let f = json_to_float(other, ctx)?;
                    let (dec, status) = Decimal::from_f64(f);
                    if status == DecimalStatus::Overflow {
                        ctx.handle_overflow(CastError::overflow("DECIMAL", other))?;
                    }
                    dec
                }
            };
            let dec = produce_dec_with_specified_tp(ctx, dec, target)?;
            Ok(Some(ScalarValue::Decimal(dec)))
        }
        EvalType::String => finish_str(ctx, j.to_string().into_bytes(), target),
        EvalType::Json => Ok(Some(ScalarValue::Json(j))),
        EvalType::Time => {
            let kind = time_kind(target)?;
            let Json::String(s) = &j else {
                return invalid_time(ctx, CastError::wrong_value("datetime", &j));
            };
            match Time::parse(s, kind, target.fsp(), ctx.time_zone()) {
                Ok(t) if t.is_zero() && ctx.no_zero_date() => {
                    invalid_time(ctx, CastError::wrong_value("datetime", t))
                }
                Ok(t) => Ok(finish_time(t, target)),
                Err(err) => invalid_time(ctx, err),
            }
        }
        EvalType::Duration => {
            let Json::String(s) = &j else {
                return invalid_time(ctx, CastError::wrong_value("time", &j));
            };
            match Duration::parse(s, target.fsp()) {
                Ok(d) => Ok(Some(ScalarValue::Duration(d))),
                Err(err) => {
                    ctx.handle_truncate(err.error)?;
                    Ok(Some(ScalarValue::Duration(err.fallback)))
                }
            }
        }
    }
}

fn incompatible(j: &Json, target: &str) -> Result<()> {
    match j {
        Json::Array(_) | Json::Object(_) => Err(CastError::incompatible_json(target, j.json_type())),
        _ => Ok(()),
    }
}

/// JSON numbers keep their exactness: integers are reinterpreted, doubles
/// rounded, strings read like CAST of a string.
fn json_to_int(j: &Json, unsigned: bool, type_name: &str, ctx: &mut EvalContext) -> Result<i64> {
    incompatible(j, type_name)?;
    let (v, overflowed) = match j {
        Json::Null | Json::Bool(false) => (0, false),
        Json::Bool(true) => (1, false),
        Json::Int(i) => (*i, false),
        Json::Uint(u) if unsigned => (*u as i64, false),
        Json::Uint(u) => match i64::try_from(*u) {
            Ok(i) => (i, false),
            Err(_) => (i64::MAX, true),
        },
        Json::Double(f) => float_to_int(*f, unsigned),
        Json::String(s) => {
            let trimmed = s.trim();
            let prefix = valid_int_prefix(trimmed);
            let is_integer = !prefix.trim_start_matches(['+', '-']).is_empty() && prefix.len() == trimmed.len();
            if is_integer && !trimmed.starts_with('-') {
                let (u, overflowed) = str_to_uint(ctx, trimmed)?;
                (u as i64, overflowed)
            } else if is_integer {
                str_to_int(ctx, trimmed)?
            } else {
                float_to_int(str_to_float(ctx, trimmed)?, unsigned)
            }
        }
        Json::Array(_) | Json::Object(_) => (0, false),
    };
    if overflowed {
        ctx.handle_overflow(CastError::overflow(type_name, j))?;
    }
    Ok(v)
}

fn float_to_int(f: f64, unsigned: bool) -> (i64, bool) {
    if unsigned {
        let (u, overflowed) = convert_float_to_uint(f);
        (u as i64, overflowed)
    } else {
        convert_float_to_int(f)
    }
}

fn json_to_float(j: &Json, ctx: &mut EvalContext) -> Result<f64> {
    incompatible(j, "DOUBLE")?;
    Ok(match j {
        Json::Null | Json::Bool(false) => 0.0,
        Json::Bool(true) => 1.0,
        Json::Int(i) => *i as f64,
        Json::Uint(u) => *u as f64,
        Json::Double(f) => *f,
        Json::String(s) => str_to_float(ctx, s)?,
        Json::Array(_) | Json::Object(_) => 0.0,
    })
}
