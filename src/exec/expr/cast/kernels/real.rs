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
use crate::types::number::{convert_float_to_int, convert_float_to_uint, format_float};
use crate::types::{
    Datum, Decimal, DecimalStatus, Duration, EvalType, FieldKind, Json, ScalarValue, Time,
};

use super::{finish_str, finish_time, invalid_time, time_kind};

pub(super) fn eval(sig: &CastSignature, v: f64, ctx: &mut EvalContext) -> Result<Datum> {
    let target = sig.target();
    let clamp_negative = sig.in_union() && v < 0.0;
    match sig.code().target() {
        EvalType::Int => {
            let (out, overflowed) = if !target.is_unsigned() {
                convert_float_to_int(v)
            } else if clamp_negative {
                (0, false)
            } else {
                let (u, overflowed) = convert_float_to_uint(v);
                (u as i64, overflowed)
            };
            if overflowed {
                ctx.handle_overflow(CastError::overflow(&target.sql_name(), v))?;
            }
            Ok(Some(ScalarValue::Int(out)))
        }
        EvalType::Real => {
            let v = if clamp_negative && target.is_unsigned() { 0.0 } else { v };
            Ok(Some(ScalarValue::Real(v)))
        }
        EvalType::Decimal => {
            let dec = if clamp_negative {
                Decimal::ZERO
            } else {
                let (dec, status) = Decimal::from_f64(v);
                // lost fraction digits are accepted silently
                if status == DecimalStatus::Overflow {
                    ctx.handle_overflow(CastError::overflow("DECIMAL", format_float(v, false)))?;
                }
                dec
            };
            let dec = produce_dec_with_specified_tp(ctx, dec, target)?;
            Ok(Some(ScalarValue::Decimal(dec)))
        }
        EvalType::String => {
            let single = sig.source().kind == FieldKind::Float;
            finish_str(ctx, format_float(v, single).into_bytes(), target)
        }
        EvalType::Time => {
            let kind = time_kind(target)?;
            if v == 0.0 {
                return Ok(Some(ScalarValue::Time(Time::zero(kind, target.fsp()))));
            }
            let text = format_float(v, false);
            match Time::parse(&text, kind, target.fsp(), ctx.time_zone()) {
                Ok(t) => Ok(finish_time(t, target)),
                Err(err) => invalid_time(ctx, err),
            }
        }
        EvalType::Duration => match Duration::parse(&format_float(v, false), target.fsp()) {
            Ok(d) => Ok(Some(ScalarValue::Duration(d))),
            Err(err) => {
                ctx.handle_truncate(err.error)?;
                Ok(None)
            }
        },
        EvalType::Json => Ok(Some(ScalarValue::Json(Json::Double(v)))),
    }
}
