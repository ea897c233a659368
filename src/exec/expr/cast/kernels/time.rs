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
use crate::common::error::Result;
use crate::exec::context::EvalContext;
use crate::exec::expr::cast::CastSignature;
use crate::exec::expr::cast::convert::produce_dec_with_specified_tp;
use crate::types::{Datum, EvalType, Json, ScalarValue, Time, TimeKind};

use super::{finish_str, finish_time, invalid_time, time_kind};

pub(super) fn eval(sig: &CastSignature, t: Time, ctx: &mut EvalContext) -> Result<Datum> {
    let target = sig.target();
    match sig.code().target() {
        EvalType::Int => {
            let (v, _) = t.round_frac(0)?.to_number().to_i64();
            Ok(Some(ScalarValue::Int(v)))
        }
        EvalType::Real => Ok(Some(ScalarValue::Real(t.to_number().to_f64()))),
        EvalType::Decimal => {
            let dec = produce_dec_with_specified_tp(ctx, t.to_number(), target)?;
            Ok(Some(ScalarValue::Decimal(dec)))
        }
        EvalType::String => finish_str(ctx, t.to_string().into_bytes(), target),
        EvalType::Time => {
            let converted = time_kind(target)
                .and_then(|kind| t.convert(kind, ctx.time_zone()))
                .and_then(|t| match t.kind() {
                    TimeKind::Date => Ok(t.truncate_to_date()),
                    _ => t.round_frac(target.fsp()),
                });
            match converted {
                Ok(t) => Ok(finish_time(t, target)),
                Err(err) => invalid_time(ctx, err),
            }
        }
        EvalType::Duration => Ok(Some(ScalarValue::Duration(
            t.to_duration().round_frac(target.fsp()),
        ))),
        EvalType::Json => {
            let t = match t.kind() {
                TimeKind::Datetime | TimeKind::Timestamp => t.with_fsp(6),
                TimeKind::Date => t,
            };
            Ok(Some(ScalarValue::Json(Json::String(t.to_string()))))
        }
    }
}
