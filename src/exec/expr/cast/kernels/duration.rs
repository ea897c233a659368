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
use crate::types::{Datum, Duration, EvalType, Json, ScalarValue, Time};

use super::{finish_str, finish_time, invalid_time, time_kind};

pub(super) fn eval(sig: &CastSignature, d: Duration, ctx: &mut EvalContext) -> Result<Datum> {
    let target = sig.target();
    match sig.code().target() {
        EvalType::Int => {
            let (v, _) = d.round_frac(0).to_number().to_i64();
            Ok(Some(ScalarValue::Int(v)))
        }
        EvalType::Real => {
            let d = d.with_fsp(Duration::check_fsp(d.fsp() as i32)?);
            Ok(Some(ScalarValue::Real(d.to_number().to_f64())))
        }
        EvalType::Decimal => {
            let d = d.with_fsp(Duration::check_fsp(d.fsp() as i32)?);
            let dec = produce_dec_with_specified_tp(ctx, d.to_number(), target)?;
            Ok(Some(ScalarValue::Decimal(dec)))
        }
        EvalType::String => finish_str(ctx, d.to_string().into_bytes(), target),
        EvalType::Time => {
            let converted = time_kind(target)
                .and_then(|kind| Time::from_duration(d, ctx.stmt_date(), kind, ctx.time_zone()))
                .and_then(|t| t.round_frac(target.fsp()));
            match converted {
                Ok(t) => Ok(finish_time(t, target)),
                Err(err) => invalid_time(ctx, err),
            }
        }
        EvalType::Duration => Ok(Some(ScalarValue::Duration(d.round_frac(target.fsp())))),
        EvalType::Json => Ok(Some(ScalarValue::Json(Json::String(
            d.with_fsp(6).to_string(),
        )))),
    }
}
