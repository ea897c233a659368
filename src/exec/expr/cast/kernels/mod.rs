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
//! Conversion kernels, one module per source domain.

mod decimal;
mod duration;
mod int;
mod json;
mod real;
mod string;
mod time;

use crate::common::error::{CastError, Result};
use crate::exec::context::EvalContext;
use crate::exec::expr::cast::CastSignature;
use crate::exec::expr::cast::convert::{pad_zero_for_binary_type, produce_str_with_specified_tp};
use crate::types::{Datum, EvalType, FieldKind, FieldType, ScalarValue, Time, TimeKind};

pub(super) fn eval(sig: &CastSignature, value: ScalarValue, ctx: &mut EvalContext) -> Result<Datum> {
    match sig.code().source() {
        EvalType::Int => int::eval(sig, value.into_int()?, ctx),
        EvalType::Real => real::eval(sig, value.into_real()?, ctx),
        EvalType::Decimal => decimal::eval(sig, value.into_decimal()?, ctx),
        EvalType::String => string::eval(sig, value, ctx),
        EvalType::Time => time::eval(sig, value.into_time()?, ctx),
        EvalType::Duration => duration::eval(sig, value.into_duration()?, ctx),
        EvalType::Json => json::eval(sig, value.into_json()?, ctx),
    }
}

fn time_kind(target: &FieldType) -> Result<TimeKind> {
    TimeKind::from_field_kind(target.kind).ok_or_else(|| {
        CastError::internal(format!("{} is not a date or datetime type", target.sql_name()))
    })
}

/// DATE targets drop the time of day.
fn finish_time(t: Time, target: &FieldType) -> Datum {
    let t = if target.kind == FieldKind::Date {
        t.truncate_to_date()
    } else {
        t
    };
    Some(ScalarValue::Time(t))
}

fn finish_str(ctx: &mut EvalContext, s: Vec<u8>, target: &FieldType) -> Result<Datum> {
    let s = produce_str_with_specified_tp(ctx, s, target)?;
    Ok(pad_zero_for_binary_type(ctx, s, target)?.map(ScalarValue::Str))
}

/// Invalid temporal input is NULL once the policy lets it through.
fn invalid_time(ctx: &mut EvalContext, err: CastError) -> Result<Datum> {
    ctx.handle_invalid_time(err)?;
    Ok(None)
}
