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
use crate::exec::expr::{ExprArena, ExprId};
use crate::types::{Datum, Decimal, EvalType, ScalarValue};

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// `DAYNAME(d)`. Read as a string it is the English day name, read as a
/// number it is the weekday index with Monday as 0.
pub(crate) fn eval_dayname(
    arena: &ExprArena,
    args: &[ExprId],
    domain: EvalType,
    row: &[Datum],
    ctx: &mut EvalContext,
) -> Result<Datum> {
    let Some(value) = arena.eval_as(args[0], EvalType::Time, row, ctx)? else {
        return Ok(None);
    };
    let time = value.into_time()?;
    let Some(weekday) = time.weekday() else {
        ctx.handle_invalid_time(CastError::wrong_value("datetime", time))?;
        return Ok(None);
    };
    let value = match domain {
        EvalType::String => ScalarValue::str(DAY_NAMES[weekday as usize % 7]),
        EvalType::Int => ScalarValue::Int(weekday as i64),
        EvalType::Real => ScalarValue::Real(weekday as f64),
        EvalType::Decimal => ScalarValue::Decimal(Decimal::from_i64(weekday as i64)),
        other => {
            return Err(CastError::internal(format!("dayname cannot produce {other}")));
        }
    };
    Ok(Some(value))
}
