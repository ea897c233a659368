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
mod case_when;
mod if_func;

pub(super) use case_when::eval_case;
pub(super) use if_func::eval_if;

use crate::exec::context::EvalContext;
use crate::types::decimal::{MAX_PRECISION, MAX_SCALE};
use crate::types::field_type::{
    MAX_DATE_WIDTH, MAX_DATETIME_WIDTH_NO_FSP, MAX_DURATION_WIDTH_NO_FSP, MAX_INT_WIDTH,
    MAX_REAL_WIDTH, UNSPECIFIED_LENGTH,
};
use crate::types::number::parse_float_prefix;
use crate::types::{Charset, EvalType, FieldFlags, FieldKind, FieldType, Json, ScalarValue};

/// Truth value of an IF/CASE condition. NULL is false.
pub(crate) fn is_true(value: Option<&ScalarValue>) -> bool {
    match value {
        None => false,
        Some(ScalarValue::Int(v)) => *v != 0,
        Some(ScalarValue::Real(v)) => *v != 0.0,
        Some(ScalarValue::Decimal(v)) => !v.is_zero(),
        Some(ScalarValue::Str(bytes)) => parse_float_prefix(&String::from_utf8_lossy(bytes)) != 0.0,
        Some(ScalarValue::Time(t)) => !t.is_zero(),
        Some(ScalarValue::Duration(d)) => !d.is_zero(),
        Some(ScalarValue::Json(j)) => match j {
            Json::Null => false,
            Json::Bool(b) => *b,
            Json::Int(i) => *i != 0,
            Json::Uint(u) => *u != 0,
            Json::Double(d) => *d != 0.0,
            Json::String(s) => parse_float_prefix(s) != 0.0,
            Json::Array(_) | Json::Object(_) => true,
        },
    }
}

fn max_flen<'a>(types: impl IntoIterator<Item = &'a FieldType>) -> i32 {
    let mut out = 0;
    for tp in types {
        if tp.flen == UNSPECIFIED_LENGTH {
            return UNSPECIFIED_LENGTH;
        }
        out = out.max(tp.flen);
    }
    out
}

fn aggregate_decimal(types: &[&FieldType]) -> FieldType {
    let (mut int_digits, mut scale) = (0, 0);
    for tp in types {
        let (flen, decimal) = match tp.eval_type() {
            EvalType::Int => (if tp.flen > 0 { tp.flen } else { MAX_INT_WIDTH }, 0),
            _ if tp.flen == UNSPECIFIED_LENGTH => (MAX_PRECISION as i32, tp.decimal.max(0)),
            _ => (tp.flen, tp.decimal.max(0)),
        };
        int_digits = int_digits.max(flen - decimal);
        scale = scale.max(decimal);
    }
    let scale = scale.min(MAX_SCALE as i32);
    FieldType::new(FieldKind::NewDecimal)
        .with_flen((int_digits + scale).min(MAX_PRECISION as i32))
        .with_decimal(scale)
}

fn temporal_width(kind: FieldKind, fsp: i32) -> i32 {
    match kind {
        FieldKind::Date => MAX_DATE_WIDTH,
        FieldKind::Duration if fsp > 0 => MAX_DURATION_WIDTH_NO_FSP + 1 + fsp,
        FieldKind::Duration => MAX_DURATION_WIDTH_NO_FSP,
        _ if fsp > 0 => MAX_DATETIME_WIDTH_NO_FSP + 1 + fsp,
        _ => MAX_DATETIME_WIDTH_NO_FSP,
    }
}

/// Display width of a value of `tp` rendered as text.
fn text_width(tp: &FieldType) -> i32 {
    match tp.eval_type() {
        EvalType::Real => UNSPECIFIED_LENGTH,
        EvalType::Decimal if tp.flen >= 0 => tp.flen + 3,
        EvalType::Int if tp.kind == FieldKind::Bit && tp.flen > 0 => (tp.flen + 7) / 8,
        EvalType::Int => MAX_INT_WIDTH,
        _ => tp.flen,
    }
}

/// Return type of IF and CASE from the types of their value branches.
/// NULL-typed branches do not take part.
pub(super) fn aggregate_types(branches: &[FieldType], ctx: &EvalContext) -> FieldType {
    let typed: Vec<&FieldType> = branches.iter().filter(|t| t.kind != FieldKind::Null).collect();
    let mut out = match typed.first() {
        None => FieldType::new(FieldKind::Null),
        Some(first) => {
            let domains: Vec<EvalType> = typed.iter().map(|t| t.eval_type()).collect();
            let all = |domain: EvalType| domains.iter().all(|d| *d == domain);
            if all(EvalType::Int) {
                let mut tp = FieldType::new(FieldKind::LongLong)
                    .with_flen(max_flen(typed.iter().copied()))
                    .with_decimal(0);
                if typed.iter().all(|t| t.is_unsigned()) {
                    tp.add_flag(FieldFlags::UNSIGNED);
                }
                tp
            } else if domains.iter().all(|d| d.is_numeric()) {
                if domains.contains(&EvalType::Real) {
                    FieldType::new(FieldKind::Double)
                        .with_flen(MAX_REAL_WIDTH)
                        .with_decimal(UNSPECIFIED_LENGTH)
                } else {
                    aggregate_decimal(&typed)
                }
            } else if all(EvalType::Time) || all(EvalType::Duration) {
                let kind = if typed.iter().all(|t| t.kind == first.kind) {
                    first.kind
                } else {
                    FieldKind::Datetime
                };
                let fsp = typed.iter().map(|t| t.fsp() as i32).max().unwrap_or(0);
                FieldType::new(kind)
                    .with_decimal(fsp)
                    .with_flen(temporal_width(kind, fsp))
            } else if all(EvalType::Json) {
                FieldType::new(FieldKind::Json)
            } else {
                let flen = max_flen(
                    &typed
                        .iter()
                        .map(|t| FieldType::new(FieldKind::VarString).with_flen(text_width(t)))
                        .collect::<Vec<_>>(),
                );
                let tp = FieldType::new(FieldKind::VarString).with_flen(flen);
                if typed.iter().any(|t| t.is_binary_str()) {
                    tp.with_charset(Charset::Binary, Charset::Binary.default_collation())
                } else {
                    tp.with_charset(ctx.charset(), ctx.collation())
                }
            }
        }
    };
    if !branches.is_empty() && branches.iter().all(|t| t.is_not_null()) {
        out.add_flag(FieldFlags::NOT_NULL);
    }
    out
}
