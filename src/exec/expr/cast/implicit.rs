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
//! Implicit casts inserted while building function calls, one entry point
//! per target domain. Each is a no-op when the expression already has the
//! target domain.

use crate::common::error::Result;
use crate::exec::context::EvalContext;
use crate::exec::expr::cast::build_cast_function;
use crate::exec::expr::{ExprArena, ExprId, ExprNode};
use crate::types::field_type::{
    MAX_DATE_WIDTH, MAX_DATETIME_WIDTH_NO_FSP, MAX_DECIMAL_WIDTH, MAX_DURATION_WIDTH_NO_FSP,
    MAX_FSP, MAX_INT_WIDTH, MAX_JSON_WIDTH, MAX_REAL_WIDTH, UNSPECIFIED_LENGTH,
};
use crate::types::{Charset, EvalType, FieldFlags, FieldKind, FieldType, ScalarValue};

pub fn wrap_with_cast_as_int(
    arena: &mut ExprArena,
    ctx: &mut EvalContext,
    expr: ExprId,
) -> Result<ExprId> {
    let source = arena.field_type(expr)?.clone();
    if source.kind == FieldKind::Enum {
        // the enum is read through its index; the original node keeps its type
        let node = arena.get(expr)?.clone();
        let as_int = source.with_flags(FieldFlags::ENUM_SET_AS_INT);
        return Ok(arena.push_typed(node, as_int));
    }
    if source.eval_type() == EvalType::Int {
        return Ok(expr);
    }
    let mut tp = FieldType::new(FieldKind::LongLong)
        .with_flen(source.flen)
        .with_decimal(0);
    tp.set_binary_charset();
    if source.is_unsigned() {
        tp.add_flag(FieldFlags::UNSIGNED);
    }
    build_cast_function(arena, ctx, expr, tp)
}

pub fn wrap_with_cast_as_real(
    arena: &mut ExprArena,
    ctx: &mut EvalContext,
    expr: ExprId,
) -> Result<ExprId> {
    let source = arena.field_type(expr)?;
    if source.eval_type() == EvalType::Real {
        return Ok(expr);
    }
    let mut tp = FieldType::new(FieldKind::Double)
        .with_flen(MAX_REAL_WIDTH)
        .with_decimal(UNSPECIFIED_LENGTH);
    tp.set_binary_charset();
    if source.is_unsigned() {
        tp.add_flag(FieldFlags::UNSIGNED);
    }
    build_cast_function(arena, ctx, expr, tp)
}

/// Constant results narrow the declared precision and scale to the value.
pub fn wrap_with_cast_as_decimal(
    arena: &mut ExprArena,
    ctx: &mut EvalContext,
    expr: ExprId,
) -> Result<ExprId> {
    let source = arena.field_type(expr)?;
    if source.eval_type() == EvalType::Decimal {
        return Ok(expr);
    }
    let mut tp = FieldType::new(FieldKind::NewDecimal);
    tp.set_flen_under_limit(source.flen);
    tp.set_decimal_under_limit(source.decimal);
    if source.eval_type() == EvalType::Int {
        tp.flen = MAX_INT_WIDTH;
        tp.decimal = 0;
    }
    if tp.flen == UNSPECIFIED_LENGTH || tp.flen > MAX_DECIMAL_WIDTH {
        tp.flen = MAX_DECIMAL_WIDTH;
    }
    tp.set_binary_charset();
    if source.is_unsigned() {
        tp.add_flag(FieldFlags::UNSIGNED);
    }
    let id = build_cast_function(arena, ctx, expr, tp)?;
    let folded = match arena.node(id) {
        Some(ExprNode::Literal(Some(ScalarValue::Decimal(value)))) => Some(*value),
        _ => None,
    };
    if let Some(value) = folded {
        let (precision, frac) = value.precision_and_frac();
        arena.narrow_decimal(id, precision as i32, frac as i32)?;
    }
    Ok(id)
}

fn string_width(source: &FieldType) -> i32 {
    match source.kind {
        FieldKind::Float | FieldKind::Double => UNSPECIFIED_LENGTH,
        FieldKind::Bit if source.flen > 0 => (source.flen + 7) / 8,
        FieldKind::NewDecimal if source.flen != UNSPECIFIED_LENGTH => source.flen + 3,
        _ if source.eval_type() == EvalType::Int => MAX_INT_WIDTH,
        _ => source.flen,
    }
}

/// String cast in the session charset and collation.
pub fn wrap_with_cast_as_string(
    arena: &mut ExprArena,
    ctx: &mut EvalContext,
    expr: ExprId,
) -> Result<ExprId> {
    let (charset, collation) = (ctx.charset(), ctx.collation().to_string());
    wrap_with_cast_as_string_with_charset(arena, ctx, expr, charset, &collation)
}

pub fn wrap_with_cast_as_string_with_charset(
    arena: &mut ExprArena,
    ctx: &mut EvalContext,
    expr: ExprId,
    charset: Charset,
    collation: &str,
) -> Result<ExprId> {
    let source = arena.field_type(expr)?;
    if source.eval_type() == EvalType::String {
        return Ok(expr);
    }
    let tp = FieldType::new(FieldKind::VarString)
        .with_flen(string_width(source))
        .with_decimal(UNSPECIFIED_LENGTH)
        .with_charset(charset, collation);
    build_cast_function(arena, ctx, expr, tp)
}

/// Cast to the date or datetime kind of `tp`. DATE and TIMESTAMP values
/// already read as DATETIME.
pub fn wrap_with_cast_as_time(
    arena: &mut ExprArena,
    ctx: &mut EvalContext,
    expr: ExprId,
    tp: FieldType,
) -> Result<ExprId> {
    let source = arena.field_type(expr)?;
    if source.kind == tp.kind
        || (matches!(source.kind, FieldKind::Date | FieldKind::Timestamp)
            && tp.kind == FieldKind::Datetime)
    {
        return Ok(expr);
    }
    let mut tp = tp;
    tp.decimal = match source.eval_type() {
        EvalType::Int => 0,
        EvalType::String | EvalType::Real | EvalType::Json => MAX_FSP,
        EvalType::Time | EvalType::Duration => source.decimal,
        EvalType::Decimal => source.decimal.min(MAX_FSP),
    };
    match tp.kind {
        FieldKind::Date => tp.flen = MAX_DATE_WIDTH,
        FieldKind::Datetime | FieldKind::Timestamp => {
            tp.flen = MAX_DATETIME_WIDTH_NO_FSP;
            if tp.decimal > 0 {
                tp.flen += 1 + tp.decimal;
            }
        }
        _ => {}
    }
    tp.set_binary_charset();
    build_cast_function(arena, ctx, expr, tp)
}

pub fn wrap_with_cast_as_duration(
    arena: &mut ExprArena,
    ctx: &mut EvalContext,
    expr: ExprId,
) -> Result<ExprId> {
    let source = arena.field_type(expr)?;
    if source.kind == FieldKind::Duration {
        return Ok(expr);
    }
    let decimal = match source.kind {
        FieldKind::Date | FieldKind::Datetime | FieldKind::Timestamp => source.decimal,
        _ => MAX_FSP,
    };
    let mut tp = FieldType::new(FieldKind::Duration).with_decimal(decimal);
    tp.flen = MAX_DURATION_WIDTH_NO_FSP;
    if decimal > 0 {
        tp.flen += 1 + decimal;
    }
    build_cast_function(arena, ctx, expr, tp)
}

/// JSON sources are only re-cast while they still carry the parse flag.
pub fn wrap_with_cast_as_json(
    arena: &mut ExprArena,
    ctx: &mut EvalContext,
    expr: ExprId,
) -> Result<ExprId> {
    let source = arena.field_type(expr)?;
    if source.kind == FieldKind::Json && !source.has_flag(FieldFlags::PARSE_TO_JSON) {
        return Ok(expr);
    }
    let charset = Charset::Utf8mb4;
    let tp = FieldType::new(FieldKind::Json)
        .with_flen(MAX_JSON_WIDTH)
        .with_charset(charset, charset.default_collation())
        .with_flags(FieldFlags::BINARY);
    build_cast_function(arena, ctx, expr, tp)
}

/// Implicit cast to the domain of `tp`.
pub(crate) fn wrap_with_cast_to(
    arena: &mut ExprArena,
    ctx: &mut EvalContext,
    expr: ExprId,
    tp: &FieldType,
) -> Result<ExprId> {
    match tp.eval_type() {
        EvalType::Int => wrap_with_cast_as_int(arena, ctx, expr),
        EvalType::Real => wrap_with_cast_as_real(arena, ctx, expr),
        EvalType::Decimal => wrap_with_cast_as_decimal(arena, ctx, expr),
        EvalType::String => {
            wrap_with_cast_as_string_with_charset(arena, ctx, expr, tp.charset, &tp.collation)
        }
        EvalType::Time => wrap_with_cast_as_time(arena, ctx, expr, tp.clone()),
        EvalType::Duration => wrap_with_cast_as_duration(arena, ctx, expr),
        EvalType::Json => wrap_with_cast_as_json(arena, ctx, expr),
    }
}
