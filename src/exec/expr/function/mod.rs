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
//! Scalar functions the cast engine interacts with.

mod conditional;
mod date;
mod string;

use crate::common::error::{CastError, Result};
use crate::exec::context::EvalContext;
use crate::exec::expr::cast::{wrap_with_cast_as_int, wrap_with_cast_as_time, wrap_with_cast_to};
use crate::exec::expr::{ExprArena, ExprId, ExprNode};
use crate::types::{Datum, EvalType, FieldKind, FieldType};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FunctionKind {
    If,
    Case,
    Elt,
    DayName,
}

pub struct FunctionMetadata {
    pub name: &'static str,
    pub min_args: usize,
    pub max_args: usize,
    pub kind: FunctionKind,
}

pub fn function_metadata(kind: FunctionKind) -> FunctionMetadata {
    match kind {
        FunctionKind::If => FunctionMetadata {
            name: "if",
            min_args: 3,
            max_args: 3,
            kind,
        },
        FunctionKind::Case => FunctionMetadata {
            name: "case",
            min_args: 2,
            max_args: usize::MAX,
            kind,
        },
        FunctionKind::Elt => FunctionMetadata {
            name: "elt",
            min_args: 2,
            max_args: usize::MAX,
            kind,
        },
        FunctionKind::DayName => FunctionMetadata {
            name: "dayname",
            min_args: 1,
            max_args: 1,
            kind,
        },
    }
}

/// Case-insensitive name lookup.
pub fn lookup_function(name: &str) -> Option<FunctionKind> {
    [
        FunctionKind::If,
        FunctionKind::Case,
        FunctionKind::Elt,
        FunctionKind::DayName,
    ]
    .into_iter()
    .find(|kind| function_metadata(*kind).name.eq_ignore_ascii_case(name))
}

fn check_arity(kind: FunctionKind, arg_count: usize) -> Result<()> {
    let meta = function_metadata(kind);
    if arg_count < meta.min_args || arg_count > meta.max_args {
        return Err(CastError::internal(format!(
            "{} expects {}..={} arguments, got {}",
            meta.name, meta.min_args, meta.max_args, arg_count
        )));
    }
    Ok(())
}

/// Positions of the arguments whose values can become the result:
/// both IF branches, every THEN plus the trailing ELSE of CASE, every ELT
/// argument after the index.
pub(crate) fn value_arg_positions(kind: FunctionKind, arg_count: usize) -> Vec<usize> {
    match kind {
        FunctionKind::If => vec![1, 2],
        FunctionKind::Case => {
            let mut positions: Vec<usize> = (1..arg_count).step_by(2).collect();
            if arg_count % 2 == 1 {
                positions.push(arg_count - 1);
            }
            positions
        }
        FunctionKind::Elt => (1..arg_count).collect(),
        FunctionKind::DayName => Vec::new(),
    }
}

/// Builds a call node: checks the arity, coerces the arguments the function
/// needs in a fixed domain and infers the return type.
pub fn new_function(
    arena: &mut ExprArena,
    ctx: &mut EvalContext,
    kind: FunctionKind,
    args: Vec<ExprId>,
) -> Result<ExprId> {
    check_arity(kind, args.len())?;
    let mut args = args;
    match kind {
        FunctionKind::DayName => {
            args[0] = wrap_with_cast_as_time(arena, ctx, args[0], FieldType::new(FieldKind::Datetime))?;
        }
        FunctionKind::Elt => {
            args[0] = wrap_with_cast_as_int(arena, ctx, args[0])?;
        }
        FunctionKind::If | FunctionKind::Case => {}
    }
    let return_type = infer_return_type(arena, ctx, kind, &args)?;
    for pos in value_arg_positions(kind, args.len()) {
        let arg_type = arena.field_type(args[pos])?;
        if arg_type.kind != FieldKind::Null && arg_type.eval_type() != return_type.eval_type() {
            args[pos] = wrap_with_cast_to(arena, ctx, args[pos], &return_type)?;
        }
    }
    Ok(arena.push_typed(ExprNode::FunctionCall { kind, args }, return_type))
}

pub fn infer_return_type(
    arena: &ExprArena,
    ctx: &EvalContext,
    kind: FunctionKind,
    args: &[ExprId],
) -> Result<FieldType> {
    match kind {
        FunctionKind::DayName => Ok(FieldType::new(FieldKind::VarString)
            .with_flen(10)
            .with_charset(ctx.charset(), ctx.collation())),
        FunctionKind::Elt => {
            let mut flen = 0;
            for arg in &args[1..] {
                let arg_flen = arena.field_type(*arg)?.flen;
                if arg_flen < 0 {
                    flen = arg_flen;
                    break;
                }
                flen = flen.max(arg_flen);
            }
            Ok(FieldType::new(FieldKind::VarString)
                .with_flen(flen)
                .with_charset(ctx.charset(), ctx.collation()))
        }
        FunctionKind::If | FunctionKind::Case => {
            let branches = value_arg_positions(kind, args.len())
                .into_iter()
                .map(|pos| arena.field_type(args[pos]).cloned())
                .collect::<Result<Vec<_>>>()?;
            Ok(conditional::aggregate_types(&branches, ctx))
        }
    }
}

/// Evaluates a call and returns its value in `domain`.
pub(crate) fn eval_function(
    arena: &ExprArena,
    kind: FunctionKind,
    args: &[ExprId],
    domain: EvalType,
    row: &[Datum],
    ctx: &mut EvalContext,
) -> Result<Datum> {
    check_arity(kind, args.len())?;
    match kind {
        FunctionKind::If => conditional::eval_if(arena, args, domain, row, ctx),
        FunctionKind::Case => conditional::eval_case(arena, args, domain, row, ctx),
        FunctionKind::Elt => string::eval_elt(arena, args, domain, row, ctx),
        FunctionKind::DayName => date::eval_dayname(arena, args, domain, row, ctx),
    }
}

/// Functions MySQL evaluates numerically even though their declared type is
/// a string, so `DAYNAME(d) + 0` is the weekday index.
pub(crate) fn can_implicit_eval_int(arena: &ExprArena, id: ExprId) -> bool {
    matches!(
        arena.node(id),
        Some(ExprNode::FunctionCall {
            kind: FunctionKind::DayName,
            ..
        })
    )
}

pub(crate) fn can_implicit_eval_real(arena: &ExprArena, id: ExprId) -> bool {
    can_implicit_eval_int(arena, id)
}
