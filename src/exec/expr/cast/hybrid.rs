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
//! Push-down of numeric casts through IF, CASE and ELT calls whose result
//! branches include ENUM or SET values.
//!
//! `CAST(IF(c, enum_col, 'x') AS SIGNED)` would otherwise read the enum
//! through its name and parse the text. Casting every result branch first
//! reads the enum through its index (or bitmask) instead, the way MySQL
//! does. BIT columns are left alone.

use tracing::{debug, warn};

use crate::common::error::Result;
use crate::exec::context::EvalContext;
use crate::exec::expr::cast::{wrap_with_cast_as_int, wrap_with_cast_as_real};
use crate::exec::expr::function::{FunctionKind, new_function, value_arg_positions};
use crate::exec::expr::{ExprArena, ExprId, ExprNode};
use crate::types::{EvalType, FieldType};

/// Returns a rebuilt call when `expr` is a control function with a hybrid
/// result branch and `target` is numeric, and `expr` unchanged otherwise.
/// The original node is left in place.
pub fn try_push_cast_into_control_function_for_hybrid_type(
    arena: &mut ExprArena,
    ctx: &mut EvalContext,
    expr: ExprId,
    target: &FieldType,
) -> ExprId {
    let domain = target.eval_type();
    if !matches!(domain, EvalType::Int | EvalType::Real) {
        return expr;
    }
    let (kind, args) = match arena.node(expr) {
        Some(ExprNode::FunctionCall { kind, args })
            if matches!(kind, FunctionKind::If | FunctionKind::Case | FunctionKind::Elt) =>
        {
            (*kind, args.clone())
        }
        _ => return expr,
    };
    let positions = value_arg_positions(kind, args.len());
    let has_hybrid = positions.iter().any(|pos| {
        arena
            .data_type(args[*pos])
            .is_some_and(|tp| tp.is_enum_or_set())
    });
    if !has_hybrid {
        return expr;
    }

    match rebuild(arena, ctx, kind, args, &positions, domain) {
        Ok(rebuilt) => {
            debug!("pushed {} cast into the branches of {:?}", domain, kind);
            rebuilt
        }
        Err(err) => {
            warn!("keep {:?} call uncast: {}", kind, err);
            expr
        }
    }
}

fn rebuild(
    arena: &mut ExprArena,
    ctx: &mut EvalContext,
    kind: FunctionKind,
    args: Vec<ExprId>,
    positions: &[usize],
    domain: EvalType,
) -> Result<ExprId> {
    let mut args = args;
    for &pos in positions {
        args[pos] = match domain {
            EvalType::Int => wrap_with_cast_as_int(arena, ctx, args[pos])?,
            _ => wrap_with_cast_as_real(arena, ctx, args[pos])?,
        };
    }
    new_function(arena, ctx, kind, args)
}
