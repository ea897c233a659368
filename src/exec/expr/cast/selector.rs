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
//! Picks the kernel of a cast and finalizes its target type.

use tracing::debug;

use crate::common::error::Result;
use crate::exec::expr::cast::{CastSignature, ScalarFuncSig};
use crate::exec::expr::function::{can_implicit_eval_int, can_implicit_eval_real};
use crate::exec::expr::{ExprArena, ExprId, ExprNode};
use crate::types::field_type::UNSPECIFIED_LENGTH;
use crate::types::{Charset, EvalType, FieldFlags, FieldType};

/// Chooses the signature for casting `child` to `target`. The returned child
/// differs from `child` when a charset validation node had to be inserted.
pub(super) fn select_signature(
    arena: &mut ExprArena,
    child: ExprId,
    target: FieldType,
    in_union: bool,
) -> Result<(ExprId, CastSignature)> {
    let mut source = arena.field_type(child)?.clone();
    let mut target = target;
    let mut child = child;
    let to = target.eval_type();
    let numeric_view = source.hybrid() || arena.is_binary_literal(child);

    let (code, input) = match to {
        EvalType::Int if numeric_view => (ScalarFuncSig::CastIntAsInt, EvalType::Int),
        EvalType::Real if arena.is_binary_literal(child) => {
            (ScalarFuncSig::CastRealAsReal, EvalType::Real)
        }
        EvalType::Decimal if arena.is_binary_literal(child) => {
            (ScalarFuncSig::CastDecimalAsDecimal, EvalType::Decimal)
        }
        EvalType::Real | EvalType::Decimal if source.hybrid() => {
            (ScalarFuncSig::new(EvalType::Int, to), EvalType::Int)
        }
        EvalType::String if source.hybrid() => (ScalarFuncSig::CastStringAsString, EvalType::String),
        _ => {
            let from = source.eval_type();
            let input = match (from, to) {
                (EvalType::String, EvalType::Int) if can_implicit_eval_int(arena, child) => {
                    EvalType::Int
                }
                (EvalType::String, EvalType::Real) if can_implicit_eval_real(arena, child) => {
                    EvalType::Real
                }
                _ => from,
            };
            (ScalarFuncSig::new(from, to), input)
        }
    };

    // hybrid values and binary literals read as numbers are never negative
    if numeric_view && input != EvalType::String {
        source.add_flag(FieldFlags::UNSIGNED);
    }

    match code {
        ScalarFuncSig::CastIntAsString if target.flen == UNSPECIFIED_LENGTH => {
            target.flen = source.flen;
        }
        ScalarFuncSig::CastStringAsString
            if !source.hybrid()
                && source.charset == Charset::Binary
                && target.charset != Charset::Binary =>
        {
            let validated = source
                .clone()
                .with_charset(target.charset, target.collation.clone());
            child = arena.push_typed(ExprNode::FromBinary(child), validated);
        }
        ScalarFuncSig::CastStringAsJson => target.add_flag(FieldFlags::PARSE_TO_JSON),
        _ => {}
    }

    debug!(
        "cast {} -> {} selected {} (input {}, union {})",
        source.sql_name(),
        target.sql_name(),
        code,
        input,
        in_union
    );
    Ok((child, CastSignature::new(code, source, target, input, in_union)))
}
