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
use std::sync::Arc;

use tracing::{debug, warn};

use crate::common::error::Result;
use crate::exec::context::EvalContext;
use crate::exec::expr::cast::hybrid::try_push_cast_into_control_function_for_hybrid_type;
use crate::exec::expr::cast::selector::select_signature;
use crate::exec::expr::{ExprArena, ExprId, ExprNode};
use crate::types::{Charset, EvalType, FieldFlags, FieldKind, FieldType};

/// Wraps `expr` in a cast to `target`. Casts of constants are evaluated once
/// and replaced by their value.
pub fn build_cast_function(
    arena: &mut ExprArena,
    ctx: &mut EvalContext,
    expr: ExprId,
    target: FieldType,
) -> Result<ExprId> {
    build(arena, ctx, expr, target, false)
}

/// Like [`build_cast_function`] for the branches of a UNION: negative values
/// cast to unsigned targets become zero.
pub fn build_cast_function_for_union(
    arena: &mut ExprArena,
    ctx: &mut EvalContext,
    expr: ExprId,
    target: FieldType,
) -> Result<ExprId> {
    build(arena, ctx, expr, target, true)
}

fn build(
    arena: &mut ExprArena,
    ctx: &mut EvalContext,
    expr: ExprId,
    target: FieldType,
    in_union: bool,
) -> Result<ExprId> {
    let mut target = target;
    if !arena.field_type(expr)?.is_not_null() {
        target.remove_flag(FieldFlags::NOT_NULL);
    }
    let expr = try_push_cast_into_control_function_for_hybrid_type(arena, ctx, expr, &target);
    let source = arena.field_type(expr)?;
    if source.kind == FieldKind::Bit && target.eval_type() == EvalType::String && source.flen > 0 {
        target.flen = (source.flen + 7) / 8;
    }

    let (child, sig) = select_signature(arena, expr, target, in_union)?;
    let target = sig.target().clone();
    let folds = target.eval_type() != EvalType::Json;
    let id = arena.push_typed(
        ExprNode::Cast {
            child,
            sig: Arc::new(sig),
        },
        target,
    );
    if folds && arena.is_constant(id) {
        fold_constant(arena, ctx, id)?;
    }
    Ok(id)
}

/// Replaces a constant cast by its value. A cast that fails is kept so the
/// error surfaces when the statement evaluates it.
fn fold_constant(arena: &mut ExprArena, ctx: &mut EvalContext, id: ExprId) -> Result<()> {
    match arena.eval(id, &[], ctx) {
        Ok(value) => {
            debug!("folded constant cast {:?} to {:?}", id, value);
            arena.set_node(id, ExprNode::Literal(value))
        }
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => {
            warn!("constant cast {:?} not folded: {}", id, err);
            Ok(())
        }
    }
}

/// Casts a string expression to `charset`/`collation` unless it already
/// uses that collation. ENUM and SET are only cast when
/// `enum_or_set_real_type_is_str` is set.
pub fn build_cast_collation_function(
    arena: &mut ExprArena,
    ctx: &mut EvalContext,
    expr: ExprId,
    charset: Charset,
    collation: &str,
    enum_or_set_real_type_is_str: bool,
) -> Result<ExprId> {
    let source = arena.field_type(expr)?;
    if source.eval_type() != EvalType::String || source.collation == collation {
        return Ok(expr);
    }
    let mut target = source.clone();
    if source.hybrid() {
        if !enum_or_set_real_type_is_str {
            return Ok(expr);
        }
        target = FieldType::new(FieldKind::VarString);
    } else if charset == Charset::Binary {
        // fixed-length binary targets would zero pad
        target.kind = FieldKind::VarString;
    }
    let target = target.with_charset(charset, collation);
    build_cast_function(arena, ctx, expr, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::CastError;
    use crate::exec::expr::cast::ScalarFuncSig;
    use crate::types::ScalarValue;

    fn cast_sig(arena: &ExprArena, id: ExprId) -> ScalarFuncSig {
        match arena.node(id) {
            Some(ExprNode::Cast { sig, .. }) => sig.code(),
            other => panic!("expected a cast node, got {other:?}"),
        }
    }

    #[test]
    fn test_nullable_source_drops_not_null() {
        let mut arena = ExprArena::default();
        let mut ctx = EvalContext::new();
        let col = arena.column(0, FieldType::new(FieldKind::LongLong));
        let cast = build_cast_function(
            &mut arena,
            &mut ctx,
            col,
            FieldType::new(FieldKind::Double).not_null(),
        )
        .unwrap();
        assert!(!arena.data_type(cast).unwrap().is_not_null());

        let not_null = arena.column(1, FieldType::new(FieldKind::LongLong).not_null());
        let cast = build_cast_function(
            &mut arena,
            &mut ctx,
            not_null,
            FieldType::new(FieldKind::Double).not_null(),
        )
        .unwrap();
        assert!(arena.data_type(cast).unwrap().is_not_null());
    }

    #[test]
    fn test_constant_is_folded() {
        let mut arena = ExprArena::default();
        let mut ctx = EvalContext::new().with_strict_mode(true);
        let lit = arena.literal(Some(ScalarValue::str("42")), FieldType::new(FieldKind::VarString));
        let cast =
            build_cast_function(&mut arena, &mut ctx, lit, FieldType::new(FieldKind::LongLong))
                .unwrap();
        assert!(matches!(
            arena.node(cast),
            Some(ExprNode::Literal(Some(ScalarValue::Int(42))))
        ));
        assert_eq!(arena.data_type(cast).unwrap().kind, FieldKind::LongLong);
    }

    #[test]
    fn test_failing_constant_is_kept() {
        let mut arena = ExprArena::default();
        let mut ctx = EvalContext::new().with_strict_mode(true);
        let lit = arena.literal(Some(ScalarValue::str("4x")), FieldType::new(FieldKind::VarString));
        let cast =
            build_cast_function(&mut arena, &mut ctx, lit, FieldType::new(FieldKind::LongLong))
                .unwrap();
        assert_eq!(cast_sig(&arena, cast), ScalarFuncSig::CastStringAsInt);
        assert_eq!(
            arena.eval(cast, &[], &mut ctx).unwrap_err(),
            CastError::truncated_wrong_value("INTEGER", "4x")
        );
    }

    #[test]
    fn test_json_casts_are_not_folded() {
        let mut arena = ExprArena::default();
        let mut ctx = EvalContext::new();
        let lit = arena.literal(Some(ScalarValue::Int(1)), FieldType::new(FieldKind::LongLong));
        let cast = build_cast_function(&mut arena, &mut ctx, lit, FieldType::new(FieldKind::Json))
            .unwrap();
        assert_eq!(cast_sig(&arena, cast), ScalarFuncSig::CastIntAsJson);
    }

    #[test]
    fn test_bit_to_string_uses_byte_width() {
        let mut arena = ExprArena::default();
        let mut ctx = EvalContext::new();
        let bits = arena.column(0, FieldType::new(FieldKind::Bit).with_flen(12));
        let cast = build_cast_function(
            &mut arena,
            &mut ctx,
            bits,
            FieldType::new(FieldKind::VarString),
        )
        .unwrap();
        assert_eq!(arena.data_type(cast).unwrap().flen, 2);
        assert_eq!(
            arena.eval(cast, &[Some(ScalarValue::Int(0x141))], &mut ctx).unwrap(),
            Some(ScalarValue::Str(vec![0x01, 0x41]))
        );
    }

    #[test]
    fn test_union_cast_clamps() {
        let mut arena = ExprArena::default();
        let mut ctx = EvalContext::new();
        let col = arena.column(0, FieldType::new(FieldKind::LongLong));
        let cast = build_cast_function_for_union(
            &mut arena,
            &mut ctx,
            col,
            FieldType::new(FieldKind::LongLong).unsigned(),
        )
        .unwrap();
        assert_eq!(
            arena.eval(cast, &[Some(ScalarValue::Int(-5))], &mut ctx).unwrap(),
            Some(ScalarValue::Int(0))
        );
    }

    #[test]
    fn test_collation_cast() {
        let mut arena = ExprArena::default();
        let mut ctx = EvalContext::new();
        let col = arena.column(0, FieldType::new(FieldKind::String).with_flen(4));
        let same = build_cast_collation_function(&mut arena, &mut ctx, col, Charset::Utf8mb4, "utf8mb4_bin", false)
            .unwrap();
        assert_eq!(same, col);

        let binary = build_cast_collation_function(&mut arena, &mut ctx, col, Charset::Binary, "binary", false)
            .unwrap();
        let tp = arena.data_type(binary).unwrap();
        assert_eq!(tp.kind, FieldKind::VarString);
        assert_eq!(tp.charset, Charset::Binary);
        assert_eq!(
            arena.eval(binary, &[Some(ScalarValue::str("ab"))], &mut ctx).unwrap(),
            Some(ScalarValue::str("ab"))
        );

        let e = arena.column(1, FieldType::new(FieldKind::Enum).with_elems(["x"]));
        let kept = build_cast_collation_function(&mut arena, &mut ctx, e, Charset::Latin1, "latin1_bin", false)
            .unwrap();
        assert_eq!(kept, e);
        let cast = build_cast_collation_function(&mut arena, &mut ctx, e, Charset::Latin1, "latin1_bin", true)
            .unwrap();
        assert_eq!(arena.data_type(cast).unwrap().collation, "latin1_bin");
    }
}
