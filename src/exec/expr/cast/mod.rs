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
//! CAST: signature selection at build time, conversion kernels per row.
//!
//! A cast node holds an [`Arc<CastSignature>`] naming the kernel, the static
//! types on both sides and the domain its child is read in. Signatures are
//! immutable once the tree is built, so one tree can be evaluated from many
//! threads, each with its own [`EvalContext`].

mod builder;
mod convert;
mod hybrid;
mod implicit;
mod kernels;
pub mod opcode;
mod selector;

pub use builder::{build_cast_collation_function, build_cast_function, build_cast_function_for_union};
pub use hybrid::try_push_cast_into_control_function_for_hybrid_type;
pub use implicit::{
    wrap_with_cast_as_decimal, wrap_with_cast_as_duration, wrap_with_cast_as_int,
    wrap_with_cast_as_json, wrap_with_cast_as_real, wrap_with_cast_as_string,
    wrap_with_cast_as_string_with_charset, wrap_with_cast_as_time,
};
pub(crate) use implicit::wrap_with_cast_to;
pub use opcode::ScalarFuncSig;

use crate::common::error::Result;
use crate::exec::context::EvalContext;
use crate::exec::expr::{ExprArena, ExprId};
use crate::types::{Datum, EvalType, FieldType};

#[derive(Clone, Debug)]
pub struct CastSignature {
    code: ScalarFuncSig,
    source: FieldType,
    target: FieldType,
    /// Domain the child is evaluated in. Usually the source domain; hybrid
    /// and implicitly numeric children are read as numbers.
    input: EvalType,
    in_union: bool,
}

impl CastSignature {
    pub(crate) fn new(
        code: ScalarFuncSig,
        source: FieldType,
        target: FieldType,
        input: EvalType,
        in_union: bool,
    ) -> Self {
        CastSignature {
            code,
            source,
            target,
            input,
            in_union,
        }
    }

    pub fn code(&self) -> ScalarFuncSig {
        self.code
    }

    pub fn source(&self) -> &FieldType {
        &self.source
    }

    pub fn target(&self) -> &FieldType {
        &self.target
    }

    pub fn input(&self) -> EvalType {
        self.input
    }

    /// Negative values cast to unsigned targets become zero.
    pub fn in_union(&self) -> bool {
        self.in_union
    }

    pub(crate) fn target_mut(&mut self) -> &mut FieldType {
        &mut self.target
    }
}

/// Evaluates the child and runs the kernel. NULL never reaches a kernel.
pub(crate) fn eval_cast(
    arena: &ExprArena,
    sig: &CastSignature,
    child: ExprId,
    row: &[Datum],
    ctx: &mut EvalContext,
) -> Result<Datum> {
    let Some(value) = arena.eval_as(child, sig.input, row, ctx)? else {
        return Ok(None);
    };
    kernels::eval(sig, value, ctx)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::types::{FieldKind, ScalarValue};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_signature_is_shareable() {
        assert_send_sync::<CastSignature>();
        assert_send_sync::<Arc<CastSignature>>();
        assert_send_sync::<ExprArena>();
    }

    #[test]
    fn test_null_skips_kernel() {
        let mut arena = ExprArena::default();
        let mut ctx = EvalContext::new().with_strict_mode(true);
        let null = arena.literal(None, FieldType::new(FieldKind::VarString));
        let cast = build_cast_function(
            &mut arena,
            &mut ctx,
            null,
            FieldType::new(FieldKind::LongLong),
        )
        .unwrap();
        assert_eq!(arena.eval(cast, &[], &mut ctx).unwrap(), None);
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_column_cast_keeps_signature() {
        let mut arena = ExprArena::default();
        let mut ctx = EvalContext::new();
        let col = arena.column(0, FieldType::new(FieldKind::LongLong));
        let cast =
            build_cast_function(&mut arena, &mut ctx, col, FieldType::new(FieldKind::Double))
                .unwrap();
        let Some(crate::exec::expr::ExprNode::Cast { sig, .. }) = arena.node(cast) else {
            panic!("expected a cast node");
        };
        assert_eq!(sig.code(), ScalarFuncSig::CastIntAsReal);
        assert_eq!(sig.input(), EvalType::Int);
        assert!(!sig.in_union());
        assert_eq!(
            arena.eval(cast, &[Some(ScalarValue::Int(-4))], &mut ctx).unwrap(),
            Some(ScalarValue::Real(-4.0))
        );
    }
}
