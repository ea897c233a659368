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
use crate::exec::expr::{ExprArena, ExprId};
use crate::types::{Datum, EvalType};

/// `ELT(n, s1, s2, ...)`: the n-th string, NULL when n is out of range.
pub(crate) fn eval_elt(
    arena: &ExprArena,
    args: &[ExprId],
    domain: EvalType,
    row: &[Datum],
    ctx: &mut EvalContext,
) -> Result<Datum> {
    let Some(index) = arena.eval_as(args[0], EvalType::Int, row, ctx)? else {
        return Ok(None);
    };
    let index = index.into_int()?;
    match usize::try_from(index) {
        Ok(pos) if pos >= 1 && pos < args.len() => arena.eval_as(args[pos], domain, row, ctx),
        _ => Ok(None),
    }
}
