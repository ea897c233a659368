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
use super::is_true;
use crate::common::error::Result;
use crate::exec::context::EvalContext;
use crate::exec::expr::{ExprArena, ExprId};
use crate::types::{Datum, EvalType};

/// `CASE WHEN c1 THEN v1 [WHEN c2 THEN v2 ...] [ELSE e] END`, laid out as
/// `[c1, v1, c2, v2, ..., e]`.
pub(crate) fn eval_case(
    arena: &ExprArena,
    args: &[ExprId],
    domain: EvalType,
    row: &[Datum],
    ctx: &mut EvalContext,
) -> Result<Datum> {
    let mut arms = args.chunks_exact(2);
    for arm in &mut arms {
        let condition = arena.eval(arm[0], row, ctx)?;
        if is_true(condition.as_ref()) {
            return arena.eval_as(arm[1], domain, row, ctx);
        }
    }
    match arms.remainder() {
        [otherwise] => arena.eval_as(*otherwise, domain, row, ctx),
        _ => Ok(None),
    }
}
