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

/// `IF(cond, then, else)`. Only the chosen branch is evaluated, so an error
/// in the other branch never surfaces.
pub(crate) fn eval_if(
    arena: &ExprArena,
    args: &[ExprId],
    domain: EvalType,
    row: &[Datum],
    ctx: &mut EvalContext,
) -> Result<Datum> {
    let condition = arena.eval(args[0], row, ctx)?;
    let branch = if is_true(condition.as_ref()) {
        args[1]
    } else {
        args[2]
    };
    arena.eval_as(branch, domain, row, ctx)
}
