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
/// Integration tests for sharing built casts across statement threads.
mod common;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use common::*;
use novarocks_cast::exec::expr::cast::{CastSignature, build_cast_function};
use novarocks_cast::exec::expr::{ExprArena, ExprNode};
use novarocks_cast::types::ScalarValue;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_built_tree_is_shareable() {
    assert_send_sync::<CastSignature>();
    assert_send_sync::<ExprArena>();
}

#[test]
fn test_statements_keep_their_own_warnings() {
    let mut arena = ExprArena::default();
    let mut build_ctx = strict_ctx();
    let col = arena.column(0, text_type());
    let cast = build_cast_function(&mut arena, &mut build_ctx, col, int_type()).unwrap();
    let arena = Arc::new(arena);

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let arena = Arc::clone(&arena);
            thread::spawn(move || {
                let mut ctx = if worker % 2 == 0 { lax_ctx() } else { strict_ctx() };
                let mut sum = 0i64;
                for i in 0..100i64 {
                    let row = [Some(ScalarValue::str(format!("{i}x")))];
                    match arena.eval(cast, &row, &mut ctx) {
                        Ok(Some(ScalarValue::Int(v))) => sum += v,
                        Ok(other) => panic!("unexpected datum {other:?}"),
                        Err(_) => assert!(ctx.strict_mode()),
                    }
                }
                (worker, sum, ctx.take_warnings().len())
            })
        })
        .collect();

    for handle in handles {
        let (worker, sum, warnings) = handle.join().unwrap();
        if worker % 2 == 0 {
            assert_eq!(sum, (0..100).sum::<i64>());
            assert_eq!(warnings, 100);
        } else {
            assert_eq!(sum, 0);
            assert_eq!(warnings, 0);
        }
    }
}

#[test]
fn test_signature_is_shared_not_copied() {
    let mut arena = ExprArena::default();
    let mut ctx = strict_ctx();
    let col = arena.column(0, int_type());
    let cast = build_cast_function(&mut arena, &mut ctx, col, double_type()).unwrap();
    let Some(ExprNode::Cast { sig, .. }) = arena.node(cast) else {
        panic!("expected a cast node");
    };
    let sig = Arc::clone(sig);
    let result = run_with_timeout(Duration::from_secs(5), move || {
        let worker = Arc::clone(&sig);
        thread::spawn(move || worker.code()).join().unwrap()
    });
    assert_eq!(result.code(), 1);
}

/// Run `f` and fail the test if it does not finish within `timeout`.
fn run_with_timeout<F, T>(timeout: Duration, f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    use std::sync::mpsc;

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });

    match rx.recv_timeout(timeout) {
        Ok(v) => v,
        Err(_) => panic!("test timed out after {:?}", timeout),
    }
}
