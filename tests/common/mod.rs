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
//! Common utilities and helpers for integration tests.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Utc};
use tempfile::TempDir;

use novarocks_cast::common::error::Result;
use novarocks_cast::exec::context::EvalContext;
use novarocks_cast::exec::expr::ExprArena;
use novarocks_cast::exec::expr::cast::{build_cast_function, build_cast_function_for_union};
use novarocks_cast::novarocks_cast_config;
use novarocks_cast::novarocks_cast_logging;
use novarocks_cast::types::{Datum, FieldKind, FieldType, ScalarValue};

/// Test configuration for integration tests.
pub struct TestConfig {
    /// Temporary directory for test artifacts
    pub temp_dir: TempDir,
    /// Test config path
    pub config_path: PathBuf,
}

impl TestConfig {
    /// Create a new test configuration with non-strict session defaults.
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let config_path = temp_dir.path().join("test_novarocks_cast.toml");

        let config_content = r#"
log_level = "debug"

[session]
strict_mode = false
no_zero_date = false
time_zone = "+08:00"
max_allowed_packet = 4096
charset = "utf8mb4"
collation = "utf8mb4_bin"
"#;

        std::fs::write(&config_path, config_content)?;

        Ok(Self {
            temp_dir,
            config_path,
        })
    }

    /// Initialize logging for tests.
    pub fn init_logging(&self) {
        novarocks_cast_logging::init_with_level("debug");
    }

    /// Load the test configuration.
    pub fn load_config(&self) -> anyhow::Result<&'static novarocks_cast_config::CastConfig> {
        novarocks_cast_config::init_from_path(&self.config_path)
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self::new().expect("Failed to create test config")
    }
}

pub fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

/// Fixed statement start: 2024-03-01 00:00:00 UTC.
pub fn stmt_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-03-01T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn lax_ctx() -> EvalContext {
    EvalContext::new()
        .with_strict_mode(false)
        .with_no_zero_date(false)
        .with_time_zone(utc())
        .with_stmt_time(stmt_time())
}

pub fn strict_ctx() -> EvalContext {
    lax_ctx().with_strict_mode(true)
}

pub fn int_type() -> FieldType {
    FieldType::new(FieldKind::LongLong)
}

pub fn uint_type() -> FieldType {
    FieldType::new(FieldKind::LongLong).unsigned()
}

pub fn double_type() -> FieldType {
    FieldType::new(FieldKind::Double)
}

pub fn decimal_type(flen: i32, decimal: i32) -> FieldType {
    FieldType::new(FieldKind::NewDecimal)
        .with_flen(flen)
        .with_decimal(decimal)
}

pub fn text_type() -> FieldType {
    FieldType::new(FieldKind::VarString)
}

pub fn datetime_type(fsp: i32) -> FieldType {
    FieldType::new(FieldKind::Datetime).with_decimal(fsp)
}

pub fn date_type() -> FieldType {
    FieldType::new(FieldKind::Date)
}

pub fn duration_type(fsp: i32) -> FieldType {
    FieldType::new(FieldKind::Duration).with_decimal(fsp)
}

pub fn json_type() -> FieldType {
    FieldType::new(FieldKind::Json)
}

/// Casts a single-column row so the value is not folded at build time.
pub fn cast_column(
    ctx: &mut EvalContext,
    source: FieldType,
    target: FieldType,
    value: ScalarValue,
) -> Result<Datum> {
    let mut arena = ExprArena::default();
    let col = arena.column(0, source);
    let cast = build_cast_function(&mut arena, ctx, col, target)?;
    arena.eval(cast, &[Some(value)], ctx)
}

pub fn cast_column_for_union(
    ctx: &mut EvalContext,
    source: FieldType,
    target: FieldType,
    value: ScalarValue,
) -> Result<Datum> {
    let mut arena = ExprArena::default();
    let col = arena.column(0, source);
    let cast = build_cast_function_for_union(&mut arena, ctx, col, target)?;
    arena.eval(cast, &[Some(value)], ctx)
}

/// Assert that a result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a result is Err.
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => e,
        }
    };
}
