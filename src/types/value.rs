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
use crate::common::error::{CastError, Result};
use crate::types::decimal::Decimal;
use crate::types::duration::Duration;
use crate::types::field_type::EvalType;
use crate::types::json::Json;
use crate::types::time::Time;

/// A non-NULL scalar in one of the seven evaluation domains.
///
/// Integers hold the raw 64-bit pattern; whether it reads as signed or
/// unsigned is decided by the static type of the expression that produced it.
#[derive(Clone, Debug, PartialEq)]
pub enum ScalarValue {
    Int(i64),
    Real(f64),
    Decimal(Decimal),
    Str(Vec<u8>),
    Time(Time),
    Duration(Duration),
    Json(Json),
}

/// `None` is SQL NULL.
pub type Datum = Option<ScalarValue>;

impl ScalarValue {
    pub fn eval_type(&self) -> EvalType {
        match self {
            ScalarValue::Int(_) => EvalType::Int,
            ScalarValue::Real(_) => EvalType::Real,
            ScalarValue::Decimal(_) => EvalType::Decimal,
            ScalarValue::Str(_) => EvalType::String,
            ScalarValue::Time(_) => EvalType::Time,
            ScalarValue::Duration(_) => EvalType::Duration,
            ScalarValue::Json(_) => EvalType::Json,
        }
    }

    pub fn uint(v: u64) -> Self {
        ScalarValue::Int(v as i64)
    }

    pub fn str(s: impl AsRef<str>) -> Self {
        ScalarValue::Str(s.as_ref().as_bytes().to_vec())
    }

    fn mismatch(&self, expected: EvalType) -> CastError {
        CastError::internal(format!(
            "expected a {expected} value, got {}",
            self.eval_type()
        ))
    }

    pub fn into_int(self) -> Result<i64> {
        match self {
            ScalarValue::Int(v) => Ok(v),
            other => Err(other.mismatch(EvalType::Int)),
        }
    }

    pub fn into_real(self) -> Result<f64> {
        match self {
            ScalarValue::Real(v) => Ok(v),
            other => Err(other.mismatch(EvalType::Real)),
        }
    }

    pub fn into_decimal(self) -> Result<Decimal> {
        match self {
            ScalarValue::Decimal(v) => Ok(v),
            other => Err(other.mismatch(EvalType::Decimal)),
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            ScalarValue::Str(v) => Ok(v),
            other => Err(other.mismatch(EvalType::String)),
        }
    }

    pub fn into_time(self) -> Result<Time> {
        match self {
            ScalarValue::Time(v) => Ok(v),
            other => Err(other.mismatch(EvalType::Time)),
        }
    }

    pub fn into_duration(self) -> Result<Duration> {
        match self {
            ScalarValue::Duration(v) => Ok(v),
            other => Err(other.mismatch(EvalType::Duration)),
        }
    }

    pub fn into_json(self) -> Result<Json> {
        match self {
            ScalarValue::Json(v) => Ok(v),
            other => Err(other.mismatch(EvalType::Json)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_reject_other_domains() {
        assert_eq!(ScalarValue::Int(3).into_int().unwrap(), 3);
        assert_eq!(ScalarValue::uint(u64::MAX).into_int().unwrap(), -1);
        let err = ScalarValue::str("x").into_real().unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "internal cast error: expected a Real value, got String");
    }
}
