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
//! Push-down opcodes of the cast kernels.

use std::fmt;

use crate::types::EvalType;

/// One tag per (source domain, target domain) cell. The numbering is the
/// remote compute protocol's: source block times ten plus the target offset,
/// with targets ordered Int, Real, String, Decimal, Time, Duration, Json.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(i32)]
pub enum ScalarFuncSig {
    CastIntAsInt = 0,
    CastIntAsReal = 1,
    CastIntAsString = 2,
    CastIntAsDecimal = 3,
    CastIntAsTime = 4,
    CastIntAsDuration = 5,
    CastIntAsJson = 6,

    CastRealAsInt = 10,
    CastRealAsReal = 11,
    CastRealAsString = 12,
    CastRealAsDecimal = 13,
    CastRealAsTime = 14,
    CastRealAsDuration = 15,
    CastRealAsJson = 16,

    CastDecimalAsInt = 20,
    CastDecimalAsReal = 21,
    CastDecimalAsString = 22,
    CastDecimalAsDecimal = 23,
    CastDecimalAsTime = 24,
    CastDecimalAsDuration = 25,
    CastDecimalAsJson = 26,

    CastStringAsInt = 30,
    CastStringAsReal = 31,
    CastStringAsString = 32,
    CastStringAsDecimal = 33,
    CastStringAsTime = 34,
    CastStringAsDuration = 35,
    CastStringAsJson = 36,

    CastTimeAsInt = 40,
    CastTimeAsReal = 41,
    CastTimeAsString = 42,
    CastTimeAsDecimal = 43,
    CastTimeAsTime = 44,
    CastTimeAsDuration = 45,
    CastTimeAsJson = 46,

    CastDurationAsInt = 50,
    CastDurationAsReal = 51,
    CastDurationAsString = 52,
    CastDurationAsDecimal = 53,
    CastDurationAsTime = 54,
    CastDurationAsDuration = 55,
    CastDurationAsJson = 56,

    CastJsonAsInt = 60,
    CastJsonAsReal = 61,
    CastJsonAsString = 62,
    CastJsonAsDecimal = 63,
    CastJsonAsTime = 64,
    CastJsonAsDuration = 65,
    CastJsonAsJson = 66,
}

impl ScalarFuncSig {
    pub const ALL: [ScalarFuncSig; 49] = [
        ScalarFuncSig::CastIntAsInt,
        ScalarFuncSig::CastIntAsReal,
        ScalarFuncSig::CastIntAsString,
        ScalarFuncSig::CastIntAsDecimal,
        ScalarFuncSig::CastIntAsTime,
        ScalarFuncSig::CastIntAsDuration,
        ScalarFuncSig::CastIntAsJson,
        ScalarFuncSig::CastRealAsInt,
        ScalarFuncSig::CastRealAsReal,
        ScalarFuncSig::CastRealAsString,
        ScalarFuncSig::CastRealAsDecimal,
        ScalarFuncSig::CastRealAsTime,
        ScalarFuncSig::CastRealAsDuration,
        ScalarFuncSig::CastRealAsJson,
        ScalarFuncSig::CastDecimalAsInt,
        ScalarFuncSig::CastDecimalAsReal,
        ScalarFuncSig::CastDecimalAsString,
        ScalarFuncSig::CastDecimalAsDecimal,
        ScalarFuncSig::CastDecimalAsTime,
        ScalarFuncSig::CastDecimalAsDuration,
        ScalarFuncSig::CastDecimalAsJson,
        ScalarFuncSig::CastStringAsInt,
        ScalarFuncSig::CastStringAsReal,
        ScalarFuncSig::CastStringAsString,
        ScalarFuncSig::CastStringAsDecimal,
        ScalarFuncSig::CastStringAsTime,
        ScalarFuncSig::CastStringAsDuration,
        ScalarFuncSig::CastStringAsJson,
        ScalarFuncSig::CastTimeAsInt,
        ScalarFuncSig::CastTimeAsReal,
        ScalarFuncSig::CastTimeAsString,
        ScalarFuncSig::CastTimeAsDecimal,
        ScalarFuncSig::CastTimeAsTime,
        ScalarFuncSig::CastTimeAsDuration,
        ScalarFuncSig::CastTimeAsJson,
        ScalarFuncSig::CastDurationAsInt,
        ScalarFuncSig::CastDurationAsReal,
        ScalarFuncSig::CastDurationAsString,
        ScalarFuncSig::CastDurationAsDecimal,
        ScalarFuncSig::CastDurationAsTime,
        ScalarFuncSig::CastDurationAsDuration,
        ScalarFuncSig::CastDurationAsJson,
        ScalarFuncSig::CastJsonAsInt,
        ScalarFuncSig::CastJsonAsReal,
        ScalarFuncSig::CastJsonAsString,
        ScalarFuncSig::CastJsonAsDecimal,
        ScalarFuncSig::CastJsonAsTime,
        ScalarFuncSig::CastJsonAsDuration,
        ScalarFuncSig::CastJsonAsJson,
    ];

    /// The kernel converting `from` values to `to` values.
    pub fn new(from: EvalType, to: EvalType) -> Self {
        use EvalType as E;
        use ScalarFuncSig as S;
        match (from, to) {
            (E::Int, E::Int) => S::CastIntAsInt,
            (E::Int, E::Real) => S::CastIntAsReal,
            (E::Int, E::String) => S::CastIntAsString,
            (E::Int, E::Decimal) => S::CastIntAsDecimal,
            (E::Int, E::Time) => S::CastIntAsTime,
            (E::Int, E::Duration) => S::CastIntAsDuration,
            (E::Int, E::Json) => S::CastIntAsJson,
            (E::Real, E::Int) => S::CastRealAsInt,
            (E::Real, E::Real) => S::CastRealAsReal,
            (E::Real, E::String) => S::CastRealAsString,
            (E::Real, E::Decimal) => S::CastRealAsDecimal,
            (E::Real, E::Time) => S::CastRealAsTime,
            (E::Real, E::Duration) => S::CastRealAsDuration,
            (E::Real, E::Json) => S::CastRealAsJson,
            (E::Decimal, E::Int) => S::CastDecimalAsInt,
            (E::Decimal, E::Real) => S::CastDecimalAsReal,
            (E::Decimal, E::String) => S::CastDecimalAsString,
            (E::Decimal, E::Decimal) => S::CastDecimalAsDecimal,
            (E::Decimal, E::Time) => S::CastDecimalAsTime,
            (E::Decimal, E::Duration) => S::CastDecimalAsDuration,
            (E::Decimal, E::Json) => S::CastDecimalAsJson,
            (E::String, E::Int) => S::CastStringAsInt,
            (E::String, E::Real) => S::CastStringAsReal,
            (E::String, E::String) => S::CastStringAsString,
            (E::String, E::Decimal) => S::CastStringAsDecimal,
            (E::String, E::Time) => S::CastStringAsTime,
            (E::String, E::Duration) => S::CastStringAsDuration,
            (E::String, E::Json) => S::CastStringAsJson,
            (E::Time, E::Int) => S::CastTimeAsInt,
            (E::Time, E::Real) => S::CastTimeAsReal,
            (E::Time, E::String) => S::CastTimeAsString,
            (E::Time, E::Decimal) => S::CastTimeAsDecimal,
            (E::Time, E::Time) => S::CastTimeAsTime,
            (E::Time, E::Duration) => S::CastTimeAsDuration,
            (E::Time, E::Json) => S::CastTimeAsJson,
            (E::Duration, E::Int) => S::CastDurationAsInt,
            (E::Duration, E::Real) => S::CastDurationAsReal,
            (E::Duration, E::String) => S::CastDurationAsString,
            (E::Duration, E::Decimal) => S::CastDurationAsDecimal,
            (E::Duration, E::Time) => S::CastDurationAsTime,
            (E::Duration, E::Duration) => S::CastDurationAsDuration,
            (E::Duration, E::Json) => S::CastDurationAsJson,
            (E::Json, E::Int) => S::CastJsonAsInt,
            (E::Json, E::Real) => S::CastJsonAsReal,
            (E::Json, E::String) => S::CastJsonAsString,
            (E::Json, E::Decimal) => S::CastJsonAsDecimal,
            (E::Json, E::Time) => S::CastJsonAsTime,
            (E::Json, E::Duration) => S::CastJsonAsDuration,
            (E::Json, E::Json) => S::CastJsonAsJson,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|sig| sig.code() == code)
    }

    pub fn source(self) -> EvalType {
        EvalType::ALL
            .into_iter()
            .find(|from| EvalType::ALL.into_iter().any(|to| Self::new(*from, to) == self))
            .unwrap_or(EvalType::Int)
    }

    pub fn target(self) -> EvalType {
        EvalType::ALL
            .into_iter()
            .find(|to| Self::new(self.source(), *to) == self)
            .unwrap_or(EvalType::Int)
    }
}

impl fmt::Display for ScalarFuncSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_protocol_numbering() {
        assert_eq!(ScalarFuncSig::CastIntAsInt.code(), 0);
        assert_eq!(ScalarFuncSig::CastIntAsString.code(), 2);
        assert_eq!(ScalarFuncSig::CastRealAsDecimal.code(), 13);
        assert_eq!(ScalarFuncSig::CastStringAsJson.code(), 36);
        assert_eq!(ScalarFuncSig::CastJsonAsJson.code(), 66);
    }

    #[test]
    fn test_matrix_is_total_and_injective() {
        let mut seen = HashSet::new();
        for from in EvalType::ALL {
            for to in EvalType::ALL {
                let sig = ScalarFuncSig::new(from, to);
                assert!(seen.insert(sig), "{sig} selected twice");
                assert_eq!((sig.source(), sig.target()), (from, to));
                assert_eq!(ScalarFuncSig::from_code(sig.code()), Some(sig));
            }
        }
        assert_eq!(seen.len(), 49);
        assert_eq!(ScalarFuncSig::from_code(7), None);
    }
}
