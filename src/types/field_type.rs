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
//! Static type metadata carried by every expression node and cast target.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::types::charset::{COLLATION_BIN, Charset};

pub const UNSPECIFIED_LENGTH: i32 = -1;

pub const MAX_INT_WIDTH: i32 = 20;
pub const MAX_REAL_WIDTH: i32 = 23;
pub const MAX_DECIMAL_WIDTH: i32 = 65;
pub const MAX_DECIMAL_SCALE: i32 = 30;
pub const MAX_DATE_WIDTH: i32 = 10;
pub const MAX_DATETIME_WIDTH_NO_FSP: i32 = 19;
pub const MAX_DURATION_WIDTH_NO_FSP: i32 = 10;
pub const MAX_JSON_WIDTH: i32 = 12_582_912;
pub const MAX_FSP: i32 = 6;
pub const NOT_FIXED_DEC: i32 = 31;

/// The seven evaluation domains. Every static type maps to exactly one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EvalType {
    Int,
    Real,
    Decimal,
    String,
    Time,
    Duration,
    Json,
}

impl EvalType {
    pub const ALL: [EvalType; 7] = [
        EvalType::Int,
        EvalType::Real,
        EvalType::Decimal,
        EvalType::String,
        EvalType::Time,
        EvalType::Duration,
        EvalType::Json,
    ];

    pub fn is_numeric(self) -> bool {
        matches!(self, EvalType::Int | EvalType::Real | EvalType::Decimal)
    }

    pub fn name(self) -> &'static str {
        match self {
            EvalType::Int => "Int",
            EvalType::Real => "Real",
            EvalType::Decimal => "Decimal",
            EvalType::String => "String",
            EvalType::Time => "Time",
            EvalType::Duration => "Duration",
            EvalType::Json => "Json",
        }
    }
}

impl fmt::Display for EvalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage kind of a column or expression result.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Null,
    Tiny,
    Short,
    Int24,
    Long,
    LongLong,
    Year,
    Bit,
    Float,
    Double,
    NewDecimal,
    Varchar,
    VarString,
    String,
    Blob,
    Enum,
    Set,
    Date,
    Datetime,
    Timestamp,
    Duration,
    Json,
}

impl FieldKind {
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            FieldKind::Tiny
                | FieldKind::Short
                | FieldKind::Int24
                | FieldKind::Long
                | FieldKind::LongLong
                | FieldKind::Year
                | FieldKind::Bit
        )
    }

    pub fn is_string(self) -> bool {
        matches!(
            self,
            FieldKind::Varchar
                | FieldKind::VarString
                | FieldKind::String
                | FieldKind::Blob
                | FieldKind::Enum
                | FieldKind::Set
        )
    }

    /// CHAR and VARCHAR, the kinds that tolerate trailing-space truncation.
    pub fn is_char(self) -> bool {
        matches!(self, FieldKind::String | FieldKind::Varchar)
    }

    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            FieldKind::Date | FieldKind::Datetime | FieldKind::Timestamp | FieldKind::Duration
        )
    }

    pub fn sql_name(self) -> &'static str {
        match self {
            FieldKind::Null => "NULL",
            FieldKind::Tiny => "TINYINT",
            FieldKind::Short => "SMALLINT",
            FieldKind::Int24 => "MEDIUMINT",
            FieldKind::Long => "INT",
            FieldKind::LongLong => "BIGINT",
            FieldKind::Year => "YEAR",
            FieldKind::Bit => "BIT",
            FieldKind::Float => "FLOAT",
            FieldKind::Double => "DOUBLE",
            FieldKind::NewDecimal => "DECIMAL",
            FieldKind::Varchar => "VARCHAR",
            FieldKind::VarString => "CHAR",
            FieldKind::String => "CHAR",
            FieldKind::Blob => "BLOB",
            FieldKind::Enum => "ENUM",
            FieldKind::Set => "SET",
            FieldKind::Date => "DATE",
            FieldKind::Datetime => "DATETIME",
            FieldKind::Timestamp => "TIMESTAMP",
            FieldKind::Duration => "TIME",
            FieldKind::Json => "JSON",
        }
    }
}

/// Column flag bits, numbered as in the MySQL protocol.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldFlags(u32);

impl FieldFlags {
    pub const NOT_NULL: FieldFlags = FieldFlags(1);
    pub const UNSIGNED: FieldFlags = FieldFlags(1 << 5);
    pub const BINARY: FieldFlags = FieldFlags(1 << 7);
    /// String to JSON casts parse the text instead of wrapping it.
    pub const PARSE_TO_JSON: FieldFlags = FieldFlags(1 << 18);
    pub const IS_BOOLEAN: FieldFlags = FieldFlags(1 << 19);
    /// ENUM/SET evaluated through its index or bitmask.
    pub const ENUM_SET_AS_INT: FieldFlags = FieldFlags(1 << 21);

    pub const fn empty() -> Self {
        FieldFlags(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: FieldFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: FieldFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: FieldFlags) {
        self.0 &= !other.0;
    }
}

impl BitOr for FieldFlags {
    type Output = FieldFlags;

    fn bitor(self, rhs: FieldFlags) -> FieldFlags {
        FieldFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for FieldFlags {
    fn bitor_assign(&mut self, rhs: FieldFlags) {
        self.0 |= rhs.0;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldType {
    pub kind: FieldKind,
    pub flags: FieldFlags,
    /// Display width, byte/char length or precision. `UNSPECIFIED_LENGTH` if unset.
    pub flen: i32,
    /// Scale for decimals, fsp for temporals. `UNSPECIFIED_LENGTH` if unset.
    pub decimal: i32,
    pub charset: Charset,
    pub collation: String,
    /// Member names of an ENUM or SET.
    pub elems: Vec<String>,
}

impl FieldType {
    pub fn new(kind: FieldKind) -> Self {
        let mut tp = FieldType {
            kind,
            flags: FieldFlags::empty(),
            flen: UNSPECIFIED_LENGTH,
            decimal: UNSPECIFIED_LENGTH,
            charset: Charset::Binary,
            collation: COLLATION_BIN.to_string(),
            elems: Vec::new(),
        };
        if kind.is_string() {
            tp.charset = Charset::Utf8mb4;
            tp.collation = Charset::Utf8mb4.default_collation().to_string();
        } else if kind != FieldKind::Null {
            tp.flags.insert(FieldFlags::BINARY);
        }
        tp
    }

    pub fn with_flen(mut self, flen: i32) -> Self {
        self.flen = flen;
        self
    }

    pub fn with_decimal(mut self, decimal: i32) -> Self {
        self.decimal = decimal;
        self
    }

    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags.insert(flags);
        self
    }

    pub fn unsigned(self) -> Self {
        self.with_flags(FieldFlags::UNSIGNED)
    }

    pub fn not_null(self) -> Self {
        self.with_flags(FieldFlags::NOT_NULL)
    }

    pub fn with_charset(mut self, charset: Charset, collation: impl Into<String>) -> Self {
        self.charset = charset;
        self.collation = collation.into();
        if charset == Charset::Binary {
            self.flags.insert(FieldFlags::BINARY);
        } else {
            self.flags.remove(FieldFlags::BINARY);
        }
        self
    }

    pub fn with_elems<S: Into<String>>(mut self, elems: impl IntoIterator<Item = S>) -> Self {
        self.elems = elems.into_iter().map(Into::into).collect();
        self
    }

    pub fn eval_type(&self) -> EvalType {
        match self.kind {
            FieldKind::Tiny
            | FieldKind::Short
            | FieldKind::Int24
            | FieldKind::Long
            | FieldKind::LongLong
            | FieldKind::Year
            | FieldKind::Bit => EvalType::Int,
            FieldKind::Float | FieldKind::Double => EvalType::Real,
            FieldKind::NewDecimal => EvalType::Decimal,
            FieldKind::Date | FieldKind::Datetime | FieldKind::Timestamp => EvalType::Time,
            FieldKind::Duration => EvalType::Duration,
            FieldKind::Json => EvalType::Json,
            FieldKind::Enum | FieldKind::Set if self.has_flag(FieldFlags::ENUM_SET_AS_INT) => {
                EvalType::Int
            }
            FieldKind::Null
            | FieldKind::Varchar
            | FieldKind::VarString
            | FieldKind::String
            | FieldKind::Blob
            | FieldKind::Enum
            | FieldKind::Set => EvalType::String,
        }
    }

    /// ENUM, SET and BIT carry both a numeric and a textual view.
    pub fn hybrid(&self) -> bool {
        matches!(self.kind, FieldKind::Enum | FieldKind::Set | FieldKind::Bit)
    }

    pub fn is_enum_or_set(&self) -> bool {
        matches!(self.kind, FieldKind::Enum | FieldKind::Set)
    }

    pub fn has_flag(&self, flag: FieldFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn add_flag(&mut self, flag: FieldFlags) {
        self.flags.insert(flag);
    }

    pub fn remove_flag(&mut self, flag: FieldFlags) {
        self.flags.remove(flag);
    }

    pub fn is_unsigned(&self) -> bool {
        self.has_flag(FieldFlags::UNSIGNED)
    }

    pub fn is_not_null(&self) -> bool {
        self.has_flag(FieldFlags::NOT_NULL)
    }

    pub fn is_binary_str(&self) -> bool {
        self.collation == COLLATION_BIN && self.kind.is_string()
    }

    /// Marks the type as binary: binary charset, binary collation, BINARY flag.
    pub fn set_binary_charset(&mut self) {
        self.charset = Charset::Binary;
        self.collation = COLLATION_BIN.to_string();
        self.flags.insert(FieldFlags::BINARY);
    }

    /// Caps precision of decimals at 65 digits.
    pub fn set_flen_under_limit(&mut self, flen: i32) {
        if self.kind == FieldKind::NewDecimal {
            self.flen = flen.min(MAX_DECIMAL_WIDTH);
        } else {
            self.flen = flen;
        }
    }

    /// Caps scale of decimals at 30 digits.
    pub fn set_decimal_under_limit(&mut self, decimal: i32) {
        if self.kind == FieldKind::NewDecimal {
            self.decimal = decimal.min(MAX_DECIMAL_SCALE);
        } else {
            self.decimal = decimal;
        }
    }

    /// Name used in overflow and truncation messages, e.g. `BIGINT UNSIGNED`.
    pub fn sql_name(&self) -> String {
        if self.kind.is_integer() && self.is_unsigned() {
            format!("{} UNSIGNED", self.kind.sql_name())
        } else {
            self.kind.sql_name().to_string()
        }
    }

    /// Fractional second precision for temporal targets, clamped to 0..=6.
    pub fn fsp(&self) -> u8 {
        self.decimal.clamp(0, MAX_FSP) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_type_mapping() {
        assert_eq!(FieldType::new(FieldKind::Year).eval_type(), EvalType::Int);
        assert_eq!(FieldType::new(FieldKind::Bit).eval_type(), EvalType::Int);
        assert_eq!(FieldType::new(FieldKind::Float).eval_type(), EvalType::Real);
        assert_eq!(FieldType::new(FieldKind::Timestamp).eval_type(), EvalType::Time);
        assert_eq!(FieldType::new(FieldKind::Enum).eval_type(), EvalType::String);
        assert_eq!(
            FieldType::new(FieldKind::Enum)
                .with_flags(FieldFlags::ENUM_SET_AS_INT)
                .eval_type(),
            EvalType::Int
        );
        assert_eq!(FieldType::new(FieldKind::Null).eval_type(), EvalType::String);
    }

    #[test]
    fn test_hybrid_classification() {
        assert!(FieldType::new(FieldKind::Bit).hybrid());
        assert!(!FieldType::new(FieldKind::Bit).is_enum_or_set());
        assert!(FieldType::new(FieldKind::Set).is_enum_or_set());
        assert!(!FieldType::new(FieldKind::Varchar).hybrid());
    }

    #[test]
    fn test_decimal_limits() {
        let mut tp = FieldType::new(FieldKind::NewDecimal);
        tp.set_flen_under_limit(80);
        tp.set_decimal_under_limit(40);
        assert_eq!((tp.flen, tp.decimal), (65, 30));

        let mut tp = FieldType::new(FieldKind::VarString);
        tp.set_flen_under_limit(80);
        assert_eq!(tp.flen, 80);
    }

    #[test]
    fn test_charset_defaults() {
        let s = FieldType::new(FieldKind::Varchar);
        assert_eq!(s.charset, Charset::Utf8mb4);
        assert!(!s.is_binary_str());
        let b = FieldType::new(FieldKind::String).with_charset(Charset::Binary, COLLATION_BIN);
        assert!(b.is_binary_str());
        assert!(b.has_flag(FieldFlags::BINARY));
        assert!(FieldType::new(FieldKind::Long).has_flag(FieldFlags::BINARY));
    }

    #[test]
    fn test_sql_name() {
        assert_eq!(FieldType::new(FieldKind::LongLong).unsigned().sql_name(), "BIGINT UNSIGNED");
        assert_eq!(FieldType::new(FieldKind::Double).sql_name(), "DOUBLE");
    }
}
