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
use std::fmt::Display;

use thiserror::Error;

/// Error raised while building or evaluating a cast.
///
/// Every kind except [`CastError::InternalInconsistency`] goes through the
/// statement's strictness policy (see `EvalContext::handle_truncate` and
/// friends): strict statements surface it, the others record it as a warning
/// and continue with the kernel's fallback value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CastError {
    /// The value does not fit the target domain.
    #[error("{0}")]
    Overflow(String),
    /// Digits, characters or fractional seconds were dropped.
    #[error("{0}")]
    Truncation(String),
    /// The input is not a numeral, temporal literal or JSON text.
    #[error("{0}")]
    InvalidFormat(String),
    /// The value has no meaning in the target domain.
    #[error("{0}")]
    IncompatibleValue(String),
    /// The expression tree or the cast matrix is inconsistent.
    #[error("internal cast error: {0}")]
    InternalInconsistency(String),
}

pub type Result<T> = std::result::Result<T, CastError>;

impl CastError {
    /// Errors that are never downgraded to a warning.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CastError::InternalInconsistency(_))
    }

    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        CastError::InternalInconsistency(msg.into())
    }

    pub(crate) fn overflow(type_name: &str, value: impl Display) -> Self {
        CastError::Overflow(format!("{type_name} value is out of range in '{value}'"))
    }

    pub(crate) fn truncated_wrong_value(type_name: &str, value: impl Display) -> Self {
        CastError::Truncation(format!("Truncated incorrect {type_name} value: '{value}'"))
    }

    pub(crate) fn data_too_long(flen: usize, data_len: usize) -> Self {
        CastError::Truncation(format!(
            "Data Too Long, field len {flen}, data len {data_len}"
        ))
    }

    pub(crate) fn data_truncated(flen: usize, data_len: usize) -> Self {
        CastError::Truncation(format!(
            "Data truncated, field len {flen}, data len {data_len}"
        ))
    }

    pub(crate) fn cast_as_signed_overflow() -> Self {
        CastError::Overflow(
            "Cast to signed converted positive out-of-range integer to it's negative complement"
                .to_string(),
        )
    }

    pub(crate) fn cast_neg_int_as_unsigned() -> Self {
        CastError::Overflow(
            "Cast to unsigned converted negative integer to it's positive complement".to_string(),
        )
    }

    pub(crate) fn wrong_value(type_name: &str, value: impl Display) -> Self {
        CastError::InvalidFormat(format!("Incorrect {type_name} value: '{value}'"))
    }

    pub(crate) fn invalid_json_text(detail: impl Display) -> Self {
        CastError::InvalidFormat(format!("Invalid JSON text: {detail}"))
    }

    pub(crate) fn invalid_fsp(fsp: impl Display) -> Self {
        CastError::InvalidFormat(format!("Invalid fsp {fsp}"))
    }

    pub(crate) fn cannot_convert_string(bytes: &[u8], from: &str, to: &str) -> Self {
        let mut hex = String::with_capacity(bytes.len() * 2 + 2);
        hex.push_str("\\x");
        for b in bytes.iter().take(32) {
            hex.push_str(&format!("{b:02X}"));
        }
        CastError::InvalidFormat(format!(
            "Cannot convert string '{hex}' from {from} to {to}"
        ))
    }

    pub(crate) fn allowed_packet_overflowed(func: &str, max: u64) -> Self {
        CastError::Overflow(format!(
            "Result of {func}() was larger than max_allowed_packet ({max}) - truncated"
        ))
    }

    pub(crate) fn m_bigger_than_d(flen: i32, decimal: i32) -> Self {
        CastError::InvalidFormat(format!(
            "For float(M,D), double(M,D) or decimal(M,D), M must be >= D ({flen}, {decimal})"
        ))
    }

    pub(crate) fn incompatible_json(target: &str, json_type: &str) -> Self {
        CastError::IncompatibleValue(format!("Cannot cast JSON {json_type} to {target}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_follow_mysql_wording() {
        assert_eq!(
            CastError::overflow("BIGINT UNSIGNED", "99999999999999999999").to_string(),
            "BIGINT UNSIGNED value is out of range in '99999999999999999999'"
        );
        assert_eq!(
            CastError::truncated_wrong_value("INTEGER", "12ab").to_string(),
            "Truncated incorrect INTEGER value: '12ab'"
        );
        assert_eq!(
            CastError::cannot_convert_string(&[0xff, 0x01], "binary", "utf8mb4").to_string(),
            "Cannot convert string '\\xFF01' from binary to utf8mb4"
        );
    }

    #[test]
    fn test_only_internal_errors_are_fatal() {
        assert!(CastError::internal("bad").is_fatal());
        assert!(!CastError::wrong_value("datetime", "x").is_fatal());
        assert!(!CastError::incompatible_json("SIGNED", "ARRAY").is_fatal());
    }
}
