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
//! Fixed-point decimal with up to 65 significant digits and a scale of at
//! most 30, stored as an unscaled `i256`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use arrow_buffer::i256;

pub const MAX_PRECISION: u8 = 65;
pub const MAX_SCALE: u8 = 30;

/// Outcome of a lossy decimal conversion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DecimalStatus {
    Exact,
    /// Fraction digits or trailing characters were dropped.
    Truncated,
    /// The value was replaced by the largest representable magnitude.
    Overflow,
    /// No digits at all.
    BadNumber,
}

#[derive(Copy, Clone, Debug)]
pub struct Decimal {
    unscaled: i256,
    scale: u8,
}

/// Compute 10^exp in i256 with overflow checking.
fn pow10_i256(exp: u32) -> Option<i256> {
    let mut out = i256::ONE;
    let ten = i256::from_i128(10);
    for _ in 0..exp {
        out = out.checked_mul(ten)?;
    }
    Some(out)
}

/// Integer division with ROUND_HALF_UP.
fn div_round_i256(dividend: i256, divisor: i256) -> Option<i256> {
    let mut q = dividend.checked_div(divisor)?;
    let r = dividend.checked_rem(divisor)?;
    if r == i256::ZERO {
        return Some(q);
    }

    let abs_b = if divisor.is_negative() {
        divisor.checked_neg()?
    } else {
        divisor
    };
    let abs_r = if r.is_negative() { r.checked_neg()? } else { r };
    let threshold = (abs_b >> 1).checked_add(abs_b & i256::ONE)?;

    if abs_r.cmp(&threshold) != Ordering::Less {
        let carry = if dividend.is_negative() ^ divisor.is_negative() {
            i256::MINUS_ONE
        } else {
            i256::ONE
        };
        q = q.checked_add(carry)?;
    }
    Some(q)
}

fn digits_to_i256(digits: &[u8]) -> Option<i256> {
    let ten = i256::from_i128(10);
    let mut out = i256::ZERO;
    for d in digits {
        out = out
            .checked_mul(ten)?
            .checked_add(i256::from_i128((d - b'0') as i128))?;
    }
    Some(out)
}

impl Decimal {
    pub const ZERO: Decimal = Decimal {
        unscaled: i256::ZERO,
        scale: 0,
    };

    pub fn new(unscaled: i256, scale: u8) -> Self {
        Decimal { unscaled, scale }
    }

    pub fn from_i64(v: i64) -> Self {
        Decimal::new(i256::from_i128(v as i128), 0)
    }

    pub fn from_u64(v: u64) -> Self {
        Decimal::new(i256::from_i128(v as i128), 0)
    }

    pub fn unscaled(&self) -> i256 {
        self.unscaled
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.unscaled == i256::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.unscaled.is_negative()
    }

    fn abs_digits(&self) -> String {
        let s = self.unscaled.to_string();
        s.trim_start_matches('-').to_string()
    }

    /// Number of digits before the decimal point, ignoring leading zeros.
    pub fn int_digits(&self) -> u8 {
        if self.is_zero() {
            return 0;
        }
        let len = self.abs_digits().len();
        len.saturating_sub(self.scale as usize) as u8
    }

    /// `(precision, frac)` in the sense of DECIMAL(precision, frac).
    pub fn precision_and_frac(&self) -> (u8, u8) {
        let precision = self.int_digits() + self.scale;
        (precision.max(1), self.scale)
    }

    /// Largest (or, when `negative`, smallest) value of DECIMAL(precision, frac).
    pub fn max_or_min(negative: bool, precision: u8, frac: u8) -> Self {
        let precision = precision.clamp(1, MAX_PRECISION);
        let frac = frac.min(MAX_SCALE).min(precision);
        let nines = vec![b'9'; precision as usize];
        let magnitude = digits_to_i256(&nines).unwrap_or(i256::ZERO);
        let unscaled = if negative {
            magnitude.checked_neg().unwrap_or(magnitude)
        } else {
            magnitude
        };
        Decimal::new(unscaled, frac)
    }

    /// Parses a decimal numeral with an optional exponent. Leading whitespace
    /// is skipped, trailing garbage yields `Truncated`.
    pub fn parse(text: &str) -> (Decimal, DecimalStatus) {
        let bytes = text.trim_start().as_bytes();
        let len = bytes.len();
        let mut i = 0;
        let negative = match bytes.first() {
            Some(b'-') => {
                i = 1;
                true
            }
            Some(b'+') => {
                i = 1;
                false
            }
            _ => false,
        };

        let mut digits = Vec::with_capacity(len);
        let int_start = i;
        while i < len && bytes[i].is_ascii_digit() {
            digits.push(bytes[i]);
            i += 1;
        }
        let int_len = i - int_start;
        let mut frac_len = 0usize;
        if i < len && bytes[i] == b'.' {
            i += 1;
            while i < len && bytes[i].is_ascii_digit() {
                digits.push(bytes[i]);
                frac_len += 1;
                i += 1;
            }
        }
        if int_len + frac_len == 0 {
            return (Decimal::ZERO, DecimalStatus::BadNumber);
        }

        let mut exp: i64 = 0;
        if i < len && (bytes[i] == b'e' || bytes[i] == b'E') {
            let mut j = i + 1;
            let mut exp_negative = false;
            if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
                exp_negative = bytes[j] == b'-';
                j += 1;
            }
            let start = j;
            let mut value: i64 = 0;
            while j < len && bytes[j].is_ascii_digit() {
                value = value
                    .saturating_mul(10)
                    .saturating_add((bytes[j] - b'0') as i64);
                j += 1;
            }
            if j > start {
                i = j;
                // past this bound the result is already overflow or zero
                let bound = (MAX_PRECISION as i64) + (MAX_SCALE as i64) + digits.len() as i64;
                let value = value.min(bound);
                exp = if exp_negative { -value } else { value };
            }
        }

        let trailing = bytes[i..].iter().any(|b| !b.is_ascii_whitespace());
        let (dec, status) = Self::from_digits(negative, digits, frac_len as i64 - exp);
        if trailing && status == DecimalStatus::Exact {
            return (dec, DecimalStatus::Truncated);
        }
        (dec, status)
    }

    /// Builds `digits * 10^-frac`, dropping fraction digits past the limits.
    fn from_digits(negative: bool, mut digits: Vec<u8>, mut frac: i64) -> (Decimal, DecimalStatus) {
        let leading = digits.iter().take_while(|d| **d == b'0').count();
        digits.drain(..leading);
        if digits.is_empty() {
            let scale = frac.clamp(0, MAX_SCALE as i64) as u8;
            return (Decimal::new(i256::ZERO, scale), DecimalStatus::Exact);
        }
        if frac < 0 {
            if digits.len() as i64 - frac > MAX_PRECISION as i64 {
                return (
                    Decimal::max_or_min(negative, MAX_PRECISION, 0),
                    DecimalStatus::Overflow,
                );
            }
            digits.extend(std::iter::repeat_n(b'0', (-frac) as usize));
            frac = 0;
        }

        let int_digits = (digits.len() as i64 - frac).max(0);
        if int_digits > MAX_PRECISION as i64 {
            return (
                Decimal::max_or_min(negative, MAX_PRECISION, 0),
                DecimalStatus::Overflow,
            );
        }

        let mut status = DecimalStatus::Exact;
        let allowed_frac = (MAX_SCALE as i64).min(MAX_PRECISION as i64 - int_digits);
        if frac > allowed_frac {
            let drop = (frac - allowed_frac) as usize;
            digits.truncate(digits.len().saturating_sub(drop));
            frac = allowed_frac;
            status = DecimalStatus::Truncated;
        }

        let Some(magnitude) = digits_to_i256(&digits) else {
            return (
                Decimal::max_or_min(negative, MAX_PRECISION, 0),
                DecimalStatus::Overflow,
            );
        };
        let unscaled = if negative {
            magnitude.checked_neg().unwrap_or(magnitude)
        } else {
            magnitude
        };
        (Decimal::new(unscaled, frac as u8), status)
    }

    /// Converts through the shortest round-trip text of `value`.
    pub fn from_f64(value: f64) -> (Decimal, DecimalStatus) {
        if !value.is_finite() {
            return (Decimal::ZERO, DecimalStatus::Overflow);
        }
        let mut buf = ryu::Buffer::new();
        let text = buf.format_finite(value);
        Self::parse(text.strip_suffix(".0").unwrap_or(text))
    }

    /// Rounds half away from zero (`HalfUp`) to `frac` fraction digits.
    pub fn round(&self, frac: u8) -> Result<Decimal, DecimalStatus> {
        let frac = frac.min(MAX_SCALE);
        let out = match frac.cmp(&self.scale) {
            Ordering::Equal => return Ok(*self),
            Ordering::Greater => {
                let factor =
                    pow10_i256((frac - self.scale) as u32).ok_or(DecimalStatus::Overflow)?;
                let unscaled = self
                    .unscaled
                    .checked_mul(factor)
                    .ok_or(DecimalStatus::Overflow)?;
                Decimal::new(unscaled, frac)
            }
            Ordering::Less => {
                let divisor =
                    pow10_i256((self.scale - frac) as u32).ok_or(DecimalStatus::Overflow)?;
                let unscaled =
                    div_round_i256(self.unscaled, divisor).ok_or(DecimalStatus::Overflow)?;
                Decimal::new(unscaled, frac)
            }
        };
        if out.int_digits() as u16 + out.scale as u16 > MAX_PRECISION as u16 {
            return Err(DecimalStatus::Overflow);
        }
        Ok(out)
    }

    fn integral_part(&self) -> Option<i256> {
        let divisor = pow10_i256(self.scale as u32)?;
        self.unscaled.checked_div(divisor)
    }

    /// Drops the fraction and saturates to the i64 range. The flag reports overflow.
    pub fn to_i64(&self) -> (i64, bool) {
        let saturated = if self.is_negative() { i64::MIN } else { i64::MAX };
        match self
            .integral_part()
            .and_then(|v| v.to_i128())
            .and_then(|v| i64::try_from(v).ok())
        {
            Some(v) => (v, false),
            None => (saturated, true),
        }
    }

    /// Drops the fraction and saturates to the u64 range. Negative values give 0.
    pub fn to_u64(&self) -> (u64, bool) {
        let Some(integral) = self.integral_part() else {
            return (u64::MAX, true);
        };
        if integral.is_negative() {
            return (0, true);
        }
        match integral.to_i128().and_then(|v| u64::try_from(v).ok()) {
            Some(v) => (v, false),
            None => (u64::MAX, true),
        }
    }

    pub fn to_f64(&self) -> f64 {
        self.to_string().parse::<f64>().unwrap_or(0.0)
    }

    /// Same value with trailing fraction zeros removed.
    fn normalized(&self) -> Decimal {
        let ten = i256::from_i128(10);
        let mut out = *self;
        while out.scale > 0 && out.unscaled.checked_rem(ten) == Some(i256::ZERO) {
            out.unscaled = out.unscaled.checked_div(ten).unwrap_or(out.unscaled);
            out.scale -= 1;
        }
        out
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.normalized(), other.normalized());
        a.unscaled == b.unscaled && a.scale == b.scale
    }
}

impl FromStr for Decimal {
    type Err = DecimalStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Decimal::parse(s) {
            (dec, DecimalStatus::Exact) => Ok(dec),
            (_, status) => Err(status),
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = self.scale as usize;
        let negative = self.is_negative();
        let digits = self.abs_digits();
        if scale == 0 {
            return write!(f, "{}{}", if negative { "-" } else { "" }, digits);
        }
        let sign = if negative { "-" } else { "" };
        if digits.len() <= scale {
            write!(f, "{sign}0.{digits:0>scale$}")
        } else {
            let split = digits.len() - scale;
            write!(f, "{sign}{}.{}", &digits[..split], &digits[split..])
        }
    }
}
