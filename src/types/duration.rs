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
//! TIME values: a signed microsecond count within ±838:59:59.999999.

use std::fmt;
use std::ops::Neg;

use arrow_buffer::i256;
use chrono::FixedOffset;

use crate::common::error::{CastError, Result};
use crate::types::decimal::Decimal;
use crate::types::time::{Time, TimeKind, parse_frac_micros};

pub const MAX_HOUR: i64 = 838;
pub const MAX_DURATION_MICROS: i64 = ((MAX_HOUR * 60 + 59) * 60 + 59) * 1_000_000 + 999_999;
/// Largest `hhmmss` numeral that is still a time of day.
const TIME_MAX_VALUE: i64 = MAX_HOUR * 10000 + 59 * 100 + 59;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Duration {
    micros: i64,
    fsp: u8,
}

/// A literal that only partially parsed, with the value MySQL keeps for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DurationParseError {
    pub fallback: Duration,
    pub error: CastError,
}

impl Duration {
    pub fn new(micros: i64, fsp: u8) -> Self {
        Duration { micros, fsp }
    }

    pub fn zero(fsp: u8) -> Self {
        Duration::new(0, fsp)
    }

    /// `838:59:59` with as many nines after the point as `fsp` allows.
    pub fn max(fsp: u8) -> Self {
        let fsp = fsp.min(6);
        let frac = 999_999 - 999_999 % 10i64.pow(6 - fsp as u32);
        Duration::new(MAX_DURATION_MICROS - 999_999 + frac, fsp)
    }

    pub fn micros(&self) -> i64 {
        self.micros
    }

    pub fn fsp(&self) -> u8 {
        self.fsp
    }

    pub fn is_zero(&self) -> bool {
        self.micros == 0
    }

    pub fn is_negative(&self) -> bool {
        self.micros < 0
    }

    pub fn with_fsp(self, fsp: u8) -> Self {
        Duration::new(self.micros, fsp)
    }

    /// `(hours, minutes, seconds, microseconds)` of the absolute value.
    fn parts(&self) -> (i64, i64, i64, i64) {
        let abs = self.micros.unsigned_abs() as i64;
        let secs = abs / 1_000_000;
        (secs / 3600, secs / 60 % 60, secs % 60, abs % 1_000_000)
    }

    pub fn check_fsp(fsp: i32) -> Result<u8> {
        match fsp {
            -1 => Ok(0),
            0..=6 => Ok(fsp as u8),
            _ => Err(CastError::invalid_fsp(fsp)),
        }
    }

    /// Parses `[-][D ]hh:mm[:ss][.f]`, `[-]hhmmss[.f]` or a datetime literal,
    /// whose time of day is taken.
    pub fn parse(text: &str, fsp: u8) -> std::result::Result<Self, DurationParseError> {
        let fsp = fsp.min(6);
        let truncated = |value: Duration| DurationParseError {
            fallback: value,
            error: CastError::truncated_wrong_value("time", text),
        };
        let mut s = text.trim();
        if s.is_empty() {
            return Err(truncated(Duration::zero(fsp)));
        }
        let negative = s.starts_with('-');
        if negative {
            s = s[1..].trim_start();
        }

        let int_len = s.find('.').unwrap_or(s.len());
        let all_digits = s.bytes().all(|b| b.is_ascii_digit() || b == b'.');
        if s.contains('-') || (all_digits && int_len >= 12) {
            let utc = FixedOffset::east_opt(0).ok_or_else(|| truncated(Duration::zero(fsp)))?;
            return match Time::parse(s, TimeKind::Datetime, fsp, utc) {
                Ok(t) => {
                    let d = t.to_duration().with_fsp(fsp);
                    Ok(if negative { -d } else { d })
                }
                Err(_) => Err(truncated(Duration::zero(fsp))),
            };
        }

        let (days, rest) = match s.split_once(' ') {
            Some((d, rest)) => match d.parse::<i64>() {
                Ok(days) => (days, rest.trim()),
                Err(_) => return Err(truncated(Duration::zero(fsp))),
            },
            None => (0, s),
        };
        let (hms, frac) = rest.split_once('.').unwrap_or((rest, ""));
        let (hours, minutes, seconds) = if hms.contains(':') {
            let fields: Vec<i64> = hms
                .split(':')
                .map(|f| f.parse::<i64>())
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| truncated(Duration::zero(fsp)))?;
            match fields.as_slice() {
                [h, m] => (*h, *m, 0),
                [h, m, s] => (*h, *m, *s),
                _ => return Err(truncated(Duration::zero(fsp))),
            }
        } else if hms.is_empty() && !frac.is_empty() {
            (0, 0, 0)
        } else {
            let n = hms
                .parse::<i64>()
                .map_err(|_| truncated(Duration::zero(fsp)))?;
            (n / 10000, n / 100 % 100, n % 100)
        };
        if minutes >= 60 || seconds >= 60 || hours < 0 || days < 0 {
            return Err(truncated(Duration::zero(fsp)));
        }
        let micro = parse_frac_micros(frac, fsp).ok_or_else(|| truncated(Duration::zero(fsp)))?;

        let total = (days as i128 * 24 + hours as i128) * 3_600_000_000
            + minutes as i128 * 60_000_000
            + seconds as i128 * 1_000_000
            + micro as i128;
        if total > MAX_DURATION_MICROS as i128 {
            let max = Duration::max(fsp);
            return Err(truncated(if negative { -max } else { max }));
        }
        let d = Duration::new(total as i64, fsp);
        Ok(if negative { -d } else { d })
    }

    /// Interprets an integer as `[-]hhmmss`. Numerals of eleven or more digits
    /// are tried as datetimes.
    pub fn from_num(num: i64, fsp: u8) -> Result<Self> {
        if num > TIME_MAX_VALUE {
            if num >= 10_000_000_000
                && let Some(utc) = FixedOffset::east_opt(0)
                && let Ok(t) = Time::from_num(num, TimeKind::Datetime, 0, utc)
            {
                return Ok(t.to_duration().with_fsp(fsp));
            }
            return Err(CastError::overflow("time", num));
        }
        if num < -TIME_MAX_VALUE {
            return Err(CastError::overflow("time", num));
        }
        let abs = num.abs();
        if abs / 10000 > MAX_HOUR || abs % 100 >= 60 || abs / 100 % 100 >= 60 {
            return Err(CastError::truncated_wrong_value("time", num));
        }
        let micros = ((abs / 10000) * 3600 + (abs / 100 % 100) * 60 + abs % 100) * 1_000_000;
        Ok(Duration::new(if num < 0 { -micros } else { micros }, fsp))
    }

    /// Rounds half away from zero to `fsp` fraction digits, clamped to the range.
    pub fn round_frac(&self, fsp: u8) -> Self {
        let fsp = fsp.min(6);
        let unit = 10i64.pow(6 - fsp as u32);
        let abs = self.micros.unsigned_abs() as i64;
        let rounded = ((abs + unit / 2) / unit * unit).min(Duration::max(fsp).micros);
        Duration::new(if self.micros < 0 { -rounded } else { rounded }, fsp)
    }

    /// `[-]hhmmss[.ffffff]` with `fsp` fraction digits.
    pub fn to_number(&self) -> Decimal {
        let (h, m, s, micro) = self.parts();
        let whole = h * 10000 + m * 100 + s;
        let frac = micro / 10i64.pow(6 - self.fsp.min(6) as u32);
        let mut unscaled = whole as i128 * 10i128.pow(self.fsp.min(6) as u32) + frac as i128;
        if self.is_negative() {
            unscaled = -unscaled;
        }
        Decimal::new(i256::from_i128(unscaled), self.fsp.min(6))
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        Duration::new(-self.micros, self.fsp)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s, micro) = self.parts();
        if self.is_negative() {
            f.write_str("-")?;
        }
        write!(f, "{h:02}:{m:02}:{s:02}")?;
        if self.fsp > 0 {
            let frac = format!("{micro:06}");
            write!(f, ".{}", &frac[..self.fsp.min(6) as usize])?;
        }
        Ok(())
    }
}
