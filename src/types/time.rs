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
//! DATE / DATETIME / TIMESTAMP values.
//!
//! Fields are kept broken down rather than as a `chrono` value because the
//! dialect admits dates chrono cannot represent: the zero date
//! `0000-00-00` and dates with a zero month or day (`2001-00-00`).
//! Calendar arithmetic goes through `chrono` whenever the date is real.

use std::fmt;

use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Timelike};

use crate::common::error::{CastError, Result};
use crate::types::decimal::Decimal;
use crate::types::duration::Duration;
use crate::types::field_type::FieldKind;

use arrow_buffer::i256;

const YY_PART_YEAR: i64 = 70;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TimeKind {
    Date,
    Datetime,
    Timestamp,
}

impl TimeKind {
    pub fn from_field_kind(kind: FieldKind) -> Option<Self> {
        match kind {
            FieldKind::Date => Some(TimeKind::Date),
            FieldKind::Datetime => Some(TimeKind::Datetime),
            FieldKind::Timestamp => Some(TimeKind::Timestamp),
            _ => None,
        }
    }

    pub fn field_kind(self) -> FieldKind {
        match self {
            TimeKind::Date => FieldKind::Date,
            TimeKind::Datetime => FieldKind::Datetime,
            TimeKind::Timestamp => FieldKind::Timestamp,
        }
    }

    fn name(self) -> &'static str {
        match self {
            TimeKind::Date => "date",
            TimeKind::Datetime => "datetime",
            TimeKind::Timestamp => "timestamp",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Time {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    microsecond: u32,
    kind: TimeKind,
    fsp: u8,
}

/// Rewrites a compact date numeral to `YYYYMMDDhhmmss`, expanding two-digit
/// years (00-69 are 20xx, 70-99 are 19xx).
fn standardize_date_literal(value: i64) -> Option<i64> {
    if value <= 0 {
        return None;
    }
    if value >= 10000101000000 {
        if value > 99999999999999 {
            return None;
        }
        return Some(value);
    }
    if value < 101 {
        return None;
    }
    if value <= (YY_PART_YEAR - 1) * 10000 + 1231 {
        return Some((value + 20000000) * 1000000);
    }
    if value < YY_PART_YEAR * 10000 + 101 {
        return None;
    }
    if value <= 991231 {
        return Some((value + 19000000) * 1000000);
    }
    if value < 10000101 {
        return None;
    }
    if value <= 99991231 {
        return Some(value * 1000000);
    }
    if value < 101000000 {
        return None;
    }
    if value <= (YY_PART_YEAR - 1) * 10000000000 + 1231235959 {
        return Some(value + 20000000000000);
    }
    if value < YY_PART_YEAR * 10000000000 + 101000000 {
        return None;
    }
    if value <= 991231235959 {
        return Some(value + 19000000000000);
    }
    Some(value)
}

fn adjust_two_digit_year(year: u32) -> u32 {
    if (year as i64) < YY_PART_YEAR {
        year + 2000
    } else {
        year + 1900
    }
}

/// Rounds a fraction digit string to `fsp` digits. Returns microseconds,
/// which may equal 1_000_000 when the rounding carries into the seconds.
pub(crate) fn parse_frac_micros(frac: &str, fsp: u8) -> Option<u32> {
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut seven = [b'0'; 7];
    for (slot, b) in seven.iter_mut().zip(frac.bytes()) {
        *slot = b;
    }
    let mut value: u64 = 0;
    for b in seven {
        value = value * 10 + (b - b'0') as u64;
    }
    let unit = 10u64.pow(7 - fsp.min(6) as u32);
    let rounded = (value + unit / 2) / unit * unit;
    Some((rounded / 10) as u32)
}

fn timestamp_bounds() -> Option<(NaiveDateTime, NaiveDateTime)> {
    let min = NaiveDate::from_ymd_opt(1970, 1, 1)?.and_hms_opt(0, 0, 1)?;
    let max = NaiveDate::from_ymd_opt(2038, 1, 19)?.and_hms_micro_opt(3, 14, 7, 999_999)?;
    Some((min, max))
}

impl Time {
    pub fn zero(kind: TimeKind, fsp: u8) -> Self {
        Time {
            year: 0,
            month: 0,
            day: 0,
            hour: 0,
            minute: 0,
            second: 0,
            microsecond: 0,
            kind,
            fsp: fsp.min(6),
        }
    }

    /// Builds and validates a value. Zero month or day is allowed.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        year: u32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: u32,
        kind: TimeKind,
    ) -> Result<Self> {
        let text = format!(
            "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{microsecond:06}"
        );
        if year > 9999 || month > 12 || day > 31 || hour > 23 || minute > 59 || second > 59 {
            return Err(CastError::wrong_value(kind.name(), text));
        }
        if microsecond > 999_999 {
            return Err(CastError::wrong_value(kind.name(), text));
        }
        let t = Time {
            year: year as u16,
            month: month as u8,
            day: day as u8,
            hour: hour as u8,
            minute: minute as u8,
            second: second as u8,
            microsecond,
            kind,
            fsp: if microsecond == 0 { 0 } else { 6 },
        };
        if t.month != 0 && t.day != 0 && t.naive_date().is_none() {
            return Err(CastError::wrong_value(kind.name(), text));
        }
        Ok(t)
    }

    pub fn from_naive(dt: NaiveDateTime, kind: TimeKind, fsp: u8) -> Result<Self> {
        if !(0..=9999).contains(&dt.year()) {
            return Err(CastError::wrong_value(kind.name(), dt));
        }
        Ok(Time {
            year: dt.year() as u16,
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second() as u8,
            microsecond: dt.nanosecond() / 1000 % 1_000_000,
            kind,
            fsp: fsp.min(6),
        })
    }

    pub fn with_fsp(mut self, fsp: u8) -> Self {
        self.fsp = fsp.min(6);
        self
    }

    pub fn year(&self) -> u32 {
        self.year as u32
    }

    pub fn month(&self) -> u32 {
        self.month as u32
    }

    pub fn day(&self) -> u32 {
        self.day as u32
    }

    pub fn hour(&self) -> u32 {
        self.hour as u32
    }

    pub fn minute(&self) -> u32 {
        self.minute as u32
    }

    pub fn second(&self) -> u32 {
        self.second as u32
    }

    pub fn microsecond(&self) -> u32 {
        self.microsecond
    }

    pub fn kind(&self) -> TimeKind {
        self.kind
    }

    pub fn fsp(&self) -> u8 {
        self.fsp
    }

    pub fn is_zero(&self) -> bool {
        self.year == 0
            && self.month == 0
            && self.day == 0
            && self.hour == 0
            && self.minute == 0
            && self.second == 0
            && self.microsecond == 0
    }

    fn naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)
    }

    /// The value as a calendar datetime, `None` for zero or partial dates.
    pub fn naive(&self) -> Option<NaiveDateTime> {
        self.naive_date()?.and_hms_micro_opt(
            self.hour as u32,
            self.minute as u32,
            self.second as u32,
            self.microsecond,
        )
    }

    /// Day of week counted from Monday = 0.
    pub fn weekday(&self) -> Option<u32> {
        self.naive_date().map(|d| d.weekday().num_days_from_monday())
    }

    fn wrong_value(&self) -> CastError {
        CastError::wrong_value(self.kind.name(), self)
    }

    /// Calendar and, for TIMESTAMP, range validation in the session time zone.
    pub fn check(&self, tz: FixedOffset) -> Result<()> {
        if self.is_zero() {
            return Ok(());
        }
        if (self.month != 0 && self.day != 0 && self.naive_date().is_none()) || self.month > 12 {
            return Err(self.wrong_value());
        }
        if self.kind != TimeKind::Timestamp {
            return Ok(());
        }
        let naive = self.naive().ok_or_else(|| self.wrong_value())?;
        let utc = tz
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| self.wrong_value())?;
        let (min, max) = timestamp_bounds().ok_or_else(|| CastError::internal("timestamp bounds"))?;
        if utc < min || utc > max {
            return Err(self.wrong_value());
        }
        Ok(())
    }

    fn finish(mut self, kind: TimeKind, fsp: u8, tz: FixedOffset) -> Result<Self> {
        self.kind = kind;
        self.fsp = fsp.min(6);
        if kind == TimeKind::Date {
            self = self.truncate_to_date();
        }
        self.check(tz)?;
        Ok(self)
    }

    /// Parses a date or datetime literal: delimited (`2023-04-01 10:20:30.5`,
    /// `23/4/1`, `2023-04-01T10:20`) or compact (`20230401102030`).
    pub fn parse(text: &str, kind: TimeKind, fsp: u8, tz: FixedOffset) -> Result<Self> {
        let s = text.trim();
        let err = || CastError::wrong_value(kind.name(), text);
        if s.is_empty() {
            return Err(err());
        }
        let is_compact = s.as_bytes()[0].is_ascii_digit()
            && s.bytes().all(|b| b.is_ascii_digit() || b == b'.')
            && s.matches('.').count() <= 1;
        if is_compact {
            return Self::parse_compact(s, kind, fsp, tz).map_err(|_| err());
        }

        let (date_part, time_part) = match s.find([' ', 'T']) {
            Some(pos) => (&s[..pos], Some(s[pos + 1..].trim())),
            None => (s, None),
        };
        let date_fields: Vec<&str> = date_part
            .split(|c: char| !c.is_ascii_digit())
            .filter(|f| !f.is_empty())
            .collect();
        if date_fields.len() != 3 || date_part.starts_with(|c: char| !c.is_ascii_digit()) {
            return Err(err());
        }
        let mut nums = [0u32; 3];
        for (slot, field) in nums.iter_mut().zip(&date_fields) {
            *slot = field.parse().map_err(|_| err())?;
        }
        let year = if date_fields[0].len() <= 2 {
            adjust_two_digit_year(nums[0])
        } else {
            nums[0]
        };

        let (mut hour, mut minute, mut second, mut micro) = (0u32, 0u32, 0u32, 0u32);
        if let Some(time_part) = time_part.filter(|t| !t.is_empty()) {
            let (hms, frac) = time_part.split_once('.').unwrap_or((time_part, ""));
            let fields: Vec<&str> = hms.split(':').collect();
            if fields.len() > 3 || fields.iter().any(|f| f.is_empty()) {
                return Err(err());
            }
            let mut parts = [0u32; 3];
            for (slot, field) in parts.iter_mut().zip(&fields) {
                *slot = field.trim().parse().map_err(|_| err())?;
            }
            (hour, minute, second) = (parts[0], parts[1], parts[2]);
            micro = parse_frac_micros(frac, fsp).ok_or_else(err)?;
        }

        let carry = micro >= 1_000_000;
        let t = Time::from_parts(
            year,
            nums[1],
            nums[2],
            hour,
            minute,
            second,
            if carry { 0 } else { micro },
            kind,
        )
        .map_err(|_| err())?;
        let t = if carry { t.add_seconds(1)? } else { t };
        t.finish(kind, fsp, tz).map_err(|_| err())
    }

    fn parse_compact(s: &str, kind: TimeKind, fsp: u8, tz: FixedOffset) -> Result<Self> {
        let (int_part, frac) = s.split_once('.').unwrap_or((s, ""));
        let field = |from: usize, to: usize| -> u32 { int_part[from..to].parse().unwrap_or(0) };
        let (year, month, day, hour, minute, second) = match int_part.len() {
            14 => (field(0, 4), field(4, 6), field(6, 8), field(8, 10), field(10, 12), field(12, 14)),
            12 => (
                adjust_two_digit_year(field(0, 2)),
                field(2, 4),
                field(4, 6),
                field(6, 8),
                field(8, 10),
                field(10, 12),
            ),
            10 => (
                adjust_two_digit_year(field(0, 2)),
                field(2, 4),
                field(4, 6),
                field(6, 8),
                field(8, 10),
                0,
            ),
            8 => (field(0, 4), field(4, 6), field(6, 8), 0, 0, 0),
            6 => (adjust_two_digit_year(field(0, 2)), field(2, 4), field(4, 6), 0, 0, 0),
            _ => {
                let num: i64 = int_part
                    .parse()
                    .map_err(|_| CastError::wrong_value(kind.name(), s))?;
                if num == 0 && frac.bytes().any(|b| b != b'0') {
                    return Err(CastError::wrong_value(kind.name(), s));
                }
                return Self::from_num(num, kind, fsp, tz);
            }
        };
        let micro = parse_frac_micros(frac, fsp).ok_or_else(|| CastError::wrong_value(kind.name(), s))?;
        let carry = micro >= 1_000_000;
        let t = Time::from_parts(
            year,
            month,
            day,
            hour,
            minute,
            second,
            if carry { 0 } else { micro },
            kind,
        )?;
        let t = if carry { t.add_seconds(1)? } else { t };
        t.finish(kind, fsp, tz)
    }

    /// Interprets an integer as a compact date numeral. `0` is the zero date.
    pub fn from_num(num: i64, kind: TimeKind, fsp: u8, tz: FixedOffset) -> Result<Self> {
        if num == 0 {
            return Ok(Time::zero(kind, fsp));
        }
        let err = || CastError::wrong_value(kind.name(), num);
        let value = standardize_date_literal(num).ok_or_else(err)?;
        let date = value / 1_000_000;
        let time = value % 1_000_000;
        Time::from_parts(
            (date / 10000) as u32,
            (date / 100 % 100) as u32,
            (date % 100) as u32,
            (time / 10000) as u32,
            (time / 100 % 100) as u32,
            (time % 100) as u32,
            0,
            kind,
        )
        .map_err(|_| err())?
        .finish(kind, fsp, tz)
        .map_err(|_| err())
    }

    /// Parses the text of a real or decimal number (`20230401.123`).
    pub fn from_float_str(s: &str, kind: TimeKind, fsp: u8, tz: FixedOffset) -> Result<Self> {
        if s.starts_with("0.0") {
            return Ok(Time::zero(kind, fsp));
        }
        let s = s.trim();
        if !s.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(CastError::wrong_value(kind.name(), s));
        }
        Self::parse_compact(s, kind, fsp, tz)
    }

    /// Value of a YEAR column as a date. Month and day stay zero.
    pub fn from_year(year: i64) -> Result<Self> {
        if year == 0 {
            return Ok(Time::zero(TimeKind::Date, 0));
        }
        let year = u32::try_from(year).map_err(|_| CastError::wrong_value("date", year))?;
        Time::from_parts(year, 0, 0, 0, 0, 0, 0, TimeKind::Datetime)
    }

    /// The statement date plus a time-of-day offset.
    pub fn from_duration(
        d: Duration,
        anchor: NaiveDate,
        kind: TimeKind,
        tz: FixedOffset,
    ) -> Result<Self> {
        let start = anchor
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| CastError::wrong_value(kind.name(), anchor))?;
        let dt = start
            .checked_add_signed(TimeDelta::microseconds(d.micros()))
            .ok_or_else(|| CastError::wrong_value(kind.name(), d))?;
        let t = Time::from_naive(dt, kind, d.fsp())?;
        t.check(tz)?;
        Ok(t)
    }

    fn add_seconds(self, secs: i64) -> Result<Self> {
        let Some(naive) = self.naive() else {
            // partial dates cannot carry into the day, saturate instead
            return Ok(Time {
                microsecond: 999_999,
                ..self
            });
        };
        let dt = naive
            .checked_add_signed(TimeDelta::seconds(secs))
            .ok_or_else(|| self.wrong_value())?;
        Time::from_naive(dt, self.kind, self.fsp)
    }

    /// Rounds half up to `fsp` fraction digits, carrying into the seconds.
    pub fn round_frac(&self, fsp: u8) -> Result<Self> {
        let fsp = fsp.min(6);
        if self.is_zero() || self.microsecond == 0 {
            return Ok(self.with_fsp(fsp));
        }
        let unit = 10u32.pow(6 - fsp as u32);
        let rounded = (self.microsecond + unit / 2) / unit * unit;
        if rounded < 1_000_000 {
            return Ok(Time {
                microsecond: rounded,
                fsp,
                ..*self
            });
        }
        let truncated = Time {
            microsecond: 0,
            fsp,
            ..*self
        };
        match truncated.naive() {
            Some(_) => truncated.add_seconds(1),
            None => Ok(Time {
                microsecond: 1_000_000 - unit,
                ..truncated
            }),
        }
    }

    /// Changes the kind; TIMESTAMP results are range checked.
    pub fn convert(&self, kind: TimeKind, tz: FixedOffset) -> Result<Self> {
        let t = Time { kind, ..*self };
        if kind == TimeKind::Timestamp {
            t.check(tz)?;
        }
        Ok(t)
    }

    pub fn truncate_to_date(&self) -> Self {
        Time {
            hour: 0,
            minute: 0,
            second: 0,
            microsecond: 0,
            kind: TimeKind::Date,
            fsp: 0,
            ..*self
        }
    }

    /// `YYYYMMDD` for dates, `YYYYMMDDhhmmss[.ffffff]` otherwise.
    pub fn to_number(&self) -> Decimal {
        if self.is_zero() {
            return Decimal::ZERO;
        }
        let date = self.year as i64 * 10000 + self.month as i64 * 100 + self.day as i64;
        if self.kind == TimeKind::Date {
            return Decimal::from_i64(date);
        }
        let whole = date * 1_000_000
            + self.hour as i64 * 10000
            + self.minute as i64 * 100
            + self.second as i64;
        if self.fsp == 0 {
            return Decimal::from_i64(whole);
        }
        let frac = self.microsecond as i64 / 10i64.pow(6 - self.fsp as u32);
        let unscaled = whole as i128 * 10i128.pow(self.fsp as u32) + frac as i128;
        Decimal::new(i256::from_i128(unscaled), self.fsp)
    }

    /// Time of day as a duration.
    pub fn to_duration(&self) -> Duration {
        let secs = self.hour as i64 * 3600 + self.minute as i64 * 60 + self.second as i64;
        Duration::new(secs * 1_000_000 + self.microsecond as i64, self.fsp)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;
        if self.kind == TimeKind::Date {
            return Ok(());
        }
        write!(f, " {:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.fsp > 0 {
            let frac = format!("{:06}", self.microsecond);
            write!(f, ".{}", &frac[..self.fsp as usize])?;
        }
        Ok(())
    }
}
