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
//! Per-statement evaluation state.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tracing::debug;

use crate::common::app_config::SessionConfig;
use crate::common::config;
use crate::common::error::{CastError, Result};
use crate::types::Charset;

/// State shared by every cast evaluated for one statement.
///
/// Errors raised by kernels pass through [`EvalContext::handle_truncate`],
/// [`EvalContext::handle_overflow`] or [`EvalContext::handle_invalid_time`]:
/// strict statements get the error back, the others get it appended to the
/// warning list and continue with the kernel's fallback value.
#[derive(Clone, Debug)]
pub struct EvalContext {
    strict_mode: bool,
    no_zero_date: bool,
    time_zone: FixedOffset,
    stmt_time: DateTime<Utc>,
    max_allowed_packet: u64,
    charset: Charset,
    collation: String,
    warnings: Vec<CastError>,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}

impl EvalContext {
    /// A context initialised from the process configuration, if any.
    pub fn new() -> Self {
        let session = config::session();
        EvalContext {
            strict_mode: session.strict_mode,
            no_zero_date: session.no_zero_date,
            time_zone: config::session_time_zone(&session),
            stmt_time: Utc::now(),
            max_allowed_packet: session.max_allowed_packet,
            charset: config::session_charset(&session),
            collation: session.collation,
            warnings: Vec::new(),
        }
    }

    pub fn from_session_config(session: &SessionConfig) -> anyhow::Result<Self> {
        Ok(EvalContext {
            strict_mode: session.strict_mode,
            no_zero_date: session.no_zero_date,
            time_zone: session.time_zone_offset()?,
            stmt_time: Utc::now(),
            max_allowed_packet: session.max_allowed_packet,
            charset: session.charset()?,
            collation: session.collation.clone(),
            warnings: Vec::new(),
        })
    }

    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    pub fn with_no_zero_date(mut self, no_zero_date: bool) -> Self {
        self.no_zero_date = no_zero_date;
        self
    }

    pub fn with_time_zone(mut self, tz: FixedOffset) -> Self {
        self.time_zone = tz;
        self
    }

    pub fn with_stmt_time(mut self, stmt_time: DateTime<Utc>) -> Self {
        self.stmt_time = stmt_time;
        self
    }

    pub fn with_max_allowed_packet(mut self, bytes: u64) -> Self {
        self.max_allowed_packet = bytes;
        self
    }

    pub fn with_charset(mut self, charset: Charset, collation: impl Into<String>) -> Self {
        self.charset = charset;
        self.collation = collation.into();
        self
    }

    pub fn strict_mode(&self) -> bool {
        self.strict_mode
    }

    pub fn no_zero_date(&self) -> bool {
        self.no_zero_date
    }

    pub fn time_zone(&self) -> FixedOffset {
        self.time_zone
    }

    /// Statement start date in the session time zone.
    pub fn stmt_date(&self) -> NaiveDate {
        self.stmt_time.with_timezone(&self.time_zone).date_naive()
    }

    pub fn max_allowed_packet(&self) -> u64 {
        self.max_allowed_packet
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn collation(&self) -> &str {
        &self.collation
    }

    pub fn append_warning(&mut self, err: CastError) {
        debug!("cast warning: {}", err);
        self.warnings.push(err);
    }

    pub fn warnings(&self) -> &[CastError] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<CastError> {
        std::mem::take(&mut self.warnings)
    }

    fn downgrade(&mut self, err: CastError) -> Result<()> {
        if err.is_fatal() || self.strict_mode {
            return Err(err);
        }
        self.append_warning(err);
        Ok(())
    }

    /// Lost digits or characters.
    pub fn handle_truncate(&mut self, err: CastError) -> Result<()> {
        self.downgrade(err)
    }

    /// Values clamped to the target range.
    pub fn handle_overflow(&mut self, err: CastError) -> Result<()> {
        self.downgrade(err)
    }

    /// Unparseable or out-of-range temporal input; the caller yields NULL.
    pub fn handle_invalid_time(&mut self, err: CastError) -> Result<()> {
        self.downgrade(err)
    }
}
