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
use chrono::{FixedOffset, Offset, Utc};

use crate::common::app_config::{SessionConfig, config as cast_app_config};
use crate::types::Charset;

/// Session defaults from the process configuration, read once per call.
pub(crate) fn session() -> SessionConfig {
    cast_app_config()
        .map(|c| c.session.clone())
        .unwrap_or_default()
}

pub(crate) fn session_time_zone(session: &SessionConfig) -> FixedOffset {
    session.time_zone_offset().unwrap_or_else(|_| Utc.fix())
}

pub(crate) fn session_charset(session: &SessionConfig) -> Charset {
    session.charset().unwrap_or(Charset::Utf8mb4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_session_values_fall_back() {
        let session = SessionConfig {
            time_zone: "+25:00".to_string(),
            charset: "ebcdic".to_string(),
            ..SessionConfig::default()
        };
        assert_eq!(session_time_zone(&session).local_minus_utc(), 0);
        assert_eq!(session_charset(&session), Charset::Utf8mb4);
    }

    #[test]
    fn test_session_time_zone_reads_offset() {
        let session = SessionConfig {
            time_zone: "+08:00".to_string(),
            ..SessionConfig::default()
        };
        assert_eq!(session_time_zone(&session).local_minus_utc(), 8 * 3600);
    }
}
