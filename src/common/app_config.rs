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
use anyhow::{Context, Result, anyhow, bail};
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::types::Charset;

static CONFIG: OnceLock<CastConfig> = OnceLock::new();

fn default_log_level() -> String {
    "info".to_string()
}

pub fn init_from_path(path: impl AsRef<Path>) -> Result<&'static CastConfig> {
    if let Some(cfg) = CONFIG.get() {
        return Ok(cfg);
    }
    let cfg = CastConfig::load_from_file(path.as_ref())?;
    Ok(CONFIG.get_or_init(|| cfg))
}

pub fn init_from_env_or_default() -> Result<&'static CastConfig> {
    if let Some(cfg) = CONFIG.get() {
        return Ok(cfg);
    }
    let path = config_path_from_env_or_default()?;
    let cfg = CastConfig::load_from_file(&path)?;
    Ok(CONFIG.get_or_init(|| cfg))
}

pub fn config() -> Result<&'static CastConfig> {
    init_from_env_or_default()
}

fn config_path_from_env_or_default() -> Result<PathBuf> {
    if let Ok(p) = std::env::var("NOVAROCKS_CAST_CONFIG")
        && !p.trim().is_empty()
    {
        return Ok(PathBuf::from(p));
    }

    let candidate = PathBuf::from("novarocks_cast.toml");
    if candidate.exists() {
        return Ok(candidate);
    }

    Err(anyhow!(
        "missing config file: set $NOVAROCKS_CAST_CONFIG or create ./novarocks_cast.toml"
    ))
}

#[derive(Clone, Debug, Deserialize)]
pub struct CastConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Optional full tracing EnvFilter expression.
    /// If set, this takes precedence over `log_level`.
    /// Example: "novarocks_cast=debug"
    #[serde(default)]
    pub log_filter: Option<String>,

    #[serde(default)]
    pub session: SessionConfig,
}

impl CastConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config file: {}", path.display()))?;
        Self::from_toml_str(&s).with_context(|| format!("load config: {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: CastConfig = toml::from_str(s).context("parse toml")?;
        cfg.session.validate()?;
        Ok(cfg)
    }

    pub fn effective_log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(&self.log_level)
    }
}

impl Default for CastConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_filter: None,
            session: SessionConfig::default(),
        }
    }
}

/// Statement defaults applied when a caller does not configure a context.
#[derive(Clone, Debug, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_strict_mode")]
    pub strict_mode: bool,
    #[serde(default)]
    pub no_zero_date: bool,
    /// Fixed offset such as `+08:00`, or `UTC`.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_max_allowed_packet")]
    pub max_allowed_packet: u64,
    #[serde(default = "default_charset")]
    pub charset: String,
    #[serde(default = "default_collation")]
    pub collation: String,
}

fn default_strict_mode() -> bool {
    true
}
fn default_time_zone() -> String {
    "+00:00".to_string()
}
fn default_max_allowed_packet() -> u64 {
    64 * 1024 * 1024
}
fn default_charset() -> String {
    "utf8mb4".to_string()
}
fn default_collation() -> String {
    "utf8mb4_bin".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            strict_mode: default_strict_mode(),
            no_zero_date: false,
            time_zone: default_time_zone(),
            max_allowed_packet: default_max_allowed_packet(),
            charset: default_charset(),
            collation: default_collation(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        self.time_zone_offset()?;
        self.charset()?;
        if self.max_allowed_packet == 0 {
            bail!("session.max_allowed_packet must be positive");
        }
        Ok(())
    }

    pub fn time_zone_offset(&self) -> Result<FixedOffset> {
        parse_time_zone(&self.time_zone)
    }

    pub fn charset(&self) -> Result<Charset> {
        Charset::from_name(&self.charset)
            .ok_or_else(|| anyhow!("session.charset: unsupported charset '{}'", self.charset))
    }
}

/// Parses `±HH:MM` (or `UTC`) into a fixed offset.
pub fn parse_time_zone(s: &str) -> Result<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("utc") || s.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or_else(|| anyhow!("invalid time zone '{s}'"));
    }
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => bail!("invalid time zone '{s}': expected ±HH:MM"),
    };
    let (hh, mm) = rest
        .split_once(':')
        .ok_or_else(|| anyhow!("invalid time zone '{s}': expected ±HH:MM"))?;
    let hours: i32 = hh
        .parse()
        .with_context(|| format!("invalid time zone hours in '{s}'"))?;
    let minutes: i32 = mm
        .parse()
        .with_context(|| format!("invalid time zone minutes in '{s}'"))?;
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        bail!("time zone '{s}' out of range");
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| anyhow!("time zone '{s}' out of range"))
}
