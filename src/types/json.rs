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
use std::fmt;

use serde_json::Value as JsonValue;

use crate::common::error::{CastError, Result};
use crate::types::number::format_json_double;

/// JSON document. Object members are kept sorted by key length, then key
/// bytes, which is the order MySQL prints them in.
#[derive(Clone, Debug, PartialEq)]
pub enum Json {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Double(f64),
    String(String),
    Array(Vec<Json>),
    Object(Vec<(String, Json)>),
}

fn key_order(a: &str, b: &str) -> std::cmp::Ordering {
    a.len().cmp(&b.len()).then_with(|| a.as_bytes().cmp(b.as_bytes()))
}

impl Json {
    /// Builds an object; for duplicate keys the first occurrence wins.
    pub fn object<K: Into<String>>(members: impl IntoIterator<Item = (K, Json)>) -> Json {
        let mut out: Vec<(String, Json)> = Vec::new();
        for (k, v) in members {
            let k = k.into();
            if !out.iter().any(|(existing, _)| *existing == k) {
                out.push((k, v));
            }
        }
        out.sort_by(|a, b| key_order(&a.0, &b.0));
        Json::Object(out)
    }

    pub fn parse(text: &str) -> Result<Json> {
        let value: JsonValue = serde_json::from_str(text).map_err(CastError::invalid_json_text)?;
        Ok(Json::from_value(value))
    }

    pub fn from_value(value: JsonValue) -> Json {
        match value {
            JsonValue::Null => Json::Null,
            JsonValue::Bool(b) => Json::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Json::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Json::Uint(u)
                } else {
                    Json::Double(n.as_f64().unwrap_or(0.0))
                }
            }
            JsonValue::String(s) => Json::String(s),
            JsonValue::Array(items) => Json::Array(items.into_iter().map(Json::from_value).collect()),
            JsonValue::Object(map) => {
                Json::object(map.into_iter().map(|(k, v)| (k, Json::from_value(v))))
            }
        }
    }

    /// Type name as reported by `JSON_TYPE`.
    pub fn json_type(&self) -> &'static str {
        match self {
            Json::Null => "NULL",
            Json::Bool(_) => "BOOLEAN",
            Json::Int(_) => "INTEGER",
            Json::Uint(_) => "UNSIGNED INTEGER",
            Json::Double(_) => "DOUBLE",
            Json::String(_) => "STRING",
            Json::Array(_) => "ARRAY",
            Json::Object(_) => "OBJECT",
        }
    }

    /// Strings lose their quotes, every other node renders as JSON text.
    pub fn unquote(&self) -> String {
        match self {
            Json::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

fn write_json_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let escaped = serde_json::to_string(s).map_err(|_| fmt::Error)?;
    f.write_str(&escaped)
}

impl fmt::Display for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Json::Null => f.write_str("null"),
            Json::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Json::Int(i) => write!(f, "{i}"),
            Json::Uint(u) => write!(f, "{u}"),
            Json::Double(d) => f.write_str(&format_json_double(*d)),
            Json::String(s) => write_json_string(f, s),
            Json::Array(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Json::Object(members) => {
                f.write_str("{")?;
                for (idx, (key, value)) in members.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write_json_string(f, key)?;
                    write!(f, ": {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}
