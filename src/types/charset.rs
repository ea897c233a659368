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
//! The small charset table the cast engine needs: byte validation and
//! character counting. Collations are carried as names only.

use std::fmt;

pub const COLLATION_BIN: &str = "binary";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Charset {
    Binary,
    #[default]
    Utf8mb4,
    Utf8,
    Latin1,
    Ascii,
}

impl Charset {
    pub fn name(self) -> &'static str {
        match self {
            Charset::Binary => "binary",
            Charset::Utf8mb4 => "utf8mb4",
            Charset::Utf8 => "utf8",
            Charset::Latin1 => "latin1",
            Charset::Ascii => "ascii",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "binary" => Some(Charset::Binary),
            "utf8mb4" => Some(Charset::Utf8mb4),
            "utf8" | "utf8mb3" => Some(Charset::Utf8),
            "latin1" => Some(Charset::Latin1),
            "ascii" => Some(Charset::Ascii),
            _ => None,
        }
    }

    pub fn default_collation(self) -> &'static str {
        match self {
            Charset::Binary => COLLATION_BIN,
            Charset::Utf8mb4 => "utf8mb4_bin",
            Charset::Utf8 => "utf8_bin",
            Charset::Latin1 => "latin1_bin",
            Charset::Ascii => "ascii_bin",
        }
    }

    fn is_utf8_family(self) -> bool {
        matches!(self, Charset::Utf8mb4 | Charset::Utf8)
    }

    /// Length in characters. Bytes that do not decode count as one character each.
    pub fn char_len(self, bytes: &[u8]) -> usize {
        if !self.is_utf8_family() {
            return bytes.len();
        }
        match std::str::from_utf8(bytes) {
            Ok(s) => s.chars().count(),
            Err(_) => bytes.len(),
        }
    }

    /// Byte offset of the `n`-th character, or `bytes.len()` when shorter.
    pub fn char_boundary(self, bytes: &[u8], n: usize) -> usize {
        if !self.is_utf8_family() {
            return n.min(bytes.len());
        }
        match std::str::from_utf8(bytes) {
            Ok(s) => s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len()),
            Err(_) => n.min(bytes.len()),
        }
    }

    /// Offset of the first byte sequence that is not valid in this charset.
    pub fn first_invalid(self, bytes: &[u8]) -> Option<usize> {
        match self {
            Charset::Binary | Charset::Latin1 => None,
            Charset::Ascii => bytes.iter().position(|b| !b.is_ascii()),
            Charset::Utf8mb4 => std::str::from_utf8(bytes).err().map(|e| e.valid_up_to()),
            Charset::Utf8 => match std::str::from_utf8(bytes) {
                Err(e) => Some(e.valid_up_to()),
                Ok(s) => s.char_indices().find(|(_, c)| c.len_utf8() > 3).map(|(i, _)| i),
            },
        }
    }

    /// Replaces every invalid sequence by `?`.
    pub fn sanitize(self, bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(bytes.len());
        let mut rest = bytes;
        while let Some(pos) = self.first_invalid(rest) {
            out.extend_from_slice(&rest[..pos]);
            out.push(b'?');
            let skip = match self {
                Charset::Utf8mb4 | Charset::Utf8 => invalid_sequence_len(&rest[pos..]),
                _ => 1,
            };
            rest = &rest[pos + skip..];
        }
        out.extend_from_slice(rest);
        out
    }
}

fn invalid_sequence_len(bytes: &[u8]) -> usize {
    let valid = match std::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) if e.valid_up_to() == 0 => return e.error_len().unwrap_or(bytes.len()).max(1),
        Err(e) => std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
    };
    // a well-formed 4-byte character rejected by 3-byte utf8
    valid.chars().next().map(char::len_utf8).unwrap_or(1)
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
