// Copyright (c) 2024 The Strand Project Authors.
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::{ErrorKind, HttpError};

/// HTTP protocol version.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Version {
    /// HTTP/1.0
    Http1_0,

    /// HTTP/1.1
    Http1_1,
}

impl Version {
    /// Gets the wire representation of this `Version`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http1_0 => "HTTP/1.0",
            Self::Http1_1 => "HTTP/1.1",
        }
    }

    /// Parses a `Version` from its wire representation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HttpError> {
        match bytes {
            b"HTTP/1.0" => Ok(Self::Http1_0),
            b"HTTP/1.1" => Ok(Self::Http1_1),
            _ => Err(ErrorKind::InvalidVersion.into()),
        }
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::Http1_1
    }
}
