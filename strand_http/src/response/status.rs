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

use core::fmt::{Display, Formatter};

use crate::error::{ErrorKind, HttpError};

/// An HTTP response status code in `100..=599`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusCode(u16);

impl StatusCode {
    /// 200 OK
    pub const OK: Self = Self(200);

    /// 204 No Content
    pub const NO_CONTENT: Self = Self(204);

    /// 206 Partial Content
    pub const PARTIAL_CONTENT: Self = Self(206);

    /// 304 Not Modified
    pub const NOT_MODIFIED: Self = Self(304);

    /// 404 Not Found
    pub const NOT_FOUND: Self = Self(404);

    /// 416 Range Not Satisfiable
    pub const RANGE_NOT_SATISFIABLE: Self = Self(416);

    /// 500 Internal Server Error
    pub const INTERNAL_SERVER_ERROR: Self = Self(500);

    /// Creates a `StatusCode` from an integer. Returns `Err` if the value is
    /// outside `100..=599`.
    pub fn from_u16(code: u16) -> Result<Self, HttpError> {
        if !(100..=599).contains(&code) {
            return Err(ErrorKind::InvalidStatus.into());
        }
        Ok(Self(code))
    }

    /// Parses a `StatusCode` from exactly three ASCII digits.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HttpError> {
        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_digit()) {
            return Err(ErrorKind::InvalidStatus.into());
        }
        let code = (bytes[0] - b'0') as u16 * 100
            + (bytes[1] - b'0') as u16 * 10
            + (bytes[2] - b'0') as u16;
        Self::from_u16(code)
    }

    /// Gets the status code as an integer.
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns `true` for 1xx status codes.
    pub fn is_informational(&self) -> bool {
        (100..200).contains(&self.0)
    }

    /// Returns `true` for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// Returns `true` for 4xx status codes.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// Returns `true` for 5xx status codes.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }
}

impl Display for StatusCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
