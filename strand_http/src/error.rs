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

//! Definition of `HttpError` which covers protocol-level failures such as
//! malformed URIs, headers or body framing.

use core::fmt::{Debug, Display, Formatter};
use std::error::Error;

/// Errors that occur while parsing or serializing HTTP protocol elements.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpError {
    kind: ErrorKind,
}

/// Error kinds which can indicate the type of an `HttpError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid HTTP method.
    InvalidMethod,

    /// Invalid URI.
    InvalidUri,

    /// Invalid header name or value.
    InvalidHeader,

    /// Invalid HTTP version.
    InvalidVersion,

    /// Invalid status line or status code.
    InvalidStatus,

    /// Invalid response head framing.
    InvalidResponse,

    /// Invalid chunk-size line or chunk framing.
    InvalidChunk,
}

impl HttpError {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Gets the `ErrorKind` of this `HttpError`.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl ErrorKind {
    /// Gets the string info of this `ErrorKind`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidMethod => "Invalid Method",
            Self::InvalidUri => "Invalid Uri",
            Self::InvalidHeader => "Invalid Header",
            Self::InvalidVersion => "Invalid Version",
            Self::InvalidStatus => "Invalid Status",
            Self::InvalidResponse => "Invalid Response",
            Self::InvalidChunk => "Invalid Chunk",
        }
    }
}

impl From<ErrorKind> for HttpError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl Debug for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HttpError")
            .field("ErrorKind", &self.kind)
            .finish()
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.kind.as_str())
    }
}

impl Error for HttpError {}

#[cfg(test)]
mod ut_http_error {
    use super::{ErrorKind, HttpError};

    /// UT test cases for `ErrorKind::as_str`.
    ///
    /// # Brief
    /// 1. Transfers each `ErrorKind` to str by calling `ErrorKind::as_str`.
    /// 2. Checks if the results are correct.
    #[test]
    fn ut_err_as_str() {
        assert_eq!(ErrorKind::InvalidMethod.as_str(), "Invalid Method");
        assert_eq!(ErrorKind::InvalidUri.as_str(), "Invalid Uri");
        assert_eq!(ErrorKind::InvalidChunk.as_str(), "Invalid Chunk");
        let err = HttpError::from(ErrorKind::InvalidResponse);
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
        assert_eq!(format!("{err}"), "Invalid Response");
    }
}
